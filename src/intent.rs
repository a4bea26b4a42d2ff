//! Tracker commands and intents.
//!
//! A presentation layer forwards user actions as [`Intent`]s wrapped in
//! a [`Command`]. Commands serialize to JSON so they can cross a UI
//! boundary unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quest::{QuestDraft, QuestId};
use crate::stats::StatsEdit;

/// Envelope for every tracker intent.
///
/// The timestamp is the "current time" seen by the quest store: it
/// becomes the creation or completion time of the affected quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Unique identifier for this request, carried into log events.
    pub request_id: Uuid,

    /// When the user acted.
    pub timestamp: DateTime<Utc>,

    /// What to do.
    pub intent: Intent,
}

impl Command {
    /// Wraps an intent stamped with the current time.
    #[must_use]
    pub fn new(intent: Intent) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            intent,
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets a custom request ID (useful for correlation).
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// A command completing `quest_id`.
    #[must_use]
    pub fn complete(quest_id: QuestId) -> Self {
        Self::new(Intent::CompleteQuest { quest_id })
    }

    /// A command reopening `quest_id`.
    #[must_use]
    pub fn undo(quest_id: QuestId) -> Self {
        Self::new(Intent::UndoQuest { quest_id })
    }

    /// A command toggling `quest_id`.
    #[must_use]
    pub fn toggle(quest_id: QuestId) -> Self {
        Self::new(Intent::ToggleQuest { quest_id })
    }

    /// A command applying a manual stats edit.
    #[must_use]
    pub fn edit_stats(edit: StatsEdit) -> Self {
        Self::new(Intent::EditStats(edit))
    }
}

/// Everything a user can ask the tracker to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    /// Append a new quest.
    CreateQuest(QuestDraft),

    /// Mark a quest done and grant its reward.
    CompleteQuest {
        /// Target quest.
        quest_id: QuestId,
    },

    /// Reopen a completed quest and take its reward back.
    UndoQuest {
        /// Target quest.
        quest_id: QuestId,
    },

    /// Complete if open, undo if completed.
    ToggleQuest {
        /// Target quest.
        quest_id: QuestId,
    },

    /// Overwrite level, experience or gold.
    EditStats(StatsEdit),
}

impl Intent {
    /// Short name for log events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateQuest(_) => "create_quest",
            Self::CompleteQuest { .. } => "complete_quest",
            Self::UndoQuest { .. } => "undo_quest",
            Self::ToggleQuest { .. } => "toggle_quest",
            Self::EditStats(_) => "edit_stats",
        }
    }
}
