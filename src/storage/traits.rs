//! Abstract quest store contract.
//!
//! Every operation is total. Unknown identifiers and redundant
//! transitions are no-ops, since a stale view can send the same intent
//! twice before it re-renders.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::Reward;
use crate::quest::{Frequency, Quest, QuestDraft, QuestId};

/// Outcome of a complete or undo request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The quest after the request, or `None` if the ID is unknown.
    pub quest: Option<Quest>,
    /// Reward to apply or reverse. Zero when nothing changed.
    pub reward: Reward,
    /// Whether the quest's completion state flipped.
    pub changed: bool,
}

impl Transition {
    /// A transition that flipped `quest` and moves its reward.
    #[must_use]
    pub fn flipped(quest: Quest) -> Self {
        let reward = quest.reward();
        Self {
            quest: Some(quest),
            reward,
            changed: true,
        }
    }

    /// A transition that changed nothing.
    #[must_use]
    pub fn unchanged(quest: Option<Quest>) -> Self {
        Self {
            quest,
            reward: Reward::ZERO,
            changed: false,
        }
    }
}

/// Optional frequency and category filters. Absent means "match all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestFilter {
    /// Keep only quests with this frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    /// Keep only quests in the category with this name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl QuestFilter {
    /// A filter that matches every quest.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one frequency.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Restricts to one category name.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns true if `quest` passes both filters.
    #[must_use]
    pub fn matches(&self, quest: &Quest) -> bool {
        if self.frequency.is_some_and(|f| f != quest.frequency) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|c| c != quest.category)
        {
            return false;
        }
        true
    }
}

/// Ordered collection of quests.
///
/// Implementations must keep creation order for [`QuestStore::list`]
/// and never hand out an identifier twice.
pub trait QuestStore: fmt::Debug {
    /// Appends a new open quest created at `now`.
    fn create(&mut self, draft: QuestDraft, now: DateTime<Utc>) -> Quest;

    /// Get a quest by ID.
    fn get(&self, id: QuestId) -> Option<Quest>;

    /// Marks an open quest completed at `now`.
    ///
    /// No-op for completed or unknown quests.
    fn complete(&mut self, id: QuestId, now: DateTime<Utc>) -> Transition;

    /// Reopens a completed quest.
    ///
    /// No-op for open or unknown quests.
    fn undo(&mut self, id: QuestId) -> Transition;

    /// Quests matching `filter`, in creation order.
    fn list(&self, filter: &QuestFilter) -> Vec<Quest>;

    /// Number of quests.
    fn len(&self) -> usize;

    /// Returns true if the store holds no quests.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct category names in order of first appearance.
    fn categories_in_use(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for quest in self.list(&QuestFilter::all()) {
            if !seen.contains(&quest.category) {
                seen.push(quest.category);
            }
        }
        seen
    }
}
