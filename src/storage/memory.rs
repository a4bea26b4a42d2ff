//! In-memory quest store.
//!
//! Quests live in a `Vec` in creation order with a side index from ID
//! to position. Quests are never removed, so positions stay valid.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::quest::{Quest, QuestDraft, QuestId};
use crate::storage::traits::{QuestFilter, QuestStore, Transition};

/// Insertion-ordered in-memory [`QuestStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryQuestStore {
    quests: Vec<Quest>,
    by_id: HashMap<QuestId, usize>,
}

impl InMemoryQuestStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self) -> QuestId {
        loop {
            let id = QuestId::new();
            if !self.by_id.contains_key(&id) {
                return id;
            }
        }
    }

    fn slot_mut(&mut self, id: QuestId) -> Option<&mut Quest> {
        let idx = *self.by_id.get(&id)?;
        self.quests.get_mut(idx)
    }
}

impl QuestStore for InMemoryQuestStore {
    fn create(&mut self, draft: QuestDraft, now: DateTime<Utc>) -> Quest {
        let id = self.fresh_id();
        let quest = Quest::from_draft(id, draft, now);
        self.by_id.insert(id, self.quests.len());
        self.quests.push(quest.clone());
        debug!(quest_id = %id, name = %quest.name, "quest created");
        quest
    }

    fn get(&self, id: QuestId) -> Option<Quest> {
        self.by_id
            .get(&id)
            .and_then(|&idx| self.quests.get(idx))
            .cloned()
    }

    fn complete(&mut self, id: QuestId, now: DateTime<Utc>) -> Transition {
        let Some(quest) = self.slot_mut(id) else {
            debug!(quest_id = %id, "complete ignored: unknown quest");
            return Transition::unchanged(None);
        };
        if quest.completed {
            debug!(quest_id = %id, "complete ignored: already completed");
            return Transition::unchanged(Some(quest.clone()));
        }

        quest.mark_completed(now);
        debug!(quest_id = %id, xp = quest.xp, gold = quest.gold, "quest completed");
        Transition::flipped(quest.clone())
    }

    fn undo(&mut self, id: QuestId) -> Transition {
        let Some(quest) = self.slot_mut(id) else {
            debug!(quest_id = %id, "undo ignored: unknown quest");
            return Transition::unchanged(None);
        };
        if !quest.completed {
            debug!(quest_id = %id, "undo ignored: quest is open");
            return Transition::unchanged(Some(quest.clone()));
        }

        quest.mark_open();
        debug!(quest_id = %id, xp = quest.xp, gold = quest.gold, "quest reopened");
        Transition::flipped(quest.clone())
    }

    fn list(&self, filter: &QuestFilter) -> Vec<Quest> {
        self.quests
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.quests.len()
    }
}
