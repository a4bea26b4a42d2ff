//! The tracker: the session's single state container.
//!
//! [`Tracker`] owns the character stats and the quest store. Every
//! mutation goes through it, so stats only ever change through the
//! progression engine and quests only through the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::catalog::{find_category, PerkId};
use crate::config::TrackerConfig;
use crate::error::{TrackerResult, ValidationError};
use crate::intent::{Command, Intent};
use crate::operations::QuestBuilder;
use crate::progression::{self, ProgressionOutcome};
use crate::quest::{Quest, QuestDraft, QuestId};
use crate::seed;
use crate::stats::{CharacterStats, StatsEdit, PROGRESS_SEGMENTS};
use crate::storage::{InMemoryQuestStore, QuestFilter, QuestStore, Transition};

/// Level and perk changes caused by one intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    /// Level before the intent.
    pub previous_level: u32,
    /// Level after the intent.
    pub level: u32,
    /// Perks that became available.
    pub unlocked: Vec<PerkId>,
    /// Perks that were taken away.
    pub locked: Vec<PerkId>,
}

impl LevelChange {
    fn none(level: u32) -> Self {
        Self {
            previous_level: level,
            level,
            unlocked: Vec::new(),
            locked: Vec::new(),
        }
    }

    /// Returns true if neither level nor perks changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.previous_level == self.level && self.unlocked.is_empty() && self.locked.is_empty()
    }
}

impl From<&ProgressionOutcome> for LevelChange {
    fn from(outcome: &ProgressionOutcome) -> Self {
        Self {
            previous_level: outcome.previous_level,
            level: outcome.stats.level,
            unlocked: outcome.unlocked.clone(),
            locked: outcome.locked.clone(),
        }
    }
}

/// Result of completing, undoing or toggling a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestUpdate {
    /// What the store did with the quest.
    pub transition: Transition,
    /// Progression caused by the transition's reward.
    pub level_change: LevelChange,
}

/// Result of executing a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackerResponse {
    /// A quest was appended.
    Created {
        /// The stored quest with its assigned ID.
        quest: Quest,
    },

    /// A complete request was handled (possibly as a no-op).
    Completed {
        /// Store transition and progression.
        update: QuestUpdate,
    },

    /// An undo request was handled (possibly as a no-op).
    Undone {
        /// Store transition and progression.
        update: QuestUpdate,
    },

    /// Stats were overwritten and resynchronized.
    StatsEdited {
        /// Level and perk changes from the resync.
        level_change: LevelChange,
    },
}

/// Experience bar values for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    /// Rounded percentage of the threshold reached.
    pub percent: u32,
    /// Bar segments filled, floored.
    pub filled_segments: u32,
    /// Bar segments in total.
    pub total_segments: u32,
    /// Experience still missing for the next level.
    pub xp_to_next_level: u64,
}

impl ProgressView {
    fn of(stats: &CharacterStats) -> Self {
        Self {
            percent: stats.xp_progress_percent(),
            filled_segments: stats.filled_segments(PROGRESS_SEGMENTS),
            total_segments: PROGRESS_SEGMENTS,
            xp_to_next_level: stats.xp_to_next_level(),
        }
    }
}

/// Immutable copy of the whole session state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Character stats.
    pub stats: CharacterStats,
    /// Every quest in creation order.
    pub quests: Vec<Quest>,
    /// Experience bar values derived from `stats`.
    pub progress: ProgressView,
    /// When the copy was made.
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Serializes the snapshot as JSON.
    pub fn to_json(&self) -> TrackerResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Quest tracker session.
///
/// # Examples
///
/// ```
/// use questlog::{Tracker, TrackerConfig};
///
/// let mut tracker = Tracker::new(TrackerConfig::default()).unwrap();
/// let draft = tracker
///     .quest_builder()
///     .name("Stretch")
///     .description("Ten minutes of stretching")
///     .xp(120)
///     .build()
///     .unwrap();
/// let quest = tracker.create_quest(draft).unwrap();
///
/// let update = tracker.complete_quest(quest.id);
/// assert!(update.transition.changed);
/// assert_eq!(tracker.stats().level, 2);
/// assert_eq!(tracker.stats().xp, 20);
/// ```
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    stats: CharacterStats,
    quests: Box<dyn QuestStore>,
}

impl Tracker {
    /// Creates a tracker with an empty in-memory quest store.
    pub fn new(config: TrackerConfig) -> TrackerResult<Self> {
        Self::with_store(config, Box::new(InMemoryQuestStore::new()))
    }

    /// Creates a tracker over the given store.
    ///
    /// Rewards of quests the store already holds as completed are
    /// applied to the starting stats in creation order, so undoing one
    /// later only takes back what was granted.
    pub fn with_store(config: TrackerConfig, store: Box<dyn QuestStore>) -> TrackerResult<Self> {
        config.validate()?;
        let mut stats = config.initial_stats();
        for quest in store.list(&QuestFilter::all()).iter().filter(|q| q.completed) {
            debug!(quest_id = %quest.id, xp = quest.xp, gold = quest.gold, "replaying reward");
            stats = progression::apply_reward(&stats, &config.curve, quest.reward()).stats;
        }
        Ok(Self {
            config,
            stats,
            quests: store,
        })
    }

    /// Creates a tracker preloaded with the starter quests.
    ///
    /// Starter quests whose category is missing from the configured
    /// catalog are skipped.
    pub fn seeded(config: TrackerConfig) -> TrackerResult<Self> {
        let mut tracker = Self::new(config)?;
        let now = Utc::now();
        for draft in seed::starter_quests() {
            if let Err(err) = tracker.create_quest_at(draft, now) {
                warn!(error = %err, "skipping starter quest");
            }
        }
        Ok(tracker)
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current character stats.
    #[must_use]
    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    /// Looks up one quest.
    #[must_use]
    pub fn quest(&self, id: QuestId) -> Option<Quest> {
        self.quests.get(id)
    }

    /// Quests matching `filter`, in creation order.
    #[must_use]
    pub fn quests(&self, filter: &QuestFilter) -> Vec<Quest> {
        self.quests.list(filter)
    }

    /// Category names used by at least one quest, for filter controls.
    #[must_use]
    pub fn categories_in_use(&self) -> Vec<String> {
        self.quests.categories_in_use()
    }

    /// A quest builder defaulting to the first catalog category.
    #[must_use]
    pub fn quest_builder(&self) -> QuestBuilder {
        match self.stats.categories.first() {
            Some(category) => QuestBuilder::new().category(category.name.clone()),
            None => QuestBuilder::new(),
        }
    }

    /// Appends a quest.
    ///
    /// Text fields are trimmed and must not be blank, and the category
    /// must exist in the catalog.
    pub fn create_quest(&mut self, draft: QuestDraft) -> TrackerResult<Quest> {
        self.create_quest_at(draft, Utc::now())
    }

    fn create_quest_at(&mut self, draft: QuestDraft, now: DateTime<Utc>) -> TrackerResult<Quest> {
        let draft = draft.validate()?;
        if find_category(&self.stats.categories, &draft.category).is_none() {
            return Err(ValidationError::UnknownCategory {
                name: draft.category,
            }
            .into());
        }
        Ok(self.quests.create(draft, now))
    }

    /// Completes a quest and applies its reward.
    ///
    /// Completed or unknown quests are left alone and nothing is awarded.
    pub fn complete_quest(&mut self, id: QuestId) -> QuestUpdate {
        self.complete_quest_at(id, Utc::now())
    }

    fn complete_quest_at(&mut self, id: QuestId, now: DateTime<Utc>) -> QuestUpdate {
        let transition = self.quests.complete(id, now);
        if !transition.changed {
            warn!(quest_id = %id, "complete ignored");
            return self.unchanged(transition);
        }

        let outcome = progression::apply_reward(&self.stats, &self.config.curve, transition.reward);
        self.commit(transition, &outcome)
    }

    /// Reopens a completed quest and reverses its reward.
    pub fn undo_quest(&mut self, id: QuestId) -> QuestUpdate {
        let transition = self.quests.undo(id);
        if !transition.changed {
            warn!(quest_id = %id, "undo ignored");
            return self.unchanged(transition);
        }

        let outcome = progression::reverse_reward(&self.stats, &self.config.curve, transition.reward);
        self.commit(transition, &outcome)
    }

    /// Completes an open quest or undoes a completed one.
    pub fn toggle_quest(&mut self, id: QuestId) -> QuestUpdate {
        self.toggle_quest_at(id, Utc::now())
    }

    fn toggle_quest_at(&mut self, id: QuestId, now: DateTime<Utc>) -> QuestUpdate {
        match self.quests.get(id) {
            Some(quest) if quest.completed => self.undo_quest(id),
            _ => self.complete_quest_at(id, now),
        }
    }

    /// Overwrites level, experience or gold, then restores thresholds
    /// and perks from the resulting level.
    pub fn edit_stats(&mut self, edit: StatsEdit) -> LevelChange {
        if edit.is_empty() {
            return LevelChange::none(self.stats.level);
        }
        let outcome = progression::apply_edit(&self.stats, &self.config.curve, edit);
        let change = LevelChange::from(&outcome);
        info!(
            level = outcome.stats.level,
            xp = outcome.stats.xp,
            gold = outcome.stats.gold,
            "stats edited"
        );
        self.stats = outcome.stats;
        change
    }

    /// Executes a command.
    pub fn execute(&mut self, command: Command) -> TrackerResult<TrackerResponse> {
        let span = info_span!(
            "intent",
            request_id = %command.request_id,
            op = command.intent.name()
        );
        let _guard = span.enter();
        let now = command.timestamp;

        let response = match command.intent {
            Intent::CreateQuest(draft) => TrackerResponse::Created {
                quest: self.create_quest_at(draft, now)?,
            },
            Intent::CompleteQuest { quest_id } => TrackerResponse::Completed {
                update: self.complete_quest_at(quest_id, now),
            },
            Intent::UndoQuest { quest_id } => TrackerResponse::Undone {
                update: self.undo_quest(quest_id),
            },
            Intent::ToggleQuest { quest_id } => {
                let was_completed = self.quests.get(quest_id).is_some_and(|q| q.completed);
                let update = self.toggle_quest_at(quest_id, now);
                if was_completed {
                    TrackerResponse::Undone { update }
                } else {
                    TrackerResponse::Completed { update }
                }
            }
            Intent::EditStats(edit) => TrackerResponse::StatsEdited {
                level_change: self.edit_stats(edit),
            },
        };
        Ok(response)
    }

    /// Copies the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stats: self.stats.clone(),
            quests: self.quests.list(&QuestFilter::all()),
            progress: ProgressView::of(&self.stats),
            taken_at: Utc::now(),
        }
    }

    fn unchanged(&self, transition: Transition) -> QuestUpdate {
        QuestUpdate {
            transition,
            level_change: LevelChange::none(self.stats.level),
        }
    }

    fn commit(&mut self, transition: Transition, outcome: &ProgressionOutcome) -> QuestUpdate {
        let change = LevelChange::from(outcome);
        if outcome.leveled_up() {
            info!(from = change.previous_level, to = change.level, "level up");
        } else if outcome.leveled_down() {
            info!(from = change.previous_level, to = change.level, "level down");
        }
        for perk in &change.unlocked {
            info!(perk_id = %perk, "perk unlocked");
        }
        for perk in &change.locked {
            info!(perk_id = %perk, "perk locked");
        }
        debug!(
            xp = outcome.stats.xp,
            gold = outcome.stats.gold,
            next_level_xp = outcome.stats.next_level_xp,
            "stats updated"
        );

        self.stats = outcome.stats.clone();
        QuestUpdate {
            transition,
            level_change: change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::Frequency;

    fn tracker() -> Tracker {
        Tracker::new(TrackerConfig::default()).unwrap()
    }

    fn add(tracker: &mut Tracker, xp: u64, gold: u64) -> QuestId {
        let draft = tracker
            .quest_builder()
            .name("Quest")
            .description("Do the thing")
            .xp(xp)
            .gold(gold)
            .build()
            .unwrap();
        tracker.create_quest(draft).unwrap().id
    }

    #[test]
    fn test_quest_builder_defaults_to_first_category() {
        let t = tracker();
        let draft = t.quest_builder().name("n").description("d").build().unwrap();
        assert_eq!(draft.category, "Fitness");
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let mut t = tracker();
        let draft = QuestBuilder::new()
            .name("Bake bread")
            .description("Sourdough")
            .category("Cooking")
            .build()
            .unwrap();
        let err = t.create_quest(draft).unwrap_err();
        assert!(err.is_validation());
        assert!(t.quests(&QuestFilter::all()).is_empty());
    }

    #[test]
    fn test_complete_and_undo_round_trip() {
        let mut t = tracker();
        let before = t.stats().clone();
        let id = add(&mut t, 130, 10);

        let update = t.complete_quest(id);
        assert!(update.transition.changed);
        assert_eq!(update.level_change.level, 2);
        assert_eq!(t.stats().xp, 30);
        assert_eq!(t.stats().gold, 10);

        let update = t.undo_quest(id);
        assert!(update.transition.changed);
        assert_eq!(update.level_change.previous_level, 2);
        assert_eq!(t.stats(), &before);
    }

    #[test]
    fn test_double_complete_awards_once() {
        let mut t = tracker();
        let id = add(&mut t, 40, 5);
        t.complete_quest(id);
        let after_first = t.snapshot();

        let update = t.complete_quest(id);
        assert!(!update.transition.changed);
        assert!(update.level_change.is_empty());
        let after_second = t.snapshot();
        assert_eq!(after_first.stats, after_second.stats);
        assert_eq!(after_first.quests, after_second.quests);
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut t = tracker();
        let id = add(&mut t, 40, 5);
        t.toggle_quest(id);
        assert!(t.quest(id).unwrap().completed);
        assert_eq!(t.stats().xp, 40);
        t.toggle_quest(id);
        assert!(!t.quest(id).unwrap().completed);
        assert_eq!(t.stats().xp, 0);
    }

    #[test]
    fn test_edit_stats_resyncs() {
        let mut t = tracker();
        let change = t.edit_stats(StatsEdit::default().level(2).gold(300));
        assert_eq!(change.previous_level, 1);
        assert_eq!(change.level, 2);
        assert_eq!(change.unlocked.len(), 1);
        assert_eq!(t.stats().next_level_xp, 150);
        assert_eq!(t.stats().gold, 300);
        assert!(t.stats().perks_in_sync());

        let noop = t.edit_stats(StatsEdit::default());
        assert!(noop.is_empty());
    }

    #[test]
    fn test_execute_uses_command_timestamp() {
        let mut t = tracker();
        let created_at = Utc::now() - chrono::Duration::hours(2);
        let cmd = t
            .quest_builder()
            .name("Weekly review")
            .description("Plan the week")
            .frequency(Frequency::Weekly)
            .into_command()
            .unwrap()
            .at(created_at);
        let TrackerResponse::Created { quest } = t.execute(cmd).unwrap() else {
            panic!("expected created response");
        };
        assert_eq!(quest.created_at, created_at);

        let done_at = created_at + chrono::Duration::minutes(30);
        let resp = t.execute(Command::toggle(quest.id).at(done_at)).unwrap();
        let TrackerResponse::Completed { update } = resp else {
            panic!("expected completed response");
        };
        assert_eq!(update.transition.quest.unwrap().completed_at, Some(done_at));

        let resp = t.execute(Command::toggle(quest.id)).unwrap();
        assert!(matches!(resp, TrackerResponse::Undone { .. }));
    }

    #[test]
    fn test_snapshot_progress() {
        let mut t = tracker();
        let id = add(&mut t, 80, 0);
        t.complete_quest(id);
        let snap = t.snapshot();
        assert_eq!(snap.progress.percent, 80);
        assert_eq!(snap.progress.filled_segments, 8);
        assert_eq!(snap.progress.xp_to_next_level, 20);
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"next_level_xp\":100"));
    }

    #[test]
    fn test_seeded_tracker() {
        let t = Tracker::seeded(TrackerConfig::default()).unwrap();
        let names: Vec<String> = t.quests(&QuestFilter::all()).into_iter().map(|q| q.name).collect();
        assert_eq!(names, vec!["Morning Workout", "Study Session", "Social Challenge"]);
        assert_eq!(t.categories_in_use(), vec!["Fitness", "Learning", "Social"]);
    }

    #[test]
    fn test_deserialized_blank_draft_is_rejected() {
        let mut t = tracker();
        let json = r#"{"op":"create_quest","payload":{"name":"   ","description":"","xp":5,"gold":1,"category":"Fitness","frequency":"daily"}}"#;
        let intent: Intent = serde_json::from_str(json).unwrap();

        let err = t.execute(Command::new(intent)).unwrap_err();
        assert!(err.is_validation());
        assert!(t.quests(&QuestFilter::all()).is_empty());
    }

    #[test]
    fn test_created_quest_is_trimmed() {
        let mut t = tracker();
        let draft = QuestDraft {
            name: " Stretch ".to_string(),
            description: "Ten minutes".to_string(),
            xp: 10,
            gold: 0,
            category: " Fitness ".to_string(),
            frequency: Frequency::Daily,
        };
        let quest = t.create_quest(draft).unwrap();
        assert_eq!(quest.name, "Stretch");
        assert_eq!(quest.category, "Fitness");
    }

    #[test]
    fn test_with_store_replays_completed_rewards() {
        let mut store = InMemoryQuestStore::new();
        let draft = QuestDraft {
            name: "Stretch".to_string(),
            description: "Ten minutes".to_string(),
            xp: 120,
            gold: 5,
            category: "Fitness".to_string(),
            frequency: Frequency::Daily,
        };
        let open = store.create(draft.clone(), Utc::now()).id;
        let done = store.create(draft, Utc::now()).id;
        store.complete(done, Utc::now());

        let mut t = Tracker::with_store(TrackerConfig::default(), Box::new(store)).unwrap();
        assert_eq!(t.stats().level, 2);
        assert_eq!(t.stats().xp, 20);
        assert_eq!(t.stats().gold, 5);
        assert!(t.stats().perks_in_sync());

        t.undo_quest(done);
        let stats = t.stats();
        assert_eq!((stats.level, stats.xp, stats.gold, stats.next_level_xp), (1, 0, 0, 100));

        t.complete_quest(open);
        assert_eq!(t.stats().level, 2);
    }
}
