//! # questlog - quests, experience and levels for a to-do list
//!
//! questlog turns a to-do list into a role-playing progression: every
//! quest carries an experience and gold reward, experience raises the
//! character's level, and perks unlock as the level climbs. Undoing a
//! quest takes its reward back, levelling down if needed.
//!
//! ## Core Concepts
//!
//! - **Quest**: a to-do item with xp/gold rewards, a category and a frequency
//! - **CharacterStats**: level, experience, gold, threshold, categories and perks
//! - **Progression**: pure functions applying or reversing a reward
//! - **QuestStore**: insertion-ordered quest collection with idempotent transitions
//! - **Tracker**: the session state container every intent goes through
//!
//! ## Usage
//!
//! ```rust
//! use questlog::{QuestFilter, Tracker, TrackerConfig};
//!
//! let mut tracker = Tracker::seeded(TrackerConfig::default())?;
//! let workout = tracker.quests(&QuestFilter::all())[0].id;
//!
//! tracker.complete_quest(workout);
//! assert_eq!(tracker.stats().xp, 50);
//! assert_eq!(tracker.stats().gold, 10);
//!
//! tracker.undo_quest(workout);
//! assert_eq!(tracker.stats().xp, 0);
//! # Ok::<(), questlog::TrackerError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Data model
pub mod catalog;
pub mod error;
pub mod quest;
pub mod stats;

// Rules and state
pub mod config;
pub mod engine;
pub mod intent;
pub mod operations;
pub mod progression;
pub mod seed;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use catalog::{Category, CategoryId, Perk, PerkId};
pub use config::{CategoryConfig, PerkConfig, TrackerConfig};
pub use engine::{LevelChange, ProgressView, QuestUpdate, Snapshot, Tracker, TrackerResponse};
pub use error::{ConfigError, TrackerError, TrackerResult, ValidationError};
pub use intent::{Command, Intent};
pub use operations::QuestBuilder;
pub use progression::{apply_reward, reverse_reward, LevelCurve, ProgressionOutcome, Reward};
pub use quest::{Frequency, Quest, QuestDraft, QuestId};
pub use stats::{CharacterStats, StatsEdit};
pub use storage::{InMemoryQuestStore, QuestFilter, QuestStore, Transition};
