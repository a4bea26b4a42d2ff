//! Quest storage.
//!
//! [`QuestStore`] is the contract; [`InMemoryQuestStore`] is the
//! session-scoped implementation.

mod memory;
mod traits;

pub use memory::InMemoryQuestStore;
pub use traits::{QuestFilter, QuestStore, Transition};
