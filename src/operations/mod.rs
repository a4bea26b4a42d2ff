//! Builders for tracker commands.
//!
//! These builders validate caller input before it reaches the tracker.

mod create_op;

pub use create_op::QuestBuilder;
