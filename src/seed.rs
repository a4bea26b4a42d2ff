//! Starter quests for a fresh session.

use crate::quest::{Frequency, QuestDraft};

fn draft(name: &str, description: &str, xp: u64, gold: u64, category: &str, frequency: Frequency) -> QuestDraft {
    QuestDraft {
        name: name.to_string(),
        description: description.to_string(),
        xp,
        gold,
        category: category.to_string(),
        frequency,
    }
}

/// The three quests a new player starts with, in display order.
#[must_use]
pub fn starter_quests() -> Vec<QuestDraft> {
    vec![
        draft(
            "Morning Workout",
            "Complete a 30-minute workout session",
            50,
            10,
            "Fitness",
            Frequency::Daily,
        ),
        draft(
            "Study Session",
            "Study a new programming concept for 1 hour",
            75,
            15,
            "Learning",
            Frequency::Daily,
        ),
        draft(
            "Social Challenge",
            "Attend a networking event",
            200,
            50,
            "Social",
            Frequency::Challenge,
        ),
    ]
}
