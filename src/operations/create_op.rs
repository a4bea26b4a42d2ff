//! Quest creation builder.
//!
//! `QuestBuilder` mirrors the quest creation form: it starts from the
//! form's defaults and validates required fields before producing a
//! [`QuestDraft`] or a ready-to-execute [`Command`].

use crate::error::ValidationError;
use crate::intent::{Command, Intent};
use crate::quest::{Frequency, QuestDraft};

/// Default experience reward offered by the creation form.
pub const DEFAULT_XP: u64 = 50;

/// Default gold reward offered by the creation form.
pub const DEFAULT_GOLD: u64 = 10;

/// Builder for new quests.
///
/// # Example
/// ```
/// use questlog::{Frequency, QuestBuilder};
///
/// let draft = QuestBuilder::new()
///     .name("Study Session")
///     .description("Study a new programming concept for 1 hour")
///     .xp(75)
///     .gold(15)
///     .category("Learning")
///     .frequency(Frequency::Daily)
///     .build()
///     .unwrap();
/// assert_eq!(draft.xp, 75);
/// ```
#[derive(Debug, Clone)]
pub struct QuestBuilder {
    name: Option<String>,
    description: Option<String>,
    xp: u64,
    gold: u64,
    category: Option<String>,
    frequency: Frequency,
}

impl Default for QuestBuilder {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            xp: DEFAULT_XP,
            gold: DEFAULT_GOLD,
            category: None,
            frequency: Frequency::Daily,
        }
    }
}

impl QuestBuilder {
    /// Creates a builder with the form defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quest name (required).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description (required).
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the experience reward (default: 50).
    #[must_use]
    pub fn xp(mut self, xp: u64) -> Self {
        self.xp = xp;
        self
    }

    /// Set the gold reward (default: 10).
    #[must_use]
    pub fn gold(mut self, gold: u64) -> Self {
        self.gold = gold;
        self
    }

    /// Set the category name (required).
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the recurrence (default: daily).
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Build the draft.
    ///
    /// Returns `ValidationError::MissingField` if name, description or
    /// category is not set, and `ValidationError::EmptyField` if one is
    /// blank after trimming.
    pub fn build(self) -> Result<QuestDraft, ValidationError> {
        let name = required("name", self.name)?;
        let description = required("description", self.description)?;
        let category = required("category", self.category)?;

        QuestDraft {
            name,
            description,
            xp: self.xp,
            gold: self.gold,
            category,
            frequency: self.frequency,
        }
        .validate()
    }

    /// Build a create command.
    pub fn into_command(self) -> Result<Command, ValidationError> {
        Ok(Command::new(Intent::CreateQuest(self.build()?)))
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingField {
        field: field.to_string(),
    })
}
