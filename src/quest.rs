//! Quest records and identifiers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::progression::Reward;

/// Unique, opaque quest identifier.
///
/// # Examples
///
/// ```
/// use questlog::QuestId;
///
/// let a = QuestId::new();
/// let b = QuestId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(Uuid);

impl QuestId {
    /// Creates a new random quest ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a quest ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for QuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for QuestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// How often a quest recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Repeats every day.
    #[default]
    Daily,
    /// Repeats every week.
    Weekly,
    /// One-off, usually larger reward.
    Challenge,
}

impl Frequency {
    /// All frequencies in display order.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Challenge];

    /// Lowercase name, as written in JSON and config files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Challenge => "challenge",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "challenge" => Ok(Self::Challenge),
            other => Err(ValidationError::UnknownFrequency {
                value: other.to_string(),
            }),
        }
    }
}

/// Input for a new quest.
///
/// Usually produced by [`crate::QuestBuilder::build`], but a draft can
/// also arrive deserialized inside an intent, so the tracker runs
/// [`QuestDraft::validate`] again before storing it. The store assigns
/// the ID and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDraft {
    /// Short title.
    pub name: String,
    /// What has to be done.
    pub description: String,
    /// Experience granted on completion.
    pub xp: u64,
    /// Gold granted on completion.
    pub gold: u64,
    /// Category name from the catalog.
    pub category: String,
    /// Recurrence.
    pub frequency: Frequency,
}

impl QuestDraft {
    /// Trims the text fields and rejects any that end up blank.
    ///
    /// Returns `ValidationError::EmptyField` naming the first blank field.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = non_blank("name", &self.name)?;
        self.description = non_blank("description", &self.description)?;
        self.category = non_blank("category", &self.category)?;
        Ok(self)
    }
}

fn non_blank(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// A to-do item carrying experience and gold rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    /// Store-assigned identifier.
    pub id: QuestId,
    /// Short title.
    pub name: String,
    /// What has to be done.
    pub description: String,
    /// Experience granted on completion.
    pub xp: u64,
    /// Gold granted on completion.
    pub gold: u64,
    /// Category name; resolved against the catalog for display.
    pub category: String,
    /// Recurrence.
    pub frequency: Frequency,
    /// Whether the reward is currently granted.
    pub completed: bool,
    /// When the store accepted the quest.
    pub created_at: DateTime<Utc>,
    /// Present exactly when `completed` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Quest {
    /// Materializes a draft into an open quest.
    #[must_use]
    pub fn from_draft(id: QuestId, draft: QuestDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            xp: draft.xp,
            gold: draft.gold,
            category: draft.category,
            frequency: draft.frequency,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Experience and gold granted on completion.
    #[must_use]
    pub const fn reward(&self) -> Reward {
        Reward::new(self.xp, self.gold)
    }

    pub(crate) fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    pub(crate) fn mark_open(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestDraft {
        QuestDraft {
            name: "Morning Workout".to_string(),
            description: "Complete a 30-minute workout session".to_string(),
            xp: 50,
            gold: 10,
            category: "Fitness".to_string(),
            frequency: Frequency::Daily,
        }
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!(" Challenge ".parse::<Frequency>().unwrap(), Frequency::Challenge);
        assert!(matches!(
            "monthly".parse::<Frequency>(),
            Err(ValidationError::UnknownFrequency { .. })
        ));
    }

    #[test]
    fn test_frequency_defaults_to_daily() {
        assert_eq!(Frequency::default(), Frequency::Daily);
    }

    #[test]
    fn test_validate_trims_fields() {
        let raw = QuestDraft {
            name: "  Morning Workout ".to_string(),
            category: " Fitness".to_string(),
            ..draft()
        };
        let clean = raw.validate().unwrap();
        assert_eq!(clean, draft());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let blank_name = QuestDraft {
            name: "   ".to_string(),
            ..draft()
        };
        assert!(matches!(
            blank_name.validate(),
            Err(ValidationError::EmptyField { field }) if field == "name"
        ));

        let blank_description = QuestDraft {
            description: String::new(),
            ..draft()
        };
        assert!(matches!(
            blank_description.validate(),
            Err(ValidationError::EmptyField { field }) if field == "description"
        ));
    }

    #[test]
    fn test_frequency_serde_lowercase() {
        let json = serde_json::to_string(&Frequency::Challenge).unwrap();
        assert_eq!(json, "\"challenge\"");
    }

    #[test]
    fn test_completion_timestamp_tracks_flag() {
        let now = Utc::now();
        let mut quest = Quest::from_draft(QuestId::new(), draft(), now);
        assert!(!quest.completed);
        assert!(quest.completed_at.is_none());

        quest.mark_completed(now);
        assert!(quest.completed);
        assert_eq!(quest.completed_at, Some(now));

        quest.mark_open();
        assert!(!quest.completed);
        assert!(quest.completed_at.is_none());
    }

    #[test]
    fn test_open_quest_omits_completed_at() {
        let quest = Quest::from_draft(QuestId::new(), draft(), Utc::now());
        let json = serde_json::to_value(&quest).unwrap();
        assert!(json.get("completed_at").is_none());
        assert_eq!(json["frequency"], "daily");
    }
}
