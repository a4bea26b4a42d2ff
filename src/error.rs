//! Error types for questlog.
//!
//! Progression and quest store operations are total and never fail.
//! Errors only appear at the edges: building quests, loading
//! configuration, and serializing snapshots.

use thiserror::Error;

/// Validation errors raised while checking caller-supplied input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required builder field was never set.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// A text field was empty after trimming.
    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        /// Name of the empty field.
        field: String,
    },

    /// A quest names a category the catalog does not hold.
    #[error("Unknown category: {name}")]
    UnknownCategory {
        /// The category name as given.
        name: String,
    },

    /// A frequency string did not parse.
    #[error("Unknown frequency '{value}', expected daily, weekly or challenge")]
    UnknownFrequency {
        /// The rejected input, lowercased.
        value: String,
    },

    /// Two catalog entries share a name.
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName {
        /// Either `"category"` or `"perk"`.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// The level curve would not grow.
    #[error("Invalid level curve: {reason}")]
    InvalidCurve {
        /// What is wrong with the curve.
        reason: String,
    },

    /// A perk unlocks below level 1.
    #[error("Perk '{name}' must unlock at level 1 or above")]
    InvalidUnlockLevel {
        /// The perk's name.
        name: String,
    },
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for a config.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but failed validation.
    #[error("Invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// Top-level error type for questlog.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Caller input was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded or was invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON encoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TrackerError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a config error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_empty_field() {
        let err = ValidationError::EmptyField {
            field: "name".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("name"));
        assert!(msg.contains("cannot be empty"));
    }

    #[test]
    fn test_validation_error_unknown_category() {
        let err = ValidationError::UnknownCategory {
            name: "Cooking".to_string(),
        };
        assert_eq!(format!("{err}"), "Unknown category: Cooking");
    }

    #[test]
    fn test_config_error_from_parse() {
        let parse_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(format!("{err}").starts_with("Failed to parse config"));
    }

    #[test]
    fn test_tracker_error_from_validation() {
        let err: TrackerError = ValidationError::MissingField {
            field: "description".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_config());
    }

    #[test]
    fn test_tracker_error_from_config() {
        let err: TrackerError = ConfigError::Invalid(ValidationError::InvalidCurve {
            reason: "growth must exceed 1".to_string(),
        })
        .into();
        assert!(err.is_config());
        assert!(format!("{err}").contains("growth must exceed 1"));
    }
}
