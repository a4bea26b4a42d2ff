//! Tracker configuration.
//!
//! Defaults reproduce the stock profile: a 100 xp first level growing
//! by 1.5x, four categories and two perks. A TOML file can override any
//! part of it:
//!
//! ```toml
//! starting_gold = 25
//!
//! [curve]
//! base_threshold = 200
//!
//! [[perks]]
//! name = "Night Owl"
//! description = "Study after midnight"
//! level = 3
//! cost = 100
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Perk};
use crate::error::{ConfigError, ValidationError};
use crate::progression::{self, LevelCurve};
use crate::stats::CharacterStats;

/// A category entry in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Display name, unique in the file.
    pub name: String,
    /// CSS color.
    pub color: String,
}

/// A perk entry in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerkConfig {
    /// Display name, unique in the file.
    pub name: String,
    /// What the perk grants.
    #[serde(default)]
    pub description: String,
    /// Unlock level.
    pub level: u32,
    /// Optional gold price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Threshold growth.
    pub curve: LevelCurve,
    /// Level of a fresh character.
    pub starting_level: u32,
    /// Gold of a fresh character.
    pub starting_gold: u64,
    /// Category catalog.
    pub categories: Vec<CategoryConfig>,
    /// Perk catalog.
    pub perks: Vec<PerkConfig>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let category = |name: &str, color: &str| CategoryConfig {
            name: name.to_string(),
            color: color.to_string(),
        };
        Self {
            curve: LevelCurve::default(),
            starting_level: 1,
            starting_gold: 0,
            categories: vec![
                category("Fitness", "#ef4444"),
                category("Learning", "#3b82f6"),
                category("Social", "#10b981"),
                category("Productivity", "#f59e0b"),
            ],
            perks: vec![
                PerkConfig {
                    name: "Early Bird".to_string(),
                    description: "Wake up early for 7 days straight".to_string(),
                    level: 1,
                    cost: None,
                },
                PerkConfig {
                    name: "Bookworm".to_string(),
                    description: "Read for 30 minutes daily".to_string(),
                    level: 2,
                    cost: None,
                },
            ],
        }
    }
}

impl TrackerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks the curve and catalog.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.curve.validate()?;

        let mut names = HashSet::new();
        for category in &self.categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptyField {
                    field: "categories.name".to_string(),
                });
            }
            if !names.insert(name) {
                return Err(ValidationError::DuplicateName {
                    kind: "category",
                    name: name.to_string(),
                });
            }
        }

        for perk in &self.perks {
            if perk.name.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    field: "perks.name".to_string(),
                });
            }
            if perk.level == 0 {
                return Err(ValidationError::InvalidUnlockLevel {
                    name: perk.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builds the session's starting stats with perks in sync.
    #[must_use]
    pub fn initial_stats(&self) -> CharacterStats {
        let categories = self
            .categories
            .iter()
            .map(|c| Category::new(c.name.trim(), c.color.clone()))
            .collect();
        let perks = self
            .perks
            .iter()
            .map(|p| {
                let perk = Perk::new(p.name.trim(), p.description.clone(), p.level);
                match p.cost {
                    Some(cost) => perk.with_cost(cost),
                    None => perk,
                }
            })
            .collect();

        let mut stats = CharacterStats::new(self.curve.base_threshold, categories, perks);
        stats.level = self.starting_level;
        stats.gold = self.starting_gold;
        progression::resync(&stats, &self.curve).stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());

        let stats = config.initial_stats();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.xp, 0);
        assert_eq!(stats.gold, 0);
        assert_eq!(stats.next_level_xp, 100);
        assert_eq!(stats.categories.len(), 4);
        assert_eq!(stats.categories[0].name, "Fitness");
        // Early Bird unlocks at level 1.
        let unlocked: Vec<&str> = stats.active_perks().map(|p| p.name.as_str()).collect();
        assert_eq!(unlocked, vec!["Early Bird"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TrackerConfig::from_toml_str(
            r#"
            starting_gold = 25

            [curve]
            base_threshold = 200
            "#,
        )
        .unwrap();
        assert_eq!(config.starting_gold, 25);
        assert_eq!(config.curve.base_threshold, 200);
        assert_eq!(config.curve.growth_numerator, 3);
        assert_eq!(config.categories.len(), 4);

        let stats = config.initial_stats();
        assert_eq!(stats.gold, 25);
        assert_eq!(stats.next_level_xp, 200);
    }

    #[test]
    fn test_starting_level_derives_threshold() {
        let config = TrackerConfig::from_toml_str("starting_level = 3").unwrap();
        let stats = config.initial_stats();
        assert_eq!(stats.level, 3);
        assert_eq!(stats.next_level_xp, 225);
        assert!(stats.perks.iter().all(|p| p.unlocked));
    }

    #[test]
    fn test_custom_perks() {
        let config = TrackerConfig::from_toml_str(
            r#"
            [[perks]]
            name = "Night Owl"
            description = "Study after midnight"
            level = 3
            cost = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.perks.len(), 1);
        let stats = config.initial_stats();
        assert_eq!(stats.perks[0].cost, Some(100));
        assert!(!stats.perks[0].unlocked);
    }

    #[test]
    fn test_rejects_flat_curve() {
        let err = TrackerConfig::from_toml_str(
            r#"
            [curve]
            growth_numerator = 1
            growth_denominator = 1
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ValidationError::InvalidCurve { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_category() {
        let err = TrackerConfig::from_toml_str(
            r##"
            [[categories]]
            name = "Fitness"
            color = "#ef4444"

            [[categories]]
            name = "Fitness"
            color = "#000000"
            "##,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ValidationError::DuplicateName { kind: "category", .. })
        ));
    }

    #[test]
    fn test_rejects_level_zero_perk() {
        let err = TrackerConfig::from_toml_str(
            r#"
            [[perks]]
            name = "Nothing"
            level = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ValidationError::InvalidUnlockLevel { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        let err = TrackerConfig::from_toml_str("starting_level = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questlog.toml");
        std::fs::write(&path, "starting_gold = 7\n").unwrap();

        let config = TrackerConfig::load(&path).unwrap();
        assert_eq!(config.starting_gold, 7);

        let missing = TrackerConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
