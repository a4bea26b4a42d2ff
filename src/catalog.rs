//! Reward catalog: quest categories and level-gated perks.
//!
//! Quests refer to categories by name only. Perks are never unlocked
//! directly; their `unlocked` flag follows the character level and is
//! recomputed by the progression engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
    /// Creates a new random category ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a perk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerkId(Uuid);

impl PerkId {
    /// Creates a new random perk ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PerkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PerkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeling tag for quests, shown with its display color.
///
/// # Examples
///
/// ```
/// use questlog::Category;
///
/// let category = Category::new("Fitness", "#ef4444");
/// assert_eq!(category.name, "Fitness");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier.
    pub id: CategoryId,
    /// Unique within a catalog.
    pub name: String,
    /// CSS color, e.g. `#3b82f6`.
    pub color: String,
}

impl Category {
    /// Creates a category with a fresh ID.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A bonus gated by character level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perk {
    /// Stable identifier.
    pub id: PerkId,
    /// Display name.
    pub name: String,
    /// What the perk grants.
    pub description: String,
    /// Character level at which this perk unlocks.
    pub unlock_level: u32,
    /// Derived from the character level by the progression engine.
    pub unlocked: bool,
    /// Gold price, for perks that can be bought.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
}

impl Perk {
    /// Creates a locked perk with a fresh ID.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, unlock_level: u32) -> Self {
        Self {
            id: PerkId::new(),
            name: name.into(),
            description: description.into(),
            unlock_level,
            unlocked: false,
            cost: None,
        }
    }

    /// Sets a gold cost.
    #[must_use]
    pub fn with_cost(mut self, cost: u64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Returns true if a character at `level` has access to this perk.
    #[must_use]
    pub const fn is_available_at(&self, level: u32) -> bool {
        self.unlock_level <= level
    }
}

/// Finds a category by exact name.
#[must_use]
pub fn find_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.name == name)
}
