//! Character stats aggregate and derived display values.

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Perk};

/// Number of segments in the experience bar.
pub const PROGRESS_SEGMENTS: u32 = 10;

/// The character profile: level, experience, gold and the reward catalog.
///
/// Mutated only by the progression engine (see [`crate::progression`])
/// and by [`StatsEdit`] followed by a resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Starts at 1, never below.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub xp: u64,
    /// Spendable currency.
    pub gold: u64,
    /// Experience required to leave the current level.
    pub next_level_xp: u64,
    /// Category catalog, in display order.
    pub categories: Vec<Category>,
    /// Perk catalog with unlock flags.
    pub perks: Vec<Perk>,
}

impl CharacterStats {
    /// Creates a level 1 character with no experience or gold.
    #[must_use]
    pub fn new(next_level_xp: u64, categories: Vec<Category>, perks: Vec<Perk>) -> Self {
        Self {
            level: 1,
            xp: 0,
            gold: 0,
            next_level_xp,
            categories,
            perks,
        }
    }

    /// Experience still needed to reach the next level.
    #[must_use]
    pub const fn xp_to_next_level(&self) -> u64 {
        self.next_level_xp.saturating_sub(self.xp)
    }

    /// Progress toward the next level as a rounded percentage.
    #[must_use]
    pub fn xp_progress_percent(&self) -> u32 {
        if self.next_level_xp == 0 {
            return 100;
        }
        let scaled = (u128::from(self.xp) * 200 + u128::from(self.next_level_xp))
            / (u128::from(self.next_level_xp) * 2);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    /// Number of filled segments in a bar of `segments` cells (floored).
    #[must_use]
    pub fn filled_segments(&self, segments: u32) -> u32 {
        if self.next_level_xp == 0 {
            return segments;
        }
        let filled = u128::from(self.xp) * u128::from(segments) / u128::from(self.next_level_xp);
        u32::try_from(filled).unwrap_or(u32::MAX).min(segments)
    }

    /// Perks currently unlocked, in catalog order.
    pub fn active_perks(&self) -> impl Iterator<Item = &Perk> {
        self.perks.iter().filter(|p| p.unlocked)
    }

    /// Returns true if every perk flag matches the current level.
    #[must_use]
    pub fn perks_in_sync(&self) -> bool {
        self.perks
            .iter()
            .all(|p| p.unlocked == p.is_available_at(self.level))
    }
}

/// A manual edit of the character's numeric fields.
///
/// Only level, experience and gold can be edited. Thresholds and perks
/// are always derived from the edited level afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsEdit {
    /// New level; values below 1 are raised to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// New experience; any excess over the threshold carries into levels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u64>,
    /// New gold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<u64>,
}

impl StatsEdit {
    /// Sets the level.
    #[must_use]
    pub fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the experience.
    #[must_use]
    pub fn xp(mut self, xp: u64) -> Self {
        self.xp = Some(xp);
        self
    }

    /// Sets the gold.
    #[must_use]
    pub fn gold(mut self, gold: u64) -> Self {
        self.gold = Some(gold);
        self
    }

    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.level.is_none() && self.xp.is_none() && self.gold.is_none()
    }

    /// Overwrites the named fields without restoring any invariant.
    pub(crate) fn write_into(&self, stats: &mut CharacterStats) {
        if let Some(level) = self.level {
            stats.level = level;
        }
        if let Some(xp) = self.xp {
            stats.xp = xp;
        }
        if let Some(gold) = self.gold {
            stats.gold = gold;
        }
    }
}
