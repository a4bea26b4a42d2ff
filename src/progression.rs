//! Progression engine: experience, gold, leveling and perk unlocks.
//!
//! Every function here is pure. It takes the current [`CharacterStats`]
//! and returns the next one inside a [`ProgressionOutcome`].
//!
//! The experience threshold is a function of level alone, given by a
//! [`LevelCurve`]. Leveling up multiplies the threshold by the growth
//! factor (floored); leveling down reads the threshold of the lower
//! level back from the curve, so a reward applied and then reversed
//! lands on exactly the same stats.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::catalog::PerkId;
use crate::error::ValidationError;
use crate::stats::{CharacterStats, StatsEdit};

/// Experience and gold carried by a quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    /// Experience points.
    pub xp: u64,
    /// Gold pieces.
    pub gold: u64,
}

impl Reward {
    /// A reward that changes nothing.
    pub const ZERO: Self = Self { xp: 0, gold: 0 };

    /// Creates a reward.
    #[must_use]
    pub const fn new(xp: u64, gold: u64) -> Self {
        Self { xp, gold }
    }

    /// Returns true if both amounts are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.xp == 0 && self.gold == 0
    }
}

/// Experience threshold growth from one level to the next.
///
/// The growth factor is the ratio `growth_numerator / growth_denominator`
/// so thresholds are computed in exact integer arithmetic.
///
/// # Examples
///
/// ```
/// use questlog::LevelCurve;
///
/// let curve = LevelCurve::default();
/// assert_eq!(curve.threshold_for(1), 100);
/// assert_eq!(curve.threshold_for(2), 150);
/// assert_eq!(curve.threshold_for(3), 225);
/// assert_eq!(curve.threshold_for(4), 337);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCurve {
    /// Experience needed to leave level 1.
    pub base_threshold: u64,
    /// Numerator of the growth factor.
    pub growth_numerator: u64,
    /// Denominator of the growth factor.
    pub growth_denominator: u64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_threshold: 100,
            growth_numerator: 3,
            growth_denominator: 2,
        }
    }
}

impl LevelCurve {
    /// Checks that the curve is positive and strictly growing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_threshold == 0 {
            return Err(ValidationError::InvalidCurve {
                reason: "base threshold must be positive".to_string(),
            });
        }
        if self.growth_denominator == 0 {
            return Err(ValidationError::InvalidCurve {
                reason: "growth denominator must be positive".to_string(),
            });
        }
        if self.growth_numerator <= self.growth_denominator {
            return Err(ValidationError::InvalidCurve {
                reason: format!(
                    "growth {}/{} must exceed 1",
                    self.growth_numerator, self.growth_denominator
                ),
            });
        }
        Ok(())
    }

    /// Threshold of the level after one whose threshold is `threshold`.
    ///
    /// Always strictly larger than `threshold` (until saturation).
    #[must_use]
    pub fn next(&self, threshold: u64) -> u64 {
        let denominator = u128::from(self.growth_denominator.max(1));
        let grown = u128::from(threshold) * u128::from(self.growth_numerator) / denominator;
        u64::try_from(grown)
            .unwrap_or(u64::MAX)
            .max(threshold.saturating_add(1))
    }

    /// Experience needed to leave `level`. Levels below 1 read as 1.
    #[must_use]
    pub fn threshold_for(&self, level: u32) -> u64 {
        let mut threshold = self.base_threshold.max(1);
        for _ in 1..level.max(1) {
            if threshold == u64::MAX {
                break;
            }
            threshold = self.next(threshold);
        }
        threshold
    }
}

/// Result of a progression step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionOutcome {
    /// The updated stats.
    pub stats: CharacterStats,
    /// Level before the step.
    pub previous_level: u32,
    /// Perks whose flag went from locked to unlocked.
    pub unlocked: Vec<PerkId>,
    /// Perks whose flag went from unlocked to locked.
    pub locked: Vec<PerkId>,
}

impl ProgressionOutcome {
    /// Signed level change.
    #[must_use]
    pub fn level_change(&self) -> i64 {
        i64::from(self.stats.level) - i64::from(self.previous_level)
    }

    /// Returns true if the level rose.
    #[must_use]
    pub fn leveled_up(&self) -> bool {
        self.stats.level > self.previous_level
    }

    /// Returns true if the level fell.
    #[must_use]
    pub fn leveled_down(&self) -> bool {
        self.stats.level < self.previous_level
    }
}

/// Adds a reward, levels up as many times as the experience allows,
/// then resynchronizes perks.
///
/// # Examples
///
/// ```
/// use questlog::{apply_reward, CharacterStats, LevelCurve, Reward};
///
/// let mut stats = CharacterStats::new(100, Vec::new(), Vec::new());
/// stats.xp = 80;
///
/// let outcome = apply_reward(&stats, &LevelCurve::default(), Reward::new(50, 10));
/// assert_eq!(outcome.stats.level, 2);
/// assert_eq!(outcome.stats.xp, 30);
/// assert_eq!(outcome.stats.gold, 10);
/// assert_eq!(outcome.stats.next_level_xp, 150);
/// ```
#[must_use]
pub fn apply_reward(stats: &CharacterStats, curve: &LevelCurve, reward: Reward) -> ProgressionOutcome {
    let mut next = stats.clone();
    next.xp = next.xp.saturating_add(reward.xp);
    next.gold = next.gold.saturating_add(reward.gold);
    level_up(&mut next, curve);
    finish(stats.level, next)
}

/// Removes a reward, levels down while experience is negative, clamps
/// what is left at zero, then resynchronizes perks.
///
/// Gold clamps at zero independently of experience.
#[must_use]
pub fn reverse_reward(stats: &CharacterStats, curve: &LevelCurve, reward: Reward) -> ProgressionOutcome {
    let mut next = stats.clone();
    next.gold = next.gold.saturating_sub(reward.gold);

    let mut xp = i128::from(next.xp) - i128::from(reward.xp);
    if xp < 0 && next.level > 1 {
        let mut below = thresholds_covering(curve, next.level, xp.unsigned_abs());
        while xp < 0 {
            let Some(threshold) = below.pop() else { break };
            next.level -= 1;
            next.next_level_xp = threshold;
            xp += i128::from(threshold);
        }
    }
    // Still negative only at level 1.
    next.xp = u64::try_from(xp.max(0)).unwrap_or(u64::MAX);

    finish(stats.level, next)
}

/// Restores every invariant after a manual edit.
///
/// The threshold is re-derived from the level, any experience beyond
/// it carries into further levels, and perks are resynchronized.
#[must_use]
pub fn resync(stats: &CharacterStats, curve: &LevelCurve) -> ProgressionOutcome {
    let mut next = stats.clone();
    next.level = next.level.max(1);
    next.next_level_xp = curve.threshold_for(next.level);
    level_up(&mut next, curve);
    finish(stats.level, next)
}

/// Writes a manual edit and resyncs.
#[must_use]
pub fn apply_edit(stats: &CharacterStats, curve: &LevelCurve, edit: StatsEdit) -> ProgressionOutcome {
    let mut edited = stats.clone();
    edit.write_into(&mut edited);
    let mut outcome = resync(&edited, curve);
    outcome.previous_level = stats.level;
    // Diff perks against the pre-edit flags.
    let (unlocked, locked) = perk_changes(stats, &outcome.stats);
    outcome.unlocked = unlocked;
    outcome.locked = locked;
    outcome
}

/// Thresholds of the levels directly below `level`, lowest first,
/// trimmed to the shortest run whose sum covers `debt`.
///
/// One forward pass over the curve. Without enough experience below
/// `level` the run reaches down to level 1.
fn thresholds_covering(curve: &LevelCurve, level: u32, debt: u128) -> Vec<u64> {
    let mut run: VecDeque<u64> = VecDeque::new();
    let mut covered: u128 = 0;
    let mut threshold = curve.base_threshold.max(1);
    for _ in 1..level {
        if threshold == u64::MAX {
            // Every remaining level saturates and one of them covers any debt.
            return vec![u64::MAX];
        }
        run.push_back(threshold);
        covered += u128::from(threshold);
        while let Some(&lowest) = run.front() {
            if covered - u128::from(lowest) < debt {
                break;
            }
            covered -= u128::from(lowest);
            run.pop_front();
        }
        threshold = curve.next(threshold);
    }
    run.into()
}

fn level_up(stats: &mut CharacterStats, curve: &LevelCurve) {
    while stats.xp >= stats.next_level_xp {
        stats.level = stats.level.saturating_add(1);
        stats.xp -= stats.next_level_xp;
        stats.next_level_xp = curve.next(stats.next_level_xp);
    }
}

fn finish(previous_level: u32, mut stats: CharacterStats) -> ProgressionOutcome {
    let before = stats.clone();
    sync_perks(&mut stats);
    let (unlocked, locked) = perk_changes(&before, &stats);
    ProgressionOutcome {
        stats,
        previous_level,
        unlocked,
        locked,
    }
}

/// Sets every perk's flag from the current level.
pub fn sync_perks(stats: &mut CharacterStats) {
    let level = stats.level;
    for perk in &mut stats.perks {
        perk.unlocked = perk.is_available_at(level);
    }
}

fn perk_changes(before: &CharacterStats, after: &CharacterStats) -> (Vec<PerkId>, Vec<PerkId>) {
    let mut unlocked = Vec::new();
    let mut locked = Vec::new();
    for perk in &after.perks {
        let was = before
            .perks
            .iter()
            .find(|p| p.id == perk.id)
            .is_some_and(|p| p.unlocked);
        match (was, perk.unlocked) {
            (false, true) => unlocked.push(perk.id),
            (true, false) => locked.push(perk.id),
            _ => {}
        }
    }
    (unlocked, locked)
}
