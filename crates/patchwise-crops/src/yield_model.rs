//! Harvest yield model: harvest lives and the chance to save a life.
//!
//! A probabilistic patch starts with [`BASE_HARVEST_LIVES`] lives plus one
//! per compost tier. Every pick has a chance `p` to keep the life it would
//! otherwise spend, so the expected harvest is `lives / (1 - p)`.
//!
//! # Chance to save
//!
//! With crop constants `low` and `high` and the level `L` clamped into
//! `[1, 99]`:
//!
//! ```text
//! numerator = 1 + floor(low * (99 - L) / 98 + high * (L - 1) / 98 + 0.5)
//! p         = numerator / 256
//! ```
//!
//! The two constants are first scaled by every applicable modifier in turn,
//! each step multiplying and flooring: secateurs, cape, attas seed, then
//! the regional diary.
//!
//! # Distribution
//!
//! - `min` is the number of lives (every pick spends one).
//! - `average` is the expectation rounded to one decimal place.
//! - `max` is a practical bound, `max(ceil(expected * 1.6), lives + 3)`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use patchwise_types::{
    CompostTier, CropCategory, CropRecord, ModifierFlags, YieldDistribution, YieldProfile,
};

use crate::error::CropError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Harvest lives every probabilistic patch starts with before compost.
pub const BASE_HARVEST_LIVES: u32 = 3;

/// Lowest skill level the formula interpolates from.
pub const MIN_SKILL_LEVEL: u32 = 1;

/// Highest skill level the formula interpolates to.
pub const MAX_SKILL_LEVEL: u32 = 99;

/// Denominator of the chance to save.
pub const SAVE_DENOMINATOR: u32 = 256;

/// Largest numerator allowed, keeping `p` strictly below one.
pub const MAX_SAVE_NUMERATOR: u32 = 255;

/// Multiplier from expected yield to the practical `max` bound.
const MAX_YIELD_FACTOR: Decimal = Decimal::from_parts(16, 0, 0, false, 1);

/// Lives added to `min` for the floor of the `max` bound.
const MAX_YIELD_HEADROOM: u32 = 3;

// ---------------------------------------------------------------------------
// Formula pieces
// ---------------------------------------------------------------------------

/// Clamp a skill level into `[1, 99]`.
pub const fn clamp_level(level: u32) -> u32 {
    if level < MIN_SKILL_LEVEL {
        MIN_SKILL_LEVEL
    } else if level > MAX_SKILL_LEVEL {
        MAX_SKILL_LEVEL
    } else {
        level
    }
}

/// Total harvest lives for a compost tier.
pub const fn harvest_lives(compost: CompostTier) -> u32 {
    BASE_HARVEST_LIVES.saturating_add(compost.extra_lives())
}

/// Scale a chance-to-save constant by every modifier the category accepts.
///
/// Each active modifier multiplies by `(100 + percent) / 100` and floors
/// before the next is applied. Returns `None` on overflow.
pub fn scale_cts(cts: u32, category: CropCategory, modifiers: &ModifierFlags) -> Option<u32> {
    let mut scaled = cts;
    for (modifier, percent) in modifiers.active() {
        if !category.accepts(modifier) {
            continue;
        }
        let factor = percent.checked_add(100)?;
        scaled = scaled.checked_mul(factor)?.checked_div(100)?;
    }
    Some(scaled)
}

/// Numerator of the chance to save (out of [`SAVE_DENOMINATOR`]).
///
/// Evaluated in integer arithmetic: `floor(a/98 + b/98 + 0.5)` equals
/// `(a + b + 49) / 98` for non-negative `a` and `b`. Capped at
/// [`MAX_SAVE_NUMERATOR`]. Returns `None` on overflow.
pub fn save_numerator(cts_low: u32, cts_high: u32, level: u32) -> Option<u32> {
    let level = clamp_level(level);
    let low_weight = MAX_SKILL_LEVEL.checked_sub(level)?;
    let high_weight = level.checked_sub(MIN_SKILL_LEVEL)?;
    let span = MAX_SKILL_LEVEL.checked_sub(MIN_SKILL_LEVEL)?;

    let weighted = cts_low
        .checked_mul(low_weight)?
        .checked_add(cts_high.checked_mul(high_weight)?)?
        .checked_add(span.checked_div(2)?)?;
    let interpolated = weighted.checked_div(span)?;

    Some(interpolated.checked_add(1)?.min(MAX_SAVE_NUMERATOR))
}

/// Expected harvest for `lives` lives and a save numerator.
///
/// `lives / (1 - n/256)` rewritten as `lives * 256 / (256 - n)`.
/// Returns `None` on overflow or if `n >= 256`.
pub fn expected_harvest(lives: u32, numerator: u32) -> Option<Decimal> {
    let spend = SAVE_DENOMINATOR.checked_sub(numerator)?;
    if spend == 0 {
        return None;
    }
    Decimal::from(lives)
        .checked_mul(Decimal::from(SAVE_DENOMINATOR))?
        .checked_div(Decimal::from(spend))
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Compute the per-patch harvest distribution of a crop.
///
/// Fixed-yield crops ignore level, compost, and modifiers.
///
/// # Errors
///
/// Returns [`CropError::ArithmeticOverflow`] if any intermediate value
/// overflows.
pub fn yield_distribution(
    crop: &CropRecord,
    level: u32,
    compost: CompostTier,
    modifiers: &ModifierFlags,
) -> Result<YieldDistribution, CropError> {
    let (cts_low, cts_high) = match crop.yield_profile {
        YieldProfile::Fixed { units } => return Ok(YieldDistribution::fixed(units)),
        YieldProfile::Lives { cts_low, cts_high } => (cts_low, cts_high),
    };

    let overflow = |what: &str| CropError::ArithmeticOverflow {
        context: format!("{what} for {}", crop.id),
    };

    let low =
        scale_cts(cts_low, crop.category, modifiers).ok_or_else(|| overflow("scaled cts_low"))?;
    let high =
        scale_cts(cts_high, crop.category, modifiers).ok_or_else(|| overflow("scaled cts_high"))?;
    let numerator = save_numerator(low, high, level).ok_or_else(|| overflow("save numerator"))?;

    let lives = harvest_lives(compost);
    let expected =
        expected_harvest(lives, numerator).ok_or_else(|| overflow("expected harvest"))?;

    let min = Decimal::from(lives);
    let average = expected.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    let bound = expected
        .checked_mul(MAX_YIELD_FACTOR)
        .ok_or_else(|| overflow("max bound"))?
        .ceil();
    let headroom = Decimal::from(
        lives
            .checked_add(MAX_YIELD_HEADROOM)
            .ok_or_else(|| overflow("max headroom"))?,
    );
    let max = bound.max(headroom);

    Ok(YieldDistribution { min, average, max })
}

/// Ceiling of `needed / per_patch` as a whole patch count.
///
/// Returns `Some(0)` when nothing is needed and `None` when `per_patch` is
/// not positive or the result does not fit a `u32`.
pub fn patches_for(needed: u32, per_patch: Decimal) -> Option<u32> {
    if needed == 0 {
        return Some(0);
    }
    if per_patch <= Decimal::ZERO {
        return None;
    }
    Decimal::from(needed).checked_div(per_patch)?.ceil().to_u32()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
