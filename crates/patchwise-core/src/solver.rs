//! Experience-target solver.
//!
//! Finds the smallest harvest quantity of a crop whose resolved plan,
//! dependencies included, awards at least the experience between two
//! levels. Plan experience never decreases as the quantity grows, so the
//! first qualifying quantity can be found either by counting up from one
//! or by bisection; both stop on the same predicate.

use std::collections::BTreeMap;

use patchwise_crops::{CropRegistry, MAX_SKILL_LEVEL, MIN_SKILL_LEVEL, experience_between};
use patchwise_types::{ItemId, LevelResolution, Resolution};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PlannerError;
use crate::planner::Planner;
use crate::request::LevelRequest;

/// Default cap on resolver invocations per search.
pub const DEFAULT_ITERATION_CEILING: u32 = 100_000;

/// How the solver walks candidate quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Try 1, 2, 3, ... until the target is met.
    Linear,
    /// Double until the target is met, then binary search the last gap.
    #[default]
    Bisect,
}

/// Solver tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Search strategy.
    #[serde(default)]
    pub search: SearchMode,
    /// Largest quantity tried before giving up.
    #[serde(default = "default_iteration_ceiling")]
    pub iteration_ceiling: u32,
}

impl SolverSettings {
    /// Bisection with the default ceiling.
    pub const DEFAULT: Self = Self {
        search: SearchMode::Bisect,
        iteration_ceiling: DEFAULT_ITERATION_CEILING,
    };
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn default_iteration_ceiling() -> u32 {
    DEFAULT_ITERATION_CEILING
}

/// One evaluated quantity.
struct Candidate {
    quantity: u32,
    resolution: Resolution,
    experience: Decimal,
    breakdown: BTreeMap<ItemId, Decimal>,
}

impl Planner<'_> {
    /// Size a crop so that growing it takes the player from
    /// `starting_level` to `target_level`.
    ///
    /// # Errors
    ///
    /// - [`PlannerError::UnknownCrop`] if the crop is not registered.
    /// - [`PlannerError::InvalidRange`] if the range is empty, leaves
    ///   `1..=99`, or starts below the crop's unlock level.
    /// - [`PlannerError::SolverExhausted`] if no quantity up to the
    ///   iteration ceiling is enough.
    /// - Any resolver error.
    pub fn solve_for_level(
        &mut self,
        request: &LevelRequest,
    ) -> Result<LevelResolution, PlannerError> {
        let crop = self.registry.require_crop(&request.target)?;
        let (start, target) = (request.starting_level, request.target_level);
        check_range(start, target)?;
        if start < crop.unlock_level {
            return Err(PlannerError::invalid_range(
                start,
                target,
                format!("{} unlocks at level {}", crop.name, crop.unlock_level),
            ));
        }
        let experience_needed = experience_between(start, target).ok_or_else(|| {
            PlannerError::invalid_range(start, target, "outside experience table")
        })?;

        let (found, attempts) = match self.solver.search {
            SearchMode::Linear => self.search_linear(request, experience_needed)?,
            SearchMode::Bisect => self.search_bisect(request, experience_needed)?,
        };

        debug!(
            crop = %request.target,
            start,
            target,
            quantity = found.quantity,
            attempts,
            "Solved level target"
        );

        Ok(LevelResolution {
            resolution: found.resolution,
            quantity: found.quantity,
            starting_level: start,
            target_level: target,
            experience_needed,
            total_experience: found.experience,
            experience_breakdown: found.breakdown,
            attempts,
        })
    }

    fn evaluate(
        &mut self,
        request: &LevelRequest,
        quantity: u32,
    ) -> Result<Candidate, PlannerError> {
        let resolution = self.resolve(&request.at_quantity(quantity))?;
        let (experience, breakdown) = plan_experience(self.registry, &resolution)?;
        Ok(Candidate {
            quantity,
            resolution,
            experience,
            breakdown,
        })
    }

    fn search_linear(
        &mut self,
        request: &LevelRequest,
        needed: u32,
    ) -> Result<(Candidate, u32), PlannerError> {
        let needed = Decimal::from(needed);
        let ceiling = self.solver.iteration_ceiling;
        for quantity in 1..=ceiling {
            let candidate = self.evaluate(request, quantity)?;
            if candidate.experience >= needed {
                return Ok((candidate, quantity));
            }
        }
        Err(exhausted(&request.target, ceiling))
    }

    fn search_bisect(
        &mut self,
        request: &LevelRequest,
        needed: u32,
    ) -> Result<(Candidate, u32), PlannerError> {
        let needed = Decimal::from(needed);
        let ceiling = self.solver.iteration_ceiling;
        if ceiling == 0 {
            return Err(exhausted(&request.target, 0));
        }

        // Largest quantity known to fall short.
        let mut short: u32 = 0;
        let mut probe: u32 = 1;
        let mut attempts: u32 = 0;
        let mut best = loop {
            attempts = attempts.saturating_add(1);
            let candidate = self.evaluate(request, probe)?;
            if candidate.experience >= needed {
                break candidate;
            }
            if probe >= ceiling {
                return Err(exhausted(&request.target, attempts));
            }
            short = probe;
            probe = probe.saturating_mul(2).min(ceiling);
        };

        while best.quantity.abs_diff(short) > 1 {
            let gap = best.quantity.saturating_sub(short);
            let mid = short.saturating_add(gap / 2);
            attempts = attempts.saturating_add(1);
            let candidate = self.evaluate(request, mid)?;
            if candidate.experience >= needed {
                best = candidate;
            } else {
                short = mid;
            }
        }
        Ok((best, attempts))
    }
}

/// Experience awarded by a resolved plan, in total and per crop.
///
/// Each crop contributes `patches * (plant + harvest * average yield)`.
///
/// # Errors
///
/// Returns [`PlannerError::UnknownCrop`] if a requirement names an
/// unregistered crop, or [`PlannerError::ArithmeticOverflow`].
pub fn plan_experience(
    registry: &CropRegistry,
    resolution: &Resolution,
) -> Result<(Decimal, BTreeMap<ItemId, Decimal>), PlannerError> {
    let mut total = Decimal::ZERO;
    let mut breakdown = BTreeMap::new();
    for (id, requirement) in &resolution.requirements {
        let crop = registry.require_crop(id)?;
        let overflow = || PlannerError::overflow(format!("experience of {id}"));
        let per_patch = crop
            .experience_per_harvest
            .checked_mul(requirement.per_patch_yield.average)
            .and_then(|harvest| harvest.checked_add(crop.experience_per_plant))
            .ok_or_else(overflow)?;
        let experience = per_patch
            .checked_mul(Decimal::from(requirement.patches))
            .ok_or_else(overflow)?;
        total = total.checked_add(experience).ok_or_else(overflow)?;
        breakdown.insert(id.clone(), experience);
    }
    Ok((total, breakdown))
}

/// Reject level ranges the experience table cannot answer.
pub(crate) fn check_range(start: u32, target: u32) -> Result<(), PlannerError> {
    if start < MIN_SKILL_LEVEL {
        return Err(PlannerError::invalid_range(start, target, "start below level 1"));
    }
    if target > MAX_SKILL_LEVEL {
        return Err(PlannerError::invalid_range(start, target, "target above level 99"));
    }
    if start >= target {
        return Err(PlannerError::invalid_range(
            start,
            target,
            "start must be below target",
        ));
    }
    Ok(())
}

fn exhausted(crop: &ItemId, attempts: u32) -> PlannerError {
    warn!(%crop, attempts, "Solver hit its iteration ceiling");
    PlannerError::SolverExhausted {
        crop: crop.clone(),
        attempts,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
