//! Level-by-level progression optimizer.
//!
//! For every level in the requested range the optimizer picks the crop
//! with the best static experience per patch, then sizes that crop with
//! the solver for a one-level gap. Steps are independent: each is solved
//! from an empty inventory, so any single level can be re-derived alone.
//!
//! Selection and sizing use different yields. Selection uses
//! the plain average at the step's level with no compost or modifiers;
//! sizing uses the caller's full growing conditions.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use patchwise_types::{
    CompostTier, CropCategory, CropRecord, MaterialsManifest, ModifierFlags, ProgressionPlan,
    ProgressionStep,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::PlannerError;
use crate::manifest::materials_for;
use crate::planner::Planner;
use crate::request::{LevelRequest, ProgressionOptions};
use crate::solver::check_range;

impl<'r> Planner<'r> {
    /// Plan every level from `options.start_level` up to
    /// `options.target_level`.
    ///
    /// # Errors
    ///
    /// - [`PlannerError::InvalidRange`] for an unusable range.
    /// - [`PlannerError::NoEligibleCrop`] if some level has no candidate.
    /// - Any solver error for a step.
    pub fn plan_progression(
        &mut self,
        options: &ProgressionOptions,
    ) -> Result<ProgressionPlan, PlannerError> {
        check_range(options.start_level, options.target_level)?;
        let overflow = || PlannerError::overflow("progression totals");

        let mut steps = Vec::new();
        let mut total_patches_used: u32 = 0;
        let mut total_experience_gained = Decimal::ZERO;
        let mut materials = MaterialsManifest::default();

        for level in options.start_level..options.target_level {
            let (crop, estimate) = self.select_crop(level, &options.excluded_categories)?;
            let next = level.checked_add(1).ok_or_else(overflow)?;
            let request = LevelRequest {
                target: crop.id.clone(),
                starting_level: level,
                target_level: next,
                conditions: options.conditions,
                starting_resources: BTreeMap::new(),
            };
            let plan = self.solve_for_level(&request)?;
            let step_materials =
                materials_for(self.registry, &plan.resolution, &options.conditions)?;

            total_patches_used = total_patches_used
                .checked_add(plan.resolution.totals.total_patches)
                .ok_or_else(overflow)?;
            total_experience_gained = total_experience_gained
                .checked_add(plan.total_experience)
                .ok_or_else(overflow)?;
            materials.merge(&step_materials).ok_or_else(overflow)?;

            info!(
                level,
                crop = %crop.id,
                quantity = plan.quantity,
                patches = plan.resolution.totals.total_patches,
                "Planned progression step"
            );

            steps.push(ProgressionStep {
                level,
                crop: crop.id.clone(),
                crop_name: crop.name.clone(),
                estimated_experience_per_patch: estimate,
                plan,
                materials: step_materials,
            });
        }

        info!(
            start = options.start_level,
            target = options.target_level,
            patches = total_patches_used,
            cache_hits = self.cache.hits(),
            cache_misses = self.cache.misses(),
            "Progression planned"
        );

        Ok(ProgressionPlan {
            start_level: options.start_level,
            target_level: options.target_level,
            steps,
            total_patches_used,
            total_experience_gained,
            materials,
        })
    }

    /// Static experience estimate for one patch of `crop` at `level`:
    /// `plant + harvest * base_yield`.
    ///
    /// `base_yield` is the fixed yield, or the average yield at `level`
    /// with no compost and no modifiers.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ArithmeticOverflow`] or a yield lookup error.
    pub fn static_patch_experience(
        &mut self,
        crop: &CropRecord,
        level: u32,
    ) -> Result<Decimal, PlannerError> {
        let base_yield = match crop.fixed_yield() {
            Some(units) => Decimal::from(units),
            None => {
                self.cache
                    .yield_of(
                        self.registry,
                        &crop.id,
                        level,
                        CompostTier::None,
                        &ModifierFlags::default(),
                    )?
                    .average
            }
        };
        crop.experience_per_harvest
            .checked_mul(base_yield)
            .and_then(|harvest| harvest.checked_add(crop.experience_per_plant))
            .ok_or_else(|| PlannerError::overflow(format!("static estimate of {}", crop.id)))
    }

    /// Best crop plantable at `level`. Ties go to the higher unlock level,
    /// then the smaller id.
    fn select_crop(
        &mut self,
        level: u32,
        excluded: &BTreeSet<CropCategory>,
    ) -> Result<(&'r CropRecord, Decimal), PlannerError> {
        let registry = self.registry;
        let mut best: Option<(&'r CropRecord, Decimal)> = None;
        for crop in registry
            .unlocked_at(level)
            .filter(|crop| !excluded.contains(&crop.category))
        {
            let estimate = self.static_patch_experience(crop, level)?;
            let better = best.is_none_or(|(incumbent, top)| {
                estimate
                    .cmp(&top)
                    .then_with(|| crop.unlock_level.cmp(&incumbent.unlock_level))
                    .then_with(|| incumbent.id.cmp(&crop.id))
                    == Ordering::Greater
            });
            if better {
                best = Some((crop, estimate));
            }
        }
        best.ok_or(PlannerError::NoEligibleCrop { level })
    }
}
