//! Materials needed to carry out a resolved plan.

use patchwise_crops::CropRegistry;
use patchwise_types::{MaterialsManifest, Resolution};

use crate::error::PlannerError;
use crate::request::GrowingConditions;

/// Seeds, purchases, and compost consumed by one resolution.
///
/// Seeds come from every planted trace entry (`patches * seeds_per_patch`
/// at the planning strategy), purchases from every terminal payment entry,
/// and compost is one unit per planted patch unless the tier is `None`.
///
/// # Errors
///
/// Returns [`PlannerError::UnknownCrop`] if a trace entry names an
/// unregistered crop, or [`PlannerError::ArithmeticOverflow`].
pub fn materials_for(
    registry: &CropRegistry,
    resolution: &Resolution,
    conditions: &GrowingConditions,
) -> Result<MaterialsManifest, PlannerError> {
    let overflow = || PlannerError::overflow("materials manifest");
    let mut manifest = MaterialsManifest::default();

    for step in &resolution.trace {
        if let Some(units) = step.purchase_quantity {
            manifest
                .add_purchase(&step.item, units)
                .ok_or_else(overflow)?;
            continue;
        }
        let patches = step.patch_counts.pick(conditions.strategy);
        if patches == 0 {
            continue;
        }
        let crop = registry.require_crop(&step.item)?;
        let seeds = patches
            .checked_mul(crop.seeds_per_patch)
            .ok_or_else(overflow)?;
        manifest.add_seeds(&step.item, seeds).ok_or_else(overflow)?;
        if conditions.compost.is_applied() {
            manifest.compost = manifest.compost.checked_add(patches).ok_or_else(overflow)?;
        }
    }
    Ok(manifest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use patchwise_crops::default_registry;
    use patchwise_types::{CompostTier, ItemId};

    use super::*;
    use crate::planner::Planner;
    use crate::request::ResolveRequest;

    #[test]
    fn seeds_and_purchases_follow_the_trace() {
        let registry = default_registry().unwrap();
        let mut planner = Planner::new(&registry);
        // Barley pays three buckets of compost per patch.
        let plan = planner
            .resolve(&ResolveRequest::new("barley", 40, 20))
            .unwrap();
        let materials = materials_for(&registry, &plan, &GrowingConditions::default()).unwrap();

        let patches = plan.requirements["barley"].patches;
        assert_eq!(materials.seeds[&ItemId::from("barley")], patches * 4);
        assert_eq!(materials.purchases[&ItemId::from("compost")], patches * 3);
        assert_eq!(materials.compost, 0);
    }

    #[test]
    fn compost_is_one_per_patch() {
        let registry = default_registry().unwrap();
        let mut planner = Planner::new(&registry);
        let conditions = GrowingConditions {
            compost: CompostTier::Supercompost,
            ..GrowingConditions::default()
        };
        let plan = planner
            .resolve(&ResolveRequest::new("jute", 50, 30).with_conditions(conditions))
            .unwrap();
        let materials = materials_for(&registry, &plan, &conditions).unwrap();

        assert_eq!(materials.compost, plan.totals.total_patches);
        assert!(materials.seeds.contains_key("jute"));
        assert!(materials.seeds.contains_key("barley"));
    }

    #[test]
    fn covered_target_needs_nothing() {
        let registry = default_registry().unwrap();
        let mut planner = Planner::new(&registry);
        let plan = planner
            .resolve(&ResolveRequest::new("onion", 10, 20).holding("onion", 10))
            .unwrap();
        let materials = materials_for(&registry, &plan, &GrowingConditions::default()).unwrap();
        assert_eq!(materials, MaterialsManifest::default());
    }
}
