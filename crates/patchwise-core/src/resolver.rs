//! Recursive protection-chain resolver.
//!
//! Given a target crop and a quantity, the resolver walks the protection
//! chain and works out how many patches of every crop are needed, net of
//! what the player already holds.
//!
//! # Walk
//!
//! 1. Held units of the literal crop id are consumed first. A fully
//!    covered node records a zero-patch trace entry and stops.
//! 2. Otherwise the per-patch yield is looked up and patch counts are
//!    computed for every strategy. The configured strategy's count drives
//!    the rest of the walk.
//! 3. A protected crop needs `patches * quantity` units of its payment.
//!    Purchasable payments end the chain with a purchase entry; crop
//!    payments are resolved one chain level deeper.
//! 4. Requirements are keyed by crop id; a crop reached twice merges into
//!    one entry.
//!
//! The trace is built target-first and returned reversed, so callers read
//! it as a build order.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use patchwise_crops::yield_model::patches_for;
use patchwise_crops::{CropRegistry, Payment, YieldCache};
use patchwise_types::{
    CropRecord, ItemId, PatchCounts, PaymentPackaging, PlanStep, PlanTotals, ProtectionRequirement,
    Resolution, ResolutionRequirement, YieldDistribution,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::PlannerError;
use crate::planner::Planner;
use crate::request::{GrowingConditions, ResolveRequest};

impl Planner<'_> {
    /// Resolve the full patch plan for harvesting `request.quantity` units
    /// of `request.target`.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownCrop`] if the target or any crop on
    /// its protection chain is unregistered,
    /// [`PlannerError::ProtectionCycle`] if the chain loops, or
    /// [`PlannerError::ArithmeticOverflow`] if a count does not fit.
    pub fn resolve(&mut self, request: &ResolveRequest) -> Result<Resolution, PlannerError> {
        let registry = self.registry;
        let target = registry.require_crop(&request.target)?;

        let mut walk = Walk {
            registry,
            cache: &mut self.cache,
            skill_level: request.skill_level,
            conditions: request.conditions,
            stock: request.starting_resources.clone(),
            path: Vec::new(),
            requirements: BTreeMap::new(),
            trace: Vec::new(),
        };
        let reason = format!("Harvest {} {}", request.quantity, target.name);
        walk.visit(&target.id, request.quantity, 0, reason)?;

        let totals = walk.totals()?;
        let Walk {
            requirements,
            mut trace,
            ..
        } = walk;
        trace.reverse();

        debug!(
            target = %request.target,
            quantity = request.quantity,
            crops = requirements.len(),
            patches = totals.total_patches,
            "Resolved plan"
        );

        Ok(Resolution {
            target: request.target.clone(),
            quantity: request.quantity,
            requirements,
            trace,
            totals,
        })
    }
}

/// State of one resolution walk.
struct Walk<'a> {
    registry: &'a CropRegistry,
    cache: &'a mut YieldCache,
    skill_level: u32,
    conditions: GrowingConditions,
    /// Held units not yet consumed by an earlier node.
    stock: BTreeMap<ItemId, u32>,
    /// Crops on the current branch, root first.
    path: Vec<ItemId>,
    requirements: BTreeMap<ItemId, ResolutionRequirement>,
    /// Target-first trace.
    trace: Vec<PlanStep>,
}

impl Walk<'_> {
    fn visit(
        &mut self,
        id: &ItemId,
        needed: u32,
        chain_level: u32,
        reason: String,
    ) -> Result<(), PlannerError> {
        if self.path.contains(id) {
            let mut path = self.path.clone();
            path.push(id.clone());
            return Err(PlannerError::ProtectionCycle { path });
        }
        let registry = self.registry;
        let crop = registry.require_crop(id)?;

        let held = self.stock.get(id).copied().unwrap_or(0);
        let used = held.min(needed);
        let still_needed = needed.saturating_sub(used);
        if used > 0 {
            self.stock.insert(id.clone(), held.saturating_sub(used));
        }
        if still_needed == 0 {
            self.trace.push(PlanStep {
                chain_level,
                item: id.clone(),
                name: crop.name.clone(),
                patch_counts: PatchCounts::default(),
                yield_totals: YieldDistribution::default(),
                purpose: format!("{reason} (covered by {used} held)"),
                purchase_quantity: None,
            });
            return Ok(());
        }

        let per_patch = self.cache.yield_of(
            registry,
            id,
            self.skill_level,
            self.conditions.compost,
            &self.conditions.modifiers,
        )?;
        let patch_counts = PatchCounts {
            min: patch_count(still_needed, per_patch.min, id)?,
            average: patch_count(still_needed, per_patch.average, id)?,
            max: patch_count(still_needed, per_patch.max, id)?,
        };
        let patches = patch_counts.pick(self.conditions.strategy);
        let total_yield = per_patch
            .times(patches)
            .ok_or_else(|| PlannerError::overflow(format!("total yield of {id}")))?;

        self.trace.push(PlanStep {
            chain_level,
            item: id.clone(),
            name: crop.name.clone(),
            patch_counts,
            yield_totals: strategy_totals(&per_patch, patch_counts, id)?,
            purpose: reason.clone(),
            purchase_quantity: None,
        });

        let mut payment_packaging = None;
        if let Some(edge) = &crop.protection {
            let payment_needed = patches
                .checked_mul(edge.quantity)
                .ok_or_else(|| PlannerError::overflow(format!("payment for {id}")))?;
            payment_packaging = self.packaging_for(edge, payment_needed);
            self.pay(crop, edge, patches, payment_needed, chain_level)?;
        }

        self.record(
            crop,
            patches,
            patch_counts,
            reason,
            total_yield,
            per_patch,
            payment_packaging,
        )
    }

    /// Follow one protection edge.
    fn pay(
        &mut self,
        crop: &CropRecord,
        edge: &ProtectionRequirement,
        patches: u32,
        payment_needed: u32,
        chain_level: u32,
    ) -> Result<(), PlannerError> {
        let next_level = chain_level
            .checked_add(1)
            .ok_or_else(|| PlannerError::overflow("chain level"))?;
        let purpose = format!("Protection for {patches} {} patch(es)", crop.name);

        let registry = self.registry;
        match registry.payment(&edge.payment)? {
            Payment::Purchase(item) => {
                self.trace.push(PlanStep {
                    chain_level: next_level,
                    item: item.id.clone(),
                    name: item.name.clone(),
                    patch_counts: PatchCounts::default(),
                    yield_totals: YieldDistribution::default(),
                    purpose,
                    purchase_quantity: Some(payment_needed),
                });
                Ok(())
            }
            Payment::Crop(payer) => {
                self.path.push(crop.id.clone());
                let result = self.visit(&payer.id, payment_needed, next_level, purpose);
                self.path.pop();
                result
            }
        }
    }

    /// Container breakdown of a payment, when the payment is packed.
    fn packaging_for(&self, edge: &ProtectionRequirement, units: u32) -> Option<PaymentPackaging> {
        let packaging = edge.packaging.as_ref().or_else(|| {
            self.registry
                .purchasable(&edge.payment)
                .and_then(|item| item.packaging.as_ref())
        })?;
        let mut info = PaymentPackaging {
            payment: edge.payment.clone(),
            units: 0,
            container: packaging.container.clone(),
            units_per_container: packaging.units_per_container,
            containers: 0,
        };
        set_units(&mut info, units)?;
        Some(info)
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        crop: &CropRecord,
        patches: u32,
        patch_counts: PatchCounts,
        reason: String,
        total_yield: YieldDistribution,
        per_patch_yield: YieldDistribution,
        payment_packaging: Option<PaymentPackaging>,
    ) -> Result<(), PlannerError> {
        let overflow = || PlannerError::overflow(format!("merging requirement for {}", crop.id));
        match self.requirements.entry(crop.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(ResolutionRequirement {
                    item: crop.id.clone(),
                    name: crop.name.clone(),
                    patches,
                    patch_counts,
                    reason,
                    total_yield,
                    per_patch_yield,
                    payment_packaging,
                });
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.patches = existing.patches.checked_add(patches).ok_or_else(overflow)?;
                existing.patch_counts = existing
                    .patch_counts
                    .checked_add(&patch_counts)
                    .ok_or_else(overflow)?;
                existing.total_yield = existing
                    .total_yield
                    .checked_add(&total_yield)
                    .ok_or_else(overflow)?;
                existing.reason = format!("{}; {reason}", existing.reason);
                if let Some(extra) = payment_packaging {
                    match existing.payment_packaging.as_mut() {
                        Some(current) => {
                            let units =
                                current.units.checked_add(extra.units).ok_or_else(overflow)?;
                            set_units(current, units).ok_or_else(overflow)?;
                        }
                        None => existing.payment_packaging = Some(extra),
                    }
                }
            }
        }
        Ok(())
    }

    fn totals(&self) -> Result<PlanTotals, PlannerError> {
        let mut totals = PlanTotals::default();
        for requirement in self.requirements.values() {
            let crop = self.registry.require_crop(&requirement.item)?;
            let minutes = u64::from(requirement.patches)
                .checked_mul(u64::from(crop.growth_minutes))
                .ok_or_else(|| PlannerError::overflow("growth minutes"))?;
            totals.total_patches = totals
                .total_patches
                .checked_add(requirement.patches)
                .ok_or_else(|| PlannerError::overflow("total patches"))?;
            totals.estimated_minutes = totals
                .estimated_minutes
                .checked_add(minutes)
                .ok_or_else(|| PlannerError::overflow("estimated minutes"))?;
        }
        Ok(totals)
    }
}

/// Patches needed to cover `needed` units at `per_patch` units each.
fn patch_count(needed: u32, per_patch: Decimal, id: &ItemId) -> Result<u32, PlannerError> {
    patches_for(needed, per_patch)
        .ok_or_else(|| PlannerError::overflow(format!("patch count for {id}")))
}

/// Yield of each strategy's own patch count.
fn strategy_totals(
    per_patch: &YieldDistribution,
    counts: PatchCounts,
    id: &ItemId,
) -> Result<YieldDistribution, PlannerError> {
    let overflow = || PlannerError::overflow(format!("yield totals of {id}"));
    Ok(YieldDistribution {
        min: per_patch.min.checked_mul(counts.min.into()).ok_or_else(overflow)?,
        average: per_patch
            .average
            .checked_mul(counts.average.into())
            .ok_or_else(overflow)?,
        max: per_patch.max.checked_mul(counts.max.into()).ok_or_else(overflow)?,
    })
}

/// Set the unit count and recompute whole containers.
fn set_units(info: &mut PaymentPackaging, units: u32) -> Option<()> {
    if info.units_per_container == 0 {
        return None;
    }
    info.units = units;
    info.containers = units.div_ceil(info.units_per_container);
    Some(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use patchwise_crops::default_registry;
    use patchwise_types::{
        CompostTier, CropCategory, Packaging, PurchasableItem, YieldProfile, YieldStrategy,
    };
    use rust_decimal_macros::dec;

    use super::*;

    fn crop(id: &str, units: u32, protection: Option<(&str, u32)>) -> CropRecord {
        CropRecord {
            id: ItemId::from(id),
            name: id.to_uppercase(),
            category: CropCategory::Bush,
            unlock_level: 1,
            seeds_per_patch: 1,
            growth_minutes: 60,
            experience_per_plant: dec!(10),
            experience_per_harvest: dec!(5),
            yield_profile: YieldProfile::Fixed { units },
            protection: protection.map(|(payment, quantity)| ProtectionRequirement {
                payment: ItemId::from(payment),
                quantity,
                packaging: None,
            }),
        }
    }

    fn registry(crops: Vec<CropRecord>) -> CropRegistry {
        let mut registry = CropRegistry::new();
        for record in crops {
            registry.add_crop(record).unwrap();
        }
        registry
    }

    #[test]
    fn unprotected_crop_has_single_requirement() {
        let registry = registry(vec![crop("a", 4, None)]);
        let mut planner = Planner::new(&registry);
        let plan = planner.resolve(&ResolveRequest::new("a", 10, 50)).unwrap();

        assert_eq!(plan.requirements.len(), 1);
        assert_eq!(plan.requirements["a"].patches, 3);
        assert_eq!(plan.trace.len(), 1);
        assert_eq!(plan.totals.total_patches, 3);
        assert_eq!(plan.totals.estimated_minutes, 180);
    }

    #[test]
    fn chain_is_resolved_foundation_first() {
        let registry = registry(vec![
            crop("a", 5, Some(("b", 10))),
            crop("b", 5, Some(("c", 5))),
            crop("c", 5, None),
        ]);
        let mut planner = Planner::new(&registry);
        let plan = planner.resolve(&ResolveRequest::new("a", 5, 50)).unwrap();

        // a: 1 patch -> 10 b -> 2 patches -> 10 c -> 2 patches
        assert_eq!(plan.requirements["a"].patches, 1);
        assert_eq!(plan.requirements["b"].patches, 2);
        assert_eq!(plan.requirements["c"].patches, 2);
        let order: Vec<_> = plan.trace.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
        assert_eq!(plan.trace[0].chain_level, 2);
        assert_eq!(plan.trace[2].chain_level, 0);
    }

    #[test]
    fn held_units_are_netted_before_yield() {
        let registry = registry(vec![crop("a", 5, Some(("b", 10))), crop("b", 5, None)]);
        let mut planner = Planner::new(&registry);
        let plan = planner
            .resolve(&ResolveRequest::new("a", 5, 50).holding("b", 4))
            .unwrap();

        // 10 b needed, 4 held -> 6 more -> 2 patches
        assert_eq!(plan.requirements["b"].patches, 2);
    }

    #[test]
    fn covered_dependency_leaves_zero_patch_trace_entry() {
        let registry = registry(vec![crop("a", 5, Some(("b", 10))), crop("b", 5, None)]);
        let mut planner = Planner::new(&registry);
        let plan = planner
            .resolve(&ResolveRequest::new("a", 5, 50).holding("b", 10))
            .unwrap();

        assert!(!plan.requirements.contains_key("b"));
        let b = plan.trace.iter().find(|s| s.item.as_str() == "b").unwrap();
        assert_eq!(b.patch_counts, PatchCounts::default());
        assert!(b.purpose.contains("covered by 10 held"));
    }

    #[test]
    fn purchasable_payment_ends_chain() {
        let mut registry = registry(vec![crop("a", 5, Some(("fee", 3)))]);
        registry
            .add_purchasable(PurchasableItem {
                id: ItemId::from("fee"),
                name: String::from("Fee"),
                packaging: Some(Packaging {
                    container: String::from("Bag"),
                    units_per_container: 4,
                }),
            })
            .unwrap();
        let mut planner = Planner::new(&registry);
        let plan = planner.resolve(&ResolveRequest::new("a", 10, 50)).unwrap();

        assert_eq!(plan.requirements.len(), 1);
        let purchase = plan.trace.iter().find(|s| s.item.as_str() == "fee").unwrap();
        assert_eq!(purchase.purchase_quantity, Some(6));
        assert_eq!(purchase.chain_level, 1);

        let packaging = plan.requirements["a"].payment_packaging.as_ref().unwrap();
        assert_eq!(packaging.units, 6);
        assert_eq!(packaging.containers, 2);
    }

    #[test]
    fn payment_in_sacks_reports_containers() {
        let mut target = crop("a", 5, None);
        target.protection = Some(ProtectionRequirement {
            payment: ItemId::from("b"),
            quantity: 7,
            packaging: Some(Packaging {
                container: String::from("Sack"),
                units_per_container: 10,
            }),
        });
        let registry = registry(vec![target, crop("b", 10, None)]);
        let mut planner = Planner::new(&registry);
        let plan = planner.resolve(&ResolveRequest::new("a", 15, 50)).unwrap();

        // 3 patches of a -> 21 b in 3 sacks
        let packaging = plan.requirements["a"].payment_packaging.as_ref().unwrap();
        assert_eq!(packaging.units, 21);
        assert_eq!(packaging.containers, 3);
        assert_eq!(plan.requirements["b"].patches, 3);
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let registry = registry(vec![crop("a", 5, Some(("ghost", 1)))]);
        let mut planner = Planner::new(&registry);
        let err = planner.resolve(&ResolveRequest::new("a", 5, 50)).unwrap_err();
        assert_eq!(err, PlannerError::UnknownCrop(ItemId::from("ghost")));
    }

    #[test]
    fn cycle_fails_fast() {
        let registry = registry(vec![
            crop("a", 5, Some(("b", 1))),
            crop("b", 5, Some(("a", 1))),
        ]);
        let mut planner = Planner::new(&registry);
        let err = planner.resolve(&ResolveRequest::new("a", 5, 50)).unwrap_err();
        assert_eq!(
            err,
            PlannerError::ProtectionCycle {
                path: vec![ItemId::from("a"), ItemId::from("b"), ItemId::from("a")],
            }
        );
    }

    #[test]
    fn strategies_record_all_patch_counts() {
        let registry = default_registry().unwrap();
        let mut planner = Planner::new(&registry);
        let conditions = GrowingConditions {
            compost: CompostTier::Ultracompost,
            strategy: YieldStrategy::Min,
            ..GrowingConditions::default()
        };
        let plan = planner
            .resolve(&ResolveRequest::new("guam", 30, 99).with_conditions(conditions))
            .unwrap();

        let guam = &plan.requirements["guam"];
        // min 6, average 8.8, max 15 per patch
        assert_eq!(guam.patch_counts.min, 5);
        assert_eq!(guam.patch_counts.average, 4);
        assert_eq!(guam.patch_counts.max, 2);
        assert_eq!(guam.patches, 5);
        assert_eq!(guam.total_yield.min, dec!(30));
    }
}
