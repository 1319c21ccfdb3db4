//! Calculation results handed back to the presentation layer.
//!
//! Every top-level call builds these fresh; nothing here is persisted
//! between calls.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ItemId;
use crate::structs::{PatchCounts, YieldDistribution};

// ---------------------------------------------------------------------------
// Quantity mode
// ---------------------------------------------------------------------------

/// How a protection payment is handed over in containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PaymentPackaging {
    /// The paid crop or item.
    pub payment: ItemId,
    /// Raw units owed.
    pub units: u32,
    /// Container name.
    pub container: String,
    /// Raw units per container.
    pub units_per_container: u32,
    /// Containers to fill, rounded up.
    pub containers: u32,
}

/// Planned patches for one crop touched by a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResolutionRequirement {
    /// The crop.
    pub item: ItemId,
    /// Display name.
    pub name: String,
    /// Patches to plant under the chosen strategy, net of starting
    /// resources.
    pub patches: u32,
    /// Candidate counts for every strategy.
    pub patch_counts: PatchCounts,
    /// Why these patches are needed.
    pub reason: String,
    /// Harvest over all `patches`.
    pub total_yield: YieldDistribution,
    /// Harvest of a single patch.
    pub per_patch_yield: YieldDistribution,
    /// Container breakdown of this crop's own protection payment.
    pub payment_packaging: Option<PaymentPackaging>,
}

/// One entry of the resolution trace, in build order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlanStep {
    /// Depth in the protection chain; the target is level 0.
    pub chain_level: u32,
    /// Crop or purchasable item.
    pub item: ItemId,
    /// Display name.
    pub name: String,
    /// Patch counts per strategy (zero for purchases and covered crops).
    pub patch_counts: PatchCounts,
    /// Harvest totals per strategy.
    pub yield_totals: YieldDistribution,
    /// Free-text purpose of the step.
    pub purpose: String,
    /// Units to buy, for purchasable terminal items.
    pub purchase_quantity: Option<u32>,
}

/// Summary over a whole resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlanTotals {
    /// Sum of planned patches across every crop.
    pub total_patches: u32,
    /// Serial growing time: patches times growth minutes, summed.
    pub estimated_minutes: u64,
}

/// Full output of the dependency resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Resolution {
    /// Target crop.
    pub target: ItemId,
    /// Requested harvest quantity.
    pub quantity: u32,
    /// One entry per crop that needs planting.
    pub requirements: BTreeMap<ItemId, ResolutionRequirement>,
    /// Build order: foundation first, target last.
    pub trace: Vec<PlanStep>,
    /// Patch and time totals.
    pub totals: PlanTotals,
}

// ---------------------------------------------------------------------------
// Level mode
// ---------------------------------------------------------------------------

/// Output of the XP-target solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LevelResolution {
    /// The resolved plan for `quantity`.
    pub resolution: Resolution,
    /// Smallest harvest quantity that reaches the target level.
    pub quantity: u32,
    /// Level the plan starts from.
    pub starting_level: u32,
    /// Level the plan reaches.
    pub target_level: u32,
    /// Experience between the two levels.
    pub experience_needed: u32,
    /// Experience the plan awards, dependencies included.
    #[ts(as = "String")]
    pub total_experience: Decimal,
    /// Experience per crop touched.
    #[ts(as = "BTreeMap<ItemId, String>")]
    pub experience_breakdown: BTreeMap<ItemId, Decimal>,
    /// Resolver invocations the search used.
    pub attempts: u32,
}

// ---------------------------------------------------------------------------
// Progression mode
// ---------------------------------------------------------------------------

/// Seeds, purchases, and compost needed across a progression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MaterialsManifest {
    /// Seeds to plant, keyed by crop.
    pub seeds: BTreeMap<ItemId, u32>,
    /// Purchasable payment items, keyed by item.
    pub purchases: BTreeMap<ItemId, u32>,
    /// Compost units (one per planted patch when compost is used).
    pub compost: u32,
}

impl MaterialsManifest {
    /// Add seeds for a crop. Returns `None` on overflow.
    pub fn add_seeds(&mut self, crop: &ItemId, count: u32) -> Option<()> {
        add_into(&mut self.seeds, crop, count)
    }

    /// Add a purchase. Returns `None` on overflow.
    pub fn add_purchase(&mut self, item: &ItemId, count: u32) -> Option<()> {
        add_into(&mut self.purchases, item, count)
    }

    /// Merge another manifest into this one. Returns `None` on overflow.
    pub fn merge(&mut self, other: &Self) -> Option<()> {
        for (crop, count) in &other.seeds {
            self.add_seeds(crop, *count)?;
        }
        for (item, count) in &other.purchases {
            self.add_purchase(item, *count)?;
        }
        self.compost = self.compost.checked_add(other.compost)?;
        Some(())
    }
}

fn add_into(map: &mut BTreeMap<ItemId, u32>, key: &ItemId, count: u32) -> Option<()> {
    if count == 0 {
        return Some(());
    }
    let entry = map.entry(key.clone()).or_insert(0);
    *entry = entry.checked_add(count)?;
    Some(())
}

/// One level of a progression plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressionStep {
    /// Level the step starts at; it ends at `level + 1`.
    pub level: u32,
    /// Crop selected for this level.
    pub crop: ItemId,
    /// Display name of the crop.
    pub crop_name: String,
    /// Static per-patch experience estimate used for selection.
    #[ts(as = "String")]
    pub estimated_experience_per_patch: Decimal,
    /// The solver's sized plan.
    pub plan: LevelResolution,
    /// Materials this step consumes.
    pub materials: MaterialsManifest,
}

/// A complete level-by-level progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressionPlan {
    /// First level planned.
    pub start_level: u32,
    /// Level reached after the final step.
    pub target_level: u32,
    /// One step per level, in increasing order.
    pub steps: Vec<ProgressionStep>,
    /// Patches planted across all steps.
    pub total_patches_used: u32,
    /// Experience awarded across all steps.
    #[ts(as = "String")]
    pub total_experience_gained: Decimal,
    /// Everything to buy or gather up front.
    pub materials: MaterialsManifest,
}
