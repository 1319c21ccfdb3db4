//! Catalogue records and yield value types.
//!
//! These are the inputs of every calculation: crop and purchasable-item
//! records supplied by the caller, the protection edges between them, and
//! the modifier flags that scale yields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CropCategory, Modifier, RegionalBonus, YieldStrategy};
use crate::ids::ItemId;

// ---------------------------------------------------------------------------
// Crop records
// ---------------------------------------------------------------------------

/// How a crop's harvest count is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum YieldProfile {
    /// Deterministic harvest: every patch yields exactly `units`.
    Fixed {
        /// Units harvested per patch.
        units: u32,
    },
    /// Probabilistic harvest driven by harvest lives and a chance to save a
    /// life on each pick, interpolated between the two constants by level.
    Lives {
        /// Chance-to-save constant at level 1 (out of 256).
        cts_low: u32,
        /// Chance-to-save constant at level 99 (out of 256).
        cts_high: u32,
    },
}

/// Packaging in which a payment item is handed over, e.g. a sack of 10
/// potatoes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Packaging {
    /// Container name ("sack", "basket").
    pub container: String,
    /// Raw units held by one container.
    pub units_per_container: u32,
}

/// Payment a gardener accepts to protect one patch of a crop.
///
/// "To safely grow 1 patch of this crop, pay `quantity` units of
/// `payment`." The payment is either another crop (which recurses) or a
/// purchasable item (which ends the chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProtectionRequirement {
    /// Crop or purchasable item paid.
    pub payment: ItemId,
    /// Raw units paid per patch.
    pub quantity: u32,
    /// Packaging the payment is handed over in, if any.
    #[serde(default)]
    pub packaging: Option<Packaging>,
}

/// One growable crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CropRecord {
    /// Stable unique key.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Patch category.
    pub category: CropCategory,
    /// Farming level required to plant.
    pub unlock_level: u32,
    /// Seeds consumed when planting one patch.
    pub seeds_per_patch: u32,
    /// Minutes from planting to harvest.
    pub growth_minutes: u32,
    /// Experience awarded for planting one patch.
    #[ts(as = "String")]
    pub experience_per_plant: Decimal,
    /// Experience awarded per harvested unit (or per check for bushes).
    #[ts(as = "String")]
    pub experience_per_harvest: Decimal,
    /// Fixed or probabilistic yield.
    pub yield_profile: YieldProfile,
    /// Payment protecting the patch, if the crop accepts one.
    #[serde(default)]
    pub protection: Option<ProtectionRequirement>,
}

impl CropRecord {
    /// Fixed harvest units, if the crop's yield is deterministic.
    pub const fn fixed_yield(&self) -> Option<u32> {
        match self.yield_profile {
            YieldProfile::Fixed { units } => Some(units),
            YieldProfile::Lives { .. } => None,
        }
    }
}

/// An item bought from a shop or another player, never grown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PurchasableItem {
    /// Stable unique key.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Packaging the item is sold in, if any.
    #[serde(default)]
    pub packaging: Option<Packaging>,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Yield modifiers the player has active.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct ModifierFlags {
    /// Magic secateurs equipped.
    pub secateurs: bool,
    /// Farming cape equipped.
    pub farming_cape: bool,
    /// Attas seed active in the anima patch.
    pub attas_seed: bool,
    /// Regional diary bonus.
    pub regional: RegionalBonus,
}

impl ModifierFlags {
    /// Active modifiers with their percentage bonus, in application order.
    pub fn active(&self) -> Vec<(Modifier, u32)> {
        let mut active = Vec::with_capacity(4);
        if self.secateurs {
            active.push((Modifier::Secateurs, 10));
        }
        if self.farming_cape {
            active.push((Modifier::FarmingCape, 5));
        }
        if self.attas_seed {
            active.push((Modifier::AttasSeed, 5));
        }
        if self.regional != RegionalBonus::None {
            active.push((Modifier::Regional, self.regional.percent()));
        }
        active
    }
}

// ---------------------------------------------------------------------------
// Yield values
// ---------------------------------------------------------------------------

/// Harvest-count distribution for one patch, or a total over many patches.
///
/// Invariant: `0 <= min <= average <= max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct YieldDistribution {
    /// Guaranteed harvest.
    #[ts(as = "String")]
    pub min: Decimal,
    /// Expected harvest, rounded to one decimal place.
    #[ts(as = "String")]
    pub average: Decimal,
    /// Practical upper bound.
    #[ts(as = "String")]
    pub max: Decimal,
}

impl YieldDistribution {
    /// Distribution of a deterministic crop.
    pub fn fixed(units: u32) -> Self {
        let units = Decimal::from(units);
        Self {
            min: units,
            average: units,
            max: units,
        }
    }

    /// Select the value a strategy plans with.
    pub const fn pick(&self, strategy: YieldStrategy) -> Decimal {
        match strategy {
            YieldStrategy::Min => self.min,
            YieldStrategy::Average => self.average,
            YieldStrategy::Max => self.max,
        }
    }

    /// Multiply each branch by a patch count.
    ///
    /// Returns `None` on overflow.
    pub fn times(&self, patches: u32) -> Option<Self> {
        let n = Decimal::from(patches);
        Some(Self {
            min: self.min.checked_mul(n)?,
            average: self.average.checked_mul(n)?,
            max: self.max.checked_mul(n)?,
        })
    }

    /// Add two distributions branch by branch.
    ///
    /// Returns `None` on overflow.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Some(Self {
            min: self.min.checked_add(other.min)?,
            average: self.average.checked_add(other.average)?,
            max: self.max.checked_add(other.max)?,
        })
    }
}

/// Patch counts computed independently for each yield strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PatchCounts {
    /// Patches needed if every patch yields its minimum.
    pub min: u32,
    /// Patches needed at the expected yield.
    pub average: u32,
    /// Patches needed at the optimistic bound.
    pub max: u32,
}

impl PatchCounts {
    /// Select the count a strategy plans with.
    pub const fn pick(&self, strategy: YieldStrategy) -> u32 {
        match strategy {
            YieldStrategy::Min => self.min,
            YieldStrategy::Average => self.average,
            YieldStrategy::Max => self.max,
        }
    }

    /// Add two counts branch by branch.
    ///
    /// Returns `None` on overflow.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Some(Self {
            min: self.min.checked_add(other.min)?,
            average: self.average.checked_add(other.average)?,
            max: self.max.checked_add(other.max)?,
        })
    }
}
