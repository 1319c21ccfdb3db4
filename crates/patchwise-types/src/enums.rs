//! Enumeration types for the Patchwise planner.
//!
//! Crop categories, compost tiers, yield strategies, and the yield
//! modifiers a player can have active while farming.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Crop categories
// ---------------------------------------------------------------------------

/// The kind of patch a crop is grown in.
///
/// The set is closed: every crop in the registry belongs to exactly one
/// category, and modifier applicability is decided per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CropCategory {
    /// Allotment patches (potatoes, onions, watermelons, ...).
    GroundPlot,
    /// Hops patches (barley, jute, wildblood, ...).
    VinePlot,
    /// Bush patches. Berries are picked a fixed number of times.
    Bush,
    /// Herb patches.
    Herb,
    /// Flower patches.
    Flower,
}

impl CropCategory {
    /// All categories in declaration order.
    pub const ALL: [Self; 5] = [
        Self::GroundPlot,
        Self::VinePlot,
        Self::Bush,
        Self::Herb,
        Self::Flower,
    ];

    /// Whether the given modifier affects crops of this category.
    ///
    /// Secateurs affect every harvest-lives patch, the attas seed affects
    /// all categories, and the cape and regional bonuses apply to herbs
    /// only.
    pub const fn accepts(self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Secateurs => matches!(self, Self::GroundPlot | Self::VinePlot | Self::Herb),
            Modifier::AttasSeed => true,
            Modifier::FarmingCape | Modifier::Regional => matches!(self, Self::Herb),
        }
    }
}

impl core::fmt::Display for CropCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::GroundPlot => "allotment",
            Self::VinePlot => "hops",
            Self::Bush => "bush",
            Self::Herb => "herb",
            Self::Flower => "flower",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Compost
// ---------------------------------------------------------------------------

/// Soil additive applied to a patch before planting.
///
/// Each tier adds extra harvest lives on top of the base three.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CompostTier {
    /// No additive.
    #[default]
    None,
    /// Regular compost (+1 life).
    Compost,
    /// Supercompost (+2 lives).
    Supercompost,
    /// Ultracompost (+3 lives).
    Ultracompost,
}

impl CompostTier {
    /// All tiers, weakest first.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::Compost,
        Self::Supercompost,
        Self::Ultracompost,
    ];

    /// Extra harvest lives granted by this tier.
    pub const fn extra_lives(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Compost => 1,
            Self::Supercompost => 2,
            Self::Ultracompost => 3,
        }
    }

    /// Whether this tier consumes an additive item per patch.
    pub const fn is_applied(self) -> bool {
        !matches!(self, Self::None)
    }
}

// ---------------------------------------------------------------------------
// Yield strategy
// ---------------------------------------------------------------------------

/// Which branch of a yield distribution drives patch-count planning.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum YieldStrategy {
    /// Plan for the worst case: every patch yields its minimum.
    Min,
    /// Plan for the expected yield.
    #[default]
    Average,
    /// Plan for the optimistic practical bound.
    Max,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// A yield modifier that scales a crop's chance-to-save constants.
///
/// Listed in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Modifier {
    /// Magic secateurs (+10%).
    Secateurs,
    /// Farming cape (+5%, herbs only).
    FarmingCape,
    /// Attas seed planted in the anima patch (+5%).
    AttasSeed,
    /// Regional achievement diary bonus (herbs only).
    Regional,
}

/// Regional achievement diary bonus to herb yields.
///
/// The Kandarin and Kourend bonuses do not stack, so only one value can be
/// active at a time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RegionalBonus {
    /// No diary bonus.
    #[default]
    None,
    /// Kandarin medium diary (+5%).
    KandarinMedium,
    /// Kandarin hard diary (+10%).
    KandarinHard,
    /// Kandarin elite diary (+15%).
    KandarinElite,
    /// Kourend and Kebos elite diary (+5%).
    KourendElite,
}

impl RegionalBonus {
    /// Percentage added to the chance-to-save constants.
    pub const fn percent(self) -> u32 {
        match self {
            Self::None => 0,
            Self::KandarinMedium | Self::KourendElite => 5,
            Self::KandarinHard => 10,
            Self::KandarinElite => 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compost_lives_increase_by_tier() {
        let lives: Vec<u32> = CompostTier::ALL.iter().map(|t| t.extra_lives()).collect();
        assert_eq!(lives, vec![0, 1, 2, 3]);
        assert!(!CompostTier::None.is_applied());
        assert!(CompostTier::Ultracompost.is_applied());
    }

    #[test]
    fn herb_only_modifiers() {
        assert!(CropCategory::Herb.accepts(Modifier::FarmingCape));
        assert!(CropCategory::Herb.accepts(Modifier::Regional));
        assert!(!CropCategory::GroundPlot.accepts(Modifier::FarmingCape));
        assert!(!CropCategory::VinePlot.accepts(Modifier::Regional));
    }

    #[test]
    fn secateurs_skip_fixed_yield_categories() {
        assert!(CropCategory::GroundPlot.accepts(Modifier::Secateurs));
        assert!(!CropCategory::Bush.accepts(Modifier::Secateurs));
        assert!(!CropCategory::Flower.accepts(Modifier::Secateurs));
    }

    #[test]
    fn attas_applies_everywhere() {
        assert!(CropCategory::ALL.iter().all(|c| c.accepts(Modifier::AttasSeed)));
    }

    #[test]
    fn regional_percentages() {
        assert_eq!(RegionalBonus::None.percent(), 0);
        assert_eq!(RegionalBonus::KandarinElite.percent(), 15);
        assert_eq!(RegionalBonus::KourendElite.percent(), 5);
    }

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&CropCategory::GroundPlot).unwrap_or_default();
        assert_eq!(json, "\"ground_plot\"");
        let tier: CompostTier =
            serde_json::from_str("\"supercompost\"").unwrap_or(CompostTier::None);
        assert_eq!(tier, CompostTier::Supercompost);
    }
}
