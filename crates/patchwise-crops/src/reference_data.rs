//! Bundled reference registry.
//!
//! Allotment, hops, bush, herb, and flower crops with their protection
//! payments, plus the purchasable items that end the payment chains.
//! Callers with fresher data load their own registry from YAML instead.

use rust_decimal::Decimal;

use patchwise_types::{
    CropCategory, CropRecord, ItemId, Packaging, ProtectionRequirement, PurchasableItem,
    YieldProfile,
};

use crate::error::CropError;
use crate::registry::CropRegistry;

/// Experience value from tenths, so `xp(95)` is 9.5.
const fn xp(tenths: u32) -> Decimal {
    Decimal::from_parts(tenths, 0, 0, false, 1)
}

/// Static description of one crop row.
struct Row {
    id: &'static str,
    name: &'static str,
    category: CropCategory,
    level: u32,
    seeds: u32,
    minutes: u32,
    plant_xp: Decimal,
    harvest_xp: Decimal,
    profile: YieldProfile,
    protection: Option<Protection>,
}

/// Static description of one protection edge.
struct Protection {
    payment: &'static str,
    quantity: u32,
    packaging: Option<(&'static str, u32)>,
}

const fn lives(cts_low: u32, cts_high: u32) -> YieldProfile {
    YieldProfile::Lives { cts_low, cts_high }
}

const fn fixed(units: u32) -> YieldProfile {
    YieldProfile::Fixed { units }
}

const fn paid(payment: &'static str, quantity: u32) -> Option<Protection> {
    Some(Protection {
        payment,
        quantity,
        packaging: None,
    })
}

const fn packed(
    payment: &'static str,
    quantity: u32,
    container: &'static str,
    per_container: u32,
) -> Option<Protection> {
    Some(Protection {
        payment,
        quantity,
        packaging: Some((container, per_container)),
    })
}

impl Row {
    fn into_record(self) -> CropRecord {
        CropRecord {
            id: ItemId::from(self.id),
            name: self.name.to_owned(),
            category: self.category,
            unlock_level: self.level,
            seeds_per_patch: self.seeds,
            growth_minutes: self.minutes,
            experience_per_plant: self.plant_xp,
            experience_per_harvest: self.harvest_xp,
            yield_profile: self.profile,
            protection: self.protection.map(|p| ProtectionRequirement {
                payment: ItemId::from(p.payment),
                quantity: p.quantity,
                packaging: p.packaging.map(|(container, units)| Packaging {
                    container: container.to_owned(),
                    units_per_container: units,
                }),
            }),
        }
    }
}

fn purchasable(id: &str, name: &str, packaging: Option<(&str, u32)>) -> PurchasableItem {
    PurchasableItem {
        id: ItemId::from(id),
        name: name.to_owned(),
        packaging: packaging.map(|(container, units)| Packaging {
            container: container.to_owned(),
            units_per_container: units,
        }),
    }
}

/// Build the bundled reference registry.
///
/// # Errors
///
/// Returns [`CropError`] if the hard-coded data fails validation (should
/// not happen).
#[allow(clippy::too_many_lines)]
pub fn default_registry() -> Result<CropRegistry, CropError> {
    use CropCategory::{Bush, Flower, GroundPlot, Herb, VinePlot};

    let mut registry = CropRegistry::new();

    for item in [
        purchasable("compost", "Bucket of compost", None),
        purchasable("apple", "Cooking apple", Some(("basket", 5))),
        purchasable("curry_leaf", "Curry leaf", None),
        purchasable("mushroom", "Bittercap mushroom", None),
    ] {
        registry.add_purchasable(item)?;
    }

    #[rustfmt::skip]
    let rows = [
        // --- Allotments ---
        Row { id: "potato", name: "Potato", category: GroundPlot, level: 1, seeds: 3, minutes: 40,
              plant_xp: xp(80), harvest_xp: xp(90), profile: lives(101, 180),
              protection: paid("compost", 2) },
        Row { id: "onion", name: "Onion", category: GroundPlot, level: 5, seeds: 3, minutes: 40,
              plant_xp: xp(95), harvest_xp: xp(105), profile: lives(105, 180),
              protection: packed("potato", 10, "sack", 10) },
        Row { id: "cabbage", name: "Cabbage", category: GroundPlot, level: 7, seeds: 3, minutes: 40,
              plant_xp: xp(100), harvest_xp: xp(115), profile: lives(107, 180),
              protection: packed("onion", 10, "sack", 10) },
        Row { id: "tomato", name: "Tomato", category: GroundPlot, level: 12, seeds: 3, minutes: 40,
              plant_xp: xp(125), harvest_xp: xp(140), profile: lives(109, 180),
              protection: packed("cabbage", 20, "sack", 10) },
        Row { id: "sweetcorn", name: "Sweetcorn", category: GroundPlot, level: 20, seeds: 3,
              minutes: 60, plant_xp: xp(170), harvest_xp: xp(190), profile: lives(111, 180),
              protection: paid("jute", 10) },
        Row { id: "strawberry", name: "Strawberry", category: GroundPlot, level: 31, seeds: 3,
              minutes: 60, plant_xp: xp(260), harvest_xp: xp(290), profile: lives(113, 180),
              protection: packed("apple", 5, "basket", 5) },
        Row { id: "watermelon", name: "Watermelon", category: GroundPlot, level: 47, seeds: 3,
              minutes: 80, plant_xp: xp(485), harvest_xp: xp(545), profile: lives(115, 180),
              protection: paid("curry_leaf", 10) },
        Row { id: "snape_grass", name: "Snape grass", category: GroundPlot, level: 61, seeds: 3,
              minutes: 70, plant_xp: xp(820), harvest_xp: xp(820), profile: lives(117, 180),
              protection: paid("jangerberry", 5) },
        // --- Hops ---
        Row { id: "barley", name: "Barley", category: VinePlot, level: 3, seeds: 4, minutes: 40,
              plant_xp: xp(85), harvest_xp: xp(95), profile: lives(103, 180),
              protection: paid("compost", 3) },
        Row { id: "hammerstone", name: "Hammerstone hops", category: VinePlot, level: 4, seeds: 4,
              minutes: 40, plant_xp: xp(90), harvest_xp: xp(100), profile: lives(104, 180),
              protection: paid("marigold", 1) },
        Row { id: "asgarnian", name: "Asgarnian hops", category: VinePlot, level: 8, seeds: 4,
              minutes: 50, plant_xp: xp(109), harvest_xp: xp(120), profile: lives(107, 180),
              protection: packed("onion", 10, "sack", 10) },
        Row { id: "jute", name: "Jute fibre", category: VinePlot, level: 13, seeds: 3, minutes: 50,
              plant_xp: xp(130), harvest_xp: xp(145), profile: lives(110, 180),
              protection: paid("barley", 6) },
        Row { id: "yanillian", name: "Yanillian hops", category: VinePlot, level: 16, seeds: 4,
              minutes: 60, plant_xp: xp(145), harvest_xp: xp(160), profile: lives(112, 180),
              protection: packed("tomato", 5, "basket", 5) },
        Row { id: "krandorian", name: "Krandorian hops", category: VinePlot, level: 21, seeds: 4,
              minutes: 70, plant_xp: xp(175), harvest_xp: xp(195), profile: lives(114, 180),
              protection: packed("cabbage", 30, "sack", 10) },
        Row { id: "wildblood", name: "Wildblood hops", category: VinePlot, level: 28, seeds: 4,
              minutes: 80, plant_xp: xp(230), harvest_xp: xp(260), profile: lives(116, 180),
              protection: paid("nasturtium", 1) },
        // --- Bushes ---
        Row { id: "redberry", name: "Redberries", category: Bush, level: 10, seeds: 1,
              minutes: 100, plant_xp: xp(115), harvest_xp: xp(45), profile: fixed(4),
              protection: packed("cabbage", 40, "sack", 10) },
        Row { id: "cadavaberry", name: "Cadava berries", category: Bush, level: 22, seeds: 1,
              minutes: 120, plant_xp: xp(180), harvest_xp: xp(70), profile: fixed(4),
              protection: packed("tomato", 15, "basket", 5) },
        Row { id: "dwellberry", name: "Dwellberries", category: Bush, level: 36, seeds: 1,
              minutes: 140, plant_xp: xp(315), harvest_xp: xp(120), profile: fixed(4),
              protection: packed("strawberry", 15, "basket", 5) },
        Row { id: "jangerberry", name: "Jangerberries", category: Bush, level: 48, seeds: 1,
              minutes: 160, plant_xp: xp(505), harvest_xp: xp(190), profile: fixed(4),
              protection: paid("watermelon", 6) },
        Row { id: "whiteberry", name: "White berries", category: Bush, level: 59, seeds: 1,
              minutes: 160, plant_xp: xp(780), harvest_xp: xp(290), profile: fixed(4),
              protection: paid("mushroom", 8) },
        Row { id: "poison_ivy", name: "Poison ivy berries", category: Bush, level: 70, seeds: 1,
              minutes: 160, plant_xp: xp(1200), harvest_xp: xp(450), profile: fixed(4),
              protection: None },
        // --- Herbs ---
        Row { id: "guam", name: "Guam leaf", category: Herb, level: 9, seeds: 1, minutes: 80,
              plant_xp: xp(110), harvest_xp: xp(125), profile: lives(25, 80), protection: None },
        Row { id: "marrentill", name: "Marrentill", category: Herb, level: 14, seeds: 1,
              minutes: 80, plant_xp: xp(135), harvest_xp: xp(150), profile: lives(28, 80),
              protection: None },
        Row { id: "tarromin", name: "Tarromin", category: Herb, level: 19, seeds: 1, minutes: 80,
              plant_xp: xp(160), harvest_xp: xp(180), profile: lives(31, 80), protection: None },
        Row { id: "harralander", name: "Harralander", category: Herb, level: 26, seeds: 1,
              minutes: 80, plant_xp: xp(215), harvest_xp: xp(240), profile: lives(36, 80),
              protection: None },
        Row { id: "ranarr", name: "Ranarr weed", category: Herb, level: 32, seeds: 1, minutes: 80,
              plant_xp: xp(270), harvest_xp: xp(305), profile: lives(39, 80), protection: None },
        Row { id: "toadflax", name: "Toadflax", category: Herb, level: 38, seeds: 1, minutes: 80,
              plant_xp: xp(340), harvest_xp: xp(385), profile: lives(43, 80), protection: None },
        Row { id: "irit", name: "Irit leaf", category: Herb, level: 44, seeds: 1, minutes: 80,
              plant_xp: xp(430), harvest_xp: xp(485), profile: lives(46, 80), protection: None },
        Row { id: "avantoe", name: "Avantoe", category: Herb, level: 50, seeds: 1, minutes: 80,
              plant_xp: xp(545), harvest_xp: xp(615), profile: lives(50, 80), protection: None },
        Row { id: "kwuarm", name: "Kwuarm", category: Herb, level: 56, seeds: 1, minutes: 80,
              plant_xp: xp(690), harvest_xp: xp(780), profile: lives(54, 80), protection: None },
        Row { id: "snapdragon", name: "Snapdragon", category: Herb, level: 62, seeds: 1,
              minutes: 80, plant_xp: xp(875), harvest_xp: xp(985), profile: lives(57, 80),
              protection: None },
        Row { id: "cadantine", name: "Cadantine", category: Herb, level: 67, seeds: 1,
              minutes: 80, plant_xp: xp(1065), harvest_xp: xp(1200), profile: lives(60, 80),
              protection: None },
        Row { id: "lantadyme", name: "Lantadyme", category: Herb, level: 73, seeds: 1,
              minutes: 80, plant_xp: xp(1345), harvest_xp: xp(1515), profile: lives(64, 80),
              protection: None },
        Row { id: "dwarf_weed", name: "Dwarf weed", category: Herb, level: 79, seeds: 1,
              minutes: 80, plant_xp: xp(1705), harvest_xp: xp(1920), profile: lives(67, 80),
              protection: None },
        Row { id: "torstol", name: "Torstol", category: Herb, level: 85, seeds: 1, minutes: 80,
              plant_xp: xp(1995), harvest_xp: xp(2245), profile: lives(71, 80), protection: None },
        // --- Flowers ---
        Row { id: "marigold", name: "Marigold", category: Flower, level: 2, seeds: 1, minutes: 20,
              plant_xp: xp(85), harvest_xp: xp(470), profile: fixed(1), protection: None },
        Row { id: "rosemary", name: "Rosemary", category: Flower, level: 11, seeds: 1,
              minutes: 20, plant_xp: xp(120), harvest_xp: xp(665), profile: fixed(1),
              protection: None },
        Row { id: "nasturtium", name: "Nasturtium", category: Flower, level: 24, seeds: 1,
              minutes: 20, plant_xp: xp(195), harvest_xp: xp(1110), profile: fixed(1),
              protection: None },
        Row { id: "woad", name: "Woad leaf", category: Flower, level: 25, seeds: 1, minutes: 20,
              plant_xp: xp(205), harvest_xp: xp(385), profile: fixed(3), protection: None },
        Row { id: "limpwurt", name: "Limpwurt root", category: Flower, level: 26, seeds: 1,
              minutes: 20, plant_xp: xp(215), harvest_xp: xp(400), profile: fixed(3),
              protection: None },
        Row { id: "white_lily", name: "White lily", category: Flower, level: 58, seeds: 1,
              minutes: 20, plant_xp: xp(420), harvest_xp: xp(2500), profile: fixed(1),
              protection: None },
    ];

    for row in rows {
        registry.add_crop(row.into_record())?;
    }
    registry.validate()?;
    Ok(registry)
}
