//! Integration tests for the planning engine against the bundled crop data.
//!
//! Each test builds its own planner, so every run starts from a cold yield
//! cache unless the test warms one on purpose.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use patchwise_core::{
    GrowingConditions, LevelRequest, Planner, PlannerError, ProgressionOptions, ResolveRequest,
    SearchMode, SolverSettings, plan_experience,
};
use patchwise_crops::{CropError, CropRegistry, YieldCache, default_registry, experience_between};
use patchwise_types::{
    CompostTier, CropCategory, ItemId, ModifierFlags, RegionalBonus, YieldProfile, YieldStrategy,
};
use rust_decimal::Decimal;

fn registry() -> CropRegistry {
    default_registry().expect("bundled registry is valid")
}

fn all_modifiers() -> [ModifierFlags; 3] {
    [
        ModifierFlags::default(),
        ModifierFlags {
            secateurs: true,
            farming_cape: true,
            attas_seed: true,
            regional: RegionalBonus::KandarinElite,
        },
        ModifierFlags {
            attas_seed: true,
            regional: RegionalBonus::KourendElite,
            ..ModifierFlags::default()
        },
    ]
}

// ---------------------------------------------------------------------------
// Yield model
// ---------------------------------------------------------------------------

#[test]
fn fixed_yield_crops_ignore_level_compost_and_modifiers() {
    let registry = registry();
    for crop in registry.crops() {
        let YieldProfile::Fixed { units } = crop.yield_profile else {
            continue;
        };
        let units = Decimal::from(units);
        for level in [1, 50, 99] {
            for compost in CompostTier::ALL {
                for flags in all_modifiers() {
                    let y = registry.yield_of(&crop.id, level, compost, &flags).unwrap();
                    assert_eq!((y.min, y.average, y.max), (units, units, units), "{}", crop.id);
                }
            }
        }
    }
}

#[test]
fn probabilistic_yields_are_ordered_and_grow() {
    let registry = registry();
    let flags = ModifierFlags::default();
    for crop in registry.crops() {
        if crop.fixed_yield().is_some() {
            continue;
        }
        let mut previous = Decimal::ZERO;
        for level in 1..=99 {
            let y = registry
                .yield_of(&crop.id, level, CompostTier::None, &flags)
                .unwrap();
            assert!(y.min <= y.average && y.average <= y.max, "{} at {level}", crop.id);
            assert!(y.average >= previous, "{} at {level}", crop.id);
            previous = y.average;
        }

        let low = registry.yield_of(&crop.id, 1, CompostTier::None, &flags).unwrap();
        let high = registry.yield_of(&crop.id, 99, CompostTier::None, &flags).unwrap();
        assert!(low.average < high.average, "{}", crop.id);

        let mut previous = Decimal::ZERO;
        for compost in CompostTier::ALL {
            let y = registry.yield_of(&crop.id, 60, compost, &flags).unwrap();
            assert!(y.average > previous, "{} with {compost:?}", crop.id);
            previous = y.average;
        }
    }
}

#[test]
fn unknown_crop_yield_fails() {
    let registry = registry();
    let err = registry
        .yield_of(&ItemId::from("kelp"), 50, CompostTier::None, &ModifierFlags::default())
        .unwrap_err();
    assert!(matches!(err, CropError::UnknownCrop(_)));
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

#[test]
fn single_requirement_example() {
    let registry = registry();
    let conditions = GrowingConditions {
        compost: CompostTier::Ultracompost,
        ..GrowingConditions::default()
    };
    let mut planner = Planner::new(&registry);
    let plan = planner
        .resolve(&ResolveRequest::new("potato", 20, 99).with_conditions(conditions))
        .unwrap();

    // Potato is paid for with a purchasable, so it is the only crop.
    assert_eq!(plan.requirements.len(), 1);
    let potato = &plan.requirements["potato"];
    let per_patch = registry
        .yield_of(&ItemId::from("potato"), 99, CompostTier::Ultracompost, &ModifierFlags::default())
        .unwrap();
    let expected = (Decimal::from(20) / per_patch.average).ceil();
    assert_eq!(Decimal::from(potato.patches), expected);
    assert_eq!(potato.per_patch_yield, per_patch);
}

#[test]
fn payment_crop_example() {
    // Onion pays ten potatoes per patch.
    let registry = registry();
    let mut planner = Planner::new(&registry);
    let plan = planner.resolve(&ResolveRequest::new("onion", 1, 20)).unwrap();

    assert_eq!(plan.requirements.len(), 2);
    assert_eq!(plan.requirements["onion"].patches, 1);
    assert!(plan.requirements["potato"].patches >= 1);

    let packaging = plan.requirements["onion"].payment_packaging.as_ref().unwrap();
    assert_eq!(packaging.units, 10);
    assert_eq!(packaging.containers, 1);

    // Potato's own compost payment shows up as a purchase, not a crop.
    let compost = plan
        .trace
        .iter()
        .find(|s| s.item.as_str() == "compost")
        .unwrap();
    assert_eq!(
        compost.purchase_quantity,
        Some(plan.requirements["potato"].patches * 2)
    );
    // Foundation first, target last.
    assert_eq!(plan.trace.last().unwrap().item.as_str(), "onion");
    assert_eq!(plan.trace[0].item.as_str(), "compost");
}

#[test]
fn covered_target_needs_nothing() {
    let registry = registry();
    let mut planner = Planner::new(&registry);
    for held in [25, 26, 1000] {
        let plan = planner
            .resolve(&ResolveRequest::new("snape_grass", 25, 70).holding("snape_grass", held))
            .unwrap();
        assert!(plan.requirements.is_empty());
        assert_eq!(plan.totals.total_patches, 0);
        assert_eq!(plan.totals.estimated_minutes, 0);
        assert_eq!(plan.trace.len(), 1);
    }
}

#[test]
fn chain_produces_entries_for_every_link() {
    // snape grass <- jangerberry <- watermelon <- curry leaf (bought)
    let registry = registry();
    let mut planner = Planner::new(&registry);
    let plan = planner
        .resolve(&ResolveRequest::new("snape_grass", 10, 70))
        .unwrap();

    for crop in ["snape_grass", "jangerberry", "watermelon"] {
        let step = plan.trace.iter().find(|s| s.item.as_str() == crop).unwrap();
        assert!(step.patch_counts.average > 0, "{crop}");
        assert!(plan.requirements[crop].patches > 0, "{crop}");
    }
    let levels: Vec<u32> = plan.trace.iter().map(|s| s.chain_level).collect();
    assert_eq!(levels, [3, 2, 1, 0]);
    assert_eq!(plan.trace[0].purchase_quantity.map(|q| q > 0), Some(true));

    let minutes: u64 = plan
        .requirements
        .values()
        .map(|r| {
            let crop = registry.crop(&r.item).unwrap();
            u64::from(r.patches) * u64::from(crop.growth_minutes)
        })
        .sum();
    assert_eq!(plan.totals.estimated_minutes, minutes);
}

#[test]
fn resolve_is_idempotent() {
    let registry = registry();
    let request = ResolveRequest::new("tomato", 137, 45)
        .with_conditions(GrowingConditions {
            compost: CompostTier::Compost,
            strategy: YieldStrategy::Max,
            modifiers: ModifierFlags {
                secateurs: true,
                ..ModifierFlags::default()
            },
        })
        .holding("onion", 12);

    let mut planner = Planner::new(&registry);
    let first = planner.resolve(&request).unwrap();
    let second = planner.resolve(&request).unwrap();
    let fresh = Planner::new(&registry).resolve(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn more_starting_resources_never_add_patches() {
    let registry = registry();
    let mut planner = Planner::new(&registry);
    let chain = ["tomato", "cabbage", "onion", "potato"];

    for held_crop in chain {
        let mut previous: Option<(u32, u32)> = None;
        for held in (0..=400).step_by(20) {
            let plan = planner
                .resolve(&ResolveRequest::new("tomato", 60, 30).holding(held_crop, held))
                .unwrap();
            let own = plan
                .requirements
                .get(held_crop)
                .map_or(0, |r| r.patches);
            let total = plan.totals.total_patches;
            if let Some((prev_own, prev_total)) = previous {
                assert!(own <= prev_own, "{held_crop} holding {held}");
                assert!(total <= prev_total, "{held_crop} holding {held}");
            }
            previous = Some((own, total));
        }
    }
}

#[test]
fn strategy_changes_patch_counts_not_recorded_candidates() {
    let registry = registry();
    let mut planner = Planner::new(&registry);
    let at = |strategy| {
        ResolveRequest::new("ranarr", 200, 80).with_conditions(GrowingConditions {
            strategy,
            ..GrowingConditions::default()
        })
    };
    let min = planner.resolve(&at(YieldStrategy::Min)).unwrap();
    let max = planner.resolve(&at(YieldStrategy::Max)).unwrap();

    let (min_req, max_req) = (&min.requirements["ranarr"], &max.requirements["ranarr"]);
    assert_eq!(min_req.patch_counts, max_req.patch_counts);
    assert!(min_req.patches > max_req.patches);
    assert_eq!(min_req.patches, min_req.patch_counts.min);
    assert_eq!(max_req.patches, max_req.patch_counts.max);
}

#[test]
fn plans_serialize_for_presentation() {
    let registry = registry();
    let plan = Planner::new(&registry)
        .resolve(&ResolveRequest::new("onion", 30, 20))
        .unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["target"], "onion");
    assert_eq!(json["trace"].as_array().map(Vec::len), Some(plan.trace.len()));
    assert!(json["requirements"]["potato"]["per_patch_yield"]["average"].is_string());
    assert_eq!(json["requirements"]["onion"]["payment_packaging"]["container"], "sack");
}

#[test]
fn unknown_target_fails() {
    let registry = registry();
    let err = Planner::new(&registry)
        .resolve(&ResolveRequest::new("kelp", 5, 50))
        .unwrap_err();
    assert_eq!(err, PlannerError::UnknownCrop(ItemId::from("kelp")));
}

#[test]
fn cyclic_registry_file_is_rejected() {
    let yaml = r"
crops:
  - id: a
    name: A
    category: bush
    unlock_level: 1
    seeds_per_patch: 1
    growth_minutes: 10
    experience_per_plant: '1'
    experience_per_harvest: '1'
    yield_profile: { kind: fixed, units: 4 }
    protection: { payment: b, quantity: 2 }
  - id: b
    name: B
    category: bush
    unlock_level: 1
    seeds_per_patch: 1
    growth_minutes: 10
    experience_per_plant: '1'
    experience_per_harvest: '1'
    yield_profile: { kind: fixed, units: 4 }
    protection: { payment: a, quantity: 2 }
";
    let err = CropRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, CropError::ProtectionCycle { .. }), "{err}");
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

#[test]
fn solved_quantity_is_minimal() {
    let registry = registry();
    let cases = [
        ("potato", 1, 10),
        ("onion", 5, 9),
        ("tomato", 20, 31),
        ("guam", 9, 30),
        ("snape_grass", 61, 70),
        ("poison_ivy", 70, 80),
        ("torstol", 85, 99),
    ];
    let mut planner = Planner::new(&registry);
    for (crop, start, target) in cases {
        let request = LevelRequest::new(crop, start, target);
        let plan = planner.solve_for_level(&request).unwrap();
        let needed = Decimal::from(experience_between(start, target).unwrap());

        assert_eq!(Decimal::from(plan.experience_needed), needed);
        assert!(plan.total_experience >= needed, "{crop}");
        let breakdown: Decimal = plan.experience_breakdown.values().copied().sum();
        assert_eq!(breakdown, plan.total_experience);

        if plan.quantity > 1 {
            let less = planner
                .resolve(&ResolveRequest::new(crop, plan.quantity - 1, start))
                .unwrap();
            let (experience, _) = plan_experience(&registry, &less).unwrap();
            assert!(experience < needed, "{crop} at {}", plan.quantity - 1);
        }
    }
}

#[test]
fn linear_and_bisect_agree() {
    let registry = registry();
    let linear = SolverSettings {
        search: SearchMode::Linear,
        ..SolverSettings::DEFAULT
    };
    let conditions = GrowingConditions {
        compost: CompostTier::Supercompost,
        strategy: YieldStrategy::Min,
        modifiers: ModifierFlags {
            secateurs: true,
            ..ModifierFlags::default()
        },
    };
    let cases = [
        LevelRequest::new("marigold", 2, 12),
        LevelRequest::new("jute", 13, 22).with_conditions(conditions),
        LevelRequest::new("dwellberry", 36, 41),
        LevelRequest::new("irit", 44, 52).with_conditions(conditions),
    ];
    for request in cases {
        let slow = Planner::new(&registry)
            .with_solver(linear)
            .solve_for_level(&request)
            .unwrap();
        let fast = Planner::new(&registry).solve_for_level(&request).unwrap();
        assert_eq!(slow.quantity, fast.quantity, "{}", request.target);
        assert_eq!(slow.resolution, fast.resolution, "{}", request.target);
        assert_eq!(slow.total_experience, fast.total_experience);
    }
}

#[test]
fn starting_resources_shrink_level_plans() {
    let registry = registry();
    let mut planner = Planner::new(&registry);
    let bare = planner
        .solve_for_level(&LevelRequest::new("jute", 13, 25))
        .unwrap();
    let mut request = LevelRequest::new("jute", 13, 25);
    request.starting_resources.insert(ItemId::from("barley"), 500);
    let stocked = planner.solve_for_level(&request).unwrap();

    // Held barley is not grown, so less barley experience is earned and
    // more jute is needed to make up the gap.
    assert!(stocked.quantity >= bare.quantity);
    let bare_barley = bare.resolution.requirements["barley"].patches;
    let stocked_barley = stocked
        .resolution
        .requirements
        .get("barley")
        .map_or(0, |r| r.patches);
    assert!(stocked_barley < bare_barley);
}

#[test]
fn level_below_unlock_is_invalid() {
    let registry = registry();
    let err = Planner::new(&registry)
        .solve_for_level(&LevelRequest::new("torstol", 84, 90))
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidRange { start: 84, target: 90, .. }));
}

// ---------------------------------------------------------------------------
// Yield cache
// ---------------------------------------------------------------------------

#[test]
fn warm_cache_matches_cold_cache() {
    let registry = registry();
    let request = LevelRequest::new("watermelon", 47, 60);

    let mut cold = Planner::new(&registry);
    let cold_plan = cold.solve_for_level(&request).unwrap();
    let warmed = cold.into_cache();
    assert!(!warmed.is_empty());

    let mut warm = Planner::with_cache(&registry, warmed);
    let warm_plan = warm.solve_for_level(&request).unwrap();
    assert_eq!(cold_plan, warm_plan);
    assert!(warm.cache().hits() > 0);

    let mut fresh = Planner::with_cache(&registry, YieldCache::new());
    assert_eq!(fresh.solve_for_level(&request).unwrap(), cold_plan);
}

#[test]
fn planners_share_one_registry_across_threads() {
    let registry = registry();
    let (a, b) = std::thread::scope(|scope| {
        let a = scope.spawn(|| {
            Planner::new(&registry)
                .solve_for_level(&LevelRequest::new("kwuarm", 56, 70))
                .unwrap()
        });
        let b = scope.spawn(|| {
            Planner::new(&registry)
                .solve_for_level(&LevelRequest::new("kwuarm", 56, 70))
                .unwrap()
        });
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

#[test]
fn full_progression_reaches_99() {
    let registry = registry();
    let mut planner = Planner::new(&registry);
    let plan = planner
        .plan_progression(&ProgressionOptions::default())
        .unwrap();

    assert_eq!(plan.steps.len(), 98);
    assert_eq!(plan.steps[0].level, 1);
    assert_eq!(plan.steps[97].level, 98);
    assert!(plan.total_experience_gained >= Decimal::from(13_034_431));

    let patches: u32 = plan
        .steps
        .iter()
        .map(|s| s.plan.resolution.totals.total_patches)
        .sum();
    assert_eq!(plan.total_patches_used, patches);

    for step in &plan.steps {
        let crop = registry.crop(&step.crop).unwrap();
        assert!(crop.unlock_level <= step.level);
        assert_eq!(step.plan.starting_level, step.level);
        assert_eq!(step.plan.target_level, step.level + 1);
        assert!(step.plan.total_experience >= Decimal::from(step.plan.experience_needed));
    }

    let seeds: u32 = plan.materials.seeds.values().sum();
    assert!(seeds > 0);
    assert_eq!(plan.materials.compost, 0);
}

#[test]
fn progression_steps_are_independent() {
    let registry = registry();
    let options = ProgressionOptions {
        start_level: 40,
        target_level: 46,
        excluded_categories: [CropCategory::Flower].into_iter().collect(),
        conditions: GrowingConditions {
            compost: CompostTier::Ultracompost,
            ..GrowingConditions::default()
        },
    };
    let whole = Planner::new(&registry).plan_progression(&options).unwrap();

    for step in &whole.steps {
        let alone = Planner::new(&registry)
            .plan_progression(&ProgressionOptions {
                start_level: step.level,
                target_level: step.level + 1,
                ..options.clone()
            })
            .unwrap();
        assert_eq!(alone.steps.len(), 1);
        assert_eq!(&alone.steps[0], step);
        assert_ne!(registry.crop(&step.crop).unwrap().category, CropCategory::Flower);
    }
    assert!(whole.materials.compost > 0);
}
