//! Shared type definitions for the Patchwise farming planner.
//!
//! This crate is the single source of truth for the records the planner
//! consumes and the results it produces. Types flow downstream to
//! `TypeScript` via `ts-rs` for the presentation layer.
//!
//! # Modules
//!
//! - [`ids`] -- The [`ItemId`] key shared by crops and purchasable items
//! - [`enums`] -- Crop categories, compost tiers, strategies, modifiers
//! - [`structs`] -- Crop and item records, protection edges, yield values
//! - [`plans`] -- Resolver, solver, and progression results

pub mod enums;
pub mod ids;
pub mod plans;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CompostTier, CropCategory, Modifier, RegionalBonus, YieldStrategy};
pub use ids::ItemId;
pub use plans::{
    LevelResolution, MaterialsManifest, PaymentPackaging, PlanStep, PlanTotals, ProgressionPlan,
    ProgressionStep, Resolution, ResolutionRequirement,
};
pub use structs::{
    CropRecord, ModifierFlags, Packaging, PatchCounts, ProtectionRequirement, PurchasableItem,
    YieldDistribution, YieldProfile,
};
