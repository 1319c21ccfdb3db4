//! Crop catalogue, yield model, and experience table for the Patchwise
//! planner.
//!
//! This crate models what can be grown and how much it yields: crop and
//! purchasable-item records with their protection edges, the
//! harvest-lives yield formula, and the fixed level-to-experience table.
//!
//! # Modules
//!
//! - [`registry`] -- [`CropRegistry`], the read-only catalogue with
//!   reference validation and YAML loading.
//! - [`yield_model`] -- Chance-to-save and harvest distribution formulas.
//! - [`cache`] -- [`YieldCache`], an injectable memo of yield lookups.
//! - [`experience`] -- Cumulative experience per level.
//! - [`reference_data`] -- The bundled default registry.
//! - [`error`] -- Error types for registry and yield operations.

pub mod cache;
pub mod error;
pub mod experience;
pub mod reference_data;
pub mod registry;
pub mod yield_model;

// Re-export primary types at crate root.
pub use cache::YieldCache;
pub use error::CropError;
pub use experience::{experience_between, experience_for_level, level_for_experience};
pub use reference_data::default_registry;
pub use registry::{CropRegistry, Payment};
pub use yield_model::{BASE_HARVEST_LIVES, MAX_SKILL_LEVEL, MIN_SKILL_LEVEL, yield_distribution};
