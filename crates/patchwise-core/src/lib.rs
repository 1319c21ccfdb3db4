//! Planning engine for the Patchwise farming planner.
//!
//! Given a crop registry, this crate answers three questions:
//!
//! 1. How many patches of what must I grow to harvest `n` of a crop?
//!    ([`Planner::resolve`])
//! 2. How much of a crop must I grow to get from one level to another?
//!    ([`Planner::solve_for_level`])
//! 3. What should I grow at every level on the way to 99?
//!    ([`Planner::plan_progression`])
//!
//! All calculations are synchronous and pure over the registry. The only
//! state a [`Planner`] carries between calls is its yield cache.
//!
//! # Modules
//!
//! - [`planner`] -- [`Planner`], the entry point owning the yield cache.
//! - [`request`] -- Inputs shared by the three modes.
//! - [`resolver`] -- Recursive protection-chain resolution.
//! - [`solver`] -- Experience-target search and plan experience.
//! - [`progression`] -- Level-by-level crop selection.
//! - [`manifest`] -- Seeds, purchases, and compost for a plan.
//! - [`config`] -- `patchwise.yaml` loading.
//! - [`error`] -- [`PlannerError`].

pub mod config;
pub mod error;
pub mod manifest;
pub mod planner;
pub mod progression;
pub mod request;
pub mod resolver;
pub mod solver;

// Re-export primary types at crate root.
pub use config::{ConfigError, Job, PlannerConfig};
pub use error::PlannerError;
pub use planner::Planner;
pub use request::{GrowingConditions, LevelRequest, ProgressionOptions, ResolveRequest};
pub use solver::{SearchMode, SolverSettings, plan_experience};
