//! The [`Planner`] entry point.
//!
//! A planner borrows a read-only [`CropRegistry`] and owns a
//! [`YieldCache`]. The three calculation modes live in their own modules
//! as `impl Planner` blocks:
//!
//! - [`Planner::resolve`] in [`crate::resolver`]
//! - [`Planner::solve_for_level`] in [`crate::solver`]
//! - [`Planner::plan_progression`] in [`crate::progression`]
//!
//! Planners never mutate the registry, so several may run on separate
//! threads against one shared registry.

use patchwise_crops::{CropRegistry, YieldCache};

use crate::solver::SolverSettings;

/// Runs planning calculations against one crop registry.
#[derive(Debug)]
pub struct Planner<'r> {
    pub(crate) registry: &'r CropRegistry,
    pub(crate) cache: YieldCache,
    pub(crate) solver: SolverSettings,
}

impl<'r> Planner<'r> {
    /// A planner with a cold cache and default solver settings.
    pub const fn new(registry: &'r CropRegistry) -> Self {
        Self::with_cache(registry, YieldCache::new())
    }

    /// A planner that starts from an existing cache.
    ///
    /// The cache must have been filled from the same registry.
    pub const fn with_cache(registry: &'r CropRegistry, cache: YieldCache) -> Self {
        Self {
            registry,
            cache,
            solver: SolverSettings::DEFAULT,
        }
    }

    /// Replace the solver settings.
    #[must_use]
    pub const fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    /// The registry this planner reads.
    pub const fn registry(&self) -> &'r CropRegistry {
        self.registry
    }

    /// The yield cache, for inspecting hit and miss counts.
    pub const fn cache(&self) -> &YieldCache {
        &self.cache
    }

    /// Current solver settings.
    pub const fn solver(&self) -> SolverSettings {
        self.solver
    }

    /// Give back the cache so a later planner can reuse it.
    pub fn into_cache(self) -> YieldCache {
        self.cache
    }
}
