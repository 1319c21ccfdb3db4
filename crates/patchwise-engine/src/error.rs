//! Error types for the planner binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode between startup and printing the plan.

/// Top-level error for the planner binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: patchwise_core::ConfigError,
    },

    /// The crop registry could not be loaded.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: patchwise_crops::CropError,
    },

    /// A calculation failed.
    #[error("planner error: {source}")]
    Planner {
        /// The underlying planner error.
        #[from]
        source: patchwise_core::PlannerError,
    },

    /// The result could not be rendered as JSON.
    #[error("output error: {source}")]
    Output {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
