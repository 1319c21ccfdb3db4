//! Configuration loading for the Patchwise planner.
//!
//! The planner reads `patchwise.yaml`. Every section is optional and falls
//! back to defaults, so an empty file (or no file) plans a full 1 to 99
//! progression with the bundled crop data.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use patchwise_crops::MIN_SKILL_LEVEL;
use patchwise_types::{CompostTier, CropCategory, ItemId, ModifierFlags, YieldStrategy};
use serde::Deserialize;

use crate::request::{GrowingConditions, LevelRequest, ProgressionOptions, ResolveRequest};
use crate::solver::{DEFAULT_ITERATION_CEILING, SearchMode, SolverSettings};

/// Environment variable that overrides `registry_path`.
pub const REGISTRY_ENV: &str = "PATCHWISE_REGISTRY";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level planner configuration, mirroring `patchwise.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlannerConfig {
    /// How patches are tended and how the solver searches.
    #[serde(default)]
    pub planner: PlannerSettings,

    /// Range and filters for progression runs.
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Crop registry YAML. The bundled reference data is used when unset.
    #[serde(default)]
    pub registry_path: Option<PathBuf>,

    /// What the batch binary calculates.
    #[serde(default)]
    pub job: Job,
}

impl PlannerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `PATCHWISE_REGISTRY` overrides `registry_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(REGISTRY_ENV) {
            self.registry_path = Some(PathBuf::from(val));
        }
    }

    /// Progression options with the configured growing conditions.
    pub fn progression_options(&self) -> ProgressionOptions {
        ProgressionOptions {
            start_level: self.progression.start_level,
            target_level: self.progression.target_level,
            excluded_categories: self.progression.excluded_categories.clone(),
            conditions: self.planner.conditions(),
        }
    }
}

/// The `planner` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlannerSettings {
    /// Farming level for quantity jobs, and the starting level for level
    /// jobs.
    #[serde(default = "default_skill_level")]
    pub skill_level: u32,

    /// Compost applied to every patch.
    #[serde(default)]
    pub compost: CompostTier,

    /// Which yield branch sizes patch counts.
    #[serde(default)]
    pub strategy: YieldStrategy,

    /// Active yield modifiers.
    #[serde(default)]
    pub modifiers: ModifierFlags,

    /// Solver search mode.
    #[serde(default)]
    pub search_mode: SearchMode,

    /// Solver iteration ceiling.
    #[serde(default = "default_iteration_ceiling")]
    pub iteration_ceiling: u32,
}

impl PlannerSettings {
    /// The growing conditions these settings describe.
    pub const fn conditions(&self) -> GrowingConditions {
        GrowingConditions {
            compost: self.compost,
            strategy: self.strategy,
            modifiers: self.modifiers,
        }
    }

    /// The solver settings these settings describe.
    pub const fn solver(&self) -> SolverSettings {
        SolverSettings {
            search: self.search_mode,
            iteration_ceiling: self.iteration_ceiling,
        }
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            skill_level: default_skill_level(),
            compost: CompostTier::default(),
            strategy: YieldStrategy::default(),
            modifiers: ModifierFlags::default(),
            search_mode: SearchMode::default(),
            iteration_ceiling: default_iteration_ceiling(),
        }
    }
}

/// The `progression` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressionConfig {
    /// First level planned.
    #[serde(default = "default_skill_level")]
    pub start_level: u32,

    /// Level to finish at.
    #[serde(default = "default_target_level")]
    pub target_level: u32,

    /// Categories never selected.
    #[serde(default)]
    pub excluded_categories: BTreeSet<CropCategory>,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            start_level: default_skill_level(),
            target_level: default_target_level(),
            excluded_categories: BTreeSet::new(),
        }
    }
}

/// A single calculation for the batch binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Job {
    /// Plan the configured progression range.
    #[default]
    Progression,

    /// Harvest a fixed quantity of one crop at `planner.skill_level`.
    Quantity {
        /// Crop to harvest.
        crop: ItemId,
        /// Units wanted.
        quantity: u32,
        /// Units already held.
        #[serde(default)]
        starting_resources: BTreeMap<ItemId, u32>,
    },

    /// Grow one crop from `planner.skill_level` to `target_level`.
    Level {
        /// Crop to grow.
        crop: ItemId,
        /// Level to reach.
        target_level: u32,
        /// Units already held.
        #[serde(default)]
        starting_resources: BTreeMap<ItemId, u32>,
    },
}

impl Job {
    /// Resolver request for a quantity job.
    pub fn resolve_request(&self, settings: &PlannerSettings) -> Option<ResolveRequest> {
        match self {
            Self::Quantity {
                crop,
                quantity,
                starting_resources,
            } => Some(ResolveRequest {
                target: crop.clone(),
                quantity: *quantity,
                skill_level: settings.skill_level,
                conditions: settings.conditions(),
                starting_resources: starting_resources.clone(),
            }),
            _ => None,
        }
    }

    /// Solver request for a level job.
    pub fn level_request(&self, settings: &PlannerSettings) -> Option<LevelRequest> {
        match self {
            Self::Level {
                crop,
                target_level,
                starting_resources,
            } => Some(LevelRequest {
                target: crop.clone(),
                starting_level: settings.skill_level,
                target_level: *target_level,
                conditions: settings.conditions(),
                starting_resources: starting_resources.clone(),
            }),
            _ => None,
        }
    }
}

const fn default_skill_level() -> u32 {
    MIN_SKILL_LEVEL
}

const fn default_target_level() -> u32 {
    patchwise_crops::MAX_SKILL_LEVEL
}

const fn default_iteration_ceiling() -> u32 {
    DEFAULT_ITERATION_CEILING
}
