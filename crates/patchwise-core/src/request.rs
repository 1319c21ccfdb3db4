//! Inputs to the three planning entry points.
//!
//! Every calculation takes a [`GrowingConditions`] describing how the
//! player farms (compost, yield strategy, active modifiers) plus whatever
//! the specific entry point needs on top of it.

use std::collections::{BTreeMap, BTreeSet};

use patchwise_crops::{MAX_SKILL_LEVEL, MIN_SKILL_LEVEL};
use patchwise_types::{CompostTier, CropCategory, ItemId, ModifierFlags, YieldStrategy};
use serde::{Deserialize, Serialize};

/// How every patch in a plan is tended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowingConditions {
    /// Compost applied to each patch.
    #[serde(default)]
    pub compost: CompostTier,
    /// Which branch of the yield distribution sizes patch counts.
    #[serde(default)]
    pub strategy: YieldStrategy,
    /// Active yield modifiers.
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

/// Harvest a fixed quantity of one crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// The crop to harvest.
    pub target: ItemId,
    /// Units wanted.
    pub quantity: u32,
    /// Farming level used for every yield in the plan.
    pub skill_level: u32,
    /// Compost, strategy, and modifiers.
    pub conditions: GrowingConditions,
    /// Units the player already holds, keyed by crop id.
    pub starting_resources: BTreeMap<ItemId, u32>,
}

impl ResolveRequest {
    /// A request with default conditions and nothing held.
    pub fn new(target: impl Into<ItemId>, quantity: u32, skill_level: u32) -> Self {
        Self {
            target: target.into(),
            quantity,
            skill_level,
            conditions: GrowingConditions::default(),
            starting_resources: BTreeMap::new(),
        }
    }

    /// Replace the growing conditions.
    #[must_use]
    pub const fn with_conditions(mut self, conditions: GrowingConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Record units of `crop` already held.
    #[must_use]
    pub fn holding(mut self, crop: impl Into<ItemId>, units: u32) -> Self {
        self.starting_resources.insert(crop.into(), units);
        self
    }
}

/// Grow enough of one crop to gain the experience between two levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRequest {
    /// The crop to grow.
    pub target: ItemId,
    /// Current level. Also the level every yield is computed at.
    pub starting_level: u32,
    /// Level to reach.
    pub target_level: u32,
    /// Compost, strategy, and modifiers.
    pub conditions: GrowingConditions,
    /// Units the player already holds, keyed by crop id.
    pub starting_resources: BTreeMap<ItemId, u32>,
}

impl LevelRequest {
    /// A request with default conditions and nothing held.
    pub fn new(target: impl Into<ItemId>, starting_level: u32, target_level: u32) -> Self {
        Self {
            target: target.into(),
            starting_level,
            target_level,
            conditions: GrowingConditions::default(),
            starting_resources: BTreeMap::new(),
        }
    }

    /// Replace the growing conditions.
    #[must_use]
    pub const fn with_conditions(mut self, conditions: GrowingConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// The resolver request for one candidate quantity.
    pub(crate) fn at_quantity(&self, quantity: u32) -> ResolveRequest {
        ResolveRequest {
            target: self.target.clone(),
            quantity,
            skill_level: self.starting_level,
            conditions: self.conditions,
            starting_resources: self.starting_resources.clone(),
        }
    }
}

/// Plan level-by-level from `start_level` to `target_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionOptions {
    /// First level planned.
    #[serde(default = "default_start_level")]
    pub start_level: u32,
    /// Level the plan ends at. The last step sizes `target_level - 1 -> target_level`.
    #[serde(default = "default_target_level")]
    pub target_level: u32,
    /// Categories never selected.
    #[serde(default)]
    pub excluded_categories: BTreeSet<CropCategory>,
    /// Conditions every step is sized under.
    #[serde(default)]
    pub conditions: GrowingConditions,
}

impl Default for ProgressionOptions {
    fn default() -> Self {
        Self {
            start_level: default_start_level(),
            target_level: default_target_level(),
            excluded_categories: BTreeSet::new(),
            conditions: GrowingConditions::default(),
        }
    }
}

const fn default_start_level() -> u32 {
    MIN_SKILL_LEVEL
}

const fn default_target_level() -> u32 {
    MAX_SKILL_LEVEL
}
