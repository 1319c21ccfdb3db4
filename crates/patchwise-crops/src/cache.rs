//! Memoized yield lookups.
//!
//! Yield distributions are pure functions of (crop, level, compost,
//! modifiers), and the solver asks for the same few keys thousands of times.
//! [`YieldCache`] is an explicit object owned by the caller, so a test can
//! always start from a cold cache.

use std::collections::BTreeMap;

use patchwise_types::{CompostTier, ItemId, ModifierFlags, YieldDistribution};

use crate::error::CropError;
use crate::registry::CropRegistry;
use crate::yield_model::{self, clamp_level};

/// Key of one cached distribution. The level is stored clamped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct YieldKey {
    crop: ItemId,
    level: u32,
    compost: CompostTier,
    modifiers: ModifierFlags,
}

/// Cache of per-patch yield distributions.
#[derive(Debug, Clone, Default)]
pub struct YieldCache {
    entries: BTreeMap<YieldKey, YieldDistribution>,
    hits: u64,
    misses: u64,
}

impl YieldCache {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Per-patch yield of a registered crop, computed at most once per key.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::UnknownCrop`] if the crop is not registered.
    pub fn yield_of(
        &mut self,
        registry: &CropRegistry,
        crop: &ItemId,
        level: u32,
        compost: CompostTier,
        modifiers: &ModifierFlags,
    ) -> Result<YieldDistribution, CropError> {
        let key = YieldKey {
            crop: crop.clone(),
            level: clamp_level(level),
            compost,
            modifiers: *modifiers,
        };
        if let Some(hit) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return Ok(*hit);
        }

        let record = registry.require_crop(crop)?;
        let distribution = yield_model::yield_distribution(record, key.level, compost, modifiers)?;
        self.misses = self.misses.saturating_add(1);
        self.entries.insert(key, distribution);
        Ok(distribution)
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of cached distributions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to compute.
    pub const fn misses(&self) -> u64 {
        self.misses
    }
}
