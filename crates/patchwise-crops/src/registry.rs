//! The crop registry: every growable crop, every purchasable payment item,
//! and the protection edges between them.
//!
//! The registry is assembled once by the caller and is read-only during
//! calculations. Crops and purchasable items share one id namespace.
//! Protection edges form an adjacency map `crop -> Option<edge>`; the
//! [`CropRegistry::validate`] pass checks that every edge resolves and that
//! no chain loops back on itself.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use patchwise_types::{
    CompostTier, CropRecord, ItemId, ModifierFlags, PurchasableItem, YieldDistribution,
    YieldProfile,
};

use crate::error::CropError;
use crate::yield_model::{self, MAX_SKILL_LEVEL, MIN_SKILL_LEVEL, SAVE_DENOMINATOR};

/// What a protection edge points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payment<'a> {
    /// Another crop, which must itself be grown.
    Crop(&'a CropRecord),
    /// A purchasable item, which ends the chain.
    Purchase(&'a PurchasableItem),
}

/// On-disk layout of a registry file.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    crops: Vec<CropRecord>,
    #[serde(default)]
    purchasables: Vec<PurchasableItem>,
}

/// In-memory catalogue of crops and purchasable items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropRegistry {
    /// All crops indexed by id.
    crops: BTreeMap<ItemId, CropRecord>,
    /// All purchasable items indexed by id.
    purchasables: BTreeMap<ItemId, PurchasableItem>,
}

impl CropRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            crops: BTreeMap::new(),
            purchasables: BTreeMap::new(),
        }
    }

    /// Parse a registry from YAML and validate it.
    ///
    /// The document has two optional top-level lists, `crops` and
    /// `purchasables`.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Yaml`] on malformed YAML, or any insertion or
    /// validation error.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CropError> {
        let file: RegistryFile = serde_yml::from_str(yaml)?;
        let mut registry = Self::new();
        for item in file.purchasables {
            registry.add_purchasable(item)?;
        }
        for crop in file.crops {
            registry.add_crop(crop)?;
        }
        registry.validate()?;
        debug!(
            crops = registry.crop_count(),
            purchasables = registry.purchasable_count(),
            "Registry parsed"
        );
        Ok(registry)
    }

    /// Read and validate a registry YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Io`] if the file cannot be read, otherwise as
    /// [`CropRegistry::from_yaml_str`].
    pub fn from_file(path: &Path) -> Result<Self, CropError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    // -------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------

    /// Add a crop.
    ///
    /// Field constraints are checked here. Protection references are not,
    /// since the payment may be inserted later; see [`Self::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`CropError::DuplicateId`] if the id is taken, or
    /// [`CropError::InvalidRecord`] if a field is out of range.
    pub fn add_crop(&mut self, crop: CropRecord) -> Result<(), CropError> {
        if self.contains(&crop.id) {
            return Err(CropError::DuplicateId(crop.id));
        }
        check_crop(&crop)?;
        self.crops.insert(crop.id.clone(), crop);
        Ok(())
    }

    /// Add a purchasable item.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::DuplicateId`] if the id is taken, or
    /// [`CropError::InvalidRecord`] if its packaging holds zero units.
    pub fn add_purchasable(&mut self, item: PurchasableItem) -> Result<(), CropError> {
        if self.contains(&item.id) {
            return Err(CropError::DuplicateId(item.id));
        }
        if item
            .packaging
            .as_ref()
            .is_some_and(|p| p.units_per_container == 0)
        {
            return Err(invalid(&item.id, "packaging must hold at least one unit"));
        }
        self.purchasables.insert(item.id.clone(), item);
        Ok(())
    }

    /// Check that every protection edge resolves and that the protection
    /// graph has no cycles.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::UnknownPayment`] for a dangling edge or
    /// [`CropError::ProtectionCycle`] for a loop.
    pub fn validate(&self) -> Result<(), CropError> {
        for crop in self.crops.values() {
            if let Some(edge) = &crop.protection
                && !self.contains(&edge.payment)
            {
                return Err(CropError::UnknownPayment {
                    crop: crop.id.clone(),
                    payment: edge.payment.clone(),
                });
            }
        }

        // Every node has out-degree at most one, so following the chain
        // from each crop either ends or revisits a crop on the same walk.
        for start in self.crops.keys() {
            let mut path = vec![start.clone()];
            let mut seen = BTreeSet::from([start.clone()]);
            let mut current = start;
            while let Some(next) = self.protection_crop(current) {
                path.push(next.clone());
                if !seen.insert(next.clone()) {
                    return Err(CropError::ProtectionCycle { path });
                }
                current = next;
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Whether the id is registered as a crop or a purchasable item.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.crops.contains_key(id) || self.purchasables.contains_key(id)
    }

    /// Look up a crop.
    pub fn crop(&self, id: &ItemId) -> Option<&CropRecord> {
        self.crops.get(id)
    }

    /// Look up a crop, failing if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::UnknownCrop`].
    pub fn require_crop(&self, id: &ItemId) -> Result<&CropRecord, CropError> {
        self.crops
            .get(id)
            .ok_or_else(|| CropError::UnknownCrop(id.clone()))
    }

    /// Look up a purchasable item.
    pub fn purchasable(&self, id: &ItemId) -> Option<&PurchasableItem> {
        self.purchasables.get(id)
    }

    /// Resolve a protection payment id.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::UnknownCrop`] if the id is neither a crop nor a
    /// purchasable item.
    pub fn payment(&self, id: &ItemId) -> Result<Payment<'_>, CropError> {
        if let Some(crop) = self.crops.get(id) {
            return Ok(Payment::Crop(crop));
        }
        self.purchasables
            .get(id)
            .map(Payment::Purchase)
            .ok_or_else(|| CropError::UnknownCrop(id.clone()))
    }

    /// Display name for any registered id, falling back to the key.
    pub fn display_name(&self, id: &ItemId) -> String {
        self.crops
            .get(id)
            .map(|c| c.name.clone())
            .or_else(|| self.purchasables.get(id).map(|p| p.name.clone()))
            .unwrap_or_else(|| id.to_string())
    }

    /// Iterate over all crops in id order.
    pub fn crops(&self) -> impl Iterator<Item = &CropRecord> {
        self.crops.values()
    }

    /// Iterate over all purchasable items in id order.
    pub fn purchasables(&self) -> impl Iterator<Item = &PurchasableItem> {
        self.purchasables.values()
    }

    /// Crops a player at `level` is allowed to plant.
    pub fn unlocked_at(&self, level: u32) -> impl Iterator<Item = &CropRecord> {
        self.crops.values().filter(move |c| c.unlock_level <= level)
    }

    /// Number of crops.
    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    /// Number of purchasable items.
    pub fn purchasable_count(&self) -> usize {
        self.purchasables.len()
    }

    /// Per-patch yield distribution of a registered crop.
    ///
    /// Uncached; see [`crate::cache::YieldCache`] for the memoized path.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::UnknownCrop`] if the crop is not registered.
    pub fn yield_of(
        &self,
        id: &ItemId,
        level: u32,
        compost: CompostTier,
        modifiers: &ModifierFlags,
    ) -> Result<YieldDistribution, CropError> {
        let crop = self.require_crop(id)?;
        yield_model::yield_distribution(crop, level, compost, modifiers)
    }

    /// The crop a crop's protection is paid in, if the payment is a crop.
    fn protection_crop(&self, id: &ItemId) -> Option<&ItemId> {
        let edge = self.crops.get(id)?.protection.as_ref()?;
        self.crops.contains_key(&edge.payment).then_some(&edge.payment)
    }
}

/// Field-level validation of a crop record.
fn check_crop(crop: &CropRecord) -> Result<(), CropError> {
    if crop.seeds_per_patch == 0 {
        return Err(invalid(&crop.id, "seeds_per_patch must be at least 1"));
    }
    if !(MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&crop.unlock_level) {
        return Err(invalid(&crop.id, "unlock_level must be within 1..=99"));
    }
    match crop.yield_profile {
        YieldProfile::Fixed { units: 0 } => {
            return Err(invalid(&crop.id, "fixed yield must be at least 1 unit"));
        }
        YieldProfile::Lives { cts_low, cts_high }
            if cts_low >= SAVE_DENOMINATOR || cts_high >= SAVE_DENOMINATOR =>
        {
            return Err(invalid(&crop.id, "chance-to-save constants must be below 256"));
        }
        YieldProfile::Fixed { .. } | YieldProfile::Lives { .. } => {}
    }
    if let Some(edge) = &crop.protection {
        if edge.quantity == 0 {
            return Err(invalid(&crop.id, "protection quantity must be at least 1"));
        }
        if edge
            .packaging
            .as_ref()
            .is_some_and(|p| p.units_per_container == 0)
        {
            return Err(invalid(&crop.id, "packaging must hold at least one unit"));
        }
        if edge.payment == crop.id {
            return Err(CropError::ProtectionCycle {
                path: vec![crop.id.clone(), crop.id.clone()],
            });
        }
    }
    Ok(())
}

fn invalid(id: &ItemId, reason: &str) -> CropError {
    CropError::InvalidRecord {
        id: id.clone(),
        reason: reason.to_owned(),
    }
}
