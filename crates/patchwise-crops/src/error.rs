//! Error types for the `patchwise-crops` crate.
//!
//! Registry construction, registry loading, and yield lookups all return
//! [`CropError`].

use patchwise_types::ItemId;

/// Errors that can occur while building or querying the crop registry.
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    /// A crop id was referenced that is not registered as a crop.
    #[error("unknown crop: {0}")]
    UnknownCrop(ItemId),

    /// A protection edge points at an id that is neither a crop nor a
    /// purchasable item.
    #[error("crop {crop} is protected by unknown payment {payment}")]
    UnknownPayment {
        /// The crop carrying the protection edge.
        crop: ItemId,
        /// The dangling payment id.
        payment: ItemId,
    },

    /// The id is already taken by another crop or purchasable item.
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),

    /// A record failed field validation.
    #[error("invalid record {id}: {reason}")]
    InvalidRecord {
        /// The offending record.
        id: ItemId,
        /// What is wrong with it.
        reason: String,
    },

    /// The protection graph loops back on itself.
    #[error("protection cycle: {}", format_path(.path))]
    ProtectionCycle {
        /// Crops on the loop, in discovery order, ending with the repeat.
        path: Vec<ItemId>,
    },

    /// An arithmetic overflow occurred during a yield computation.
    #[error("arithmetic overflow in yield computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// Failed to read a registry file from disk.
    #[error("failed to read registry file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse registry YAML.
    #[error("failed to parse registry YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for CropError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Render a crop path as `a -> b -> a`.
pub fn format_path(path: &[ItemId]) -> String {
    path.iter()
        .map(ItemId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
