//! Error types for planning operations.
//!
//! [`PlannerError`] is what every entry point on [`Planner`] returns. A
//! calculation either produces a complete plan or fails with one of these
//! before any partial result is handed back.
//!
//! [`Planner`]: crate::Planner

use patchwise_crops::CropError;
use patchwise_crops::error::format_path;
use patchwise_types::ItemId;

/// Errors produced by the resolver, solver, and progression optimizer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// A crop id was referenced directly or through a protection edge but
    /// is not registered.
    #[error("unknown crop: {0}")]
    UnknownCrop(ItemId),

    /// A protection edge names an id that is neither a crop nor a
    /// purchasable item.
    #[error("crop {crop} pays with unknown item {payment}")]
    UnknownPayment {
        /// The crop whose protection edge is dangling.
        crop: ItemId,
        /// The unresolvable payment id.
        payment: ItemId,
    },

    /// The requested level range is not usable.
    #[error("invalid level range {start}..{target}: {reason}")]
    InvalidRange {
        /// Requested starting level.
        start: u32,
        /// Requested target level.
        target: u32,
        /// Which check failed.
        reason: String,
    },

    /// The quantity search hit its iteration ceiling without reaching the
    /// experience target.
    #[error("solver exhausted after {attempts} attempts for {crop}")]
    SolverExhausted {
        /// The crop being sized.
        crop: ItemId,
        /// Resolver invocations made before giving up.
        attempts: u32,
    },

    /// Walking the protection graph revisited a crop already on the
    /// current path.
    #[error("protection cycle: {}", format_path(.path))]
    ProtectionCycle {
        /// The path, ending with the repeated crop.
        path: Vec<ItemId>,
    },

    /// No registered crop is plantable at a progression level.
    #[error("no eligible crop at level {level}")]
    NoEligibleCrop {
        /// The level with no candidate.
        level: u32,
    },

    /// The crop catalogue itself is malformed.
    #[error("registry error: {message}")]
    Registry {
        /// Description of the registry failure.
        message: String,
    },

    /// An arithmetic operation overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of the operation that overflowed.
        context: String,
    },
}

impl PlannerError {
    /// Shorthand for [`PlannerError::ArithmeticOverflow`].
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::ArithmeticOverflow {
            context: context.into(),
        }
    }

    /// Shorthand for [`PlannerError::InvalidRange`].
    pub fn invalid_range(start: u32, target: u32, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            start,
            target,
            reason: reason.into(),
        }
    }
}

impl From<CropError> for PlannerError {
    fn from(err: CropError) -> Self {
        match err {
            CropError::UnknownCrop(id) => Self::UnknownCrop(id),
            CropError::UnknownPayment { crop, payment } => Self::UnknownPayment { crop, payment },
            CropError::ProtectionCycle { path } => Self::ProtectionCycle { path },
            CropError::ArithmeticOverflow { context } => Self::ArithmeticOverflow { context },
            other => Self::Registry {
                message: other.to_string(),
            },
        }
    }
}
