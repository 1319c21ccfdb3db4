//! Type-safe identifier wrapper for catalogue items.
//!
//! Crops and purchasable items share a single namespace of short, stable
//! string keys (`"potato"`, `"compost"`). Wrapping the key in [`ItemId`]
//! keeps raw strings from leaking into map keys and function signatures.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Stable short key identifying a crop or a purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an identifier from any string-like key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the inner [`String`].
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl core::borrow::Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
