//! The canonical product model.
//!
//! Products arrive from the remote catalog source with two wire-format
//! quirks, both normalized here at the serde boundary so no downstream code
//! ever branches on shape:
//!
//! - `sizes` may be a single string or an array of strings; it always lands
//!   in a `Vec<String>`.
//! - the color list may be named `color` or `colors` depending on the source
//!   version; the canonical field is `colors`.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

// =============================================================================
// Gender
// =============================================================================

/// The two catalog departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Mens,
    Womens,
}

impl Gender {
    /// Canonical wire/facet value (`"mens"` / `"womens"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mens => "mens",
            Self::Womens => "womens",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a gender value supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gender: {0}")]
pub struct UnknownGender(String);

impl std::str::FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mens" => Ok(Self::Mens),
            "womens" => Ok(Self::Womens),
            other => Err(UnknownGender(other.to_owned())),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A selectable product color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    /// Display name (e.g., `"Navy"`); also the color facet value.
    pub name: String,
    /// CSS hex value for the swatch (e.g., `"#1f2a44"`).
    pub hex: String,
}

/// A product in the catalog. Immutable once loaded; cart lines snapshot the
/// fields they need rather than holding references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier from the catalog source.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Category label (e.g., `"Dresses"`, `"Outerwear"`).
    pub category: String,
    /// Department.
    pub gender: Gender,
    /// Available sizes, in source order. Empty means the product is unsized.
    #[serde(default, deserialize_with = "string_or_list")]
    pub sizes: Vec<String>,
    /// Available colors, in source order. May be empty.
    #[serde(default, alias = "color")]
    pub colors: Vec<ColorOption>,
    /// Marketing description.
    #[serde(default)]
    pub description: String,
    /// Fabric/material, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

impl Product {
    /// Whether adding this product to the cart requires a size selection.
    #[must_use]
    pub fn requires_size(&self) -> bool {
        !self.sizes.is_empty()
    }
}

/// Accept either `"M"` or `["S", "M"]` for the `sizes` field.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        List(Vec<String>),
        Single(String),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::List(sizes) => sizes,
        StringOrList::Single(size) => vec![size],
    })
}
