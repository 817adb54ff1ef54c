//! Stable product ordering for the browse grid.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Sort keys offered by the browse view's sort control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Alphabetical by name, case-insensitive. The default.
    #[default]
    Name,
    /// Numeric ascending by unit price.
    Price,
    /// Alphabetical by category, case-insensitive.
    Category,
}

impl SortKey {
    /// Map a raw `<select>` value to a key. Unknown values fall back to the
    /// default name ordering, matching the sort control's behavior.
    #[must_use]
    pub fn from_select_value(value: &str) -> Self {
        match value {
            "price" => Self::Price,
            "category" => Self::Category,
            _ => Self::Name,
        }
    }
}

/// Return the products ordered by `key`, leaving the input untouched.
///
/// The sort is stable: products comparing equal keep their relative input
/// order.
#[must_use]
pub fn sort_products(products: &[Product], key: SortKey) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match key {
        SortKey::Name => sorted.sort_by_cached_key(|product| product.name.to_lowercase()),
        SortKey::Price => sorted.sort_by_key(|product| product.price),
        SortKey::Category => sorted.sort_by_cached_key(|product| product.category.to_lowercase()),
    }
    sorted
}
