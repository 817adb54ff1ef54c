//! Cart aggregate with line-identity merging.
//!
//! A cart line is identified by the `(product, size, color)` tuple: adding
//! the same combination twice increments one line instead of appending a
//! duplicate, and removal addresses lines by identity rather than position,
//! so stale UI handlers cannot remove the wrong row.
//!
//! Lines snapshot the product name and price at add time; later catalog
//! changes never alter what the shopper already put in the cart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Cart operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has sizes, so one must be selected before it can be
    /// added. Surfaced to the collaborator to prompt the shopper.
    #[error("product {product} requires a size selection")]
    SizeRequired {
        /// The product that was missing a size.
        product: ProductId,
    },

    /// Checkout was attempted with nothing in the cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// The merge key for cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineIdentity {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineIdentity {
    #[must_use]
    pub fn new(product_id: ProductId, size: Option<String>, color: Option<String>) -> Self {
        Self {
            product_id,
            size,
            color,
        }
    }
}

/// One line in the cart: an identity, a quantity, and an add-time snapshot
/// of the product's name and unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub identity: LineIdentity,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    pub price: Price,
    /// Always at least 1; a line whose quantity reaches 0 is removed.
    pub quantity: u32,
}

impl CartLine {
    /// Quantity times the snapshotted unit price.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.quantity
    }
}

/// The shopper's cart: an insertion-ordered list with at most one line per
/// identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// Merges into an existing line when the `(product, size, color)`
    /// identity already exists; otherwise appends a new line snapshotting
    /// the product's name and price. A zero quantity falls back to 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SizeRequired`] when the product has sizes and no
    /// size was supplied; the cart is left unchanged.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<(), CartError> {
        if product.requires_size() && size.is_none() {
            return Err(CartError::SizeRequired {
                product: product.id.clone(),
            });
        }

        let quantity = quantity.max(1);
        let identity = LineIdentity::new(product.id.clone(), size, color);

        if let Some(line) = self.lines.iter_mut().find(|line| line.identity == identity) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                identity,
                name: product.name.clone(),
                price: product.price,
                quantity,
            });
        }
        Ok(())
    }

    /// Apply a quantity delta to the line with the given identity. A result
    /// of zero or less removes the line. Returns whether the cart changed;
    /// an absent identity is a no-op.
    pub fn change_quantity(&mut self, identity: &LineIdentity, delta: i32) -> bool {
        let Some(position) = self
            .lines
            .iter()
            .position(|line| line.identity == *identity)
        else {
            return false;
        };

        let Some(line) = self.lines.get_mut(position) else {
            return false;
        };
        let updated = i64::from(line.quantity) + i64::from(delta);
        if updated <= 0 {
            self.lines.remove(position);
        } else {
            line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove the line with the given identity. Returns whether a line was
    /// removed; an absent identity is a no-op.
    pub fn remove_item(&mut self, identity: &LineIdentity) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.identity != *identity);
        self.lines.len() != before
    }

    /// Empty the cart (after a successful checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line quantities; feeds the cart badge counter.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Sum of quantity times snapshotted price across all lines.
    #[must_use]
    pub fn merchandise_total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line with the given identity, if present.
    #[must_use]
    pub fn line(&self, identity: &LineIdentity) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.identity == *identity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
