//! Persisted cart service.
//!
//! Wraps the pure [`Cart`] aggregate with durable storage: the cart is read
//! back on open (a corrupt snapshot resets to empty rather than failing),
//! and every mutation writes the full serialized cart immediately
//! afterward, so a reload mid-session never loses the shopper's items.

use std::sync::{Arc, PoisonError, RwLock};

use clothify_core::{
    Cart, CartError, CartLine, LineIdentity, Price, PricingResult, Product, ShippingSelection,
    compute_totals,
};
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::store::{DurableStore, StoreError};

/// Durable-store key for the serialized cart snapshot.
pub const CART_KEY: &str = "clothify-cart-v1";

/// The shopper's persisted cart.
///
/// Cheaply cloneable; clones share one cart and one store.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    store: Arc<dyn DurableStore>,
    cart: RwLock<Cart>,
}

impl CartStore {
    /// Open the cart, restoring any snapshot present in the store.
    ///
    /// A snapshot that fails to parse resets to an empty cart; it will be
    /// overwritten by the next mutation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only when the store itself cannot be read.
    pub async fn open(store: Arc<dyn DurableStore>) -> std::result::Result<Self, StoreError> {
        let cart: Cart = match store.get(CART_KEY).await? {
            Some(payload) => match serde_json::from_str(&payload) {
                Ok(cart) => cart,
                Err(err) => {
                    warn!(error = %err, "corrupt cart snapshot, resetting to empty");
                    Cart::new()
                }
            },
            None => Cart::new(),
        };

        debug!(items = cart.total_item_count(), "cart opened");
        Ok(Self {
            inner: Arc::new(CartStoreInner {
                store,
                cart: RwLock::new(cart),
            }),
        })
    }

    // =========================================================================
    // Mutations (each persists the full cart afterward)
    // =========================================================================

    /// Add a product to the cart, merging into an existing line when the
    /// `(product, size, color)` identity already exists.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SizeRequired`] (unchanged, unpersisted cart)
    /// when the product has sizes and none was chosen, or a storage error if
    /// the snapshot write fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(
        &self,
        product: &Product,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<()> {
        let payload = {
            let mut cart = self.write();
            cart.add_item(product, quantity, size, color)?;
            serde_json::to_string(&*cart)?
        };
        self.persist(payload).await
    }

    /// Apply a quantity delta to a line; zero or below removes the line.
    /// An absent identity is a no-op and is not persisted.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot write fails.
    #[instrument(skip(self))]
    pub async fn change_quantity(&self, identity: &LineIdentity, delta: i32) -> Result<()> {
        let payload = {
            let mut cart = self.write();
            if !cart.change_quantity(identity, delta) {
                return Ok(());
            }
            serde_json::to_string(&*cart)?
        };
        self.persist(payload).await
    }

    /// Remove a line by identity. An absent identity is a no-op and is not
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot write fails.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, identity: &LineIdentity) -> Result<()> {
        let payload = {
            let mut cart = self.write();
            if !cart.remove_item(identity) {
                return Ok(());
            }
            serde_json::to_string(&*cart)?
        };
        self.persist(payload).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot write fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        let payload = {
            let mut cart = self.write();
            cart.clear();
            serde_json::to_string(&*cart)?
        };
        self.persist(payload).await
    }

    /// Validate and finalize a checkout: compute the totals for the given
    /// shipping selection, then clear and persist the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] when there is nothing to check out,
    /// or a storage error if the snapshot write fails.
    #[instrument(skip(self))]
    pub async fn checkout(&self, selection: &ShippingSelection) -> Result<PricingResult> {
        let (totals, payload) = {
            let mut cart = self.write();
            if cart.is_empty() {
                return Err(CartError::EmptyCart.into());
            }
            let totals = compute_totals(&cart, selection);
            cart.clear();
            (totals, serde_json::to_string(&*cart)?)
        };
        self.persist(payload).await?;
        debug!(grand_total = %totals.grand_total, "checkout complete");
        Ok(totals)
    }

    // =========================================================================
    // Reads (synchronous, from the in-memory cart)
    // =========================================================================

    /// Sum of all line quantities; feeds the cart badge counter.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.read().total_item_count()
    }

    /// Sum of quantity times snapshotted price across all lines.
    #[must_use]
    pub fn merchandise_total(&self) -> Price {
        self.read().merchandise_total()
    }

    /// Snapshot of the lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.read().lines().to_vec()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Totals preview for the summary panel, without checking out.
    #[must_use]
    pub fn totals(&self, selection: &ShippingSelection) -> PricingResult {
        compute_totals(&self.read(), selection)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Cart> {
        self.inner.cart.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Cart> {
        self.inner.cart.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn persist(&self, payload: String) -> Result<()> {
        self.inner.store.set(CART_KEY, &payload).await?;
        Ok(())
    }
}
