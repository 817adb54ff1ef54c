//! Application state shared with the presentation collaborator.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::ProductCatalog;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::store::{DurableStore, SqliteStore};

/// Application state wiring the storefront services together.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the cart, and the configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: ProductCatalog,
    cart: CartStore,
}

impl AppState {
    /// Create the application state with the default `SQLite`-backed store
    /// at `config.database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the catalog
    /// client cannot be built.
    pub async fn new(config: StorefrontConfig) -> Result<Self> {
        let store: Arc<dyn DurableStore> =
            Arc::new(SqliteStore::connect(&config.database_url).await?);
        Self::with_store(config, store).await
    }

    /// Create the application state over an explicit durable store
    /// (in-memory for tests, or an alternative backend).
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built or the cart
    /// snapshot cannot be read.
    pub async fn with_store(
        config: StorefrontConfig,
        store: Arc<dyn DurableStore>,
    ) -> Result<Self> {
        let catalog = ProductCatalog::new(&config, Arc::clone(&store))?;
        let cart = CartStore::open(store).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the persisted cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
