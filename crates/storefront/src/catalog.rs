//! Product catalog loading and caching.
//!
//! The catalog is a JSON array fetched once from a remote source and then
//! served from cache. [`ProductCatalog::load`] resolves in priority order:
//!
//! 1. the in-memory copy, with zero I/O;
//! 2. the durable key-value store entry, when it parses as a product list
//!    (a corrupt entry is discarded and treated as a miss);
//! 3. a remote fetch, stored back into both caches.
//!
//! Overlapping `load` calls share a single in-flight fetch instead of
//! issuing duplicates. The catalog owns its cache as a field; constructing a
//! second catalog yields fully independent state.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use clothify_core::{Gender, Product, ProductId};
use rand::seq::IndexedRandom;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::config::StorefrontConfig;
use crate::store::DurableStore;

/// Durable-store key for the serialized catalog cache.
pub const PRODUCTS_KEY: &str = "clothify-products-v1";

const RETRY_BASE_DELAY_MS: u64 = 250;

/// Errors loading the catalog from its remote source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect error, timeout, malformed URL).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source responded with a non-success status.
    #[error("catalog source returned HTTP {0}")]
    Status(u16),

    /// The response body is not a JSON array of products.
    #[error("catalog payload is not a product list: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// ProductCatalog
// =============================================================================

/// Read-only access to the product list, with layered caching.
///
/// Cheaply cloneable; clones share one cache and one in-flight fetch.
#[derive(Clone)]
pub struct ProductCatalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    http: reqwest::Client,
    catalog_url: String,
    fetch_retries: u32,
    store: Arc<dyn DurableStore>,
    products: RwLock<Option<Arc<Vec<Product>>>>,
    /// Serializes loads so overlapping callers share one fetch.
    load_guard: Mutex<()>,
}

impl ProductCatalog {
    /// Create a catalog reading from `config.catalog_url` and caching in
    /// `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: &StorefrontConfig,
        store: Arc<dyn DurableStore>,
    ) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogInner {
                http,
                catalog_url: config.catalog_url.clone(),
                fetch_retries: config.fetch_retries,
                store,
                products: RwLock::new(None),
                load_guard: Mutex::new(()),
            }),
        })
    }

    /// Load the full product list.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when neither cache layer has a usable copy
    /// and the remote fetch fails after the configured retries. The catalog
    /// stays empty; the collaborator renders an empty list and may retry by
    /// calling `load` again.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(products) = self.cached() {
            debug!("catalog cache hit");
            return Ok(products);
        }

        let _guard = self.inner.load_guard.lock().await;

        // A concurrent caller may have finished the load while we waited.
        if let Some(products) = self.cached() {
            debug!("catalog loaded by concurrent caller");
            return Ok(products);
        }

        if let Some(products) = self.read_durable_cache().await {
            debug!(count = products.len(), "catalog restored from durable cache");
            return Ok(self.adopt(products));
        }

        let products = self.fetch_with_retries().await?;
        debug!(count = products.len(), "catalog fetched from remote source");
        self.write_durable_cache(&products).await;
        Ok(self.adopt(products))
    }

    /// Drop both cache layers so the next `load` refetches.
    #[instrument(skip(self))]
    pub async fn invalidate(&self) {
        *self
            .inner
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        if let Err(err) = self.inner.store.remove(PRODUCTS_KEY).await {
            warn!(error = %err, "failed to clear durable catalog cache");
        }
    }

    /// Whether an in-memory copy exists.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cached().is_some()
    }

    // =========================================================================
    // Lookups (served from the in-memory copy; empty before `load`)
    // =========================================================================

    /// Every product, in source order.
    #[must_use]
    pub fn all_products(&self) -> Vec<Product> {
        self.cached().map_or_else(Vec::new, |products| (*products).clone())
    }

    /// The product with the given ID.
    #[must_use]
    pub fn get_by_id(&self, id: &ProductId) -> Option<Product> {
        let products = self.cached()?;
        products.iter().find(|product| product.id == *id).cloned()
    }

    /// Products in one department, in source order.
    #[must_use]
    pub fn by_gender(&self, gender: Gender) -> Vec<Product> {
        self.cached().map_or_else(Vec::new, |products| {
            products
                .iter()
                .filter(|product| product.gender == gender)
                .cloned()
                .collect()
        })
    }

    /// Distinct category labels within one department, ascending.
    #[must_use]
    pub fn categories_for_gender(&self, gender: Gender) -> Vec<String> {
        let Some(products) = self.cached() else {
            return Vec::new();
        };
        let categories: BTreeSet<String> = products
            .iter()
            .filter(|product| product.gender == gender)
            .map(|product| product.category.clone())
            .collect();
        categories.into_iter().collect()
    }

    /// Products sharing a category or department with the given product,
    /// for the "you may also like" rail. Excludes the product itself.
    #[must_use]
    pub fn related_products(&self, id: &ProductId, limit: usize) -> Vec<Product> {
        let Some(products) = self.cached() else {
            return Vec::new();
        };
        let Some(subject) = products.iter().find(|product| product.id == *id) else {
            return Vec::new();
        };
        products
            .iter()
            .filter(|product| {
                product.id != *id
                    && (product.category == subject.category || product.gender == subject.gender)
            })
            .take(limit)
            .cloned()
            .collect()
    }

    /// A random selection for the home page's featured grid.
    #[must_use]
    pub fn featured(&self, count: usize) -> Vec<Product> {
        let Some(products) = self.cached() else {
            return Vec::new();
        };
        let mut rng = rand::rng();
        products
            .as_slice()
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect()
    }

    /// The first product matching a department and category, used as the
    /// representative image on category cards. Category comparison is
    /// case-insensitive because card labels are lowercased in markup.
    #[must_use]
    pub fn first_in_category(&self, gender: Gender, category: &str) -> Option<Product> {
        let products = self.cached()?;
        products
            .iter()
            .find(|product| {
                product.gender == gender && product.category.eq_ignore_ascii_case(category)
            })
            .cloned()
    }

    // =========================================================================
    // Cache layers
    // =========================================================================

    fn cached(&self) -> Option<Arc<Vec<Product>>> {
        self.inner
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn adopt(&self, products: Vec<Product>) -> Arc<Vec<Product>> {
        let products = Arc::new(products);
        *self
            .inner
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&products));
        products
    }

    async fn read_durable_cache(&self) -> Option<Vec<Product>> {
        let payload = match self.inner.store.get(PRODUCTS_KEY).await {
            Ok(payload) => payload?,
            Err(err) => {
                warn!(error = %err, "durable catalog cache unreadable, refetching");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(products) => Some(products),
            Err(err) => {
                warn!(error = %err, "discarding corrupt durable catalog cache");
                if let Err(err) = self.inner.store.remove(PRODUCTS_KEY).await {
                    warn!(error = %err, "failed to discard corrupt catalog cache");
                }
                None
            }
        }
    }

    /// Cache writes are best-effort: a full durable store must not take the
    /// freshly fetched catalog down with it.
    async fn write_durable_cache(&self, products: &[Product]) {
        match serde_json::to_string(products) {
            Ok(payload) => {
                if let Err(err) = self.inner.store.set(PRODUCTS_KEY, &payload).await {
                    warn!(error = %err, "failed to write durable catalog cache");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize catalog for caching"),
        }
    }

    // =========================================================================
    // Remote source
    // =========================================================================

    async fn fetch_with_retries(&self) -> Result<Vec<Product>, CatalogError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_remote().await {
                Ok(products) => return Ok(products),
                Err(err) if attempt <= self.inner.fetch_retries => {
                    let delay =
                        Duration::from_millis(RETRY_BASE_DELAY_MS << (attempt - 1).min(3));
                    warn!(error = %err, attempt, "catalog fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_remote(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.inner.http.get(&self.inner.catalog_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        // Read the body as text first for better error diagnostics.
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| {
            tracing::error!(
                error = %err,
                body = %body.chars().take(500).collect::<String>(),
                "catalog source returned malformed data"
            );
            CatalogError::Parse(err)
        })
    }
}
