//! Clothify Storefront services.
//!
//! The service layer around [`clothify_core`]: loading and caching the
//! product catalog, persisting the cart, and wiring both behind a single
//! application state. The presentation layer (views, modals, rendering,
//! toasts) is an external collaborator that calls into these services and
//! supplies raw UI events.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod store;

pub use cart::CartStore;
pub use catalog::{CatalogError, ProductCatalog};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{AppError, Result};
pub use state::AppState;
pub use store::{DurableStore, MemoryStore, SqliteStore, StoreError};
