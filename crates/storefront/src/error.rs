//! Unified error handling for the storefront services.
//!
//! Each service has its own typed error; `AppError` aggregates them so the
//! presentation collaborator handles one type. Validation variants
//! (`Cart(SizeRequired)`, `Pricing(..)`) are prompts for the shopper;
//! the rest are operational failures.

use thiserror::Error;

use clothify_core::{CartError, PricingError};

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded from any layer.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable store operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Cart validation failed (surfaced to the shopper).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Shipping selection could not be parsed (surfaced to the shopper).
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// State serialization failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
