//! Integration tests for Clothify.
//!
//! Unlike the unit tests next to each module, the tests under `tests/`
//! exercise the services end-to-end: the catalog client talks real HTTP to
//! a local stub of the remote source, and the cart persists through a real
//! `SQLite`-backed store.
//!
//! # Test Categories
//!
//! - `catalog_flow` - cache layering, single-flight fetch, failure handling
//! - `shopper_flow` - browse, filter, sort, cart, and checkout journeys
//!
//! Run with: `cargo test -p clothify-integration-tests`
//!
//! Set `RUST_LOG=clothify_storefront=debug` to see service-level events
//! (cache hits, retries, corrupt-cache discards) while a test runs.

use tracing_subscriber::EnvFilter;

/// Install a tracing subscriber for test debugging.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
