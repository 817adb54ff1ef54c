//! Shared newtype wrappers used across the domain model.

pub mod id;
pub mod price;

pub use id::ProductId;
pub use price::{Price, PriceError};
