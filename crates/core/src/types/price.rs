//! Type-safe price representation using decimal arithmetic.
//!
//! Every monetary value in the system (catalog prices, cart snapshots,
//! shipping, tax, totals) flows through [`Price`]. The inner
//! `rust_decimal::Decimal` keeps cents exact - no floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Prices are non-negative by definition; refunds and discounts do not
    /// exist in this domain.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative monetary amount in the store's single currency.
///
/// Constructed via [`TryFrom<Decimal>`] (also the serde path, so malformed
/// catalog data is rejected at ingestion) or the infallible unsigned
/// constructors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Price from whole currency units (e.g., `from_major(25)` is $25.00).
    #[must_use]
    pub fn from_major(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Price from minor units (e.g., `from_minor(1099)` is $10.99).
    #[must_use]
    pub fn from_minor(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the given whole percentage of this price (e.g., a 5% tax).
    #[must_use]
    pub fn percent(self, percent: u32) -> Self {
        Self(self.0 * Decimal::new(i64::from(percent), 2))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Display for debugging and simple summaries (e.g., `$10.99`).
/// The collaborator owns localized display formatting.
impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::ops::AddAssign for Price {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Line totals: unit price times quantity.
impl std::ops::Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), std::ops::Add::add)
    }
}
