//! Shipping, tax, and grand-total computation.
//!
//! Rates are deliberately simple: one flat rate table keyed by destination
//! and method, one free-shipping threshold, and a single flat tax rate for
//! Canadian orders. There is no per-region tax schedule and no currency
//! conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::Price;

/// Merchandise totals at or above this amount ship free.
pub const FREE_SHIPPING_THRESHOLD: u32 = 500;

/// Flat tax percentage applied to Canadian orders.
pub const CA_TAX_PERCENT: u32 = 5;

/// Errors parsing a shipping selection supplied by the presentation layer.
///
/// The rate table itself is total over the enums, so once a destination and
/// method have parsed there is no unrecognized combination left to hit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("unknown shipping destination: {0}")]
    UnknownDestination(String),
    #[error("unknown shipping method: {0}")]
    UnknownMethod(String),
}

/// Shipping destination zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Destination {
    Ca,
    Us,
    Intl,
}

impl std::str::FromStr for Destination {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "INT" is the legacy select value for international orders.
        if s.eq_ignore_ascii_case("CA") {
            Ok(Self::Ca)
        } else if s.eq_ignore_ascii_case("US") {
            Ok(Self::Us)
        } else if s.eq_ignore_ascii_case("INTL") || s.eq_ignore_ascii_case("INT") {
            Ok(Self::Intl)
        } else {
            Err(PricingError::UnknownDestination(s.to_owned()))
        }
    }
}

/// Shipping methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShippingMethod {
    Standard,
    Express,
    Priority,
}

impl std::str::FromStr for ShippingMethod {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("Standard") {
            Ok(Self::Standard)
        } else if s.eq_ignore_ascii_case("Express") {
            Ok(Self::Express)
        } else if s.eq_ignore_ascii_case("Priority") {
            Ok(Self::Priority)
        } else {
            Err(PricingError::UnknownMethod(s.to_owned()))
        }
    }
}

/// A validated destination and method pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSelection {
    pub destination: Destination,
    pub method: ShippingMethod,
}

impl ShippingSelection {
    #[must_use]
    pub const fn new(destination: Destination, method: ShippingMethod) -> Self {
        Self {
            destination,
            method,
        }
    }

    /// Parse the raw values of the destination and method selects.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] naming the first unrecognized value.
    pub fn parse(destination: &str, method: &str) -> Result<Self, PricingError> {
        Ok(Self {
            destination: destination.parse()?,
            method: method.parse()?,
        })
    }
}

/// Totals for the cart summary and checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub merchandise_total: Price,
    pub shipping_cost: Price,
    pub tax: Price,
    /// Always `merchandise_total + shipping_cost + tax`.
    pub grand_total: Price,
}

/// Shipping cost for a merchandise total.
///
/// Free when the cart is empty (nothing to ship) or the total meets the
/// free-shipping threshold; otherwise the flat rate for the destination and
/// method.
#[must_use]
pub fn compute_shipping(
    merchandise_total: Price,
    destination: Destination,
    method: ShippingMethod,
) -> Price {
    if merchandise_total.is_zero()
        || merchandise_total >= Price::from_major(FREE_SHIPPING_THRESHOLD)
    {
        return Price::zero();
    }

    let rate = match (destination, method) {
        (Destination::Ca, ShippingMethod::Standard) => 10,
        (Destination::Ca, ShippingMethod::Express) => 25,
        (Destination::Ca, ShippingMethod::Priority) => 35,
        (Destination::Us, ShippingMethod::Standard) => 15,
        (Destination::Us, ShippingMethod::Express) => 25,
        (Destination::Us, ShippingMethod::Priority) => 50,
        (Destination::Intl, ShippingMethod::Standard) => 20,
        (Destination::Intl, ShippingMethod::Express) => 30,
        (Destination::Intl, ShippingMethod::Priority) => 50,
    };
    Price::from_major(rate)
}

/// Tax for a merchandise total: a flat percentage for Canadian orders, zero
/// elsewhere.
#[must_use]
pub fn compute_tax(merchandise_total: Price, destination: Destination) -> Price {
    match destination {
        Destination::Ca => merchandise_total.percent(CA_TAX_PERCENT),
        Destination::Us | Destination::Intl => Price::zero(),
    }
}

/// Full cart totals for the given shipping selection.
#[must_use]
pub fn compute_totals(cart: &Cart, selection: &ShippingSelection) -> PricingResult {
    let merchandise_total = cart.merchandise_total();
    let shipping_cost =
        compute_shipping(merchandise_total, selection.destination, selection.method);
    let tax = compute_tax(merchandise_total, selection.destination);

    PricingResult {
        merchandise_total,
        shipping_cost,
        tax,
        grand_total: merchandise_total + shipping_cost + tax,
    }
}
