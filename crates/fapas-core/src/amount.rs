//! # Amount Module
//!
//! Provides the `Amount` type for prices, subtotals and totals.
//!
//! ## Why Not Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRICES ARRIVE AS JSON NUMBERS                                          │
//! │                                                                         │
//! │  The catalog sends  "price": 109.95  and the stored cart keeps it      │
//! │  that way. Converting to cents on the way in would round once per      │
//! │  line; rounding again on every increment compounds the error.          │
//! │                                                                         │
//! │  OUR RULE: never round internally                                       │
//! │    subtotal = price × quantity          (exact f64 product)            │
//! │    total    = Σ subtotal in cart order  (same order every time)        │
//! │    display  = round to 2 decimals ONLY when formatting                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fapas_core::amount::Amount;
//!
//! let price = Amount::new(10.0);
//! let subtotal = price * 3;
//! assert_eq!(subtotal, Amount::new(30.0));
//! assert_eq!(subtotal.to_string(), "$30.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

/// A monetary amount in major currency units (dollars).
///
/// Values are kept unrounded. `Display` and [`Amount::format`] are the
/// only places where rounding to cents happens.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Amount(f64);

impl Amount {
    /// Creates an amount from a raw value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Amount(value)
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0.0)
    }

    /// Returns the raw, unrounded value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Returns true for finite, non-negative values (a usable unit price).
    #[inline]
    pub fn is_valid_price(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    /// Multiplies the amount by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use fapas_core::amount::Amount;
    ///
    /// let unit_price = Amount::new(2.5);
    /// assert_eq!(unit_price.multiply_quantity(4).value(), 10.0);
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, quantity: u32) -> Self {
        Amount(self.0 * f64::from(quantity))
    }

    /// Rounds to two decimal places (presentation only).
    pub fn rounded_to_cents(&self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    /// Formats the amount with a currency symbol and a number of decimals.
    ///
    /// ## Example
    /// ```rust
    /// use fapas_core::amount::Amount;
    ///
    /// assert_eq!(Amount::new(1234.5).format("$", 2), "$1234.50");
    /// assert_eq!(Amount::new(19.999).format("€", 2), "€20.00");
    /// assert_eq!(Amount::new(-5.5).format("$", 2), "-$5.50");
    /// ```
    pub fn format(&self, symbol: &str, decimals: u8) -> String {
        let sign = if self.0 < 0.0 { "-" } else { "" };
        format!(
            "{}{}{:.prec$}",
            sign,
            symbol,
            self.0.abs(),
            prec = usize::from(decimals)
        )
    }
}

/// Shows the amount as dollars with two decimals, e.g. `$10.99`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format("$", 2))
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Multiplication by a line quantity.
impl Mul<u32> for Amount {
    type Output = Self;

    #[inline]
    fn mul(self, quantity: u32) -> Self {
        self.multiply_quantity(quantity)
    }
}

/// Left-to-right sum, so totals are reproducible for a given cart order.
impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, x| acc + x)
    }
}
