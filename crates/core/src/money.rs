//! Fixed-point money and quantity values.
//!
//! Monetary values carry 2 decimal places, quantities carry 3. Computed values
//! are normalised with half-up rounding (midpoint away from zero), so totals
//! are reproducible regardless of the order they were summed in. Values read
//! from outside must already fit the scale.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Decimal places kept for monetary values.
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept for quantities.
pub const QUANTITY_SCALE: u32 = 3;

/// Round `value` to `dp` decimal places, half-up, and pin the scale to `dp`.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// `value` pinned to `dp` places, or a validation error if that would drop
/// non-zero digits. Trailing zeros beyond `dp` are fine.
fn exact(value: Decimal, dp: u32, what: &str) -> DomainResult<Decimal> {
    if value.normalize().scale() > dp {
        return Err(DomainError::validation(format!(
            "{what} {value} has more than {dp} decimal places"
        )));
    }
    Ok(round_half_up(value, dp))
}

/// Monetary amount with 2-decimal precision.
///
/// Deserialization is strict: an amount with more than 2 significant decimal
/// places is rejected instead of rounded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// Normalise `amount` to money precision (half-up).
    pub fn new(amount: Decimal) -> Self {
        Self(round_half_up(amount, MONEY_SCALE))
    }

    /// Like [`Money::new`], but rejects amounts that would need rounding.
    pub fn exact(amount: Decimal) -> DomainResult<Self> {
        exact(amount, MONEY_SCALE, "amount").map(Self)
    }

    /// Like [`Money::new`], but rejects negative amounts.
    pub fn non_negative(amount: Decimal, field: &str) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "{field} must not be negative (got {amount})"
            )));
        }
        Ok(Self::new(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// `self * quantity`, rounded half-up to money precision.
    pub fn times(&self, quantity: Quantity) -> Money {
        Money::new(self.0 * quantity.value())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::exact(amount).map_err(serde::de::Error::custom)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl ValueObject for Money {}

/// Quantity with 3-decimal precision.
///
/// Negative values are representable (stock reported by an ERP may dip below
/// zero, coverage may transiently exceed demand); operations that require a
/// non-negative quantity validate it at their boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::from_parts(0, 0, 0, false, QUANTITY_SCALE));

    /// Normalise `value` to quantity precision (half-up).
    pub fn new(value: Decimal) -> Self {
        Self(round_half_up(value, QUANTITY_SCALE))
    }

    /// Like [`Quantity::new`], but rejects values that would need rounding.
    pub fn exact(value: Decimal) -> DomainResult<Self> {
        exact(value, QUANTITY_SCALE, "quantity").map(Self)
    }

    /// Like [`Quantity::new`], but rejects negative values.
    pub fn non_negative(value: Decimal, field: &str) -> DomainResult<Self> {
        let quantity = Self::new(value);
        quantity.ensure_non_negative(field)?;
        Ok(quantity)
    }

    /// Fails with a validation error when the quantity is below zero.
    pub fn ensure_non_negative(&self, field: &str) -> DomainResult<()> {
        if self.is_negative() {
            return Err(DomainError::validation(format!(
                "{field} must not be negative (got {})",
                self.0
            )));
        }
        Ok(())
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Quantity::exact(value).map_err(serde::de::Error::custom)
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 - rhs.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Quantity {
        iter.fold(Quantity::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Quantity {
        iter.copied().sum()
    }
}

impl ValueObject for Quantity {}
