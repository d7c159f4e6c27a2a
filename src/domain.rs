use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};
use strum_macros::EnumString;

use crate::{impl_add_sub_primitive, impl_from_primitive};

// ================================================================================================
// Domain Strong Types (NewTypes)
// ================================================================================================

/// A security price in the quote currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Price(pub f64);
impl_from_primitive!(Price, f64);

/// A cash balance or cash-denominated value. May be fractional.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Cash(pub f64);
impl_from_primitive!(Cash, f64);
impl_add_sub_primitive!(Cash, f64);

/// A whole number of shares.
///
/// Share counts are never fractional and never negative; bookkeeping that
/// would drive a position below zero is rejected before it executes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Quantity(pub u64);
impl_from_primitive!(Quantity, u64);
impl_add_sub_primitive!(Quantity, u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Position of a security within the market's fixed universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecurityId(pub usize);
impl_from_primitive!(SecurityId, usize);

/// Unique investor identifier, stable across one run (children of a
/// reproduction pass get fresh ids).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct InvestorId(pub u64);
impl_from_primitive!(InvestorId, u64);

/// Cost (or proceeds) of `quantity` shares at this price.
impl std::ops::Mul<Quantity> for Price {
    type Output = Cash;

    fn mul(self, quantity: Quantity) -> Cash {
        Cash(self.0 * quantity.0 as f64)
    }
}

// ================================================================================================
// Trade Actions
// ================================================================================================

/// The action a strategy can recommend for one security in one step.
///
/// Declaration order doubles as the deterministic tie-break order wherever
/// equal action values compete.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}
