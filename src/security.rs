//! The tradable security universe and its price process.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Cash, Price, Quantity},
    error::{SecurityError, SimResult},
    random::RandomSource,
};

/// Standard deviation of the per-step Gaussian price shock, as a fraction of
/// the current price.
pub const PRICE_VOLATILITY: f64 = 0.02;

/// Hard floor applied after every price update. Keeps prices strictly
/// positive.
pub const PRICE_FLOOR: f64 = 0.01;

/// A tradable instrument with a stochastic price and a fixed share count.
///
/// Prices follow a multiplicative-noise random walk: each step draws a
/// zero-mean Gaussian shock scaled by the current price, so percentage moves
/// stay roughly stationary across price levels, and the floor keeps the
/// price positive. The price is mutated by [`Security::update_price`] only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    name: String,
    price: Price,
    shares_outstanding: Quantity,
    price_history: Vec<Price>,
}

impl Security {
    /// Creates a security at its initial price.
    ///
    /// `initial_price` must be positive; the price process keeps it so from
    /// then on. Fails if `shares_outstanding` is zero.
    pub fn new(
        name: impl Into<String>,
        initial_price: Price,
        shares_outstanding: Quantity,
    ) -> SimResult<Self> {
        let name = name.into();
        if shares_outstanding.is_zero() {
            return Err(SecurityError::NoSharesOutstanding { name }.into());
        }

        Ok(Self {
            name,
            price: initial_price,
            shares_outstanding,
            price_history: vec![initial_price],
        })
    }

    /// Advances the price by one step of the random walk and appends the new
    /// price to the history.
    pub fn update_price(&mut self, rng: &mut dyn RandomSource) {
        let change = self.price.0 * rng.gaussian(PRICE_VOLATILITY);
        self.price = Price((self.price.0 + change).max(PRICE_FLOOR));
        self.price_history.push(self.price);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn shares_outstanding(&self) -> Quantity {
        self.shares_outstanding
    }

    /// Full price history: the initial price plus one entry per update.
    pub fn price_history(&self) -> &[Price] {
        &self.price_history
    }

    /// Number of recorded price observations.
    pub fn observations(&self) -> usize {
        self.price_history.len()
    }

    /// The last `window` prices, or fewer while the history is still shorter
    /// than the window.
    pub fn recent_prices(&self, window: usize) -> &[Price] {
        let start = self.price_history.len().saturating_sub(window);
        &self.price_history[start..]
    }

    /// Price times shares outstanding.
    pub fn market_cap(&self) -> Cash {
        self.price * self.shares_outstanding
    }
}

#[cfg(test)]
impl Security {
    /// Test fixture with a fully scripted price history.
    pub(crate) fn from_history(name: &str, history: &[f64], shares_outstanding: Quantity) -> Self {
        let price_history: Vec<Price> = history.iter().map(|&p| Price(p)).collect();
        Self {
            name: name.to_string(),
            price: *price_history.last().expect("history must be non-empty"),
            shares_outstanding,
            price_history,
        }
    }
}
