//! Point-in-time views for external reporting layers.
//!
//! The core pushes no metrics anywhere. A driver that wants to chart or
//! display state pulls a [`MarketSnapshot`] after any step and works with
//! the plain, serialization-friendly values inside.

use itertools::Itertools;
use serde::Serialize;

use crate::{
    domain::{Cash, InvestorId, Price, Quantity},
    market::Market,
    strategy::StrategyKind,
};

/// Per-security view: price and market capitalization.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityReport {
    pub name: String,
    pub price: Price,
    pub market_cap: Cash,
}

/// Per-investor view: the books plus the strategy family.
#[derive(Debug, Clone, Serialize)]
pub struct InvestorReport {
    pub id: InvestorId,
    pub strategy: StrategyKind,
    pub cash: Cash,
    pub portfolio_value: Cash,
    /// (security name, share count) pairs in universe order.
    pub holdings: Vec<(String, Quantity)>,
}

/// Everything an external display layer needs from one step.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub step: u64,
    pub generation: u64,
    pub securities: Vec<SecurityReport>,
    pub investors: Vec<InvestorReport>,
}

impl MarketSnapshot {
    pub(crate) fn capture(market: &Market) -> Self {
        let securities = market
            .securities()
            .iter()
            .map(|security| SecurityReport {
                name: security.name().to_string(),
                price: security.price(),
                market_cap: security.market_cap(),
            })
            .collect();

        let investors = market
            .investors()
            .iter()
            .map(|investor| {
                let mut positions: Vec<_> = investor.holdings().collect();
                positions.sort_by_key(|(id, _)| *id);
                let holdings = positions
                    .into_iter()
                    .map(|(id, qty)| (market.securities()[id.0].name().to_string(), qty))
                    .collect();

                InvestorReport {
                    id: investor.id(),
                    strategy: investor.strategy().kind(),
                    cash: investor.cash(),
                    portfolio_value: investor.portfolio_value(market.securities()),
                    holdings,
                }
            })
            .collect();

        Self {
            step: market.step_count(),
            generation: market.generation(),
            securities,
            investors,
        }
    }

    /// Investors ordered best portfolio value first.
    pub fn leaderboard(&self) -> Vec<&InvestorReport> {
        self.investors
            .iter()
            .sorted_by(|a, b| b.portfolio_value.0.total_cmp(&a.portfolio_value.0))
            .collect()
    }
}
