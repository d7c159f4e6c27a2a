//! Investor bookkeeping: cash, holdings, and trade execution.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    domain::{Cash, InvestorId, Quantity, SecurityId, TradeAction},
    random::RandomSource,
    security::Security,
    strategy::{DecisionCtx, Strategy, TradeDecision},
};

/// A market participant owning cash, share positions, and one strategy.
///
/// Economically invalid recommendations — a buy that costs more than the
/// cash on hand, a sell larger than the position — are rejected silently:
/// the trade simply does not happen. There are no partial fills and no
/// error paths in execution.
#[derive(Debug, Clone, Serialize)]
pub struct Investor {
    id: InvestorId,
    cash: Cash,
    /// Share positions; an entry is present only while its count is >= 1.
    holdings: HashMap<SecurityId, Quantity>,
    strategy: Strategy,
}

impl Investor {
    pub fn new(id: InvestorId, strategy: Strategy, cash: Cash) -> Self {
        Self {
            id,
            cash,
            holdings: HashMap::new(),
            strategy,
        }
    }

    pub fn id(&self) -> InvestorId {
        self.id
    }

    pub fn cash(&self) -> Cash {
        self.cash
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Shares held of the given security; zero when absent.
    pub fn holding(&self, id: SecurityId) -> Quantity {
        self.holdings.get(&id).copied().unwrap_or(Quantity::ZERO)
    }

    /// Iterates (security, share count) positions. Every yielded count is
    /// at least 1.
    pub fn holdings(&self) -> impl Iterator<Item = (SecurityId, Quantity)> + '_ {
        self.holdings.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Mark-to-market value of the share positions alone.
    pub fn stock_value(&self, securities: &[Security]) -> Cash {
        self.holdings
            .iter()
            .map(|(id, qty)| securities[id.0].price() * *qty)
            .sum()
    }

    /// Cash plus the mark-to-market value of all holdings. Pure read.
    pub fn portfolio_value(&self, securities: &[Security]) -> Cash {
        self.cash + self.stock_value(securities)
    }

    /// Runs one strategy decision against every security and applies the
    /// outcomes to the books.
    pub fn act(&mut self, securities: &[Security], rng: &mut dyn RandomSource) {
        for (idx, security) in securities.iter().enumerate() {
            let id = SecurityId(idx);
            let ctx = DecisionCtx {
                cash: self.cash,
                held: self.holding(id),
                stock_value: self.stock_value(securities),
            };
            let decision = self.strategy.decide(security, &ctx, rng);
            self.execute(id, security, decision);
        }
    }

    /// Applies a single decision. Zero quantities, unaffordable buys, and
    /// uncovered sells are no-ops.
    fn execute(&mut self, id: SecurityId, security: &Security, decision: TradeDecision) {
        let TradeDecision { action, quantity } = decision;
        if quantity.is_zero() {
            return;
        }

        match action {
            TradeAction::Buy => {
                let cost = security.price() * quantity;
                if cost <= self.cash {
                    self.cash -= cost;
                    *self.holdings.entry(id).or_default() += quantity;
                }
            }
            TradeAction::Sell => {
                let held = self.holding(id);
                if held >= quantity {
                    self.cash += security.price() * quantity;
                    let remaining = held - quantity;
                    if remaining.is_zero() {
                        self.holdings.remove(&id);
                    } else {
                        self.holdings.insert(id, remaining);
                    }
                }
            }
            TradeAction::Hold => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        random::ScriptedRandom,
        strategy::{QLearningStrategy, TrendFollower},
    };

    fn acme(price: f64) -> Security {
        Security::from_history("ACME Corp.", &[price], Quantity(1_000_000))
    }

    fn trend_investor(cash: f64) -> Investor {
        Investor::new(
            InvestorId(0),
            Strategy::Trend(TrendFollower::new(3)),
            Cash(cash),
        )
    }

    #[test]
    fn unaffordable_buy_is_silently_rejected() {
        let security = acme(1_000.0);
        let mut investor = trend_investor(100.0);

        investor.execute(SecurityId(0), &security, TradeDecision::buy(Quantity(1)));
        assert_eq!(investor.cash(), Cash(100.0));
        assert_eq!(investor.holding(SecurityId(0)), Quantity::ZERO);
    }

    #[test]
    fn uncovered_sell_is_silently_rejected() {
        let security = acme(100.0);
        let mut investor = trend_investor(1_000.0);

        investor.execute(SecurityId(0), &security, TradeDecision::sell(Quantity(3)));
        assert_eq!(investor.cash(), Cash(1_000.0));
        assert_eq!(investor.holdings().count(), 0);
    }

    #[test]
    fn buy_moves_cash_into_the_position() {
        let security = acme(100.0);
        let mut investor = trend_investor(1_000.0);

        investor.execute(SecurityId(0), &security, TradeDecision::buy(Quantity(4)));
        assert_eq!(investor.cash(), Cash(600.0));
        assert_eq!(investor.holding(SecurityId(0)), Quantity(4));
    }

    #[test]
    fn selling_down_to_zero_removes_the_entry() {
        let security = acme(100.0);
        let mut investor = trend_investor(1_000.0);

        investor.execute(SecurityId(0), &security, TradeDecision::buy(Quantity(4)));
        investor.execute(SecurityId(0), &security, TradeDecision::sell(Quantity(4)));

        assert_eq!(investor.cash(), Cash(1_000.0));
        assert_eq!(investor.holdings().count(), 0);
    }

    #[test]
    fn partial_sell_keeps_the_remainder() {
        let security = acme(100.0);
        let mut investor = trend_investor(1_000.0);

        investor.execute(SecurityId(0), &security, TradeDecision::buy(Quantity(4)));
        investor.execute(SecurityId(0), &security, TradeDecision::sell(Quantity(1)));

        assert_eq!(investor.cash(), Cash(700.0));
        assert_eq!(investor.holding(SecurityId(0)), Quantity(3));
    }

    #[test]
    fn zero_quantity_decisions_leave_no_residue() {
        let security = acme(100.0);
        let mut investor = trend_investor(1_000.0);

        investor.execute(SecurityId(0), &security, TradeDecision::buy(Quantity::ZERO));
        investor.execute(SecurityId(0), &security, TradeDecision::sell(Quantity::ZERO));

        assert_eq!(investor.cash(), Cash(1_000.0));
        assert_eq!(investor.holdings().count(), 0);
    }

    #[test]
    fn portfolio_value_marks_holdings_to_market() {
        let securities = vec![acme(100.0)];
        let mut investor = trend_investor(1_000.0);

        investor.execute(SecurityId(0), &securities[0], TradeDecision::buy(Quantity(3)));
        assert_eq!(investor.stock_value(&securities), Cash(300.0));
        assert_eq!(investor.portfolio_value(&securities), Cash(1_000.0));
    }

    #[test]
    fn act_executes_a_greedy_all_in_buy() {
        // A fresh Q-learner with no exploration draws ties to Buy and
        // commits all cash.
        let securities = vec![acme(100.0)];
        let mut investor = Investor::new(
            InvestorId(1),
            Strategy::QLearning(QLearningStrategy::default()),
            Cash(10_000.0),
        );
        let mut rng = ScriptedRandom::new();

        investor.act(&securities, &mut rng);
        assert_eq!(investor.cash(), Cash(0.0));
        assert_eq!(investor.holding(SecurityId(0)), Quantity(100));
    }

    #[test]
    fn act_holds_while_the_trend_window_warms_up() {
        let securities = vec![acme(100.0)];
        let mut investor = trend_investor(10_000.0);
        let mut rng = ScriptedRandom::new();

        investor.act(&securities, &mut rng);
        assert_eq!(investor.cash(), Cash(10_000.0));
        assert_eq!(investor.holdings().count(), 0);
    }
}
