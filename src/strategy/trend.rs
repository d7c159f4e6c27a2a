use serde::Serialize;

use crate::{
    domain::Quantity,
    random::RandomSource,
    security::Security,
    strategy::{DecisionCtx, TradeDecision},
};

/// Fraction of current cash a trend follower commits to a single buy.
const BUY_CASH_FRACTION: f64 = 0.1;

/// Rule-based momentum strategy.
///
/// Compares the newest price in its lookback window against the oldest:
/// rising window buys with a tenth of available cash, falling window
/// liquidates half the position, flat window holds. Stateless beyond the
/// window size.
#[derive(Debug, Clone, Serialize)]
pub struct TrendFollower {
    lookback: usize,
}

impl TrendFollower {
    /// `lookback` is floored at 1.
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback: lookback.max(1),
        }
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn decide(&self, security: &Security, ctx: &DecisionCtx) -> TradeDecision {
        // The signal needs one observation beyond the window.
        if security.observations() < self.lookback + 1 {
            return TradeDecision::hold();
        }

        let window = security.recent_prices(self.lookback);
        let (first, last) = (window[0], window[window.len() - 1]);

        if last > first {
            let affordable = ctx.cash.0 / security.price().0 * BUY_CASH_FRACTION;
            TradeDecision::buy(Quantity(affordable as u64))
        } else if last < first {
            TradeDecision::sell(Quantity(ctx.held.0 / 2))
        } else {
            TradeDecision::hold()
        }
    }

    /// Child with the window nudged by one of {-1, 0, +1}, floored at 1.
    pub fn mutate(&self, rng: &mut dyn RandomSource) -> Self {
        let delta = [-1i64, 0, 1][rng.index(3)];
        Self {
            lookback: (self.lookback as i64 + delta).max(1) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Cash, random::ScriptedRandom};

    fn ctx(cash: f64, held: u64) -> DecisionCtx {
        DecisionCtx {
            cash: Cash(cash),
            held: Quantity(held),
            stock_value: Cash(0.0),
        }
    }

    #[test]
    fn holds_until_the_window_has_one_extra_observation() {
        let security = Security::from_history("ACME Corp.", &[100.0, 105.0, 110.0], Quantity(1));
        let strategy = TrendFollower::new(3);
        assert_eq!(strategy.decide(&security, &ctx(10_000.0, 0)), TradeDecision::hold());
    }

    #[test]
    fn rising_window_buys_a_tenth_of_cash() {
        let security =
            Security::from_history("ACME Corp.", &[100.0, 105.0, 110.0, 108.0], Quantity(1));
        let strategy = TrendFollower::new(3);
        // Window [105, 110, 108]: rising endpoints, floor(10000 / 108 * 0.1) = 9.
        let decision = strategy.decide(&security, &ctx(10_000.0, 0));
        assert_eq!(decision, TradeDecision::buy(Quantity(9)));
    }

    #[test]
    fn falling_window_sells_half_the_position() {
        let security =
            Security::from_history("ACME Corp.", &[100.0, 110.0, 105.0, 102.0], Quantity(1));
        let strategy = TrendFollower::new(3);
        let decision = strategy.decide(&security, &ctx(10_000.0, 9));
        assert_eq!(decision, TradeDecision::sell(Quantity(4)));
    }

    #[test]
    fn falling_window_with_no_position_sells_zero() {
        let security =
            Security::from_history("ACME Corp.", &[100.0, 110.0, 105.0, 102.0], Quantity(1));
        let strategy = TrendFollower::new(3);
        let decision = strategy.decide(&security, &ctx(10_000.0, 0));
        assert_eq!(decision, TradeDecision::sell(Quantity::ZERO));
    }

    #[test]
    fn flat_endpoints_hold_regardless_of_interior_moves() {
        let security =
            Security::from_history("ACME Corp.", &[100.0, 105.0, 140.0, 105.0], Quantity(1));
        let strategy = TrendFollower::new(3);
        assert_eq!(strategy.decide(&security, &ctx(10_000.0, 5)), TradeDecision::hold());
    }

    #[test]
    fn mutate_shifts_lookback_by_at_most_one() {
        let strategy = TrendFollower::new(5);
        for (draw, expected) in [(0usize, 4usize), (1, 5), (2, 6)] {
            let mut rng = ScriptedRandom::new().with_indices([draw]);
            assert_eq!(strategy.mutate(&mut rng).lookback(), expected);
        }
    }

    #[test]
    fn mutate_floors_lookback_at_one() {
        let strategy = TrendFollower::new(1);
        let mut rng = ScriptedRandom::new().with_indices([0]);
        assert_eq!(strategy.mutate(&mut rng).lookback(), 1);
    }
}
