use std::collections::HashMap;

use ordered_float::OrderedFloat;
use serde::Serialize;
use smallvec::SmallVec;
use strum::EnumCount;

use crate::{
    domain::{Quantity, TradeAction},
    random::RandomSource,
    security::Security,
    strategy::{DecisionCtx, TradeDecision},
};

/// Hyperparameter nudge applied by one mutation round.
const RATE_STEP: f64 = 0.01;

const MIN_LEARNING_RATE: f64 = 0.01;
const DISCOUNT_RANGE: (f64, f64) = (0.8, 1.0);
const EXPLORATION_RANGE: (f64, f64) = (0.01, 1.0);

// ================================================================================================
// Value Table
// ================================================================================================

/// The market state a value-table row is keyed by: the raw lookback price
/// window plus the investor's cash, as exact float bit patterns.
///
/// Continuous inputs mean a key practically never repeats, so lookups almost
/// always land on default rows and learning has negligible practical effect.
/// The table is keyed this way deliberately to match the system being
/// modeled; do not discretize.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketState {
    window: SmallVec<[OrderedFloat<f64>; 8]>,
    cash: OrderedFloat<f64>,
}

impl MarketState {
    fn observe(security: &Security, ctx: &DecisionCtx, lookback: usize) -> Self {
        let window = security
            .recent_prices(lookback)
            .iter()
            .map(|p| OrderedFloat(p.0))
            .collect();
        Self {
            window,
            cash: OrderedFloat(ctx.cash.0),
        }
    }
}

/// One value-table row: the estimated value of each action in a state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ActionValues([f64; TradeAction::COUNT]);

impl ActionValues {
    fn get(&self, action: TradeAction) -> f64 {
        self.0[action as usize]
    }

    fn set(&mut self, action: TradeAction, value: f64) {
        self.0[action as usize] = value;
    }

    /// Highest stored value across the three actions.
    fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the highest value; ties go to the earliest action in
    /// declaration order (buy, then sell, then hold).
    fn best_action(&self) -> TradeAction {
        let mut best = TradeAction::Buy;
        for action in [TradeAction::Sell, TradeAction::Hold] {
            if self.get(action) > self.get(best) {
                best = action;
            }
        }
        best
    }
}

fn action_by_index(idx: usize) -> TradeAction {
    match idx {
        0 => TradeAction::Buy,
        1 => TradeAction::Sell,
        _ => TradeAction::Hold,
    }
}

// ================================================================================================
// Strategy
// ================================================================================================

/// Tabular Q-learning strategy.
///
/// Epsilon-greedy over {buy, sell, hold}, with a one-step Q update performed
/// inside every decision. Buys commit the entire cash balance, sells the
/// entire position.
#[derive(Debug, Clone, Serialize)]
pub struct QLearningStrategy {
    learning_rate: f64,
    discount_factor: f64,
    exploration_rate: f64,
    lookback: usize,
    #[serde(skip)]
    value_table: HashMap<MarketState, ActionValues>,
}

impl Default for QLearningStrategy {
    fn default() -> Self {
        Self::new(0.1, 0.95, 0.1, 5)
    }
}

impl QLearningStrategy {
    /// Rates are clamped into their legal ranges, `lookback` floored at 1.
    pub fn new(
        learning_rate: f64,
        discount_factor: f64,
        exploration_rate: f64,
        lookback: usize,
    ) -> Self {
        Self {
            learning_rate: learning_rate.max(MIN_LEARNING_RATE),
            discount_factor: discount_factor.clamp(DISCOUNT_RANGE.0, DISCOUNT_RANGE.1),
            exploration_rate: exploration_rate.clamp(EXPLORATION_RANGE.0, EXPLORATION_RANGE.1),
            lookback: lookback.max(1),
            value_table: HashMap::new(),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Number of states the value table has seen so far.
    pub fn table_len(&self) -> usize {
        self.value_table.len()
    }

    pub fn decide(
        &mut self,
        security: &Security,
        ctx: &DecisionCtx,
        rng: &mut dyn RandomSource,
    ) -> TradeDecision {
        let state = MarketState::observe(security, ctx, self.lookback);
        let old_row = self.value_table.get(&state).copied().unwrap_or_default();

        let action = if rng.uniform() < self.exploration_rate {
            action_by_index(rng.index(TradeAction::COUNT))
        } else {
            old_row.best_action()
        };

        // Portfolio value minus the mark-to-market holdings term: this
        // collapses to the cash balance, which is the reward the modeled
        // system actually pays.
        let reward = (ctx.portfolio_value() - ctx.stock_value).0;

        let row = self.value_table.entry(state).or_default();
        let current = row.get(action);
        let target = reward + self.discount_factor * old_row.max();
        row.set(action, current + self.learning_rate * (target - current));

        let quantity = match action {
            TradeAction::Buy => Quantity((ctx.cash.0 / security.price().0) as u64),
            TradeAction::Sell => ctx.held,
            TradeAction::Hold => Quantity::ZERO,
        };

        TradeDecision { action, quantity }
    }

    /// Child with each hyperparameter independently nudged and clamped; the
    /// value table starts empty (learned experience is not inherited).
    ///
    /// Draw order: learning rate, discount factor, exploration rate,
    /// lookback.
    pub fn mutate(&self, rng: &mut dyn RandomSource) -> Self {
        let deltas = [-RATE_STEP, 0.0, RATE_STEP];

        let learning_rate = (self.learning_rate + deltas[rng.index(3)]).max(MIN_LEARNING_RATE);
        let discount_factor =
            (self.discount_factor + deltas[rng.index(3)]).clamp(DISCOUNT_RANGE.0, DISCOUNT_RANGE.1);
        let exploration_rate = (self.exploration_rate + deltas[rng.index(3)])
            .clamp(EXPLORATION_RANGE.0, EXPLORATION_RANGE.1);
        let lookback_delta = [-1i64, 0, 1][rng.index(3)];

        Self {
            learning_rate,
            discount_factor,
            exploration_rate,
            lookback: (self.lookback as i64 + lookback_delta).max(1) as usize,
            value_table: HashMap::new(),
        }
    }
}
