//! Trading strategies and their dispatch surface.
//!
//! Two decision policies share one call shape: a rule-based
//! [`TrendFollower`] and a tabular [`QLearningStrategy`]. Both map
//! (security, investor context) to a [`TradeDecision`] and both expose a
//! `mutate` operator that produces the child strategy used during
//! reproduction. They share no state, so dispatch is a tagged enum rather
//! than a trait object.

pub mod qlearning;
pub mod trend;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
    domain::{Cash, Quantity, TradeAction},
    random::RandomSource,
    security::Security,
};

pub use qlearning::QLearningStrategy;
pub use trend::TrendFollower;

// ================================================================================================
// Decision Inputs & Outputs
// ================================================================================================

/// Per-investor context a strategy sees when deciding on one security.
///
/// Snapshotting the investor's books into a plain struct keeps strategy
/// dispatch free of aliasing between the strategy (mutably borrowed for the
/// learning variant) and the investor that owns it.
#[derive(Debug, Clone, Copy)]
pub struct DecisionCtx {
    /// The investor's current cash balance.
    pub cash: Cash,
    /// Shares currently held of the security under consideration.
    pub held: Quantity,
    /// Mark-to-market value of all of the investor's holdings.
    pub stock_value: Cash,
}

impl DecisionCtx {
    /// Cash plus the mark-to-market value of all holdings.
    pub fn portfolio_value(&self) -> Cash {
        self.cash + self.stock_value
    }
}

/// A strategy's recommendation for a single security in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDecision {
    pub action: TradeAction,
    pub quantity: Quantity,
}

impl TradeDecision {
    pub fn hold() -> Self {
        Self {
            action: TradeAction::Hold,
            quantity: Quantity::ZERO,
        }
    }

    pub fn buy(quantity: Quantity) -> Self {
        Self {
            action: TradeAction::Buy,
            quantity,
        }
    }

    pub fn sell(quantity: Quantity) -> Self {
        Self {
            action: TradeAction::Sell,
            quantity,
        }
    }
}

// ================================================================================================
// Dispatch
// ================================================================================================

/// Identifies a strategy family without exposing its state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    TrendFollower,
    QLearning,
}

/// The decision policy an investor carries.
#[derive(Debug, Clone, Serialize)]
pub enum Strategy {
    Trend(TrendFollower),
    QLearning(QLearningStrategy),
}

impl Strategy {
    /// Recommends an action and quantity for one security.
    pub fn decide(
        &mut self,
        security: &Security,
        ctx: &DecisionCtx,
        rng: &mut dyn RandomSource,
    ) -> TradeDecision {
        match self {
            Strategy::Trend(s) => s.decide(security, ctx),
            Strategy::QLearning(s) => s.decide(security, ctx, rng),
        }
    }

    /// Builds a child strategy with independently perturbed parameters.
    ///
    /// Learned state never carries over: a Q-learning child starts from an
    /// empty value table.
    pub fn mutate(&self, rng: &mut dyn RandomSource) -> Strategy {
        match self {
            Strategy::Trend(s) => Strategy::Trend(s.mutate(rng)),
            Strategy::QLearning(s) => Strategy::QLearning(s.mutate(rng)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Trend(_) => StrategyKind::TrendFollower,
            Strategy::QLearning(_) => StrategyKind::QLearning,
        }
    }
}
