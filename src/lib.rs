//! Evolutionary multi-agent market simulator.
//!
//! A fixed universe of securities follows a multiplicative-noise random walk
//! while a population of investors — rule-based trend followers and tabular
//! Q-learners — trades once per step. Every N steps the population is ranked
//! by portfolio value and replaced by mutated offspring of its top half.
//!
//! The crate is a synchronous core: an external driver calls
//! [`Market::step`] on whatever schedule it likes and reads state back
//! through accessors or a [`MarketSnapshot`]. All randomness flows through
//! the [`RandomSource`] seam, so runs can be entropy-driven, seeded, or
//! fully scripted.
//!
//! ```
//! use evomarket::{Market, StdRandom};
//!
//! # fn main() -> evomarket::SimResult<()> {
//! let mut market = Market::builder()
//!     .with_investors(10)
//!     .with_random_source(Box::new(StdRandom::from_seed(7)))
//!     .build()?;
//!
//! for _ in 0..50 {
//!     market.step()?;
//! }
//!
//! let snapshot = market.snapshot();
//! assert_eq!(snapshot.generation, 5);
//! assert_eq!(snapshot.investors.len(), 10);
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod error;
pub mod investor;
mod macros;
pub mod market;
pub mod random;
pub mod report;
pub mod security;
pub mod strategy;

pub use domain::{Cash, InvestorId, Price, Quantity, SecurityId, TradeAction};
pub use error::{PopulationError, SecurityError, SimError, SimResult};
pub use investor::Investor;
pub use market::{DEFAULT_INITIAL_CASH, DEFAULT_REPRODUCTION_INTERVAL, Market, MarketBuilder};
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use report::{InvestorReport, MarketSnapshot, SecurityReport};
pub use security::{PRICE_FLOOR, PRICE_VOLATILITY, Security};
pub use strategy::{
    DecisionCtx, QLearningStrategy, Strategy, StrategyKind, TradeDecision, TrendFollower,
};
