//! The simulation model: security universe, investor population, step loop,
//! and the generational reproduction pass.

use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    domain::{Cash, InvestorId, Price, Quantity},
    error::{PopulationError, SimResult},
    investor::Investor,
    random::{RandomSource, StdRandom},
    report::MarketSnapshot,
    security::Security,
    strategy::{QLearningStrategy, Strategy, TrendFollower},
};

/// Starting cash for every freshly constructed investor.
pub const DEFAULT_INITIAL_CASH: Cash = Cash(10_000.0);

/// Steps between reproduction passes.
pub const DEFAULT_REPRODUCTION_INTERVAL: u64 = 10;

/// Inclusive bounds for randomly seeded trend-follower lookbacks.
const SEED_LOOKBACK_RANGE: (usize, usize) = (3, 7);

// ================================================================================================
// Market
// ================================================================================================

/// The simulation model.
///
/// One [`Market::step`] advances every security's price, lets every investor
/// act against the fresh prices, and — every reproduction interval — ranks
/// the population by portfolio value and replaces it with mutated offspring
/// of the top half. The driver owns looping and termination; the model is
/// purely synchronous.
pub struct Market {
    securities: Vec<Security>,
    investors: Vec<Investor>,
    step_count: u64,
    generation: u64,
    reproduction_interval: u64,
    initial_cash: Cash,
    next_investor_id: u64,
    rng: Box<dyn RandomSource>,
}

impl Market {
    /// Starts a builder with the default two-security universe.
    pub fn builder() -> MarketBuilder {
        MarketBuilder::new()
    }

    /// Default-configured market with `num_investors` randomly seeded
    /// investors.
    pub fn with_defaults(num_investors: usize) -> SimResult<Market> {
        Market::builder().with_investors(num_investors).build()
    }

    pub fn securities(&self) -> &[Security] {
        &self.securities
    }

    pub fn investors(&self) -> &[Investor] {
        &self.investors
    }

    pub fn population_len(&self) -> usize {
        self.investors.len()
    }

    /// Completed steps.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Completed reproduction passes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Portfolio value of one investor at current prices.
    pub fn portfolio_value(&self, investor: &Investor) -> Cash {
        investor.portfolio_value(&self.securities)
    }

    /// Point-in-time view for external reporting layers.
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot::capture(self)
    }

    /// Advances the simulation by one tick.
    ///
    /// Prices move first, so every investor in the step sees the same
    /// post-update prices; investors then act once each (they share no
    /// mutable state, so their order is immaterial); finally, every
    /// `reproduction_interval`-th step runs the reproduction pass.
    pub fn step(&mut self) -> SimResult<()> {
        for security in &mut self.securities {
            security.update_price(self.rng.as_mut());
        }

        for investor in &mut self.investors {
            investor.act(&self.securities, self.rng.as_mut());
        }

        self.step_count += 1;
        debug!(step = self.step_count, "market step complete");

        if self.step_count % self.reproduction_interval == 0 {
            self.reproduce()?;
        }

        Ok(())
    }

    /// Replaces the whole population with mutated offspring of the current
    /// top half by portfolio value.
    #[tracing::instrument(skip(self), fields(generation = self.generation))]
    fn reproduce(&mut self) -> SimResult<()> {
        let size = self.investors.len();
        if size < 2 {
            return Err(PopulationError::TooSmallForReproduction { size }.into());
        }

        // Ranked snapshot, best first. Stable sort over total_cmp keeps ties
        // deterministic within one call.
        let ranked: Vec<usize> = (0..size)
            .sorted_by(|&a, &b| {
                let va = self.investors[a].portfolio_value(&self.securities);
                let vb = self.investors[b].portfolio_value(&self.securities);
                vb.0.total_cmp(&va.0)
            })
            .collect();

        let parent_count = size / 2;
        let parents = &ranked[..parent_count];

        // Build-then-swap: the next generation is assembled in full before
        // it replaces the old one. Slot i descends from
        // parents[i % parent_count], so every lineage comes from the top
        // half and the population size is preserved exactly.
        let mut next_generation = Vec::with_capacity(size);
        for slot in 0..size {
            let parent = &self.investors[parents[slot % parent_count]];
            let strategy = parent.strategy().mutate(self.rng.as_mut());
            let id = InvestorId(self.next_investor_id);
            self.next_investor_id += 1;
            next_generation.push(Investor::new(id, strategy, self.initial_cash));
        }

        let best = self.investors[ranked[0]].portfolio_value(&self.securities);
        let worst = self.investors[ranked[size - 1]].portfolio_value(&self.securities);
        self.investors = next_generation;
        self.generation += 1;

        info!(
            generation = self.generation,
            population = size,
            best = best.0,
            worst = worst.0,
            "reproduction pass complete"
        );

        Ok(())
    }
}

// ================================================================================================
// Building
// ================================================================================================

/// Builder for [`Market`].
pub struct MarketBuilder {
    num_investors: usize,
    securities: Option<Vec<Security>>,
    initial_cash: Cash,
    reproduction_interval: u64,
    rng: Option<Box<dyn RandomSource>>,
}

impl Default for MarketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketBuilder {
    pub fn new() -> Self {
        Self {
            num_investors: 5,
            securities: None,
            initial_cash: DEFAULT_INITIAL_CASH,
            reproduction_interval: DEFAULT_REPRODUCTION_INTERVAL,
            rng: None,
        }
    }

    pub fn with_investors(mut self, num_investors: usize) -> Self {
        self.num_investors = num_investors;
        self
    }

    /// Replaces the default two-security universe.
    pub fn with_securities(mut self, securities: Vec<Security>) -> Self {
        self.securities = Some(securities);
        self
    }

    pub fn with_initial_cash(mut self, cash: Cash) -> Self {
        self.initial_cash = cash;
        self
    }

    /// `interval` is floored at 1.
    pub fn with_reproduction_interval(mut self, interval: u64) -> Self {
        self.reproduction_interval = interval.max(1);
        self
    }

    /// Swaps the OS-entropy default for a seeded or scripted source.
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> SimResult<Market> {
        let mut rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRandom::from_entropy()));
        let securities = match self.securities {
            Some(securities) => securities,
            None => default_universe()?,
        };

        let mut investors = Vec::with_capacity(self.num_investors);
        for i in 0..self.num_investors {
            let strategy = seed_strategy(rng.as_mut());
            investors.push(Investor::new(
                InvestorId(i as u64),
                strategy,
                self.initial_cash,
            ));
        }

        info!(
            population = investors.len(),
            securities = securities.len(),
            "market built"
        );

        Ok(Market {
            securities,
            investors,
            step_count: 0,
            generation: 0,
            reproduction_interval: self.reproduction_interval,
            initial_cash: self.initial_cash,
            next_investor_id: self.num_investors as u64,
            rng,
        })
    }
}

/// The stock universe used when none is supplied.
fn default_universe() -> SimResult<Vec<Security>> {
    Ok(vec![
        Security::new("ACME Corp.", Price(150.0), Quantity(1_000_000))?,
        Security::new("Widgets Conglomerated Inc.", Price(700.0), Quantity(500_000))?,
    ])
}

/// Uniformly picks one of the two strategy families with its seeding
/// parameters: a trend follower with lookback in [3, 7], or a
/// default-parameter Q-learner.
fn seed_strategy(rng: &mut dyn RandomSource) -> Strategy {
    if rng.index(2) == 0 {
        let span = SEED_LOOKBACK_RANGE.1 - SEED_LOOKBACK_RANGE.0 + 1;
        let lookback = SEED_LOOKBACK_RANGE.0 + rng.index(span);
        Strategy::Trend(TrendFollower::new(lookback))
    } else {
        Strategy::QLearning(QLearningStrategy::default())
    }
}
