//! Simulated quote feed: a bounded random walk over the instrument universe.

use rand::Rng;

use super::instrument::Instrument;

/// Symmetric per-tick bound on the fractional price move.
pub const MAX_TICK_FRACTION: f64 = 0.025;

/// Floor on the fractional move so a price can never reach zero.
const MIN_TICK_FRACTION: f64 = -0.99;

/// Generates randomized per-tick price movements for a fixed instrument set.
/// Only the current price and the most recent change are retained; there is
/// no history.
#[derive(Debug, Clone)]
pub struct QuoteFeed {
    instruments: Vec<Instrument>,
}

impl QuoteFeed {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        QuoteFeed { instruments }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol == symbol)
    }

    /// Advance every instrument by one simulated tick.
    pub fn tick(&mut self) {
        self.tick_with(&mut rand::thread_rng());
    }

    /// Advance with a caller-supplied RNG. Seed the RNG for reproducible runs.
    pub fn tick_with<R: Rng>(&mut self, rng: &mut R) {
        for instrument in &mut self.instruments {
            let fraction = rng
                .gen_range(-MAX_TICK_FRACTION..=MAX_TICK_FRACTION)
                .max(MIN_TICK_FRACTION);
            let old_price = instrument.price;
            let new_price = old_price * (1.0 + fraction);
            instrument.change = new_price - old_price;
            instrument.change_percent = instrument.change / old_price * 100.0;
            instrument.price = new_price;
        }
    }
}
