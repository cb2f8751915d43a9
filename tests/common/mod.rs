#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use niveshsaathi::domain::instrument::{default_universe, Instrument};
use niveshsaathi::domain::ledger::{Ledger, INITIAL_CASH};
use niveshsaathi::domain::session::Session;

pub fn fresh_ledger() -> Ledger {
    Ledger::new(INITIAL_CASH, &default_universe())
}

pub fn seeded_ledger() -> Ledger {
    Ledger::seeded(INITIAL_CASH, &default_universe())
}

pub fn seeded_session() -> Session {
    Session::seeded()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn make_instrument(symbol: &str, price: f64) -> Instrument {
    Instrument::new(symbol, symbol, price, 0.0, 0.0)
}
