//! Tradable instruments and the simulated NSE universe.

use serde::{Deserialize, Serialize};

/// A tradable symbol with its simulated current price and the movement
/// recorded by the most recent tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl Instrument {
    pub fn new(symbol: &str, name: &str, price: f64, change: f64, change_percent: f64) -> Self {
        Instrument {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change,
            change_percent,
        }
    }
}

/// The fixed instrument universe the feed simulates. Prices are the opening
/// snapshot; the quote feed moves them from here.
pub fn default_universe() -> Vec<Instrument> {
    vec![
        Instrument::new("RELIANCE", "Reliance Industries", 2850.75, 30.25, 1.07),
        Instrument::new("TCS", "Tata Consultancy Services", 3805.10, -15.40, -0.40),
        Instrument::new("HDFCBANK", "HDFC Bank Ltd.", 1650.00, 12.80, 0.78),
        Instrument::new("INFY", "Infosys Ltd.", 1510.55, -5.90, -0.39),
        Instrument::new("ICICIBANK", "ICICI Bank Ltd.", 1125.30, 25.15, 2.29),
        Instrument::new("SBIN", "State Bank of India", 830.90, -2.10, -0.25),
    ]
}
