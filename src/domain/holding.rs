//! A position in one instrument within the ledger.

use serde::{Deserialize, Serialize};

/// One holding. Present in the ledger only while `shares > 0`; the ledger
/// removes it when a sale brings the count to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: u32,
    pub avg_price: f64,
}

impl Holding {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn cost_basis(&self) -> f64 {
        self.shares as f64 * self.avg_price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.market_value(price) - self.cost_basis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_holding() -> Holding {
        Holding {
            symbol: "RELIANCE".into(),
            shares: 2,
            avg_price: 2800.0,
        }
    }

    #[test]
    fn market_value_uses_current_price() {
        let holding = sample_holding();
        assert!((holding.market_value(2850.75) - 5701.50).abs() < f64::EPSILON);
    }

    #[test]
    fn cost_basis_uses_average_price() {
        let holding = sample_holding();
        assert!((holding.cost_basis() - 5600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unrealized_pnl_is_value_minus_basis() {
        let holding = sample_holding();
        assert!((holding.unrealized_pnl(2850.75) - 101.50).abs() < 1e-9);
    }

    #[test]
    fn unrealized_pnl_negative_when_underwater() {
        let holding = sample_holding();
        assert!(holding.unrealized_pnl(2700.0) < 0.0);
    }
}
