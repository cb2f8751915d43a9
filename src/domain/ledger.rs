//! Portfolio ledger: cash, holdings, and always-consistent derived metrics.

use serde::Serialize;
use std::collections::HashMap;

use super::error::SaathiError;
use super::holding::Holding;
use super::instrument::Instrument;
use super::risk_profile::RiskCategory;

/// Virtual cash every session starts with.
pub const INITIAL_CASH: f64 = 1_000_000.0;

/// Default risk score before the learner completes the questionnaire
/// (the Moderate constant).
pub const DEFAULT_RISK_SCORE: i32 = 68;

/// Valuation figures derived from holdings and the current quote view.
/// Recomputed synchronously after every mutating operation, so they are
/// never observably stale relative to the cash and holdings that produced
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PortfolioMetrics {
    pub total_value: f64,
    pub total_investment: f64,
    pub pnl: f64,
    pub day_change: f64,
    pub day_change_percent: f64,
}

impl PortfolioMetrics {
    fn compute(holdings: &HashMap<String, Holding>, quotes: &HashMap<String, Instrument>) -> Self {
        let mut total_value = 0.0;
        let mut total_investment = 0.0;
        let mut day_change = 0.0;

        for holding in holdings.values() {
            if let Some(quote) = quotes.get(&holding.symbol) {
                total_value += holding.market_value(quote.price);
                total_investment += holding.cost_basis();
                day_change += holding.shares as f64 * quote.change;
            }
        }

        let pnl = total_value - total_investment;
        let day_change_percent = if total_investment > 0.0 {
            day_change / total_investment * 100.0
        } else {
            0.0
        };

        PortfolioMetrics {
            total_value,
            total_investment,
            pnl,
            day_change,
            day_change_percent,
        }
    }
}

/// One holding enriched with its current quote, as handed to the requestors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingSnapshot {
    pub symbol: String,
    pub shares: u32,
    pub avg_price: f64,
    pub current_price: f64,
}

/// A consistent read of the ledger for the suggestion/analysis requestors.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSnapshot {
    pub cash: f64,
    pub holdings: Vec<HoldingSnapshot>,
    pub metrics: PortfolioMetrics,
    pub risk_score: i32,
    pub risk_category: RiskCategory,
}

/// The single owner of cash, holdings, and derived metrics for one session.
///
/// All mutation goes through the operations below; every failure is a
/// precondition check evaluated before any state change.
#[derive(Debug, Clone)]
pub struct Ledger {
    cash: f64,
    holdings: HashMap<String, Holding>,
    quotes: HashMap<String, Instrument>,
    metrics: PortfolioMetrics,
    risk_score: i32,
}

impl Ledger {
    pub fn new(initial_cash: f64, instruments: &[Instrument]) -> Self {
        let quotes = instruments
            .iter()
            .map(|i| (i.symbol.clone(), i.clone()))
            .collect();
        let mut ledger = Ledger {
            cash: initial_cash,
            holdings: HashMap::new(),
            quotes,
            metrics: PortfolioMetrics::default(),
            risk_score: DEFAULT_RISK_SCORE,
        };
        ledger.recompute();
        ledger
    }

    /// Ledger pre-loaded with the starter portfolio every new session gets:
    /// 2 RELIANCE @ 2800.00 and 4 HDFCBANK @ 1600.00.
    pub fn seeded(initial_cash: f64, instruments: &[Instrument]) -> Self {
        let mut ledger = Ledger::new(initial_cash, instruments);
        for (symbol, shares, avg_price) in [("RELIANCE", 2, 2800.00), ("HDFCBANK", 4, 1600.00)] {
            ledger.holdings.insert(
                symbol.to_string(),
                Holding {
                    symbol: symbol.to_string(),
                    shares,
                    avg_price,
                },
            );
        }
        ledger.recompute();
        ledger
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn metrics(&self) -> &PortfolioMetrics {
        &self.metrics
    }

    pub fn risk_score(&self) -> i32 {
        self.risk_score
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.values()
    }

    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    pub fn quote(&self, symbol: &str) -> Option<&Instrument> {
        self.quotes.get(symbol)
    }

    /// Buy `shares` of `symbol` at its current quoted price.
    pub fn buy(&mut self, symbol: &str, shares: u32) -> Result<(), SaathiError> {
        if shares == 0 {
            return Err(SaathiError::InvalidShareCount);
        }
        let price = self
            .quotes
            .get(symbol)
            .ok_or_else(|| SaathiError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?
            .price;
        let cost = price * shares as f64;
        if cost > self.cash {
            return Err(SaathiError::InsufficientFunds {
                required: cost,
                available: self.cash,
            });
        }

        self.cash -= cost;
        match self.holdings.get_mut(symbol) {
            Some(holding) => {
                let total_shares = holding.shares + shares;
                holding.avg_price = (holding.avg_price * holding.shares as f64
                    + price * shares as f64)
                    / total_shares as f64;
                holding.shares = total_shares;
            }
            None => {
                self.holdings.insert(
                    symbol.to_string(),
                    Holding {
                        symbol: symbol.to_string(),
                        shares,
                        avg_price: price,
                    },
                );
            }
        }
        self.recompute();
        Ok(())
    }

    /// Sell `shares` of `symbol` at its current quoted price. A full sale
    /// removes the holding; a partial sale leaves the average price untouched,
    /// since only purchases move it.
    pub fn sell(&mut self, symbol: &str, shares: u32) -> Result<(), SaathiError> {
        if shares == 0 {
            return Err(SaathiError::InvalidShareCount);
        }
        let held = self
            .holdings
            .get(symbol)
            .ok_or_else(|| SaathiError::NoSuchHolding {
                symbol: symbol.to_string(),
            })?
            .shares;
        if shares > held {
            return Err(SaathiError::InsufficientShares {
                symbol: symbol.to_string(),
                held,
                requested: shares,
            });
        }
        let price = self
            .quotes
            .get(symbol)
            .ok_or_else(|| SaathiError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?
            .price;

        self.cash += price * shares as f64;
        if shares == held {
            self.holdings.remove(symbol);
        } else if let Some(holding) = self.holdings.get_mut(symbol) {
            holding.shares -= shares;
        }
        self.recompute();
        Ok(())
    }

    /// Replace the ledger's view of current prices and recompute metrics.
    /// Holdings (share counts and average prices) are never touched here.
    pub fn apply_price_update(&mut self, instruments: &[Instrument]) {
        self.quotes = instruments
            .iter()
            .map(|i| (i.symbol.clone(), i.clone()))
            .collect();
        self.recompute();
    }

    /// Store the questionnaire-derived score. Plain assignment: no metric
    /// recomputation and no range enforcement (0-100 by profiler convention).
    pub fn set_risk_score(&mut self, score: i32) {
        self.risk_score = score;
    }

    /// Consistent snapshot for the requestors: holdings with live prices,
    /// cash, metrics, and the risk profile state.
    pub fn snapshot(&self) -> PortfolioSnapshot {
        let mut holdings: Vec<HoldingSnapshot> = self
            .holdings
            .values()
            .map(|h| HoldingSnapshot {
                symbol: h.symbol.clone(),
                shares: h.shares,
                avg_price: h.avg_price,
                current_price: self.quotes.get(&h.symbol).map_or(h.avg_price, |q| q.price),
            })
            .collect();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        PortfolioSnapshot {
            cash: self.cash,
            holdings,
            metrics: self.metrics,
            risk_score: self.risk_score,
            risk_category: RiskCategory::from_score(self.risk_score),
        }
    }

    fn recompute(&mut self) {
        self.metrics = PortfolioMetrics::compute(&self.holdings, &self.quotes);
    }
}
