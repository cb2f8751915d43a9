//! Per-session aggregate: one quote feed, one ledger, one chat transcript.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use super::instrument::default_universe;
use super::ledger::{Ledger, PortfolioSnapshot, INITIAL_CASH};
use super::quote_feed::QuoteFeed;
use super::settings::SessionSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChatRole {
    Learner,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Owns all mutable state for one learner session. Created once per session,
/// never shared across sessions, and destroyed with it; there is no
/// persistence. The web adapter holds exactly one instance behind a mutex.
#[derive(Debug)]
pub struct Session {
    feed: QuoteFeed,
    ledger: Ledger,
    chat: Vec<ChatMessage>,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(settings: &SessionSettings) -> Self {
        let universe = default_universe();
        let ledger = if settings.seed_portfolio {
            Ledger::seeded(settings.initial_cash, &universe)
        } else {
            Ledger::new(settings.initial_cash, &universe)
        };
        Session {
            feed: QuoteFeed::new(universe),
            ledger,
            chat: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Fresh session with the standard starting balance and seed portfolio.
    pub fn seeded() -> Self {
        Session::new(&SessionSettings {
            initial_cash: INITIAL_CASH,
            seed_portfolio: true,
        })
    }

    pub fn feed(&self) -> &QuoteFeed {
        &self.feed
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// One simulated market cycle: move every price, then push the new
    /// quotes into the ledger so its metrics are recomputed in the same step.
    pub fn tick(&mut self) {
        self.feed.tick();
        self.ledger.apply_price_update(self.feed.instruments());
    }

    /// `tick` with a caller-supplied RNG, for reproducible simulations.
    pub fn tick_with<R: Rng>(&mut self, rng: &mut R) {
        self.feed.tick_with(rng);
        self.ledger.apply_price_update(self.feed.instruments());
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        self.ledger.snapshot()
    }

    pub fn chat_transcript(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn record_chat(&mut self, role: ChatRole, text: impl Into<String>) {
        self.chat.push(ChatMessage {
            role,
            text: text.into(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn seeded_session_matches_starting_state() {
        let session = Session::seeded();
        assert!((session.ledger().cash() - INITIAL_CASH).abs() < f64::EPSILON);
        assert_eq!(session.ledger().holding_count(), 2);
        assert!(session.chat_transcript().is_empty());
    }

    #[test]
    fn tick_flows_prices_into_ledger_metrics() {
        let mut session = Session::seeded();
        let mut rng = StdRng::seed_from_u64(42);
        session.tick_with(&mut rng);

        let feed_price = session.feed().get("RELIANCE").unwrap().price;
        let quote_price = session.ledger().quote("RELIANCE").unwrap().price;
        assert!((feed_price - quote_price).abs() < f64::EPSILON);

        let expected_value: f64 = session
            .ledger()
            .holdings()
            .map(|h| h.shares as f64 * session.feed().get(&h.symbol).unwrap().price)
            .sum();
        assert!((session.ledger().metrics().total_value - expected_value).abs() < 1e-9);
    }

    #[test]
    fn tick_never_touches_holdings() {
        let mut session = Session::seeded();
        let mut rng = StdRng::seed_from_u64(9);
        let before: Vec<_> = session.ledger().holdings().cloned().collect();
        for _ in 0..50 {
            session.tick_with(&mut rng);
        }
        let mut after: Vec<_> = session.ledger().holdings().cloned().collect();
        let mut before = before;
        before.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        after.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        assert_eq!(before, after);
    }

    #[test]
    fn chat_transcript_accumulates_in_order() {
        let mut session = Session::seeded();
        session.record_chat(ChatRole::Learner, "What is a SIP?");
        session.record_chat(ChatRole::Assistant, "A systematic investment plan.");
        let transcript = session.chat_transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, ChatRole::Learner);
        assert_eq!(transcript[1].role, ChatRole::Assistant);
    }
}
