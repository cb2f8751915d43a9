//! Web server adapter.
//!
//! Axum JSON API consumed by the browser frontend, plus static asset
//! serving. One session lives behind the state mutex; the periodic feed
//! ticker mutates it through the same lock as the handlers, so every read
//! sees a consistent ledger.

mod error;
mod handlers;

pub use error::{status_from_error, WebError};
pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;

use crate::domain::session::Session;
use crate::ports::generation_port::GenerationPort;
use crate::ports::speech_port::SpeechPort;

pub struct AppState {
    session: Mutex<Session>,
    pub generation: Arc<dyn GenerationPort + Send + Sync>,
    pub speech: Arc<dyn SpeechPort + Send + Sync>,
}

impl AppState {
    pub fn new(
        session: Session,
        generation: Arc<dyn GenerationPort + Send + Sync>,
        speech: Arc<dyn SpeechPort + Send + Sync>,
    ) -> Self {
        AppState {
            session: Mutex::new(session),
            generation,
            speech,
        }
    }

    /// Lock the session, recovering from a poisoned mutex: the domain never
    /// panics mid-mutation, so the state behind a poisoned lock is intact.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn build_router(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/api/market", get(handlers::market))
        .route("/api/portfolio", get(handlers::portfolio))
        .route("/api/trade/buy", post(handlers::buy))
        .route("/api/trade/sell", post(handlers::sell))
        .route("/api/risk/questions", get(handlers::risk_questions))
        .route("/api/risk/profile", post(handlers::submit_risk_answers))
        .route("/api/learn", get(handlers::learning_catalog))
        .route("/api/learn/{slug}", get(handlers::learning_module))
        .route("/api/learn/{slug}/quiz", post(handlers::module_quiz))
        .route(
            "/api/chat",
            get(handlers::chat_transcript).post(handlers::chat),
        )
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/suggestions", get(handlers::suggestions))
        .route("/api/speak", post(handlers::speak))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// Periodic feed ticker. Runs until aborted; the caller owns the handle and
/// aborts it on shutdown so no timer outlives the server.
pub fn spawn_ticker(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // the first interval tick completes immediately; skip it so the
        // opening prices survive for one full period
        interval.tick().await;
        loop {
            interval.tick().await;
            state.session().tick();
            debug!("applied feed tick");
        }
    })
}
