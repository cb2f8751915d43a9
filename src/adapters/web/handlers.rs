//! JSON request handlers for the web adapter.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::error::SaathiError;
use crate::domain::instrument::Instrument;
use crate::domain::learning::{self, LearningModule, QuizQuestion};
use crate::domain::ledger::{PortfolioMetrics, PortfolioSnapshot};
use crate::domain::risk_profile::{self, Question, RiskCategory};
use crate::domain::session::{ChatMessage, ChatRole};
use crate::ports::generation_port::{GenerationRequest, GenerationResponse};

use super::{AppState, WebError};

#[derive(Debug, Serialize)]
pub struct PortfolioView {
    pub cash: f64,
    pub holdings: Vec<HoldingView>,
    pub metrics: PortfolioMetrics,
    pub risk_score: i32,
    pub risk_category: RiskCategory,
}

#[derive(Debug, Serialize)]
pub struct HoldingView {
    pub symbol: String,
    pub name: String,
    pub shares: u32,
    pub avg_price: f64,
    pub current_price: f64,
    pub market_value: f64,
    pub pnl: f64,
}

fn portfolio_view(snapshot: PortfolioSnapshot, instruments: &[Instrument]) -> PortfolioView {
    let holdings = snapshot
        .holdings
        .into_iter()
        .map(|h| HoldingView {
            name: instruments
                .iter()
                .find(|i| i.symbol == h.symbol)
                .map(|i| i.name.clone())
                .unwrap_or_default(),
            market_value: h.shares as f64 * h.current_price,
            pnl: h.shares as f64 * (h.current_price - h.avg_price),
            symbol: h.symbol,
            shares: h.shares,
            avg_price: h.avg_price,
            current_price: h.current_price,
        })
        .collect();
    PortfolioView {
        cash: snapshot.cash,
        holdings,
        metrics: snapshot.metrics,
        risk_score: snapshot.risk_score,
        risk_category: snapshot.risk_category,
    }
}

pub async fn market(State(state): State<Arc<AppState>>) -> Json<Vec<Instrument>> {
    let session = state.session();
    Json(session.feed().instruments().to_vec())
}

pub async fn portfolio(State(state): State<Arc<AppState>>) -> Json<PortfolioView> {
    let session = state.session();
    Json(portfolio_view(
        session.snapshot(),
        session.feed().instruments(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct TradeForm {
    pub symbol: String,
    pub shares: u32,
}

pub async fn buy(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TradeForm>,
) -> Result<Json<PortfolioView>, WebError> {
    let mut session = state.session();
    session.ledger_mut().buy(&form.symbol, form.shares)?;
    Ok(Json(portfolio_view(
        session.snapshot(),
        session.feed().instruments(),
    )))
}

pub async fn sell(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TradeForm>,
) -> Result<Json<PortfolioView>, WebError> {
    let mut session = state.session();
    session.ledger_mut().sell(&form.symbol, form.shares)?;
    Ok(Json(portfolio_view(
        session.snapshot(),
        session.feed().instruments(),
    )))
}

pub async fn risk_questions() -> Json<&'static [Question]> {
    Json(&risk_profile::QUESTIONS)
}

#[derive(Debug, Deserialize)]
pub struct RiskAnswersForm {
    pub answers: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct RiskProfileView {
    pub category: RiskCategory,
    pub score: i32,
    pub title: &'static str,
    pub description: &'static str,
}

/// Score a completed questionnaire and feed the result into the ledger.
pub async fn submit_risk_answers(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RiskAnswersForm>,
) -> Result<Json<RiskProfileView>, WebError> {
    let profile = risk_profile::score_answers(&form.answers)?;
    state.session().ledger_mut().set_risk_score(profile.score);
    Ok(Json(RiskProfileView {
        category: profile.category,
        score: profile.score,
        title: profile.category.title(),
        description: profile.category.description(),
    }))
}

pub async fn learning_catalog() -> Json<&'static [LearningModule]> {
    Json(learning::catalog())
}

pub async fn learning_module(
    Path(slug): Path<String>,
) -> Result<Json<&'static LearningModule>, WebError> {
    Ok(Json(learning::find_module(&slug)?))
}

#[derive(Debug, Serialize)]
pub struct QuizView {
    pub questions: Vec<QuizQuestion>,
}

pub async fn module_quiz(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<QuizView>, WebError> {
    let module = learning::find_module(&slug)?;
    let response = state
        .generation
        .generate(GenerationRequest::QuizGeneration {
            topic_title: module.title.to_string(),
            topic_content: module.content.to_string(),
        })
        .await?;
    match response {
        GenerationResponse::Quiz { questions } => {
            Ok(Json(QuizView { questions }))
        }
        _ => Err(mismatched_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
}

pub async fn chat_transcript(State(state): State<Arc<AppState>>) -> Json<Vec<ChatMessage>> {
    Json(state.session().chat_transcript().to_vec())
}

/// Forward an investor query to the generation service. The learner's
/// message lands in the transcript before the call so a failed request
/// still shows what was asked; the mutex is never held across the await.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ChatForm>,
) -> Result<Json<ChatReply>, WebError> {
    if form.query.trim().is_empty() {
        return Err(WebError::bad_request("query must not be empty"));
    }
    state
        .session()
        .record_chat(ChatRole::Learner, form.query.clone());

    let response = state
        .generation
        .generate(GenerationRequest::Chat {
            query: form.query,
        })
        .await?;
    match response {
        GenerationResponse::Chat { response } => {
            state
                .session()
                .record_chat(ChatRole::Assistant, response.clone());
            Ok(Json(ChatReply { response }))
        }
        _ => Err(mismatched_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub document_text: String,
    #[serde(default)]
    pub image_data_uri: Option<String>,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeReply {
    pub answer: String,
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(form): Json<AnalyzeForm>,
) -> Result<Json<AnalyzeReply>, WebError> {
    let response = state
        .generation
        .generate(
            GenerationRequest::DocumentAnalysis {
                document_text: form.document_text,
                image_data_uri: form.image_data_uri,
                question: form.question,
            },
        )
        .await?;
    match response {
        GenerationResponse::DocumentAnalysis { answer } => {
            Ok(Json(AnalyzeReply { answer }))
        }
        _ => Err(mismatched_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct SummarizeForm {
    pub text: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeReply {
    pub translated_text: String,
    pub summary: String,
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SummarizeForm>,
) -> Result<Json<SummarizeReply>, WebError> {
    let response = state
        .generation
        .generate(
            GenerationRequest::TranslateSummarize {
                text: form.text,
                language: form.language,
            },
        )
        .await?;
    match response {
        GenerationResponse::TranslateSummarize {
            translated_text,
            summary,
        } => Ok(Json(SummarizeReply {
            translated_text,
            summary,
        })),
        _ => Err(mismatched_response()),
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionsReply {
    pub suggestions: Vec<String>,
}

/// Personalized suggestions from a consistent ledger snapshot. Read-only
/// with respect to the session: the response never feeds back into state.
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuggestionsReply>, WebError> {
    let snapshot = state.session().snapshot();
    let response = state
        .generation
        .generate(GenerationRequest::Suggestions {
            risk_category: snapshot.risk_category,
            holdings: snapshot.holdings.iter().map(Into::into).collect(),
        })
        .await?;
    match response {
        GenerationResponse::Suggestions { suggestions } => {
            Ok(Json(SuggestionsReply { suggestions }))
        }
        _ => Err(mismatched_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct SpeakForm {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SpeakReply {
    pub mime_type: String,
    pub data_uri: String,
}

pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SpeakForm>,
) -> Result<Json<SpeakReply>, WebError> {
    let audio = state.speech.synthesize(&form.text).await?;
    Ok(Json(SpeakReply {
        data_uri: audio.data_uri(),
        mime_type: audio.mime_type,
    }))
}

fn mismatched_response() -> WebError {
    SaathiError::GenerationFailed {
        reason: "service returned a response of the wrong shape".into(),
    }
    .into()
}
