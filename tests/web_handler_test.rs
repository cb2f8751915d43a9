#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Market and portfolio reads against the seeded session
//! - Buy/sell round trips and the taxonomy-mapped error statuses
//! - Risk questionnaire submission writing the score into the ledger
//! - Learning catalog, module lookup, and offline quiz generation
//! - Chat transcript accumulation and the remaining requestor endpoints
//!   against the canned adapters

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use niveshsaathi::adapters::canned_adapter::{CannedGenerationAdapter, CannedSpeechAdapter};
use niveshsaathi::adapters::web::{build_router, AppState};

use common::seeded_session;

fn test_router() -> Router {
    let state = Arc::new(AppState::new(
        seeded_session(),
        Arc::new(CannedGenerationAdapter),
        Arc::new(CannedSpeechAdapter),
    ));
    build_router(state, "static")
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn market_lists_the_universe() {
    let (status, body) = get(test_router(), "/api/market").await;
    assert_eq!(status, StatusCode::OK);
    let instruments = body.as_array().unwrap();
    assert_eq!(instruments.len(), 6);
    assert!(instruments
        .iter()
        .any(|i| i["symbol"] == "RELIANCE" && i["price"].as_f64().unwrap() > 0.0));
}

#[tokio::test]
async fn portfolio_reflects_seed_state() {
    let (status, body) = get(test_router(), "/api/portfolio").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cash"].as_f64().unwrap(), 1_000_000.0);
    assert_eq!(body["holdings"].as_array().unwrap().len(), 2);
    assert_eq!(body["risk_score"], 68);
    assert_eq!(body["risk_category"], "Moderate");

    let metrics = &body["metrics"];
    let pnl = metrics["pnl"].as_f64().unwrap();
    let value = metrics["total_value"].as_f64().unwrap();
    let invested = metrics["total_investment"].as_f64().unwrap();
    assert!((value - invested - pnl).abs() < 1e-9);
}

#[tokio::test]
async fn buy_moves_cash_into_a_holding() {
    let router = test_router();
    let (status, body) = post(
        router,
        "/api/trade/buy",
        json!({"symbol": "TCS", "shares": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((body["cash"].as_f64().unwrap() - (1_000_000.0 - 3.0 * 3_805.10)).abs() < 1e-6);
    let tcs = body["holdings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["symbol"] == "TCS")
        .unwrap();
    assert_eq!(tcs["shares"], 3);
}

#[tokio::test]
async fn buy_rejections_map_to_statuses() {
    let (status, body) = post(
        test_router(),
        "/api/trade/buy",
        json!({"symbol": "TCS", "shares": 1_000_000}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("insufficient funds"));

    let (status, _) = post(
        test_router(),
        "/api/trade/buy",
        json!({"symbol": "DOGE", "shares": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        test_router(),
        "/api/trade/buy",
        json!({"symbol": "TCS", "shares": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn sell_rejections_map_to_statuses() {
    let (status, _) = post(
        test_router(),
        "/api/trade/sell",
        json!({"symbol": "TCS", "shares": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = post(
        test_router(),
        "/api/trade/sell",
        json!({"symbol": "RELIANCE", "shares": 99}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("insufficient shares"));
}

#[tokio::test]
async fn full_sale_removes_the_holding() {
    let router = test_router();
    let (status, body) = post(
        router,
        "/api/trade/sell",
        json!({"symbol": "RELIANCE", "shares": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["holdings"]
        .as_array()
        .unwrap()
        .iter()
        .any(|h| h["symbol"] == "RELIANCE"));
}

#[tokio::test]
async fn risk_flow_writes_score_into_ledger() {
    let router = test_router();

    let (status, body) = get(router.clone(), "/api/risk/questions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = post(
        router.clone(),
        "/api/risk/profile",
        json!({"answers": [1, 1, 1, 1]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Conservative");
    assert_eq!(body["score"], 35);
    assert!(body["description"].as_str().unwrap().contains("capital"));

    let (_, portfolio) = get(router, "/api/portfolio").await;
    assert_eq!(portfolio["risk_score"], 35);
}

#[tokio::test]
async fn incomplete_questionnaire_is_rejected() {
    let (status, body) = post(
        test_router(),
        "/api/risk/profile",
        json!({"answers": [1, 2]}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("incomplete questionnaire"));
}

#[tokio::test]
async fn learning_catalog_and_module_lookup() {
    let router = test_router();

    let (status, body) = get(router.clone(), "/api/learn").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().len() >= 6);

    let (status, body) = get(router.clone(), "/api/learn/mutual-funds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Mutual Funds & SIPs");

    let (status, _) = get(router, "/api/learn/crypto-101").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quiz_generation_returns_a_question() {
    let (status, body) = post(
        test_router(),
        "/api/learn/stock-market-basics/quiz",
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["options"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn chat_accumulates_a_transcript() {
    let router = test_router();

    let (status, body) = post(
        router.clone(),
        "/api/chat",
        json!({"query": "What is diversification?"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .contains("What is diversification?"));

    let (status, transcript) = get(router, "/api/chat").await;
    assert_eq!(status, StatusCode::OK);
    let messages = transcript.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "Learner");
    assert_eq!(messages[1]["role"], "Assistant");
}

#[tokio::test]
async fn empty_chat_query_is_bad_request() {
    let (status, _) = post(test_router(), "/api/chat", json!({"query": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_answers_about_a_document() {
    let (status, body) = post(
        test_router(),
        "/api/analyze",
        json!({
            "document_text": "Revenue grew 12% year over year.",
            "question": "How fast did revenue grow?"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["answer"]
        .as_str()
        .unwrap()
        .contains("How fast did revenue grow?"));
}

#[tokio::test]
async fn summarize_returns_translation_and_summary() {
    let (status, body) = post(
        test_router(),
        "/api/summarize",
        json!({"text": "Markets closed higher today.", "language": "Hindi"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["translated_text"].as_str().unwrap().contains("Hindi"));
    assert!(body["summary"].as_str().is_some());
}

#[tokio::test]
async fn suggestions_reference_the_snapshot() {
    let (status, body) = get(test_router(), "/api/suggestions").await;
    assert_eq!(status, StatusCode::OK);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(suggestions.len() >= 3);
    assert!(suggestions
        .iter()
        .any(|s| s.as_str().unwrap().contains("RELIANCE")));
}

#[tokio::test]
async fn speak_returns_a_playable_reference() {
    let (status, body) = post(
        test_router(),
        "/api/speak",
        json!({"text": "Welcome to your dashboard"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data_uri"]
        .as_str()
        .unwrap()
        .starts_with("data:audio/wav;base64,"));
}
