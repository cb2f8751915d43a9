//! Generation service port trait.
//!
//! The external prompt-based generation service is a black box behind this
//! trait. Each use case gets its own tagged request/response variant rather
//! than a generic payload; an adapter returning the wrong variant for a
//! request is a `GenerationFailed` at the call site.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::SaathiError;
use crate::domain::learning::QuizQuestion;
use crate::domain::ledger::HoldingSnapshot;
use crate::domain::risk_profile::RiskCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationRequest {
    /// Free-text investor query.
    Chat { query: String },
    /// Question about a supplied financial document, optionally with an
    /// image of a chart or table as a data URI.
    DocumentAnalysis {
        document_text: String,
        image_data_uri: Option<String>,
        question: String,
    },
    /// Personalized portfolio suggestions from a ledger snapshot.
    Suggestions {
        risk_category: RiskCategory,
        holdings: Vec<HoldingSnapshotInput>,
    },
    /// Translate a financial text and summarize the translation.
    TranslateSummarize { text: String, language: String },
    /// Quiz question generation for a learning module.
    QuizGeneration {
        topic_title: String,
        topic_content: String,
    },
}

/// Holding fields the suggestion prompt needs, decoupled from the ledger's
/// own snapshot type so the wire shape is explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingSnapshotInput {
    pub symbol: String,
    pub shares: u32,
    pub avg_price: f64,
    pub current_price: f64,
}

impl From<&HoldingSnapshot> for HoldingSnapshotInput {
    fn from(h: &HoldingSnapshot) -> Self {
        HoldingSnapshotInput {
            symbol: h.symbol.clone(),
            shares: h.shares,
            avg_price: h.avg_price,
            current_price: h.current_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationResponse {
    Chat { response: String },
    DocumentAnalysis { answer: String },
    Suggestions { suggestions: Vec<String> },
    TranslateSummarize { translated_text: String, summary: String },
    Quiz { questions: Vec<QuizQuestion> },
}

#[async_trait]
pub trait GenerationPort {
    async fn generate(&self, request: GenerationRequest)
        -> Result<GenerationResponse, SaathiError>;
}
