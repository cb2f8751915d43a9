//! Canned offline adapter: a deterministic stand-in for the generation and
//! speech services, used by `--offline` runs and by tests.

use async_trait::async_trait;

use crate::domain::error::SaathiError;
use crate::domain::learning::QuizQuestion;
use crate::ports::generation_port::{GenerationPort, GenerationRequest, GenerationResponse};
use crate::ports::speech_port::{AudioRef, SpeechPort};

// 44-byte RIFF header of an empty PCM WAV, enough for a playable reference.
const SILENT_WAV_BASE64: &str =
    "UklGRiQAAABXQVZFZm10IBAAAAABAAEAQB8AAIA+AAACABAAZGF0YQAAAAA=";

#[derive(Debug, Default)]
pub struct CannedGenerationAdapter;

#[derive(Debug, Default)]
pub struct CannedSpeechAdapter;

#[async_trait]
impl GenerationPort for CannedGenerationAdapter {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, SaathiError> {
        match request {
            GenerationRequest::Chat { query } => Ok(GenerationResponse::Chat {
                response: format!(
                    "[offline] I can't reach the advisor service right now, but here is a \
                     starting point on \"{query}\": begin with the learning modules on \
                     basics and diversification."
                ),
            }),
            GenerationRequest::DocumentAnalysis { question, .. } => {
                Ok(GenerationResponse::DocumentAnalysis {
                    answer: format!(
                        "[offline] Document analysis is unavailable without the generation \
                         service; the question was: {question}"
                    ),
                })
            }
            GenerationRequest::Suggestions {
                risk_category,
                holdings,
            } => {
                let mut suggestions = vec![format!(
                    "Your profile is {risk_category}; keep your allocation aligned with it."
                )];
                if holdings.is_empty() {
                    suggestions.push(
                        "Your arena portfolio is empty; try a small first trade to see how \
                         valuation metrics react."
                            .to_string(),
                    );
                } else {
                    for h in &holdings {
                        suggestions.push(format!(
                            "Review {}: {} shares at an average of Rs {:.2} versus Rs {:.2} now.",
                            h.symbol, h.shares, h.avg_price, h.current_price
                        ));
                    }
                }
                suggestions
                    .push("Diversify across sectors rather than adding to one stock.".to_string());
                Ok(GenerationResponse::Suggestions { suggestions })
            }
            GenerationRequest::TranslateSummarize { text, language } => {
                Ok(GenerationResponse::TranslateSummarize {
                    translated_text: format!("[offline, {language}] {text}"),
                    summary: format!(
                        "[offline] Summary unavailable; original text was {} characters.",
                        text.chars().count()
                    ),
                })
            }
            GenerationRequest::QuizGeneration { topic_title, .. } => {
                Ok(GenerationResponse::Quiz {
                    questions: vec![QuizQuestion {
                        question: format!(
                            "Which statement best matches the key idea of \"{topic_title}\"?"
                        ),
                        options: vec![
                            "The idea described in the module text".to_string(),
                            "Guaranteed returns without risk".to_string(),
                            "Prices only ever move upward".to_string(),
                            "Diversification increases concentration".to_string(),
                        ],
                        correct_answer: "The idea described in the module text".to_string(),
                        scenario: None,
                    }],
                })
            }
        }
    }
}

#[async_trait]
impl SpeechPort for CannedSpeechAdapter {
    async fn synthesize(&self, _text: &str) -> Result<AudioRef, SaathiError> {
        Ok(AudioRef {
            mime_type: "audio/wav".to_string(),
            base64_data: SILENT_WAV_BASE64.to_string(),
        })
    }
}
