//! Gemini HTTP adapter for the generation and speech ports.
//!
//! Talks to the `generateContent` REST endpoint. Structured use cases
//! (suggestions, translation, quiz) ask the model for a JSON object and
//! parse it; the model sometimes wraps JSON in a markdown code fence, so the
//! parser tolerates that.

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::error::SaathiError;
use crate::domain::learning::QuizQuestion;
use crate::ports::config_port::ConfigPort;
use crate::ports::generation_port::{
    GenerationPort, GenerationRequest, GenerationResponse, HoldingSnapshotInput,
};
use crate::ports::speech_port::{AudioRef, SpeechPort};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

pub struct GeminiAdapter {
    client: reqwest::Client,
    api_key: String,
    model: String,
    tts_model: String,
    base_url: String,
}

impl GeminiAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SaathiError> {
        let api_key = config
            .get_string("generation", "api_key")
            .ok_or_else(|| SaathiError::ConfigMissing {
                section: "generation".into(),
                key: "api_key".into(),
            })?;
        Ok(GeminiAdapter {
            client: reqwest::Client::new(),
            api_key,
            model: config
                .get_string("generation", "model")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            tts_model: config
                .get_string("generation", "tts_model")
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            base_url: config
                .get_string("generation", "base_url")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    async fn call_model(&self, model: &str, body: Value) -> Result<Value, SaathiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!("generation request to {model}");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SaathiError::GenerationFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("generation call returned {status}");
            return Err(SaathiError::GenerationFailed {
                reason: format!("service returned {status}"),
            });
        }
        response
            .json()
            .await
            .map_err(|e| SaathiError::GenerationFailed {
                reason: e.to_string(),
            })
    }

    async fn generate_text(&self, parts: Vec<Value>) -> Result<String, SaathiError> {
        let body = json!({ "contents": [{ "parts": parts }] });
        let response = self.call_model(&self.model, body).await?;
        first_text(&response).ok_or_else(|| SaathiError::GenerationFailed {
            reason: "response contained no text".into(),
        })
    }

    async fn generate_json<T: for<'de> Deserialize<'de>>(
        &self,
        parts: Vec<Value>,
    ) -> Result<T, SaathiError> {
        let text = self.generate_text(parts).await?;
        serde_json::from_str(strip_code_fence(&text)).map_err(|e| SaathiError::GenerationFailed {
            reason: format!("malformed structured response: {e}"),
        })
    }
}

#[async_trait]
impl GenerationPort for GeminiAdapter {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, SaathiError> {
        match request {
            GenerationRequest::Chat { query } => {
                let response = self.generate_text(vec![text_part(&chat_prompt(&query))]).await?;
                Ok(GenerationResponse::Chat { response })
            }
            GenerationRequest::DocumentAnalysis {
                document_text,
                image_data_uri,
                question,
            } => {
                let mut parts = vec![text_part(&analysis_prompt(&document_text, &question))];
                if let Some(uri) = image_data_uri.as_deref() {
                    let (mime_type, data) =
                        parse_data_uri(uri).ok_or_else(|| SaathiError::GenerationFailed {
                            reason: "image is not a base64 data URI".into(),
                        })?;
                    parts.push(json!({
                        "inline_data": { "mime_type": mime_type, "data": data }
                    }));
                }
                let answer = self.generate_text(parts).await?;
                Ok(GenerationResponse::DocumentAnalysis { answer })
            }
            GenerationRequest::Suggestions {
                risk_category,
                holdings,
            } => {
                let prompt = suggestions_prompt(&risk_category.to_string(), &holdings);
                let payload: SuggestionsPayload =
                    self.generate_json(vec![text_part(&prompt)]).await?;
                Ok(GenerationResponse::Suggestions {
                    suggestions: payload.suggestions,
                })
            }
            GenerationRequest::TranslateSummarize { text, language } => {
                let payload: TranslationPayload = self
                    .generate_json(vec![text_part(&translate_prompt(&text, &language))])
                    .await?;
                Ok(GenerationResponse::TranslateSummarize {
                    translated_text: payload.translated_text,
                    summary: payload.summary,
                })
            }
            GenerationRequest::QuizGeneration {
                topic_title,
                topic_content,
            } => {
                let payload: QuizPayload = self
                    .generate_json(vec![text_part(&quiz_prompt(&topic_title, &topic_content))])
                    .await?;
                Ok(GenerationResponse::Quiz {
                    questions: payload.questions,
                })
            }
        }
    }
}

#[async_trait]
impl SpeechPort for GeminiAdapter {
    async fn synthesize(&self, text: &str) -> Result<AudioRef, SaathiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": { "responseModalities": ["AUDIO"] }
        });
        let response = self
            .call_model(&self.tts_model, body)
            .await
            .map_err(|e| SaathiError::SynthesisFailed {
                reason: e.to_string(),
            })?;
        first_inline_data(&response)
            .map(|(mime_type, data)| AudioRef {
                mime_type,
                base64_data: data,
            })
            .ok_or_else(|| SaathiError::SynthesisFailed {
                reason: "response contained no audio".into(),
            })
    }
}

#[derive(Deserialize)]
struct SuggestionsPayload {
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct TranslationPayload {
    translated_text: String,
    summary: String,
}

#[derive(Deserialize)]
struct QuizPayload {
    questions: Vec<QuizQuestion>,
}

fn text_part(text: &str) -> Value {
    json!({ "text": text })
}

fn chat_prompt(query: &str) -> String {
    format!(
        "You are Nivesh Saathi, an expert AI financial advisor specializing in the stock \
         market and investments. Answer the user's query clearly and accurately in the \
         language it was asked in. If asked for a prediction, you may give a probabilistic \
         view but must add a disclaimer that this is educational, not financial advice.\n\n\
         User Query: {query}"
    )
}

fn analysis_prompt(document_text: &str, question: &str) -> String {
    format!(
        "You are an expert financial analyst. Answer the user's question based only on \
         the provided document content and supporting image, without outside knowledge. \
         If the answer cannot be found in the provided materials, say so clearly.\n\n\
         User's Question:\n\"{question}\"\n\nDocument Content:\n---\n{document_text}\n---"
    )
}

fn suggestions_prompt(risk_category: &str, holdings: &[HoldingSnapshotInput]) -> String {
    let mut prompt = format!(
        "You are a personalized financial advisor AI. Based on the user's risk profile \
         and portfolio below, provide 3-5 clear, concise suggestions about risks, \
         diversification opportunities, or relevant market observations.\n\n\
         User's Risk Profile: {risk_category}\n\nUser's Portfolio:\n"
    );
    if holdings.is_empty() {
        prompt.push_str("- (no holdings yet)\n");
    }
    for h in holdings {
        prompt.push_str(&format!(
            "- {}: {} shares, average price Rs {:.2}, current price Rs {:.2}\n",
            h.symbol, h.shares, h.avg_price, h.current_price
        ));
    }
    prompt.push_str(
        "\nRespond with only a JSON object: {\"suggestions\": [\"...\", \"...\"]}",
    );
    prompt
}

fn translate_prompt(text: &str, language: &str) -> String {
    format!(
        "Translate the following financial text into {language} and summarize the \
         translation in {language}.\n\nText: {text}\n\nRespond with only a JSON object: \
         {{\"translated_text\": \"...\", \"summary\": \"...\"}}"
    )
}

fn quiz_prompt(topic_title: &str, topic_content: &str) -> String {
    format!(
        "You are an expert in creating educational content for finance. Generate a single \
         high-quality multiple-choice question testing a key concept from the topic below. \
         Provide exactly four options, one of which is the correct answer, and optionally \
         a short practical scenario for context.\n\nTopic Title: {topic_title}\n\
         Topic Content:\n{topic_content}\n\nRespond with only a JSON object: \
         {{\"questions\": [{{\"question\": \"...\", \"options\": [\"...\", \"...\", \
         \"...\", \"...\"], \"correct_answer\": \"...\", \"scenario\": \"...\"}}]}}"
    )
}

/// First text part of the first candidate, if any.
fn first_text(response: &Value) -> Option<String> {
    response["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .find_map(|part| part["text"].as_str())
        .map(str::to_string)
}

/// First inline-data part (mime type, base64 payload) of the first candidate.
fn first_inline_data(response: &Value) -> Option<(String, String)> {
    response["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .find_map(|part| {
            let inline = part.get("inlineData").or_else(|| part.get("inline_data"))?;
            Some((
                inline.get("mimeType").or_else(|| inline.get("mime_type"))?.as_str()?.to_string(),
                inline["data"].as_str()?.to_string(),
            ))
        })
}

/// Drop a surrounding ```json ... ``` fence when present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Split `data:<mime>;base64,<payload>` into its parts.
fn parse_data_uri(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime_type, payload) = rest.split_once(";base64,")?;
    if mime_type.is_empty() || payload.is_empty() {
        return None;
    }
    Some((mime_type.to_string(), payload.to_string()))
}
