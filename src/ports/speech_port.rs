//! Text-to-speech port trait.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::error::SaathiError;

/// A playable audio reference: mime type plus base64-encoded payload, ready
/// to hand to a client as a data URI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioRef {
    pub mime_type: String,
    pub base64_data: String,
}

impl AudioRef {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

#[async_trait]
pub trait SpeechPort {
    async fn synthesize(&self, text: &str) -> Result<AudioRef, SaathiError>;
}
