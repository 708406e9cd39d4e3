use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeRequest {
    pub audio_data: Vec<f32>,
    pub sample_rate: u32,
    /// Recognition tag, `en-US` or `es-ES`.
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeResponse {
    pub text: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Seam over the speech-recognition backend.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, request: RecognizeRequest) -> Result<RecognizeResponse>;
}
