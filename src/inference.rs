use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::asr::{RecognizeRequest, RecognizeResponse, SpeechRecognizer};

/// Client for the inference sidecar hosting the pretrained translation,
/// text-to-code and speech-recognition models.
#[derive(Debug, Clone)]
pub struct InferenceServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub model: String,
    pub text: String,
    /// Truncate inputs that exceed the translation model's context.
    pub truncation: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslationCandidate {
    pub translation_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    /// Candidates in descending model score; the first is the best.
    pub candidates: Vec<TranslationCandidate>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    /// Prefixed input text; the sidecar pads or truncates the encoding
    /// to `max_input_length` tokens.
    pub inputs: String,
    pub max_input_length: usize,
    pub max_length: usize,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub num_return_sequences: u32,
    pub skip_special_tokens: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub sequences: Vec<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl InferenceServiceClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse> {
        let url = format!("{}/translate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        let result: TranslateResponse = response.json().await?;
        Ok(result)
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/generate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        let result: GenerateResponse = response.json().await?;
        Ok(result)
    }

    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl SpeechRecognizer for InferenceServiceClient {
    async fn recognize(&self, request: RecognizeRequest) -> Result<RecognizeResponse> {
        let url = format!("{}/asr/recognize", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        let result: RecognizeResponse = response.json().await?;
        Ok(result)
    }
}
