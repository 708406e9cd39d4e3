use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::interface::Translator;
use crate::error::AppError;
use crate::inference::{InferenceServiceClient, TranslateRequest};

/// Translator bound to a fixed pretrained model on the inference service.
/// Constructed once at startup and shared across requests.
pub struct ServiceTranslator {
    inference: Arc<InferenceServiceClient>,
    model: String,
}

impl ServiceTranslator {
    pub fn new(inference: Arc<InferenceServiceClient>, model: String) -> Self {
        info!(model = %model, "initialized translator");
        Self { inference, model }
    }
}

#[async_trait]
impl Translator for ServiceTranslator {
    async fn translate(&self, text: &str) -> Result<String, AppError> {
        let request = TranslateRequest {
            model: self.model.clone(),
            text: text.to_string(),
            truncation: true,
        };
        let response = self
            .inference
            .translate(request)
            .await
            .map_err(|e| AppError::ModelUnavailable(e.to_string()))?;

        if !response.success {
            let detail = response
                .error
                .unwrap_or_else(|| "translation failed".to_string());
            return Err(AppError::ModelUnavailable(detail));
        }
        let best = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ModelUnavailable("no translation candidate".to_string()))?;

        let translated = cleanup_spaces(&best.translation_text);
        debug!(original = %text, translated = %translated, "translated query");
        Ok(translated)
    }
}

/// Collapses tokenizer whitespace artifacts into single spaces.
fn cleanup_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_collapses_runs_and_trims() {
        assert_eq!(
            cleanup_spaces("  Function that  divides\nby even numbers "),
            "Function that divides by even numbers"
        );
    }

    #[test]
    fn cleanup_leaves_clean_text_alone() {
        assert_eq!(cleanup_spaces("already clean"), "already clean");
    }
}
