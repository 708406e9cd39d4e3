use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::interface::CodeGenerator;
use crate::config::ModelConfig;
use crate::error::AppError;
use crate::inference::{GenerateRequest, InferenceServiceClient};

/// Code generator bound to a fixed sequence-to-sequence model with fixed
/// decoding hyperparameters. Sampling is stochastic, so repeated calls with
/// the same input may return different code.
pub struct ServiceCodeGenerator {
    inference: Arc<InferenceServiceClient>,
    models: ModelConfig,
}

impl ServiceCodeGenerator {
    pub fn new(inference: Arc<InferenceServiceClient>, models: ModelConfig) -> Self {
        info!(
            model = %models.codegen_model,
            top_p = models.top_p,
            top_k = models.top_k,
            repetition_penalty = models.repetition_penalty,
            "initialized code generator"
        );
        Self { inference, models }
    }

    fn build_request(&self, english_text: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.models.codegen_model.clone(),
            inputs: format!("{}{}", self.models.prefix, english_text),
            max_input_length: self.models.max_input_length,
            max_length: self.models.max_target_length,
            top_p: self.models.top_p,
            top_k: self.models.top_k,
            repetition_penalty: self.models.repetition_penalty,
            num_return_sequences: self.models.num_return_sequences,
            skip_special_tokens: true,
        }
    }
}

#[async_trait]
impl CodeGenerator for ServiceCodeGenerator {
    async fn generate(&self, english_text: &str) -> Result<String, AppError> {
        let request = self.build_request(english_text);
        debug!(inputs = %request.inputs, "requesting code generation");
        let response = self
            .inference
            .generate(request)
            .await
            .map_err(|e| AppError::ModelUnavailable(e.to_string()))?;

        if !response.success {
            let detail = response
                .error
                .unwrap_or_else(|| "generation failed".to_string());
            return Err(AppError::ModelUnavailable(detail));
        }
        response
            .sequences
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ModelUnavailable("no generated sequence".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> ServiceCodeGenerator {
        ServiceCodeGenerator::new(
            Arc::new(InferenceServiceClient::new("http://localhost:0".to_string())),
            ModelConfig::default(),
        )
    }

    #[test]
    fn request_prepends_the_instruction_prefix() {
        let request = generator().build_request("reverse a linked list");
        assert_eq!(request.inputs, "Generate Python: reverse a linked list");
    }

    #[test]
    fn request_carries_the_fixed_decoding_parameters() {
        let request = generator().build_request("x");
        assert_eq!(request.model, "Salesforce/codet5-base");
        assert_eq!(request.max_input_length, 48);
        assert_eq!(request.max_length, 128);
        assert_eq!(request.top_p, 0.95);
        assert_eq!(request.top_k, 50);
        assert_eq!(request.repetition_penalty, 2.0);
        assert_eq!(request.num_return_sequences, 1);
        assert!(request.skip_special_tokens);
    }
}
