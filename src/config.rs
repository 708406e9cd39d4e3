use std::fs;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub system: SystemConfig,
    pub models: ModelConfig,
    pub asr: AsrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the inference sidecar hosting the translation,
    /// text-to-code and speech-recognition models.
    pub inference_url: String,
    pub frontend_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            inference_url: "http://localhost:8000".to_string(),
            frontend_dir: "frontend".to_string(),
        }
    }
}

/// Immutable model identifiers and decoding parameters. Loaded once at
/// startup and shared read-only for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub translation_model: String,
    pub codegen_model: String,
    /// Instruction prefix prepended to every generation input.
    pub prefix: String,
    /// Inputs are padded or truncated to this many tokens before decoding.
    pub max_input_length: usize,
    pub max_target_length: usize,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub num_return_sequences: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            translation_model: "Helsinki-NLP/opus-mt-es-en".to_string(),
            codegen_model: "Salesforce/codet5-base".to_string(),
            prefix: "Generate Python: ".to_string(),
            max_input_length: 48,
            max_target_length: 128,
            top_p: 0.95,
            top_k: 50,
            repetition_penalty: 2.0,
            num_return_sequences: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsrConfig {
    /// Upper bound on a single listen, calibration included.
    pub listen_timeout_secs: u64,
    /// How long to sample ambient noise before recording starts.
    pub calibration_millis: u64,
    /// Recording stops after this much sustained silence follows speech.
    pub silence_hang_millis: u64,
    /// Silence threshold as a multiple of the calibrated ambient level.
    pub silence_factor: f32,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            listen_timeout_secs: 30,
            calibration_millis: 1000,
            silence_hang_millis: 800,
            silence_factor: 1.5,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        if path.to_lowercase().ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_model_card() {
        let config = Config::default();
        assert_eq!(config.models.translation_model, "Helsinki-NLP/opus-mt-es-en");
        assert_eq!(config.models.codegen_model, "Salesforce/codet5-base");
        assert_eq!(config.models.prefix, "Generate Python: ");
        assert_eq!(config.models.max_input_length, 48);
        assert_eq!(config.models.max_target_length, 128);
        assert_eq!(config.models.num_return_sequences, 1);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let yaml = "system:\n  port: 9090\nasr:\n  listen_timeout_secs: 5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.system.port, 9090);
        assert_eq!(config.system.host, "localhost");
        assert_eq!(config.asr.listen_timeout_secs, 5);
        assert_eq!(config.models.top_k, 50);
    }
}
