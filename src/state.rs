use std::sync::Arc;

use tracing::{info, warn};

use crate::asr::{SpeechRecognizer, SpeechTranscriber};
use crate::codegen::{CodeGenerator, ServiceCodeGenerator};
use crate::config::Config;
use crate::inference::InferenceServiceClient;
use crate::translate::{ServiceTranslator, Translator};

/// Process-wide registry of the model clients. Everything here is built
/// once at startup and shared read-only across handlers; no per-request
/// model or pipeline reconstruction.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub inference: Arc<InferenceServiceClient>,
    pub translator: Arc<dyn Translator>,
    pub code_generator: Arc<dyn CodeGenerator>,
    pub transcriber: Arc<SpeechTranscriber>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let inference = Arc::new(InferenceServiceClient::new(
            config.system.inference_url.clone(),
        ));

        // Probe, but do not require, the sidecar: the server can come up
        // before the models finish loading.
        match inference.health_check().await {
            Ok(true) => info!("inference service is up"),
            Ok(false) => warn!("inference service reported unhealthy"),
            Err(e) => warn!(error = %e, "inference service not reachable yet"),
        }

        let translator = Arc::new(ServiceTranslator::new(
            inference.clone(),
            config.models.translation_model.clone(),
        ));
        let code_generator = Arc::new(ServiceCodeGenerator::new(
            inference.clone(),
            config.models.clone(),
        ));
        let recognizer: Arc<dyn SpeechRecognizer> = inference.clone();
        let transcriber = Arc::new(SpeechTranscriber::new(&config.asr, recognizer));

        Ok(Self {
            config,
            inference,
            translator,
            code_generator,
            transcriber,
        })
    }
}
