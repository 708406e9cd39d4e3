use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::interface::{RecognizeRequest, RecognizeResponse, SpeechRecognizer};
use super::microphone::Microphone;
use crate::config::AsrConfig;
use crate::language::Language;

/// Outcome of one transcription attempt. Sentinels are ordinary values the
/// caller can show and retry on; none of them tears down the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionResult {
    Text(String),
    LanguageNotRecognized,
    Unrecognized,
    BackendError(String),
}

impl TranscriptionResult {
    /// Message sent back to the caller over a listen channel.
    pub fn into_message(self) -> String {
        match self {
            TranscriptionResult::Text(text) => text,
            TranscriptionResult::LanguageNotRecognized => {
                "Language not recognized in database".to_string()
            }
            TranscriptionResult::Unrecognized => "Audio was not recognized. Try again.".to_string(),
            TranscriptionResult::BackendError(detail) => format!("Request Error: {}", detail),
        }
    }

    fn from_response(response: RecognizeResponse) -> Self {
        if !response.success {
            return match response.error {
                Some(detail) => TranscriptionResult::BackendError(detail),
                None => TranscriptionResult::Unrecognized,
            };
        }
        let text = response.text.trim().to_string();
        if text.is_empty() {
            TranscriptionResult::Unrecognized
        } else {
            TranscriptionResult::Text(text)
        }
    }
}

/// Captures one utterance from the microphone and sends it to the
/// recognition backend. The microphone is a single physical resource, so
/// concurrent transcriptions serialize on the mutex.
pub struct SpeechTranscriber {
    microphone: Mutex<Microphone>,
    recognizer: Arc<dyn SpeechRecognizer>,
    listen_timeout: Duration,
}

impl SpeechTranscriber {
    pub fn new(config: &AsrConfig, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            microphone: Mutex::new(Microphone::new(config)),
            recognizer,
            listen_timeout: Duration::from_secs(config.listen_timeout_secs),
        }
    }

    /// Unknown tags are answered immediately, without touching the
    /// microphone or the backend.
    pub async fn transcribe(&self, language_tag: &str) -> TranscriptionResult {
        if Language::from_recognition_tag(language_tag).is_none() {
            warn!(language_tag, "transcription requested for unknown language");
            return TranscriptionResult::LanguageNotRecognized;
        }

        let captured = {
            let guard = self.microphone.lock().await;
            info!(language_tag, "listening on microphone");
            let microphone = guard.clone();
            let timeout = self.listen_timeout;
            tokio::task::spawn_blocking(move || microphone.listen(timeout)).await
        };
        let audio = match captured {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => {
                warn!(error = %e, "microphone capture failed");
                return TranscriptionResult::BackendError(e.to_string());
            }
            Err(e) => {
                warn!(error = %e, "microphone capture task failed");
                return TranscriptionResult::BackendError(e.to_string());
            }
        };

        debug!(
            samples = audio.samples.len(),
            sample_rate = audio.sample_rate,
            "sending audio to recognition backend"
        );
        let request = RecognizeRequest {
            audio_data: audio.samples,
            sample_rate: audio.sample_rate,
            language: language_tag.to_string(),
        };
        match self.recognizer.recognize(request).await {
            Ok(response) => TranscriptionResult::from_response(response),
            Err(e) => {
                warn!(error = %e, "recognition backend request failed");
                TranscriptionResult::BackendError(e.to_string())
            }
        }
    }
}
