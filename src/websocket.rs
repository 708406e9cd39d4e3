use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::asr::SpeechTranscriber;
use crate::error::AppError;
use crate::language::Language;
use crate::state::AppState;

/// Transcription channel endpoints. Each connection walks one pass of
/// `Opened -> AwaitingSignal -> Listening -> Responded -> Closed`; the
/// close happens on every exit path, early disconnects included.

pub async fn listen_spanish(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_listen_socket(socket, state, Language::Spanish))
}

pub async fn listen_english(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_listen_socket(socket, state, Language::English))
}

async fn handle_listen_socket(socket: WebSocket, state: AppState, language: Language) {
    let session_uid = Uuid::new_v4().to_string();
    info!(%session_uid, %language, "listen channel opened");

    let mut channel = SocketChannel { socket };
    serve_listen_channel(&mut channel, &state.transcriber, language, &session_uid).await;
}

/// Runs the session and then closes the channel, whatever the session
/// produced.
async fn serve_listen_channel<C: ListenChannel + Send>(
    channel: &mut C,
    transcriber: &SpeechTranscriber,
    language: Language,
    session_uid: &str,
) {
    match run_listen_session(channel, transcriber, language).await {
        Ok(()) => info!(%session_uid, "listen session completed"),
        Err(e) => warn!(%session_uid, error = %e, "listen session aborted"),
    }
    if let Err(e) = channel.close().await {
        debug!(%session_uid, error = %e, "close after session failed");
    }
    info!(%session_uid, "listen channel closed");
}

/// The channel protocol proper: one readiness payload in, a status text
/// and a result text out. Transcription sentinels travel as the result
/// text; only peer failures abort the session.
async fn run_listen_session<C: ListenChannel + Send>(
    channel: &mut C,
    transcriber: &SpeechTranscriber,
    language: Language,
) -> Result<(), AppError> {
    channel.recv_signal().await?;
    channel.send_text(listen_prompt(language).to_string()).await?;

    let result = transcriber.transcribe(language.recognition_tag()).await;
    channel.send_text(result.into_message()).await?;
    Ok(())
}

/// Status message telling the caller to start speaking, in the channel's
/// own language.
fn listen_prompt(language: Language) -> &'static str {
    match language {
        Language::Spanish => "Por favor empieza a hablar lo que quieres transcribir...",
        Language::English => "Please start talking what you want to transcribe...",
    }
}

/// Minimal IO seam so the session protocol is testable without a socket.
#[async_trait]
pub(crate) trait ListenChannel {
    /// Blocks until the peer sends its readiness payload. The payload's
    /// content is ignored.
    async fn recv_signal(&mut self) -> Result<(), AppError>;
    async fn send_text(&mut self, text: String) -> Result<(), AppError>;
    async fn close(&mut self) -> Result<(), AppError>;
}

struct SocketChannel {
    socket: WebSocket,
}

#[async_trait]
impl ListenChannel for SocketChannel {
    async fn recv_signal(&mut self) -> Result<(), AppError> {
        match self.socket.recv().await {
            Some(Ok(Message::Close(_))) | None => Err(AppError::ChannelProtocol(
                "peer closed before signaling readiness".to_string(),
            )),
            Some(Ok(_)) => Ok(()),
            Some(Err(e)) => Err(AppError::ChannelProtocol(e.to_string())),
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), AppError> {
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|e| AppError::ChannelProtocol(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), AppError> {
        self.socket
            .send(Message::Close(None))
            .await
            .map_err(|e| AppError::ChannelProtocol(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;

    use super::*;
    use crate::asr::{RecognizeRequest, RecognizeResponse, SpeechRecognizer};
    use crate::config::AsrConfig;

    struct StubRecognizer;

    #[async_trait]
    impl SpeechRecognizer for StubRecognizer {
        async fn recognize(&self, _request: RecognizeRequest) -> Result<RecognizeResponse> {
            Ok(RecognizeResponse {
                text: "hola".to_string(),
                success: true,
                error: None,
            })
        }
    }

    fn transcriber() -> SpeechTranscriber {
        // Short timeout keeps device-less test environments fast: capture
        // fails or times out and the session reports a sentinel text.
        let config = AsrConfig {
            listen_timeout_secs: 1,
            calibration_millis: 10,
            ..AsrConfig::default()
        };
        SpeechTranscriber::new(&config, Arc::new(StubRecognizer))
    }

    /// Channel double that records the conversation and counts closes.
    struct ScriptedChannel {
        signal: Option<Result<(), AppError>>,
        fail_sends: bool,
        sent: Vec<String>,
        closed: usize,
    }

    impl ScriptedChannel {
        fn ready() -> Self {
            Self {
                signal: Some(Ok(())),
                fail_sends: false,
                sent: Vec::new(),
                closed: 0,
            }
        }

        fn disconnected() -> Self {
            Self {
                signal: Some(Err(AppError::ChannelProtocol(
                    "peer closed before signaling readiness".to_string(),
                ))),
                fail_sends: false,
                sent: Vec::new(),
                closed: 0,
            }
        }
    }

    #[async_trait]
    impl ListenChannel for ScriptedChannel {
        async fn recv_signal(&mut self) -> Result<(), AppError> {
            self.signal.take().expect("signal consumed twice")
        }

        async fn send_text(&mut self, text: String) -> Result<(), AppError> {
            if self.fail_sends {
                return Err(AppError::ChannelProtocol("send failed".to_string()));
            }
            self.sent.push(text);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), AppError> {
            self.closed += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn session_sends_status_then_result_then_closes_once() {
        let transcriber = transcriber();
        let mut channel = ScriptedChannel::ready();

        serve_listen_channel(&mut channel, &transcriber, Language::English, "test").await;

        assert_eq!(channel.sent.len(), 2);
        assert_eq!(
            channel.sent[0],
            "Please start talking what you want to transcribe..."
        );
        assert!(!channel.sent[1].is_empty());
        assert_eq!(channel.closed, 1);
    }

    #[tokio::test]
    async fn spanish_channel_prompts_in_spanish() {
        let transcriber = transcriber();
        let mut channel = ScriptedChannel::ready();

        serve_listen_channel(&mut channel, &transcriber, Language::Spanish, "test").await;

        assert_eq!(
            channel.sent[0],
            "Por favor empieza a hablar lo que quieres transcribir..."
        );
        assert_eq!(channel.closed, 1);
    }

    #[tokio::test]
    async fn early_disconnect_still_closes_exactly_once() {
        let transcriber = transcriber();
        let mut channel = ScriptedChannel::disconnected();

        serve_listen_channel(&mut channel, &transcriber, Language::English, "test").await;

        assert!(channel.sent.is_empty());
        assert_eq!(channel.closed, 1);
    }

    #[tokio::test]
    async fn send_failure_still_closes_exactly_once() {
        let transcriber = transcriber();
        let mut channel = ScriptedChannel::ready();
        channel.fail_sends = true;

        serve_listen_channel(&mut channel, &transcriber, Language::English, "test").await;

        assert!(channel.sent.is_empty());
        assert_eq!(channel.closed, 1);
    }
}
