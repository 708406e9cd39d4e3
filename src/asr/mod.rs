mod interface;
mod microphone;
mod transcriber;

pub use interface::{RecognizeRequest, RecognizeResponse, SpeechRecognizer};
pub use microphone::{CapturedAudio, Microphone};
pub use transcriber::{SpeechTranscriber, TranscriptionResult};
