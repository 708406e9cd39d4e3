use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tracing::{debug, warn};

use crate::config::AsrConfig;

/// Normalized samples never dip below this threshold, however quiet the room.
const MIN_SILENCE_THRESHOLD: f32 = 0.01;

/// How long a single receive waits before re-checking the listen deadline.
const RECV_TICK: Duration = Duration::from_millis(200);

/// Capture settings for the default input device. The physical device is
/// only held for the duration of a `listen` call.
#[derive(Debug, Clone)]
pub struct Microphone {
    calibration: Duration,
    silence_hang: Duration,
    silence_factor: f32,
}

#[derive(Debug, Clone)]
pub struct CapturedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Microphone {
    pub fn new(config: &AsrConfig) -> Self {
        Self {
            calibration: Duration::from_millis(config.calibration_millis),
            silence_hang: Duration::from_millis(config.silence_hang_millis),
            silence_factor: config.silence_factor,
        }
    }

    /// Blocking capture of one utterance: calibrate against ambient noise,
    /// then record until sustained silence follows speech. The deadline
    /// covers both phases; hitting it before any speech is an error.
    pub fn listen(&self, timeout: Duration) -> Result<CapturedAudio> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .context("no default input device available")?;
        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.config().channels as usize;
        debug!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate, channels, "opening input stream"
        );

        let (tx, rx) = mpsc::channel::<Vec<f32>>();
        let err_fn = |err| warn!("input stream error: {}", err);
        let stream = match supported.sample_format() {
            SampleFormat::F32 => device.build_input_stream(
                &supported.config(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(data.to_vec());
                },
                err_fn,
                None,
            )?,
            SampleFormat::I16 => device.build_input_stream(
                &supported.config(),
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(data.iter().map(|s| *s as f32 / i16::MAX as f32).collect());
                },
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_input_stream(
                &supported.config(),
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(
                        data.iter()
                            .map(|s| (*s as f32 - 32768.0) / 32768.0)
                            .collect(),
                    );
                },
                err_fn,
                None,
            )?,
            other => bail!("unsupported input sample format {:?}", other),
        };
        stream.play()?;

        let deadline = Instant::now() + timeout;

        // Ambient-noise calibration: sample the room, derive the threshold.
        let calibration_target =
            (sample_rate as f64 * self.calibration.as_secs_f64()) as usize * channels;
        let mut ambient: Vec<f32> = Vec::with_capacity(calibration_target);
        while ambient.len() < calibration_target {
            match next_chunk(&rx, deadline)? {
                Some(chunk) => ambient.extend_from_slice(&chunk),
                None => bail!("microphone listen timed out during calibration"),
            }
        }
        let threshold = (rms(&ambient) * self.silence_factor).max(MIN_SILENCE_THRESHOLD);
        debug!(threshold, "ambient calibration complete");

        // Record until sustained silence after speech, or the deadline.
        let hang_target =
            (sample_rate as f64 * self.silence_hang.as_secs_f64()) as usize * channels;
        let mut samples: Vec<f32> = Vec::new();
        let mut speech_started = false;
        let mut silent_run = 0usize;
        loop {
            let Some(chunk) = next_chunk(&rx, deadline)? else {
                if speech_started {
                    break;
                }
                bail!("microphone listen timed out before speech was detected");
            };
            let level = rms(&chunk);
            samples.extend_from_slice(&chunk);
            if level > threshold {
                speech_started = true;
                silent_run = 0;
            } else if speech_started {
                silent_run += chunk.len();
                if silent_run >= hang_target {
                    break;
                }
            }
        }
        drop(stream);

        debug!(samples = samples.len(), "utterance captured");
        Ok(CapturedAudio {
            samples: downmix(&samples, channels),
            sample_rate,
        })
    }
}

/// Receives the next chunk, honoring the overall deadline. `Ok(None)` means
/// the deadline passed; a dead stream is an error.
fn next_chunk(rx: &mpsc::Receiver<Vec<f32>>, deadline: Instant) -> Result<Option<Vec<f32>>> {
    loop {
        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            return Ok(None);
        };
        match rx.recv_timeout(remaining.min(RECV_TICK)) {
            Ok(chunk) => return Ok(Some(chunk)),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                bail!("input stream closed unexpectedly")
            }
        }
    }
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Averages interleaved frames down to a single channel.
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
