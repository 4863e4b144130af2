//! Speech synthesis: validate, run the voice engine, encode WAV, stream
//!
//! Engine work and encoding run on tokio's blocking pool so an inference never stalls the
//! async runtime. Each call records how long generation and encoding took.

mod wav;

pub use wav::encode_wav;

use crate::config::VoiceConfig;
use crate::voice::{is_known_voice, kokoro::KokoroLoader, VoiceEngineHandle, DEFAULT_VOICE};
use crate::{Result, TourVoiceError};
use bytes::Bytes;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_stream::Stream;
use tracing::{debug, info};

/// Allowed playback-rate multipliers.
pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

/// Size of each chunk handed to a streaming response body.
pub const STREAM_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    /// Falls back to the synthesizer's configured default voice when absent.
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            speed: default_speed(),
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Reject requests the engine should never see.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(TourVoiceError::ValidationError(
                "text must not be empty".into(),
            ));
        }
        if let Some(voice) = self.voice.as_deref() {
            if !is_known_voice(voice) {
                return Err(TourVoiceError::ValidationError(format!(
                    "Unknown voice: {voice}"
                )));
            }
        }
        if !self.speed.is_finite() || !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(TourVoiceError::ValidationError(format!(
                "speed must be between {MIN_SPEED} and {MAX_SPEED}, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisTimings {
    pub generation: Duration,
    pub encode: Duration,
    pub total: Duration,
}

/// An encoded WAV file plus what it took to produce it
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub wav: Bytes,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub timings: SynthesisTimings,
}

impl SynthesizedAudio {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.sample_count as f64 / self.sample_rate as f64)
    }

    /// The WAV bytes split into `STREAM_CHUNK_BYTES` pieces (zero-copy).
    pub fn into_chunks(self) -> Vec<Bytes> {
        let mut wav = self.wav;
        let mut chunks = Vec::with_capacity(wav.len() / STREAM_CHUNK_BYTES + 1);
        while wav.len() > STREAM_CHUNK_BYTES {
            chunks.push(wav.split_to(STREAM_CHUNK_BYTES));
        }
        if !wav.is_empty() {
            chunks.push(wav);
        }
        chunks
    }

    pub fn into_stream(self) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> {
        tokio_stream::iter(self.into_chunks().into_iter().map(Ok))
    }
}

/// Turns text into streamable WAV audio through a shared `VoiceEngineHandle`.
pub struct SpeechSynthesizer {
    handle: Arc<VoiceEngineHandle>,
    language: String,
    default_voice: String,
}

impl SpeechSynthesizer {
    pub fn new(handle: Arc<VoiceEngineHandle>, language: impl Into<String>) -> Self {
        Self {
            handle,
            language: language.into(),
            default_voice: DEFAULT_VOICE.to_string(),
        }
    }

    /// Voice used for requests that name none. Must be a catalog voice.
    pub fn with_default_voice(mut self, voice: impl Into<String>) -> Result<Self> {
        let voice = voice.into();
        if !is_known_voice(&voice) {
            return Err(TourVoiceError::ConfigError(format!(
                "Default voice is not in the catalog: {voice}"
            )));
        }
        self.default_voice = voice;
        Ok(self)
    }

    /// Synthesizer backed by the Kokoro engine. Nothing is loaded until the first request.
    pub fn from_config(cfg: &VoiceConfig) -> Result<Self> {
        let handle = VoiceEngineHandle::new(KokoroLoader::new(cfg.clone()));
        Self::new(Arc::new(handle), cfg.language.clone()).with_default_voice(&cfg.default_voice)
    }

    pub fn handle(&self) -> &Arc<VoiceEngineHandle> {
        &self.handle
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }

    pub async fn synthesize(&self, req: SynthesisRequest) -> Result<SynthesizedAudio> {
        let started = Instant::now();
        req.validate()?;
        let voice = req.voice.unwrap_or_else(|| self.default_voice.clone());
        let text = req.text;
        let speed = req.speed;
        debug!(target: "tts", voice = %voice, speed, "Synthesis requested");

        let handle = Arc::clone(&self.handle);
        let language = self.language.clone();
        let text_length = text.chars().count();
        let engine_voice = voice.clone();

        let audio = tokio::task::spawn_blocking(move || -> Result<SynthesizedAudio> {
            let engine = handle.get()?;

            let gen_started = Instant::now();
            let buffer = engine
                .synthesize(&text, &engine_voice, speed, &language)
                .map_err(|e| match e {
                    TourVoiceError::EngineLoadError(_)
                    | TourVoiceError::ValidationError(_)
                    | TourVoiceError::SynthesisError(_) => e,
                    other => TourVoiceError::SynthesisError(other.to_string()),
                })?;
            let generation = gen_started.elapsed();

            let encode_started = Instant::now();
            let wav = encode_wav(&buffer)?;
            let encode = encode_started.elapsed();

            Ok(SynthesizedAudio {
                wav,
                sample_rate: buffer.sample_rate,
                sample_count: buffer.samples.len(),
                timings: SynthesisTimings {
                    generation,
                    encode,
                    total: started.elapsed(),
                },
            })
        })
        .await
        .map_err(|e| TourVoiceError::SynthesisError(format!("synthesis task failed: {e}")))??;

        info!(
            target: "tts",
            text_length,
            voice = %voice,
            audio_gen_ms = audio.timings.generation.as_millis() as u64,
            wav_encode_ms = audio.timings.encode.as_millis() as u64,
            total_ms = audio.timings.total.as_millis() as u64,
            samples = audio.sample_count,
            sample_rate = audio.sample_rate,
            "Synthesis complete"
        );
        Ok(audio)
    }
}
