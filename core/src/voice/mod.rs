//! Voice engine: catalog, engine seams, lazily-loaded handle, and the Kokoro implementation
//!
//! The synthesis engine is expensive to load (ONNX weights plus a voice-embedding bank) and
//! immutable once loaded. `VoiceEngineHandle` loads it on first use, at most once, and hands out
//! shared references afterwards.

mod catalog;
mod handle;
pub mod kokoro;

pub use catalog::{find_voice, is_known_voice, VoiceCatalogEntry, DEFAULT_VOICE, KOKORO_VOICES};
pub use handle::{EngineState, VoiceEngineHandle};

use crate::Result;
use std::time::Duration;

/// Mono PCM audio produced by an engine
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// A loaded neural voice model.
///
/// `synthesize` is CPU-bound and blocking; callers run it off the async runtime.
pub trait SpeechEngine: Send + Sync {
    fn synthesize(&self, text: &str, voice: &str, speed: f32, language: &str)
        -> Result<AudioBuffer>;
}

/// One-shot constructor for a `SpeechEngine`, called by `VoiceEngineHandle`.
pub trait EngineLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn SpeechEngine>>;
}

impl<F> EngineLoader for F
where
    F: Fn() -> Result<Box<dyn SpeechEngine>> + Send + Sync,
{
    fn load(&self) -> Result<Box<dyn SpeechEngine>> {
        self()
    }
}
