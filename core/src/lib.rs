// Tourvoice Core Library
// Narration generation and speech synthesis runtime

pub mod config;
pub mod narration;
pub mod sanitize;
pub mod synth;
pub mod telemetry;
pub mod voice;

// Export core types
pub use config::{NarrationConfig, VoiceConfig};
pub use narration::{NarrationGenerator, NarrationRequest, NarrationResponse, TextBackend};
pub use sanitize::sanitize;
pub use synth::{SpeechSynthesizer, SynthesisRequest, SynthesizedAudio};
pub use voice::{AudioBuffer, EngineLoader, SpeechEngine, VoiceCatalogEntry, VoiceEngineHandle};

// Error types
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TourVoiceError {
    /// Deployment problem (missing credential); retrying will not help.
    #[error("{0}")]
    ConfigError(String),

    #[error("Narration generation timed out after {}s", .0.as_secs())]
    TimeoutError(Duration),

    #[error("{0}")]
    UpstreamError(String),

    /// Missing or unreadable model artifacts; fatal until an operator provisions them.
    #[error("{0}")]
    EngineLoadError(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    SynthesisError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, TourVoiceError>;
