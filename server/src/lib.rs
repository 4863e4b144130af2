// Tourvoice HTTP server
// Narration and speech synthesis over a small JSON/WAV API

pub mod api;
pub mod config;
pub mod error;

pub use api::{router, AppState};
pub use config::ServerConfig;
pub use error::ApiError;

use tourvoice_core::{NarrationGenerator, SpeechSynthesizer};

/// Build handler state from configuration.
///
/// Nothing expensive happens here: the voice engine loads on the first `/tts` request and the
/// narration credential is read per request. An unknown default voice is rejected here.
pub fn build_state(cfg: &ServerConfig) -> tourvoice_core::Result<AppState> {
    let narrator = NarrationGenerator::from_config(&cfg.narration)?;
    let synthesizer = SpeechSynthesizer::from_config(&cfg.voice)?;
    Ok(AppState::new(narrator, synthesizer))
}
