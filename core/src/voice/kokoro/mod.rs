//! Kokoro v1.0 voice engine
//!
//! Needs two artifacts on disk, `kokoro-v1.0.onnx` (model weights) and `voices-v1.0.bin`
//! (voice embeddings), plus an `espeak-ng` binary for phonemization. Inference is compiled in
//! with the `kokoro` feature (on by default).
//!
//! Pipeline per request:
//! 1. split text into sentences, phonemize each through espeak-ng
//! 2. map IPA to Kokoro token ids, pack sentences into batches of at most 510 tokens
//! 3. run the ONNX model per batch with the voice's style row for that batch length
//! 4. concatenate the 24 kHz output

#[cfg(feature = "kokoro")]
mod engine;
pub mod phonemizer;
pub mod vocab;
#[cfg(feature = "kokoro")]
mod voices;

#[cfg(feature = "kokoro")]
pub use engine::KokoroEngine;
#[cfg(feature = "kokoro")]
pub use voices::VoiceBank;

use crate::config::VoiceConfig;
use crate::voice::{EngineLoader, SpeechEngine};
use crate::{Result, TourVoiceError};
use std::path::Path;

/// Output sample rate of Kokoro v1.0.
pub const SAMPLE_RATE: u32 = 24_000;

/// Loads a Kokoro engine from the paths in `VoiceConfig`
#[derive(Debug, Clone)]
pub struct KokoroLoader {
    cfg: VoiceConfig,
}

impl KokoroLoader {
    pub fn new(cfg: VoiceConfig) -> Self {
        Self { cfg }
    }
}

impl EngineLoader for KokoroLoader {
    fn load(&self) -> Result<Box<dyn SpeechEngine>> {
        check_artifacts(&self.cfg.model_path, &self.cfg.voices_path)?;
        let espeak = self.cfg.espeak_bin.as_deref().ok_or_else(|| {
            TourVoiceError::EngineLoadError(
                "espeak-ng not found; install it or set ESPEAK_BIN".into(),
            )
        })?;
        build_engine(&self.cfg, espeak)
    }
}

#[cfg(feature = "kokoro")]
fn build_engine(cfg: &VoiceConfig, espeak: &Path) -> Result<Box<dyn SpeechEngine>> {
    Ok(Box::new(KokoroEngine::load(cfg, espeak)?))
}

#[cfg(not(feature = "kokoro"))]
fn build_engine(_cfg: &VoiceConfig, _espeak: &Path) -> Result<Box<dyn SpeechEngine>> {
    Err(TourVoiceError::EngineLoadError(
        "this build does not include the Kokoro engine (enable the `kokoro` feature)".into(),
    ))
}

/// Fail with `EngineLoadError` unless both artifacts exist.
pub fn check_artifacts(model_path: &Path, voices_path: &Path) -> Result<()> {
    let missing: Vec<String> = [model_path, voices_path]
        .iter()
        .filter(|p| !p.is_file())
        .map(|p| p.display().to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let dir = model_path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| ".".to_string());
    Err(TourVoiceError::EngineLoadError(format!(
        "Kokoro model files not found ({}). Download kokoro-v1.0.onnx and voices-v1.0.bin into {}.",
        missing.join(", "),
        dir
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifacts_name_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_artifacts(
            &dir.path().join("kokoro-v1.0.onnx"),
            &dir.path().join("voices-v1.0.bin"),
        )
        .unwrap_err();
        match err {
            TourVoiceError::EngineLoadError(msg) => {
                assert!(msg.contains("kokoro-v1.0.onnx"));
                assert!(msg.contains("voices-v1.0.bin"));
                assert!(msg.contains(&dir.path().display().to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn one_missing_artifact_is_enough_to_fail() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("kokoro-v1.0.onnx");
        std::fs::write(&model, b"onnx").unwrap();
        let err = check_artifacts(&model, &dir.path().join("voices-v1.0.bin")).unwrap_err();
        assert!(matches!(err, TourVoiceError::EngineLoadError(_)));
    }

    #[test]
    fn loader_reports_missing_files_before_anything_else() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = VoiceConfig {
            model_path: dir.path().join("kokoro-v1.0.onnx"),
            voices_path: dir.path().join("voices-v1.0.bin"),
            espeak_bin: None,
            ..VoiceConfig::default()
        };
        let err = KokoroLoader::new(cfg).load().err().unwrap();
        match err {
            TourVoiceError::EngineLoadError(msg) => assert!(msg.contains("not found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
