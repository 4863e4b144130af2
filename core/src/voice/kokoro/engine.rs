use super::phonemizer::{split_sentences, EspeakPhonemizer};
use super::vocab::{pack_batches, tokenize, MAX_TOKENS, PAD_TOKEN};
use super::voices::VoiceBank;
use super::SAMPLE_RATE;
use crate::config::VoiceConfig;
use crate::voice::{AudioBuffer, SpeechEngine};
use crate::{Result, TourVoiceError};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Kokoro v1.0 running on onnxruntime
pub struct KokoroEngine {
    // `Session::run` needs `&mut`; inference is serialized per engine.
    session: Mutex<Session>,
    token_input: String,
    voices: VoiceBank,
    phonemizer: EspeakPhonemizer,
}

impl KokoroEngine {
    pub fn load(cfg: &VoiceConfig, espeak: &Path) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| load_err(&cfg.model_path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_err(&cfg.model_path, e))?
            .with_intra_threads(cfg.intra_threads)
            .map_err(|e| load_err(&cfg.model_path, e))?
            .commit_from_file(&cfg.model_path)
            .map_err(|e| load_err(&cfg.model_path, e))?;

        // Older exports call the token input `tokens`, newer ones `input_ids`.
        let token_input = if session.inputs.iter().any(|i| i.name == "input_ids") {
            "input_ids".to_string()
        } else {
            "tokens".to_string()
        };

        let voices = VoiceBank::load(&cfg.voices_path)?;
        debug!(target: "voice_engine", voices = voices.len(), token_input = %token_input, "Kokoro loaded");

        Ok(Self {
            session: Mutex::new(session),
            token_input,
            voices,
            phonemizer: EspeakPhonemizer::new(espeak),
        })
    }

    fn infer(&self, tokens: &[i64], style: Vec<f32>, speed: f32) -> Result<Vec<f32>> {
        let mut ids = Vec::with_capacity(tokens.len() + 2);
        ids.push(PAD_TOKEN);
        ids.extend_from_slice(tokens);
        ids.push(PAD_TOKEN);

        let ids = Tensor::from_array(([1usize, ids.len()], ids)).map_err(synth_err)?;
        let style = Tensor::from_array(([1usize, style.len()], style)).map_err(synth_err)?;
        let speed = Tensor::from_array(([1usize], vec![speed])).map_err(synth_err)?;

        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let outputs = session
            .run(ort::inputs![
                self.token_input.as_str() => ids,
                "style" => style,
                "speed" => speed,
            ])
            .map_err(synth_err)?;
        if outputs.len() == 0 {
            return Err(synth_err("model returned no output tensors"));
        }
        let (_, audio) = outputs[0].try_extract_tensor::<f32>().map_err(synth_err)?;
        Ok(audio.to_vec())
    }
}

impl SpeechEngine for KokoroEngine {
    fn synthesize(
        &self,
        text: &str,
        voice: &str,
        speed: f32,
        language: &str,
    ) -> Result<AudioBuffer> {
        if !self.voices.contains(voice) {
            return Err(TourVoiceError::ValidationError(format!(
                "Unknown voice: {voice}"
            )));
        }

        let mut sentences = Vec::new();
        for sentence in split_sentences(text) {
            let phonemes = self.phonemizer.phonemize(&sentence, language)?;
            sentences.push(tokenize(&phonemes));
        }
        let batches = pack_batches(sentences, MAX_TOKENS);
        if batches.is_empty() {
            return Err(TourVoiceError::SynthesisError(
                "text produced no phonemes".into(),
            ));
        }

        let mut samples = Vec::new();
        for batch in &batches {
            let style = self.voices.style(voice, batch.len()).ok_or_else(|| {
                TourVoiceError::SynthesisError(format!("voice {voice} has no style rows"))
            })?;
            samples.extend(self.infer(batch, style, speed)?);
        }
        debug!(target: "voice_engine", batches = batches.len(), samples = samples.len(), "Kokoro inference done");

        Ok(AudioBuffer {
            samples,
            sample_rate: SAMPLE_RATE,
        })
    }
}

fn load_err(model_path: &Path, e: impl std::fmt::Display) -> TourVoiceError {
    TourVoiceError::EngineLoadError(format!(
        "Failed to load Kokoro model {}: {e}",
        model_path.display()
    ))
}

fn synth_err(e: impl std::fmt::Display) -> TourVoiceError {
    TourVoiceError::SynthesisError(format!("Kokoro inference failed: {e}"))
}
