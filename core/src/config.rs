//! Environment-driven configuration for the narration and voice pipelines
//!
//! Each struct's `Default` consults environment variables so binaries can start from
//! `::default()` and overlay file-based settings on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the text-generation credential comes from.
///
/// The value is resolved on every narration request, so a server can start (and serve audio)
/// without a credential configured.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    /// Read the named environment variable at call time.
    Env(String),
    /// A fixed value, mostly useful in tests.
    Fixed(Option<String>),
}

impl CredentialSource {
    /// Current credential, treating an empty value as missing.
    pub fn resolve(&self) -> Option<String> {
        let value = match self {
            CredentialSource::Env(key) => std::env::var(key).ok(),
            CredentialSource::Fixed(v) => v.clone(),
        };
        value.filter(|s| !s.trim().is_empty())
    }
}

/// Configuration for the narration generator and its Gemini backend
#[derive(Debug, Clone)]
pub struct NarrationConfig {
    pub credential: CredentialSource,
    pub base_url: String, // e.g., https://generativelanguage.googleapis.com/v1beta
    pub model: String,    // e.g., gemini-2.0-flash
    /// Client-side timeout of the HTTP call itself; bounds how long a worker stays busy
    /// after the caller has already given up.
    pub request_timeout_ms: u64,
    /// Deadline the caller waits for a pooled generation before failing with a timeout.
    pub deadline_ms: u64,
    pub pool_size: usize,
    pub audit_log_path: Option<PathBuf>,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            credential: CredentialSource::Env(
                std::env::var("TOURVOICE_API_KEY_ENV")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "GOOGLE_API_KEY".to_string()),
            ),
            base_url: std::env::var("TOURVOICE_LLM_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            model: std::env::var("TOURVOICE_LLM_MODEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            request_timeout_ms: std::env::var("TOURVOICE_LLM_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(120_000),
            deadline_ms: std::env::var("TOURVOICE_NARRATION_DEADLINE_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(90_000),
            pool_size: std::env::var("TOURVOICE_NARRATION_WORKERS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(2),
            audit_log_path: match std::env::var("TOURVOICE_AUDIT_LOG") {
                Ok(p) if p.is_empty() => None,
                Ok(p) => Some(PathBuf::from(p)),
                Err(_) => Some(PathBuf::from("/tmp/locations.txt")),
            },
        }
    }
}

impl NarrationConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Configuration for the local voice engine
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub model_path: PathBuf,
    pub voices_path: PathBuf,
    pub espeak_bin: Option<PathBuf>,
    pub default_voice: String,
    pub language: String,
    pub intra_threads: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        let model_path = std::env::var("KOKORO_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("kokoro-v1.0.onnx"));
        let voices_path = std::env::var("KOKORO_VOICES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("voices-v1.0.bin"));
        Self {
            model_path: resolve_beside_executable(&model_path),
            voices_path: resolve_beside_executable(&voices_path),
            espeak_bin: get_from_env_or_path("ESPEAK_BIN", "espeak-ng")
                .or_else(|| get_from_path("espeak")),
            default_voice: std::env::var("TOURVOICE_DEFAULT_VOICE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| crate::voice::DEFAULT_VOICE.to_string()),
            language: "en-us".to_string(),
            intra_threads: std::env::var("KOKORO_INTRA_THREADS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(4),
        }
    }
}

/// Relative artifact paths are looked up next to the running executable.
pub fn resolve_beside_executable(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)))
        .unwrap_or_else(|| path.to_path_buf())
}

fn get_from_env_or_path(env_key: &str, default_bin: &str) -> Option<PathBuf> {
    if let Ok(p) = std::env::var(env_key) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    get_from_path(default_bin)
}

fn get_from_path(bin: &str) -> Option<PathBuf> {
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return if p.exists() { Some(p) } else { None };
    }
    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(bin);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}
