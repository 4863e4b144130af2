use std::fs;
use std::path::{Path, PathBuf};

use tourvoice_core::config::{resolve_beside_executable, CredentialSource};
use tourvoice_core::{NarrationConfig, VoiceConfig};

/// Top-level server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub narration: NarrationConfig,
    pub voice: VoiceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TOURVOICE_HOST")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: std::env::var("TOURVOICE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            narration: NarrationConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file (path via TOURVOICE_CONFIG or ./tourvoice.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let path = std::env::var("TOURVOICE_CONFIG").unwrap_or_else(|_| "tourvoice.toml".into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Self {
        let default = Self::default();
        if !path.exists() {
            tracing::info!(target: "server", path = %path.display(), "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(path) {
            Ok(s) => match toml::from_str::<ServerToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target: "server", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target: "server", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerToml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub narration: Option<NarrationToml>,
    pub voice: Option<VoiceToml>,
}

impl ServerToml {
    fn overlay(self, mut base: ServerConfig) -> ServerConfig {
        if let Some(h) = self.host {
            base.host = h;
        }
        if let Some(p) = self.port {
            base.port = p;
        }
        if let Some(n) = self.narration {
            n.apply(&mut base.narration);
        }
        if let Some(v) = self.voice {
            v.apply(&mut base.voice);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct NarrationToml {
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub deadline_ms: Option<u64>,
    pub workers: Option<usize>,
    pub audit_log: Option<String>, // "" disables the audit log
}
impl NarrationToml {
    fn apply(self, n: &mut NarrationConfig) {
        if let Some(x) = self.api_key_env.filter(|s| !s.is_empty()) {
            n.credential = CredentialSource::Env(x);
        }
        if let Some(x) = self.base_url {
            n.base_url = x;
        }
        if let Some(x) = self.model {
            n.model = x;
        }
        if let Some(x) = self.request_timeout_ms {
            n.request_timeout_ms = x;
        }
        if let Some(x) = self.deadline_ms {
            n.deadline_ms = x;
        }
        if let Some(x) = self.workers {
            n.pool_size = x.max(1);
        }
        if let Some(x) = self.audit_log {
            n.audit_log_path = if x.is_empty() {
                None
            } else {
                Some(PathBuf::from(x))
            };
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct VoiceToml {
    pub model_path: Option<PathBuf>,
    pub voices_path: Option<PathBuf>,
    pub espeak_bin: Option<PathBuf>,
    pub default_voice: Option<String>,
    pub language: Option<String>,
    pub intra_threads: Option<usize>,
}
impl VoiceToml {
    fn apply(self, v: &mut VoiceConfig) {
        if let Some(x) = self.model_path {
            v.model_path = resolve_beside_executable(&x);
        }
        if let Some(x) = self.voices_path {
            v.voices_path = resolve_beside_executable(&x);
        }
        if let Some(x) = self.espeak_bin {
            v.espeak_bin = Some(x);
        }
        if let Some(x) = self.default_voice {
            v.default_voice = x;
        }
        if let Some(x) = self.language {
            v.language = x;
        }
        if let Some(x) = self.intra_threads {
            v.intra_threads = x.max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_replaces_only_given_fields() {
        let t: ServerToml = toml::from_str(
            r#"
            port = 9000

            [narration]
            deadline_ms = 30000
            audit_log = ""

            [voice]
            model_path = "/models/kokoro-v1.0.onnx"
            default_voice = "af_bella"
            "#,
        )
        .unwrap();

        let base = ServerConfig {
            host: "0.0.0.0".into(),
            port: 8000,
            narration: NarrationConfig::default(),
            voice: VoiceConfig::default(),
        };
        let base_voices = base.voice.voices_path.clone();
        let base_model = base.narration.model.clone();
        let cfg = t.overlay(base);

        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.narration.deadline_ms, 30_000);
        assert_eq!(cfg.narration.audit_log_path, None);
        assert_eq!(cfg.narration.model, base_model);
        assert_eq!(
            cfg.voice.model_path,
            PathBuf::from("/models/kokoro-v1.0.onnx")
        );
        assert_eq!(cfg.voice.voices_path, base_voices);
        assert_eq!(cfg.voice.default_voice, "af_bella");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<ServerToml>("prot = 9000").is_err());
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tourvoice.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();
        let cfg = ServerConfig::load_from(&path);
        assert_eq!(cfg.port, ServerConfig::default().port);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = ServerConfig::load_from(Path::new("/nonexistent/tourvoice.toml"));
        assert_eq!(cfg.bind_addr(), ServerConfig::default().bind_addr());
    }
}
