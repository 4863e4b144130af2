use super::audit::AuditLog;
use super::backend::{GeminiBackend, TextBackend};
use super::pool::{PoolStats, WorkerPool};
use super::prompt::build_prompt;
use crate::config::{CredentialSource, NarrationConfig};
use crate::sanitize::sanitize;
use crate::{Result, TourVoiceError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Produces sanitized tour narration for a location.
///
/// Contract:
/// - Missing credential: `ConfigError`, before the pool or backend is touched
/// - Backend slower than the deadline: `TimeoutError`, returned at the deadline
/// - Any other backend failure: `UpstreamError`
///
/// A single attempt is made per request; there is no retry.
pub struct NarrationGenerator {
    backend: Arc<dyn TextBackend>,
    pool: WorkerPool,
    credential: CredentialSource,
    deadline: Duration,
    audit: AuditLog,
}

impl NarrationGenerator {
    pub fn new(
        backend: Arc<dyn TextBackend>,
        pool: WorkerPool,
        credential: CredentialSource,
        deadline: Duration,
        audit: AuditLog,
    ) -> Self {
        Self {
            backend,
            pool,
            credential,
            deadline,
            audit,
        }
    }

    /// Generator wired to Gemini with pool, deadline, and audit log from `cfg`.
    pub fn from_config(cfg: &NarrationConfig) -> Result<Self> {
        let pool = WorkerPool::new("narration-worker", cfg.pool_size)?;
        Ok(Self::new(
            Arc::new(GeminiBackend::new(cfg)),
            pool,
            cfg.credential.clone(),
            cfg.deadline(),
            AuditLog::new(cfg.audit_log_path.clone()),
        ))
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub async fn generate(&self, location: &str) -> Result<String> {
        let location = location.trim();
        self.audit.record(location).await;
        if location.is_empty() {
            return Err(TourVoiceError::ValidationError(
                "location must not be empty".into(),
            ));
        }

        info!(target: "narration", location = %location, "Generating tour guide");

        let api_key = self
            .credential
            .resolve()
            .ok_or_else(|| TourVoiceError::ConfigError("API key not configured".into()))?;

        let prompt = build_prompt(location);
        debug!(target: "narration", prompt = %prompt, "Narration prompt");

        let backend = Arc::clone(&self.backend);
        let started = Instant::now();
        let rx = self
            .pool
            .submit(move || backend.generate(&api_key, &prompt));

        let raw = match timeout(self.deadline, rx).await {
            Ok(Ok(result)) => result.map_err(|e| match e {
                TourVoiceError::UpstreamError(_) => e,
                other => TourVoiceError::UpstreamError(other.to_string()),
            })?,
            Ok(Err(_)) => {
                return Err(TourVoiceError::UpstreamError(
                    "text generation worker stopped before returning a result".into(),
                ))
            }
            Err(_) => {
                // The pooled call keeps running; only the wait is abandoned.
                warn!(
                    target: "narration",
                    location = %location,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Narration generation timed out"
                );
                return Err(TourVoiceError::TimeoutError(self.deadline));
            }
        };
        debug!(target: "narration", raw = %raw, "Raw narration");

        let text = sanitize(&raw);
        info!(
            target: "narration",
            location = %location,
            elapsed_ms = started.elapsed().as_millis() as u64,
            raw_chars = raw.len(),
            chars = text.len(),
            "Narration ready"
        );
        Ok(text)
    }
}
