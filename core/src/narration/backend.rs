use crate::config::NarrationConfig;
use crate::{Result, TourVoiceError};
use reqwest::blocking::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// Blocking text-generation service: prompt in, text out.
///
/// Calls may take tens of seconds, so implementations are only ever invoked from a
/// `WorkerPool` thread, never from the async runtime.
pub trait TextBackend: Send + Sync + 'static {
    fn generate(&self, api_key: &str, prompt: &str) -> Result<String>;
}

/// Gemini `generateContent` over HTTPS
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    base_url: String,
    model: String,
    request_timeout: Duration,
}

impl GeminiBackend {
    pub fn new(cfg: &NarrationConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            model: cfg.model.clone(),
            request_timeout: cfg.request_timeout(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextBackend for GeminiBackend {
    fn generate(&self, api_key: &str, prompt: &str) -> Result<String> {
        // The blocking client owns a private runtime; build and drop it on the worker thread.
        let http = Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| {
                TourVoiceError::UpstreamError(format!("Failed to build HTTP client: {e}"))
            })?;

        let url = self.endpoint();
        debug!(target: "narration", url = %url, model = %self.model, "POST generateContent");

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
        });

        let resp = http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| TourVoiceError::UpstreamError(format!("Gemini HTTP error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            error!(target: "narration", %status, body = %text, "Gemini error");
            return Err(TourVoiceError::UpstreamError(format!(
                "Gemini error: status={} body={}",
                status, text
            )));
        }

        let val: serde_json::Value = resp.json().map_err(|e| {
            TourVoiceError::UpstreamError(format!("Failed to parse Gemini JSON: {e}"))
        })?;
        extract_text(&val).ok_or_else(|| {
            let reason = val
                .get("promptFeedback")
                .and_then(|f| f.get("blockReason"))
                .and_then(|r| r.as_str())
                .unwrap_or("no text in candidates[0].content.parts");
            TourVoiceError::UpstreamError(format!("Gemini returned no narration: {reason}"))
        })
    }
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn extract_text(v: &serde_json::Value) -> Option<String> {
    let parts = v
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_joins_candidate_parts() {
        let v = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Welcome to " }, { "text": "Rome." }] }
            }]
        });
        assert_eq!(extract_text(&v).as_deref(), Some("Welcome to Rome."));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let v = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(extract_text(&v).is_none());
    }

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let cfg = NarrationConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            model: "gemini-2.0-flash".to_string(),
            ..NarrationConfig::default()
        };
        let backend = GeminiBackend::new(&cfg);
        assert_eq!(
            backend.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
