// HTTP API: narration, voice catalog, and speech synthesis endpoints

use crate::error::ApiError;
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tourvoice_core::voice::KOKORO_VOICES;
use tourvoice_core::{
    NarrationGenerator, NarrationRequest, NarrationResponse, SpeechSynthesizer, SynthesisRequest,
    VoiceCatalogEntry,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared handler state; one generator and one synthesizer per process
#[derive(Clone)]
pub struct AppState {
    pub narrator: Arc<NarrationGenerator>,
    pub synthesizer: Arc<SpeechSynthesizer>,
}

impl AppState {
    pub fn new(narrator: NarrationGenerator, synthesizer: SpeechSynthesizer) -> Self {
        Self {
            narrator: Arc::new(narrator),
            synthesizer: Arc::new(synthesizer),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-tour-guide", post(generate_tour_guide_handler))
        .route("/voices", get(voices_handler))
        .route("/kokoro-voices", get(voices_handler))
        .route("/tts", post(tts_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Generate a spoken-tour narration for a location
async fn generate_tour_guide_handler(
    State(state): State<AppState>,
    Json(req): Json<NarrationRequest>,
) -> Result<Json<NarrationResponse>, ApiError> {
    let tour_guide_text = state.narrator.generate(&req.location).await?;
    Ok(Json(NarrationResponse { tour_guide_text }))
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: &'static [VoiceCatalogEntry],
}

async fn voices_handler() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: KOKORO_VOICES,
    })
}

/// Synthesize speech and stream it back as `audio/wav`
async fn tts_handler(
    State(state): State<AppState>,
    Json(req): Json<SynthesisRequest>,
) -> Result<Response, ApiError> {
    let audio = state.synthesizer.synthesize(req).await?;
    info!(
        target: "server",
        bytes = audio.wav.len(),
        duration_ms = audio.duration().as_millis() as u64,
        "Streaming synthesized audio"
    );

    Ok((
        [(header::CONTENT_TYPE, "audio/wav")],
        Body::from_stream(audio.into_stream()),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn voices_are_wrapped_in_an_object() {
        let Json(resp) = voices_handler().await;
        let value = serde_json::to_value(&resp).unwrap();
        let voices = value["voices"].as_array().unwrap();
        assert_eq!(voices.len(), KOKORO_VOICES.len());
        assert_eq!(voices[0]["id"], KOKORO_VOICES[0].id);
    }
}
