use tokio::signal;
use tourvoice_server::{build_state, router, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }
    tourvoice_core::telemetry::init_tracing();

    // Defaults + env + optional TOML overlay
    let cfg = ServerConfig::load();
    let state = build_state(&cfg)?;

    if cfg.narration.credential.resolve().is_none() {
        warn!(target: "server", "No text-generation API key configured; /generate-tour-guide will fail");
    }
    if !cfg.voice.model_path.is_file() || !cfg.voice.voices_path.is_file() {
        warn!(
            target: "server",
            model = %cfg.voice.model_path.display(),
            voices = %cfg.voice.voices_path.display(),
            "Kokoro model files not found; /tts will fail until they are provisioned"
        );
    }

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(target: "server", url = %format!("http://{}", addr), "Tourvoice server ready");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(target: "server", error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            info!(target: "server", "Shutting down");
        })
        .await?;

    Ok(())
}
