//! Narration module: prompt template, text-generation backend, worker pool, and generator
//!
//! This module provides:
//! - `TextBackend` seam and the `GeminiBackend` HTTP implementation
//! - `WorkerPool`, a fixed-width thread pool that keeps slow generation calls off the runtime
//! - `AuditLog`, the best-effort append-only record of requested locations
//! - `NarrationGenerator`, which ties the above together under a deadline and sanitizes output

mod audit;
mod backend;
mod generator;
mod pool;
mod prompt;

pub use audit::AuditLog;
pub use backend::{GeminiBackend, TextBackend};
pub use generator::NarrationGenerator;
pub use pool::{PoolStats, WorkerPool};
pub use prompt::{build_prompt, TARGET_WORDS};

use serde::{Deserialize, Serialize};

/// Inbound narration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationRequest {
    pub location: String,
}

/// Sanitized narration returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NarrationResponse {
    pub tour_guide_text: String,
}
