use super::{EngineLoader, SpeechEngine};
use crate::Result;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Lifecycle of the engine behind a `VoiceEngineHandle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Loading,
    Ready,
    /// Last load attempt failed; the next `get` tries again.
    Failed,
}

impl EngineState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => EngineState::Loading,
            2 => EngineState::Ready,
            3 => EngineState::Failed,
            _ => EngineState::Uninitialized,
        }
    }
}

/// Process-wide, lazily-initialised handle to the speech engine.
///
/// Concurrent first callers block on a single load; everyone else waits for its outcome.
/// After a successful load the engine is read without locking and never replaced.
pub struct VoiceEngineHandle {
    loader: Box<dyn EngineLoader>,
    engine: OnceCell<Box<dyn SpeechEngine>>,
    state: AtomicU8,
}

impl VoiceEngineHandle {
    pub fn new(loader: impl EngineLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            engine: OnceCell::new(),
            state: AtomicU8::new(EngineState::Uninitialized as u8),
        }
    }

    /// The loaded engine, loading it first if needed.
    pub fn get(&self) -> Result<&dyn SpeechEngine> {
        self.engine
            .get_or_try_init(|| self.load())
            .map(|engine| engine.as_ref())
    }

    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    fn load(&self) -> Result<Box<dyn SpeechEngine>> {
        self.set_state(EngineState::Loading);
        info!(target: "voice_engine", "Loading voice engine");
        let started = Instant::now();
        match self.loader.load() {
            Ok(engine) => {
                self.set_state(EngineState::Ready);
                info!(
                    target: "voice_engine",
                    load_ms = started.elapsed().as_millis() as u64,
                    "Voice engine ready"
                );
                Ok(engine)
            }
            Err(e) => {
                self.set_state(EngineState::Failed);
                warn!(target: "voice_engine", error = %e, "Voice engine failed to load");
                Err(e)
            }
        }
    }

    fn set_state(&self, state: EngineState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}
