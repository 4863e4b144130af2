use crate::{Result, TourVoiceError};
use ndarray::{Array3, Axis};
use ndarray_npy::NpzReader;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Per-voice style embeddings from `voices-v1.0.bin`.
///
/// The file is an npz archive with one `(510, 1, 256)` float array per voice; row `n` is the
/// style vector for an utterance of `n` tokens.
pub struct VoiceBank {
    styles: HashMap<String, Array3<f32>>,
}

impl VoiceBank {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| load_err(path, e))?;
        let mut npz = NpzReader::new(file).map_err(|e| load_err(path, e))?;
        let names = npz.names().map_err(|e| load_err(path, e))?;

        let mut styles = HashMap::with_capacity(names.len());
        for name in names {
            let array: Array3<f32> = npz.by_name(&name).map_err(|e| load_err(path, e))?;
            styles.insert(name.trim_end_matches(".npy").to_string(), array);
        }
        Ok(Self { styles })
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn contains(&self, voice: &str) -> bool {
        self.styles.contains_key(voice)
    }

    /// Style vector for `voice` at an utterance length of `token_count`.
    pub fn style(&self, voice: &str, token_count: usize) -> Option<Vec<f32>> {
        let array = self.styles.get(voice)?;
        let rows = array.len_of(Axis(0));
        if rows == 0 {
            return None;
        }
        let row = array.index_axis(Axis(0), token_count.min(rows - 1));
        Some(row.iter().copied().collect())
    }
}

fn load_err(path: &Path, e: impl std::fmt::Display) -> TourVoiceError {
    TourVoiceError::EngineLoadError(format!(
        "Failed to read voice bank {}: {e}",
        path.display()
    ))
}
