//! File-backed snapshot of the whole game state.
//!
//! The aggregate is stored as one pretty-printed JSON document. Writes go to a
//! sibling temp file first and are renamed over the snapshot, so a reader never
//! sees a half-written file.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::GameState;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the snapshot. `Ok(None)` when no snapshot exists yet.
    pub async fn try_load(&self) -> Result<Option<GameState>, PersistenceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let state = serde_json::from_slice(&bytes)?;
        Ok(Some(state))
    }

    /// Load the snapshot, falling back to a fresh default state.
    ///
    /// A missing file is created with the default state. An unreadable or
    /// corrupt file is left in place and logged; the next save replaces it.
    pub async fn load(&self) -> GameState {
        match self.try_load().await {
            Ok(Some(state)) => {
                tracing::info!(
                    path = %self.path.display(),
                    teams = state.teams.len(),
                    questions = state.questions.len(),
                    "Loaded saved game state"
                );
                state
            }
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "No saved game state, creating a new one");
                let state = GameState::default();
                if let Err(e) = self.save(&state).await {
                    tracing::error!("Failed to write initial game state: {}", e);
                }
                state
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to load game state, starting from defaults"
                );
                GameState::default()
            }
        }
    }

    /// Overwrite the snapshot with `state`
    pub async fn save(&self, state: &GameState) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(state)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Saved game state");
        Ok(())
    }
}
