mod answer;
mod game;
mod question;
mod ranking;
mod reaction;
mod team;

pub use answer::ScoredSubmission;
pub use question::{QuestionInput, QuestionUpdate};
pub use ranking::rank_teams;
pub use team::TeamUpdate;

use crate::config::AnswerLengthPolicy;
use crate::persistence::SnapshotStore;
use crate::types::GameState;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state.
///
/// The whole aggregate sits behind a single lock. Every mutation takes the
/// write guard, applies its change, and saves the snapshot before releasing
/// it, so readers never observe a half-applied update and file writes never
/// interleave.
#[derive(Clone)]
pub struct AppState {
    game: Arc<RwLock<GameState>>,
    store: Option<SnapshotStore>,
    answer_length: AnswerLengthPolicy,
}

impl AppState {
    /// In-memory state without persistence
    pub fn new() -> Self {
        Self::from_state(GameState::default(), None)
    }

    pub fn from_state(state: GameState, store: Option<SnapshotStore>) -> Self {
        Self {
            game: Arc::new(RwLock::new(state)),
            store,
            answer_length: AnswerLengthPolicy::default(),
        }
    }

    /// Load the saved snapshot (or a default one) and persist every mutation to it
    pub async fn load(store: SnapshotStore) -> Self {
        let state = store.load().await;
        Self::from_state(state, Some(store))
    }

    pub fn with_answer_length(mut self, policy: AnswerLengthPolicy) -> Self {
        self.answer_length = policy;
        self
    }

    /// Write-through save. Failures are logged and the in-memory change is kept.
    async fn persist(&self, state: &GameState) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(state).await {
                tracing::error!(
                    error = %e,
                    "Failed to save game state; in-memory state now differs from disk"
                );
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop answers and reactions that point at questions no longer in the bank,
/// then refresh every team's derived fields.
fn prune_orphans(state: &mut GameState) {
    let live: HashSet<&str> = state.questions.iter().map(|q| q.id.as_str()).collect();
    let question_count = state.questions.len();

    let before = state.reactions.len();
    state
        .reactions
        .retain(|r| live.contains(r.question_id.as_str()));
    let dropped_reactions = before - state.reactions.len();

    let mut dropped_answers = 0;
    for team in &mut state.teams {
        let before = team.answers.len();
        team.answers
            .retain(|a| live.contains(a.question_id.as_str()));
        dropped_answers += before - team.answers.len();
        team.recompute(question_count);
    }

    if dropped_reactions + dropped_answers > 0 {
        tracing::info!(
            dropped_answers,
            dropped_reactions,
            "Removed records referencing deleted questions"
        );
    }
}
