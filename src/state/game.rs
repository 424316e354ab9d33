use super::AppState;
use crate::types::*;

impl AppState {
    /// Snapshot copy of the whole aggregate
    pub async fn get_game_state(&self) -> GameState {
        self.game.read().await.clone()
    }

    pub async fn get_status(&self) -> GameStatus {
        self.game.read().await.status
    }

    /// Set the game status.
    ///
    /// Any transition is allowed so operators can move freely between states.
    /// Entering `Running` stamps `started_at`, entering `Ended` stamps `ended_at`.
    pub async fn set_game_status(&self, status: GameStatus) {
        let mut game = self.game.write().await;
        let previous = game.status;
        game.status = status;
        match status {
            GameStatus::Running => game.started_at = Some(chrono::Utc::now()),
            GameStatus::Ended => game.ended_at = Some(chrono::Utc::now()),
            GameStatus::Preparing => {}
        }

        tracing::info!(from = ?previous, to = ?status, "Game status changed");
        self.persist(&game).await;
    }

    /// Wipe all answers, scores and reactions. Teams and questions are kept.
    pub async fn reset_game(&self) {
        let mut game = self.game.write().await;
        for team in &mut game.teams {
            team.answers.clear();
            team.total_score = 0.0;
            team.current_question_index = 0;
        }
        game.reactions.clear();
        game.status = GameStatus::Preparing;
        game.started_at = None;
        game.ended_at = None;

        tracing::info!(teams = game.teams.len(), "Game reset");
        self.persist(&game).await;
    }
}
