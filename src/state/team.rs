use super::AppState;
use crate::error::StoreError;
use crate::types::*;

/// Admin edits to a team. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub members: Option<Vec<String>>,
    pub password: Option<String>,
}

impl AppState {
    pub async fn get_teams(&self) -> Vec<Team> {
        self.game.read().await.teams.clone()
    }

    pub async fn get_team(&self, team_id: &str) -> Option<Team> {
        self.game
            .read()
            .await
            .teams
            .iter()
            .find(|t| t.id == team_id)
            .cloned()
    }

    /// Register a new team. Input is validated at the API boundary.
    pub async fn add_team(&self, name: String, members: Vec<String>, password: String) -> Team {
        let team = Team {
            id: ulid::Ulid::new().to_string(),
            name,
            members,
            password,
            answers: Vec::new(),
            total_score: 0.0,
            current_question_index: 0,
            created_at: chrono::Utc::now(),
        };

        let mut game = self.game.write().await;
        game.teams.push(team.clone());

        tracing::info!(team_id = %team.id, name = %team.name, "Team created");
        self.persist(&game).await;
        team
    }

    pub async fn update_team(&self, team_id: &str, update: TeamUpdate) -> Result<Team, StoreError> {
        let mut game = self.game.write().await;
        let team = game
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or_else(|| StoreError::TeamNotFound(team_id.to_string()))?;

        if let Some(name) = update.name {
            team.name = name;
        }
        if let Some(members) = update.members {
            team.members = members;
        }
        if let Some(password) = update.password {
            team.password = password;
        }
        let updated = team.clone();

        tracing::info!(team_id = %team_id, "Team updated");
        self.persist(&game).await;
        Ok(updated)
    }

    /// Remove a team and every reaction aimed at it.
    /// Returns true if the team existed.
    pub async fn delete_team(&self, team_id: &str) -> bool {
        let mut game = self.game.write().await;
        let before = game.teams.len();
        game.teams.retain(|t| t.id != team_id);
        let removed = game.teams.len() != before;

        let before = game.reactions.len();
        game.reactions.retain(|r| r.team_id != team_id);
        let dropped_reactions = before - game.reactions.len();

        tracing::info!(team_id = %team_id, removed, dropped_reactions, "Team deleted");
        self.persist(&game).await;
        removed
    }

    /// Plain equality check against the stored event password
    pub async fn authenticate_team(&self, team_id: &str, password: &str) -> bool {
        let game = self.game.read().await;
        let ok = game
            .teams
            .iter()
            .any(|t| t.id == team_id && t.password == password);
        if !ok {
            tracing::debug!(team_id = %team_id, "Team authentication failed");
        }
        ok
    }
}
