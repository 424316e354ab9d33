use super::AppState;
use crate::error::StoreError;
use crate::scoring;
use crate::types::*;

/// Outcome of a scored submission
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSubmission {
    pub question_id: QuestionId,
    pub score: f64,
    /// False when the team id did not resolve and nothing was stored
    pub recorded: bool,
}

/// Insert or replace the team's answer for `answer.question_id`.
/// Returns false if the team does not exist.
fn upsert_answer(game: &mut GameState, team_id: &str, answer: Answer) -> bool {
    let question_count = game.questions.len();
    let Some(team) = game.teams.iter_mut().find(|t| t.id == team_id) else {
        return false;
    };

    match team
        .answers
        .iter_mut()
        .find(|a| a.question_id == answer.question_id)
    {
        Some(existing) => *existing = answer,
        None => team.answers.push(answer),
    }
    team.recompute(question_count);
    true
}

impl AppState {
    /// Record a team's answer with an already computed score.
    ///
    /// Resubmitting for the same question replaces the earlier answer. An
    /// unknown team id is a silent no-op and returns `None`.
    pub async fn submit_answer(
        &self,
        team_id: &str,
        question_id: &str,
        user_question: String,
        answer: String,
        score: f64,
    ) -> Option<Answer> {
        let record = Answer {
            question_id: question_id.to_string(),
            user_question,
            answer,
            score,
            submitted_at: chrono::Utc::now(),
        };

        let mut game = self.game.write().await;
        if !upsert_answer(&mut game, team_id, record.clone()) {
            tracing::warn!(team_id = %team_id, "Ignoring answer for unknown team");
            return None;
        }

        self.persist(&game).await;
        Some(record)
    }

    /// Validate, score and record a submission in one exclusive step.
    ///
    /// Rejects with `GameNotRunning` or `QuestionNotFound` before any scoring
    /// happens. When the answer length guard is enabled, out-of-range replies
    /// are rejected as `InvalidInput`.
    pub async fn submit_scored_answer(
        &self,
        team_id: &str,
        question_id: &str,
        user_question: String,
        answer: String,
    ) -> Result<ScoredSubmission, StoreError> {
        let mut game = self.game.write().await;

        if game.status != GameStatus::Running {
            return Err(StoreError::GameNotRunning);
        }

        let target = game
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .map(|q| q.target_answer.clone())
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.to_string()))?;

        let policy = self.answer_length;
        if policy.enforce && !scoring::validate_answer_length(&answer, policy.min, policy.max) {
            return Err(StoreError::InvalidInput(format!(
                "Answer must be between {} and {} characters",
                policy.min, policy.max
            )));
        }

        let score = scoring::score(&answer, &target, &[]);
        let record = Answer {
            question_id: question_id.to_string(),
            user_question,
            answer,
            score,
            submitted_at: chrono::Utc::now(),
        };

        let recorded = upsert_answer(&mut game, team_id, record);
        if recorded {
            tracing::info!(team_id = %team_id, question_id = %question_id, score, "Answer scored");
            self.persist(&game).await;
        } else {
            tracing::warn!(team_id = %team_id, "Scored answer for unknown team was not stored");
        }

        Ok(ScoredSubmission {
            question_id: question_id.to_string(),
            score,
            recorded,
        })
    }

    pub async fn get_team_answer(&self, team_id: &str, question_id: &str) -> Option<Answer> {
        let game = self.game.read().await;
        game.teams
            .iter()
            .find(|t| t.id == team_id)
            .and_then(|t| t.answer_for(question_id))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnswerLengthPolicy;

    async fn running_game() -> (AppState, Team, Question) {
        let state = AppState::new();
        let team = state
            .add_team("Owls".to_string(), vec!["Ana".to_string()], "pw".to_string())
            .await;
        let question = state
            .add_question("더 나은 세상을 만드는 연결".to_string(), 0)
            .await;
        state.add_question("second target".to_string(), 1).await;
        state.set_game_status(GameStatus::Running).await;
        (state, team, question)
    }

    #[tokio::test]
    async fn test_resubmission_replaces_answer() {
        let (state, team, question) = running_game().await;

        state
            .submit_answer(&team.id, &question.id, "p1".into(), "a1".into(), 3.0)
            .await
            .unwrap();
        state
            .submit_answer(&team.id, &question.id, "p2".into(), "a2".into(), 8.5)
            .await
            .unwrap();

        let team = state.get_team(&team.id).await.unwrap();
        assert_eq!(team.answers.len(), 1);
        assert_eq!(team.total_score, 8.5);
        assert_eq!(team.answers[0].user_question, "p2");
        assert_eq!(team.current_question_index, 1);
    }

    #[tokio::test]
    async fn test_identical_submission_is_idempotent() {
        let (state, team, question) = running_game().await;

        for _ in 0..2 {
            state
                .submit_scored_answer(&team.id, &question.id, "p".into(), "세상을 연결".into())
                .await
                .unwrap();
        }

        let team = state.get_team(&team.id).await.unwrap();
        assert_eq!(team.answers.len(), 1);
        assert_eq!(team.total_score, team.answers[0].score);
    }

    #[tokio::test]
    async fn test_total_score_is_sum_of_answers() {
        let (state, team, question) = running_game().await;
        let second = state.get_questions().await[1].clone();

        state
            .submit_answer(&team.id, &question.id, "p".into(), "a".into(), 7.3)
            .await;
        state
            .submit_answer(&team.id, &second.id, "p".into(), "a".into(), 2.1)
            .await;

        let team = state.get_team(&team.id).await.unwrap();
        assert_eq!(team.total_score, 9.4);
        // Index is capped at the last question
        assert_eq!(team.current_question_index, 1);
    }

    #[tokio::test]
    async fn test_unknown_team_is_silent_noop() {
        let (state, _team, question) = running_game().await;
        let before = state.get_game_state().await;

        let result = state
            .submit_answer("ghost", &question.id, "p".into(), "a".into(), 5.0)
            .await;
        assert!(result.is_none());

        let scored = state
            .submit_scored_answer("ghost", &question.id, "p".into(), "a".into())
            .await
            .unwrap();
        assert!(!scored.recorded);
        assert_eq!(state.get_game_state().await, before);
    }

    #[tokio::test]
    async fn test_exact_match_scores_ten() {
        let (state, team, question) = running_game().await;

        let result = state
            .submit_scored_answer(
                &team.id,
                &question.id,
                "슬로건을 말해줘".into(),
                "  더 나은 세상을 만드는   연결 ".into(),
            )
            .await
            .unwrap();

        assert_eq!(result.score, 10.0);
        assert!(result.recorded);
        assert_eq!(result.question_id, question.id);
        let stored = state.get_team_answer(&team.id, &question.id).await.unwrap();
        assert_eq!(stored.score, 10.0);
    }

    #[tokio::test]
    async fn test_submission_rejected_when_not_running() {
        let (state, team, question) = running_game().await;
        state.set_game_status(GameStatus::Preparing).await;

        let result = state
            .submit_scored_answer(&team.id, &question.id, "p".into(), "answer".into())
            .await;

        assert_eq!(result, Err(StoreError::GameNotRunning));
        let team = state.get_team(&team.id).await.unwrap();
        assert!(team.answers.is_empty());
        assert_eq!(team.total_score, 0.0);
    }

    #[tokio::test]
    async fn test_submission_rejected_for_unknown_question() {
        let (state, team, _question) = running_game().await;

        let result = state
            .submit_scored_answer(&team.id, "missing", "p".into(), "answer".into())
            .await;

        assert_eq!(result, Err(StoreError::QuestionNotFound("missing".to_string())));
    }

    #[tokio::test]
    async fn test_length_guard_when_enforced() {
        let (state, team, question) = running_game().await;
        let state = state.with_answer_length(AnswerLengthPolicy {
            enforce: true,
            min: 5,
            max: 20,
        });

        let result = state
            .submit_scored_answer(&team.id, &question.id, "p".into(), " hi ".into())
            .await;
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));

        let result = state
            .submit_scored_answer(&team.id, &question.id, "p".into(), "long enough".into())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_team_answer_missing() {
        let (state, team, question) = running_game().await;
        assert!(state.get_team_answer(&team.id, &question.id).await.is_none());
        assert!(state.get_team_answer("ghost", &question.id).await.is_none());
    }
}
