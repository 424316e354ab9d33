use super::{prune_orphans, AppState};
use crate::error::StoreError;
use crate::types::*;

/// Question supplied in a bulk replace. Missing `order` defaults to list position.
#[derive(Debug, Clone)]
pub struct QuestionInput {
    pub target_answer: String,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub target_answer: Option<String>,
    pub order: Option<i64>,
}

/// Questions sorted by `order`; ties keep insertion order
pub(crate) fn sorted_questions(questions: &[Question]) -> Vec<Question> {
    let mut sorted = questions.to_vec();
    sorted.sort_by_key(|q| q.order);
    sorted
}

impl AppState {
    /// All questions in presentation order
    pub async fn get_questions(&self) -> Vec<Question> {
        sorted_questions(&self.game.read().await.questions)
    }

    pub async fn get_question(&self, question_id: &str) -> Option<Question> {
        self.game
            .read()
            .await
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .cloned()
    }

    pub async fn add_question(&self, target_answer: String, order: i64) -> Question {
        self.insert_question(target_answer, Some(order)).await
    }

    /// Add a question after the current bank; its order is the bank size
    pub async fn append_question(&self, target_answer: String) -> Question {
        self.insert_question(target_answer, None).await
    }

    async fn insert_question(&self, target_answer: String, order: Option<i64>) -> Question {
        let mut game = self.game.write().await;
        let order = order.unwrap_or(game.questions.len() as i64);
        let question = Question {
            id: ulid::Ulid::new().to_string(),
            target_answer,
            order,
        };
        game.questions.push(question.clone());

        tracing::info!(question_id = %question.id, order, "Question created");
        self.persist(&game).await;
        question
    }

    pub async fn update_question(
        &self,
        question_id: &str,
        update: QuestionUpdate,
    ) -> Result<Question, StoreError> {
        let mut game = self.game.write().await;
        let question = game
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.to_string()))?;

        if let Some(target_answer) = update.target_answer {
            question.target_answer = target_answer;
        }
        if let Some(order) = update.order {
            question.order = order;
        }
        let updated = question.clone();

        tracing::info!(question_id = %question_id, "Question updated");
        self.persist(&game).await;
        Ok(updated)
    }

    /// Remove a question along with the reactions and answers that reference it.
    /// Returns true if the question existed.
    pub async fn delete_question(&self, question_id: &str) -> bool {
        let mut game = self.game.write().await;
        let before = game.questions.len();
        game.questions.retain(|q| q.id != question_id);
        let removed = game.questions.len() != before;

        if removed {
            prune_orphans(&mut game);
        }

        tracing::info!(question_id = %question_id, removed, "Question deleted");
        self.persist(&game).await;
        removed
    }

    /// Replace the whole question bank with fresh ids.
    ///
    /// Answers and reactions tied to the old questions are removed and team
    /// scores recomputed.
    pub async fn set_questions(&self, inputs: Vec<QuestionInput>) -> Vec<Question> {
        let questions: Vec<Question> = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| Question {
                id: ulid::Ulid::new().to_string(),
                target_answer: input.target_answer,
                order: input.order.unwrap_or(index as i64),
            })
            .collect();

        let mut game = self.game.write().await;
        game.questions = questions;
        prune_orphans(&mut game);

        tracing::info!(count = game.questions.len(), "Question bank replaced");
        self.persist(&game).await;
        sorted_questions(&game.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str) -> QuestionInput {
        QuestionInput {
            target_answer: text.to_string(),
            order: None,
        }
    }

    #[tokio::test]
    async fn test_questions_are_sorted_by_order_on_read() {
        let state = AppState::new();
        state.add_question("third".to_string(), 3).await;
        state.add_question("first".to_string(), 1).await;
        state.add_question("second".to_string(), 2).await;
        state.add_question("also third".to_string(), 3).await;

        let texts: Vec<_> = state
            .get_questions()
            .await
            .into_iter()
            .map(|q| q.target_answer)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third", "also third"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_orders() {
        let state = AppState::new();
        state.add_question("first".to_string(), 0).await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                state.append_question(format!("q{i}")).await.order
            }));
        }
        let mut orders = Vec::new();
        for handle in handles {
            orders.push(handle.await.unwrap());
        }

        orders.sort();
        assert_eq!(orders, (1..=20).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_update_question() {
        let state = AppState::new();
        let question = state.add_question("old".to_string(), 0).await;

        let updated = state
            .update_question(
                &question.id,
                QuestionUpdate {
                    target_answer: Some("new".to_string()),
                    order: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.target_answer, "new");
        assert_eq!(updated.order, 0);
        assert_eq!(state.get_question(&question.id).await, Some(updated));

        let missing = state
            .update_question("nope", QuestionUpdate::default())
            .await;
        assert_eq!(missing, Err(StoreError::QuestionNotFound("nope".to_string())));
    }

    #[tokio::test]
    async fn test_delete_question_cascades() {
        let state = AppState::new();
        let team = state
            .add_team("Owls".to_string(), vec!["Ana".to_string()], "pw".to_string())
            .await;
        let keep = state.add_question("keep".to_string(), 0).await;
        let gone = state.add_question("gone".to_string(), 1).await;
        state
            .submit_answer(&team.id, &keep.id, "p".into(), "a".into(), 4.0)
            .await;
        state
            .submit_answer(&team.id, &gone.id, "p".into(), "a".into(), 6.0)
            .await;
        state.add_reaction(&gone.id, &team.id, ReactionType::Heart, "v").await;
        state.add_reaction(&keep.id, &team.id, ReactionType::Heart, "v").await;

        assert!(state.delete_question(&gone.id).await);

        let team = state.get_team(&team.id).await.unwrap();
        assert_eq!(team.answers.len(), 1);
        assert_eq!(team.total_score, 4.0);
        assert_eq!(state.get_reactions(None).await.len(), 1);
        assert!(!state.delete_question(&gone.id).await);
    }

    #[tokio::test]
    async fn test_set_questions_replaces_bank() {
        let state = AppState::new();
        let mut old_ids = Vec::new();
        for i in 0..5 {
            old_ids.push(state.add_question(format!("q{i}"), i).await.id);
        }

        state
            .set_questions(vec![input("alpha"), input("beta")])
            .await;

        let questions = state.get_questions().await;
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].order, 0);
        assert_eq!(questions[1].order, 1);
        assert_eq!(questions[0].target_answer, "alpha");
        assert!(questions.iter().all(|q| !old_ids.contains(&q.id)));
        assert_ne!(questions[0].id, questions[1].id);
    }

    #[tokio::test]
    async fn test_set_questions_keeps_explicit_order() {
        let state = AppState::new();
        let questions = state
            .set_questions(vec![
                QuestionInput {
                    target_answer: "later".to_string(),
                    order: Some(10),
                },
                input("first"),
            ])
            .await;

        assert_eq!(questions[0].target_answer, "first");
        assert_eq!(questions[0].order, 1);
        assert_eq!(questions[1].order, 10);
    }

    #[tokio::test]
    async fn test_set_questions_removes_stale_references() {
        let state = AppState::new();
        let team = state
            .add_team("Owls".to_string(), vec!["Ana".to_string()], "pw".to_string())
            .await;
        let question = state.add_question("old".to_string(), 0).await;
        state
            .submit_answer(&team.id, &question.id, "p".into(), "old".into(), 10.0)
            .await;
        state
            .add_reaction(&question.id, &team.id, ReactionType::Like, "v")
            .await;

        state.set_questions(vec![input("new")]).await;

        let team = state.get_team(&team.id).await.unwrap();
        assert!(team.answers.is_empty());
        assert_eq!(team.total_score, 0.0);
        assert!(state.get_reactions(None).await.is_empty());
    }
}
