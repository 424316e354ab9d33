use super::AppState;
use crate::types::*;

/// Tally reactions for one question across every reaction type
pub(crate) fn count_reactions(reactions: &[Reaction], question_id: &str) -> ReactionCounts {
    let mut counts: ReactionCounts = ReactionType::ALL.iter().map(|k| (*k, 0)).collect();
    for reaction in reactions.iter().filter(|r| r.question_id == question_id) {
        *counts.entry(reaction.kind).or_insert(0) += 1;
    }
    counts
}

impl AppState {
    /// Append an audience reaction. Repeated reactions all count.
    pub async fn add_reaction(
        &self,
        question_id: &str,
        team_id: &str,
        kind: ReactionType,
        user_id: &str,
    ) -> Reaction {
        let reaction = Reaction {
            id: ulid::Ulid::new().to_string(),
            question_id: question_id.to_string(),
            team_id: team_id.to_string(),
            kind,
            user_id: user_id.to_string(),
            created_at: chrono::Utc::now(),
        };

        let mut game = self.game.write().await;
        game.reactions.push(reaction.clone());

        tracing::debug!(question_id = %question_id, team_id = %team_id, kind = %kind, "Reaction added");
        self.persist(&game).await;
        reaction
    }

    /// All reactions, optionally limited to one question
    pub async fn get_reactions(&self, question_id: Option<&str>) -> Vec<Reaction> {
        let game = self.game.read().await;
        match question_id {
            Some(qid) => game
                .reactions
                .iter()
                .filter(|r| r.question_id == qid)
                .cloned()
                .collect(),
            None => game.reactions.clone(),
        }
    }

    pub async fn get_reaction_counts(&self, question_id: &str) -> ReactionCounts {
        count_reactions(&self.game.read().await.reactions, question_id)
    }
}
