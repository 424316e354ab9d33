use super::question::sorted_questions;
use super::reaction::count_reactions;
use super::AppState;
use crate::protocol::PollSummary;
use crate::types::*;
use std::cmp::Ordering;

/// Leaderboard over a consistent snapshot.
///
/// Higher total first; equal totals go to the team that registered earlier.
/// Progress is the answered share of the bank and is 0 with no questions.
pub fn rank_teams(game: &GameState) -> Vec<TeamRanking> {
    let mut teams: Vec<&Team> = game.teams.iter().collect();
    teams.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal)
            .then(a.created_at.cmp(&b.created_at))
    });

    let question_count = game.questions.len();
    teams
        .into_iter()
        .enumerate()
        .map(|(index, team)| TeamRanking {
            rank: index + 1,
            team: team.clone(),
            progress: if question_count == 0 {
                0.0
            } else {
                team.answers.len() as f64 / question_count as f64 * 100.0
            },
        })
        .collect()
}

/// Best answer for a question: highest score, earliest submission on ties
fn best_answer(game: &GameState, question_id: &str) -> Option<TeamAnswerInfo> {
    game.teams
        .iter()
        .filter_map(|team| team.answer_for(question_id).map(|answer| (team, answer)))
        .max_by(|(_, a), (_, b)| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then(b.submitted_at.cmp(&a.submitted_at))
        })
        .map(|(team, answer)| TeamAnswerInfo {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            user_question: answer.user_question.clone(),
            answer: answer.answer.clone(),
            score: answer.score,
        })
}

impl AppState {
    pub async fn get_team_rankings(&self) -> Vec<TeamRanking> {
        rank_teams(&*self.game.read().await)
    }

    /// Combined read for periodically refreshing clients
    pub async fn poll_summary(&self) -> PollSummary {
        let game = self.game.read().await;
        PollSummary {
            status: game.status,
            rankings: rank_teams(&game),
            total_questions: game.questions.len(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Questions in order, each with its reaction tally and best team answer
    pub async fn question_board(&self) -> Vec<QuestionBoardEntry> {
        let game = self.game.read().await;
        sorted_questions(&game.questions)
            .into_iter()
            .map(|question| QuestionBoardEntry {
                reactions: count_reactions(&game.reactions, &question.id),
                team_answer: best_answer(&game, &question.id),
                question,
            })
            .collect()
    }
}
