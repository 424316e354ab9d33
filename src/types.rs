use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Opaque ID types for type safety
pub type TeamId = String;
pub type QuestionId = String;
pub type ReactionId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    #[serde(alias = "준비중")]
    Preparing,
    #[serde(alias = "진행중")]
    Running,
    #[serde(alias = "종료")]
    Ended,
}

/// Audience reaction kinds. Declaration order is the display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    #[serde(alias = "좋아요")]
    Like,
    #[serde(alias = "박수")]
    Clap,
    #[serde(alias = "불")]
    Fire,
    #[serde(alias = "하트")]
    Heart,
    #[serde(alias = "웃음")]
    Laugh,
}

impl ReactionType {
    pub const ALL: [ReactionType; 5] = [
        ReactionType::Like,
        ReactionType::Clap,
        ReactionType::Fire,
        ReactionType::Heart,
        ReactionType::Laugh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Like => "like",
            ReactionType::Clap => "clap",
            ReactionType::Fire => "fire",
            ReactionType::Heart => "heart",
            ReactionType::Laugh => "laugh",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "like" | "좋아요" => Ok(ReactionType::Like),
            "clap" | "박수" => Ok(ReactionType::Clap),
            "fire" | "불" => Ok(ReactionType::Fire),
            "heart" | "하트" => Ok(ReactionType::Heart),
            "laugh" | "웃음" => Ok(ReactionType::Laugh),
            other => Err(format!("Unknown reaction type: {}", other)),
        }
    }
}

/// Zero-filled reaction tally covering every [`ReactionType`].
pub type ReactionCounts = BTreeMap<ReactionType, u32>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    /// The text teams need to coax out of the chatbot
    pub target_answer: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    /// Prompt the team wrote for the chatbot
    pub user_question: String,
    /// Reply the chatbot produced
    pub answer: String,
    pub score: f64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<String>,
    /// Plaintext event credential, shown to the admin
    pub password: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub current_question_index: usize,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Recompute the derived fields after the answer set changed.
    pub fn recompute(&mut self, question_count: usize) {
        let sum: f64 = self.answers.iter().map(|a| a.score).sum();
        self.total_score = (sum * 10.0).round() / 10.0;
        self.current_question_index = self
            .answers
            .len()
            .min(question_count.saturating_sub(1));
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: ReactionId,
    pub question_id: QuestionId,
    pub team_id: TeamId,
    #[serde(rename = "type")]
    pub kind: ReactionType,
    /// Arbitrary token identifying the viewer who reacted
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// The root aggregate. This is also the on-disk snapshot format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub status: GameStatus,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamRanking {
    pub rank: usize,
    pub team: Team,
    /// Answered share of the question bank, 0..=100
    pub progress: f64,
}

/// Best submission shown next to a question on the scoreboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamAnswerInfo {
    pub team_id: TeamId,
    pub team_name: String,
    pub user_question: String,
    pub answer: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBoardEntry {
    #[serde(flatten)]
    pub question: Question,
    pub reactions: ReactionCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_answer: Option<TeamAnswerInfo>,
}
