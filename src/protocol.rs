//! Request and response bodies for the HTTP API.
//!
//! Mutating endpoints take an `action`-tagged JSON body. Field names are
//! camelCase on the wire.

use crate::error::StoreError;
use crate::state::{QuestionInput, QuestionUpdate, TeamUpdate};
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum GameAction {
    SetStatus { status: GameStatus },
    Reset,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TeamAction {
    Create {
        #[serde(default)]
        name: String,
        #[serde(default)]
        members: Vec<String>,
        #[serde(default)]
        password: String,
    },
    #[serde(rename_all = "camelCase")]
    Authenticate {
        team_id: TeamId,
        #[serde(default)]
        password: String,
    },
    #[serde(rename_all = "camelCase")]
    Update {
        team_id: TeamId,
        name: Option<String>,
        members: Option<Vec<String>>,
        password: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Delete { team_id: TeamId },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    #[serde(default)]
    pub target_answer: String,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum QuestionAction {
    #[serde(rename_all = "camelCase")]
    Create {
        #[serde(default)]
        target_answer: String,
        order: Option<i64>,
    },
    #[serde(rename_all = "camelCase")]
    Update {
        question_id: QuestionId,
        target_answer: Option<String>,
        order: Option<i64>,
    },
    #[serde(rename_all = "camelCase")]
    Delete { question_id: QuestionId },
    SetAll { questions: Vec<QuestionPayload> },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub team_id: TeamId,
    #[serde(default)]
    pub question_id: QuestionId,
    #[serde(default)]
    pub user_question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    #[serde(default)]
    pub question_id: QuestionId,
    #[serde(default)]
    pub team_id: TeamId,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuery {
    pub team_id: Option<TeamId>,
    pub question_id: Option<QuestionId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionQuery {
    pub question_id: Option<QuestionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: GameStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub success: bool,
    pub score: f64,
    pub question_id: QuestionId,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSummary {
    pub status: GameStatus,
    pub rankings: Vec<TeamRanking>,
    pub total_questions: usize,
    pub timestamp: DateTime<Utc>,
}

// ========== Boundary validation ==========

fn required(value: &str, field: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn clean_members(members: Vec<String>) -> Result<Vec<String>, StoreError> {
    let members: Vec<String> = members
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if members.is_empty() {
        return Err(StoreError::InvalidInput(
            "At least one member is required".to_string(),
        ));
    }
    Ok(members)
}

/// Validated fields for a new team
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeam {
    pub name: String,
    pub members: Vec<String>,
    pub password: String,
}

impl NewTeam {
    pub fn validate(name: &str, members: Vec<String>, password: &str) -> Result<Self, StoreError> {
        let name = required(name, "name")?;
        let members = clean_members(members)?;
        // Passwords are compared verbatim, so only emptiness is checked
        if password.is_empty() {
            return Err(StoreError::InvalidInput("password is required".to_string()));
        }
        Ok(Self {
            name,
            members,
            password: password.to_string(),
        })
    }
}

pub fn validate_team_update(
    name: Option<String>,
    members: Option<Vec<String>>,
    password: Option<String>,
) -> Result<TeamUpdate, StoreError> {
    if password.as_deref() == Some("") {
        return Err(StoreError::InvalidInput("password is required".to_string()));
    }
    Ok(TeamUpdate {
        name: name.map(|n| required(&n, "name")).transpose()?,
        members: members.map(clean_members).transpose()?,
        password,
    })
}

pub fn validate_target_answer(target_answer: &str) -> Result<String, StoreError> {
    required(target_answer, "targetAnswer")
}

pub fn validate_question_update(
    target_answer: Option<String>,
    order: Option<i64>,
) -> Result<QuestionUpdate, StoreError> {
    Ok(QuestionUpdate {
        target_answer: target_answer
            .map(|t| validate_target_answer(&t))
            .transpose()?,
        order,
    })
}

pub fn validate_question_bank(
    questions: Vec<QuestionPayload>,
) -> Result<Vec<QuestionInput>, StoreError> {
    questions
        .into_iter()
        .map(|q| {
            Ok(QuestionInput {
                target_answer: validate_target_answer(&q.target_answer)?,
                order: q.order,
            })
        })
        .collect()
}

impl SubmitAnswerRequest {
    pub fn validate(&self) -> Result<(), StoreError> {
        required(&self.team_id, "teamId")?;
        required(&self.question_id, "questionId")?;
        Ok(())
    }
}

impl ReactionRequest {
    pub fn validate(&self) -> Result<ReactionType, StoreError> {
        if self.question_id.is_empty()
            || self.team_id.is_empty()
            || self.kind.is_empty()
            || self.user_id.is_empty()
        {
            return Err(StoreError::InvalidInput(
                "Missing required fields".to_string(),
            ));
        }
        self.kind.parse().map_err(StoreError::InvalidInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_action_parsing() {
        let action: TeamAction = serde_json::from_str(
            r#"{"action":"create","name":"Owls","members":["Ana","Ben"],"password":"hoot"}"#,
        )
        .unwrap();
        assert!(matches!(action, TeamAction::Create { ref name, .. } if name == "Owls"));

        let action: TeamAction =
            serde_json::from_str(r#"{"action":"authenticate","teamId":"t1","password":"x"}"#)
                .unwrap();
        assert!(matches!(action, TeamAction::Authenticate { ref team_id, .. } if team_id == "t1"));

        assert!(serde_json::from_str::<TeamAction>(r#"{"action":"explode"}"#).is_err());
    }

    #[test]
    fn test_question_action_parsing() {
        let action: QuestionAction = serde_json::from_str(
            r#"{"action":"setAll","questions":[{"targetAnswer":"a"},{"targetAnswer":"b","order":5}]}"#,
        )
        .unwrap();
        match action {
            QuestionAction::SetAll { questions } => {
                assert_eq!(questions.len(), 2);
                assert_eq!(questions[1].order, Some(5));
            }
            other => panic!("Expected SetAll, got {:?}", other),
        }
    }

    #[test]
    fn test_game_action_accepts_legacy_status() {
        let action: GameAction =
            serde_json::from_str(r#"{"action":"setStatus","status":"진행중"}"#).unwrap();
        assert!(matches!(
            action,
            GameAction::SetStatus {
                status: GameStatus::Running
            }
        ));
    }

    #[test]
    fn test_new_team_validation() {
        let team = NewTeam::validate(
            "  Owls ",
            vec!["Ana".to_string(), "  ".to_string(), " Ben".to_string()],
            "hoot",
        )
        .unwrap();
        assert_eq!(team.name, "Owls");
        assert_eq!(team.members, vec!["Ana", "Ben"]);

        assert!(NewTeam::validate("", vec!["Ana".to_string()], "pw").is_err());
        assert!(NewTeam::validate("Owls", vec![], "pw").is_err());
        assert!(NewTeam::validate("Owls", vec!["Ana".to_string()], "").is_err());
    }

    #[test]
    fn test_reaction_request_validation() {
        let mut request = ReactionRequest {
            question_id: "q1".to_string(),
            team_id: "t1".to_string(),
            kind: "fire".to_string(),
            user_id: "viewer".to_string(),
        };
        assert_eq!(request.validate(), Ok(ReactionType::Fire));

        request.kind = "boo".to_string();
        assert!(matches!(request.validate(), Err(StoreError::InvalidInput(_))));

        request.kind = "fire".to_string();
        request.user_id = String::new();
        assert_eq!(
            request.validate(),
            Err(StoreError::InvalidInput("Missing required fields".to_string()))
        );
    }

    #[test]
    fn test_question_bank_validation() {
        let ok = validate_question_bank(vec![QuestionPayload {
            target_answer: " hello ".to_string(),
            order: None,
        }])
        .unwrap();
        assert_eq!(ok[0].target_answer, "hello");

        let err = validate_question_bank(vec![QuestionPayload {
            target_answer: "   ".to_string(),
            order: Some(1),
        }]);
        assert!(err.is_err());
    }
}
