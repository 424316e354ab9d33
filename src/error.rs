use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

use crate::types::{QuestionId, TeamId};

/// Rejections raised by game store operations
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Game is not running")]
    GameNotRunning,
    #[error("Question not found: {0}")]
    QuestionNotFound(QuestionId),
    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::QuestionNotFound(_) | StoreError::TeamNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            StoreError::GameNotRunning | StoreError::InvalidInput(_) => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let payload = Json(ErrorBody {
            error: self.to_string(),
        });

        (status, payload).into_response()
    }
}
