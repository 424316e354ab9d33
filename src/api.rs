//! HTTP API endpoints.
//!
//! Thin adapter over [`AppState`]: decode and validate the request, call the
//! store, encode the result. Clients poll these endpoints; nothing is pushed.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, StoreError};
use crate::protocol::*;
use crate::scoring;
use crate::state::AppState;
use crate::types::*;

type ApiResult<T> = Result<T, AppError>;

/// All API routes, with state attached
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/game", get(get_game_state).post(game_action))
        .route("/api/teams", get(list_teams).post(team_action))
        .route("/api/teams/{team_id}", get(get_team))
        .route("/api/questions", get(list_questions).post(question_action))
        .route("/api/questions/board", get(question_board))
        .route("/api/answers", get(get_team_answer).post(submit_answer))
        .route("/api/reactions", get(get_reactions).post(add_reaction))
        .route("/api/poll", get(poll))
        .with_state(state)
}

/// GET /api/game
pub async fn get_game_state(State(state): State<Arc<AppState>>) -> Json<GameState> {
    Json(state.get_game_state().await)
}

/// POST /api/game
///
/// `setStatus` changes the status unconditionally, `reset` wipes all answers
/// and reactions.
pub async fn game_action(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GameAction>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(action) = payload?;
    match action {
        GameAction::SetStatus { status } => {
            state.set_game_status(status).await;
            Ok(Json(StatusResponse {
                success: true,
                status,
            })
            .into_response())
        }
        GameAction::Reset => {
            state.reset_game().await;
            Ok(Json(AckResponse::ok()).into_response())
        }
    }
}

/// GET /api/teams
pub async fn list_teams(State(state): State<Arc<AppState>>) -> Json<Vec<Team>> {
    Json(state.get_teams().await)
}

/// GET /api/teams/{team_id}
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> ApiResult<Json<Team>> {
    state
        .get_team(&team_id)
        .await
        .map(Json)
        .ok_or_else(|| StoreError::TeamNotFound(team_id).into())
}

/// POST /api/teams
pub async fn team_action(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TeamAction>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(action) = payload?;
    match action {
        TeamAction::Create {
            name,
            members,
            password,
        } => {
            let new_team = NewTeam::validate(&name, members, &password)?;
            let team = state
                .add_team(new_team.name, new_team.members, new_team.password)
                .await;
            Ok(Json(team).into_response())
        }
        TeamAction::Authenticate { team_id, password } => {
            if state.authenticate_team(&team_id, &password).await {
                let team = state.get_team(&team_id).await;
                Ok(Json(AuthResponse {
                    success: true,
                    team,
                })
                .into_response())
            } else {
                Ok((
                    StatusCode::UNAUTHORIZED,
                    Json(AuthResponse {
                        success: false,
                        team: None,
                    }),
                )
                    .into_response())
            }
        }
        TeamAction::Update {
            team_id,
            name,
            members,
            password,
        } => {
            let update = validate_team_update(name, members, password)?;
            let team = state.update_team(&team_id, update).await?;
            Ok(Json(team).into_response())
        }
        TeamAction::Delete { team_id } => {
            state.delete_team(&team_id).await;
            Ok(Json(AckResponse::ok()).into_response())
        }
    }
}

/// GET /api/questions
pub async fn list_questions(State(state): State<Arc<AppState>>) -> Json<Vec<Question>> {
    Json(state.get_questions().await)
}

/// GET /api/questions/board
pub async fn question_board(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<QuestionBoardEntry>> {
    Json(state.question_board().await)
}

/// POST /api/questions
pub async fn question_action(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuestionAction>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(action) = payload?;
    match action {
        QuestionAction::Create {
            target_answer,
            order,
        } => {
            let target_answer = validate_target_answer(&target_answer)?;
            // Without an explicit order the question goes to the end
            let question = match order {
                Some(order) => state.add_question(target_answer, order).await,
                None => state.append_question(target_answer).await,
            };
            Ok(Json(question).into_response())
        }
        QuestionAction::Update {
            question_id,
            target_answer,
            order,
        } => {
            let update = validate_question_update(target_answer, order)?;
            state.update_question(&question_id, update).await?;
            Ok(Json(AckResponse::ok()).into_response())
        }
        QuestionAction::Delete { question_id } => {
            state.delete_question(&question_id).await;
            Ok(Json(AckResponse::ok()).into_response())
        }
        QuestionAction::SetAll { questions } => {
            let inputs = validate_question_bank(questions)?;
            state.set_questions(inputs).await;
            Ok(Json(AckResponse::ok()).into_response())
        }
    }
}

/// POST /api/answers
///
/// Scores the reply against the question's target answer and records it.
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> ApiResult<Json<SubmitAnswerResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let result = state
        .submit_scored_answer(
            &request.team_id,
            &request.question_id,
            request.user_question,
            request.answer,
        )
        .await?;

    Ok(Json(SubmitAnswerResponse {
        success: true,
        score: result.score,
        question_id: result.question_id,
        feedback: scoring::score_feedback(result.score).to_string(),
    }))
}

/// GET /api/answers?teamId=..&questionId=..
///
/// Responds with `null` when the team has not answered the question.
pub async fn get_team_answer(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnswerQuery>,
) -> ApiResult<Json<Option<Answer>>> {
    let (Some(team_id), Some(question_id)) = (query.team_id, query.question_id) else {
        return Err(AppError::BadRequest(
            "teamId and questionId are required".to_string(),
        ));
    };
    Ok(Json(state.get_team_answer(&team_id, &question_id).await))
}

/// POST /api/reactions
pub async fn add_reaction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReactionRequest>, JsonRejection>,
) -> ApiResult<Json<Reaction>> {
    let Json(request) = payload?;
    let kind = request.validate()?;
    let reaction = state
        .add_reaction(&request.question_id, &request.team_id, kind, &request.user_id)
        .await;
    Ok(Json(reaction))
}

/// GET /api/reactions[?questionId=..]
///
/// With a question id: zero-filled counts per reaction type.
/// Without: every reaction.
pub async fn get_reactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReactionQuery>,
) -> Response {
    // An empty questionId counts as absent
    match query.question_id.filter(|id| !id.is_empty()) {
        Some(question_id) => Json(state.get_reaction_counts(&question_id).await).into_response(),
        None => Json(state.get_reactions(None).await).into_response(),
    }
}

/// GET /api/poll
pub async fn poll(State(state): State<Arc<AppState>>) -> Json<PollSummary> {
    Json(state.poll_summary().await)
}
