//! Routes for step logging, resets, and leaderboard queries.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::steps::{ActionResponse, LeaderboardResponse, LogStepsRequest, StepTotal},
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Routes handling per-group step tracking.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/groups/{group}/steps", post(log_steps))
        .route("/groups/{group}/users/{user}/reset", post(reset_steps))
        .route("/groups/{group}/leaderboard", get(leaderboard))
}

/// Log a step delta for a participant in a group.
#[utoipa::path(
    post,
    path = "/groups/{group}/steps",
    tag = "steps",
    params(("group" = i64, Path, description = "Chat group identifier")),
    request_body = LogStepsRequest,
    responses(
        (status = 200, description = "Steps logged", body = StepTotal),
        (status = 400, description = "Invalid payload"),
        (status = 503, description = "Persistence failed; mutation rejected")
    )
)]
pub async fn log_steps(
    State(state): State<SharedState>,
    Path(group): Path<i64>,
    Json(payload): Json<LogStepsRequest>,
) -> Result<Json<StepTotal>, AppError> {
    payload.validate()?;
    let total = score_service::log_steps(&state, group, payload).await?;
    Ok(Json(total))
}

/// Reset a participant's step total to zero.
#[utoipa::path(
    post,
    path = "/groups/{group}/users/{user}/reset",
    tag = "steps",
    params(
        ("group" = i64, Path, description = "Chat group identifier"),
        ("user" = i64, Path, description = "Participant identifier")
    ),
    responses(
        (status = 200, description = "Steps reset", body = ActionResponse),
        (status = 404, description = "Participant never logged steps in this group")
    )
)]
pub async fn reset_steps(
    State(state): State<SharedState>,
    Path((group, user)): Path<(i64, i64)>,
) -> Result<Json<ActionResponse>, AppError> {
    score_service::reset_steps(&state, group, user).await?;
    Ok(Json(ActionResponse {
        status: "reset".into(),
    }))
}

/// Current leaderboard for a group.
#[utoipa::path(
    get,
    path = "/groups/{group}/leaderboard",
    tag = "steps",
    params(("group" = i64, Path, description = "Chat group identifier")),
    responses((status = 200, description = "Ranked standings", body = LeaderboardResponse))
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Path(group): Path<i64>,
) -> Json<LeaderboardResponse> {
    Json(score_service::leaderboard(&state, group).await)
}
