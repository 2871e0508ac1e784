//! Routes for the challenge lifecycle.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use validator::Validate;

use crate::{
    dto::challenge::{
        ChallengeConfirmed, ChallengeProposed, ChallengeStatus, ProposeChallengeRequest,
    },
    error::AppError,
    services::challenge_service,
    state::SharedState,
};

/// Routes handling challenge proposal, confirmation, and status.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/challenge", post(propose_challenge).get(challenge_status))
        .route("/challenge/confirm", post(confirm_challenge))
}

/// Propose a new challenge duration.
#[utoipa::path(
    post,
    path = "/challenge",
    tag = "challenge",
    request_body = ProposeChallengeRequest,
    responses(
        (status = 200, description = "Proposal recorded", body = ChallengeProposed),
        (status = 400, description = "Duration must be at least one day")
    )
)]
pub async fn propose_challenge(
    State(state): State<SharedState>,
    Json(payload): Json<ProposeChallengeRequest>,
) -> Result<Json<ChallengeProposed>, AppError> {
    payload.validate()?;
    let proposed = challenge_service::propose(&state, payload.days).await?;
    Ok(Json(proposed))
}

/// Confirm the pending proposal, starting the challenge.
#[utoipa::path(
    post,
    path = "/challenge/confirm",
    tag = "challenge",
    responses(
        (status = 200, description = "Challenge started", body = ChallengeConfirmed),
        (status = 409, description = "No duration has been proposed")
    )
)]
pub async fn confirm_challenge(
    State(state): State<SharedState>,
) -> Result<Json<ChallengeConfirmed>, AppError> {
    let confirmed = challenge_service::confirm(&state).await?;
    Ok(Json(confirmed))
}

/// Current challenge lifecycle phase.
#[utoipa::path(
    get,
    path = "/challenge",
    tag = "challenge",
    responses((status = 200, description = "Challenge status", body = ChallengeStatus))
)]
pub async fn challenge_status(State(state): State<SharedState>) -> Json<ChallengeStatus> {
    Json(challenge_service::status(&state).await)
}
