//! Command handling for step logging, resets, and leaderboard queries.

use crate::{
    dto::steps::{LeaderboardResponse, LogStepsRequest, StepTotal},
    error::ServiceError,
    state::{GroupId, SharedState, UserId},
};

/// Apply a step delta for a participant, creating their record on first use.
pub async fn log_steps(
    state: &SharedState,
    group: i64,
    request: LogStepsRequest,
) -> Result<StepTotal, ServiceError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "display name must not be empty".into(),
        ));
    }

    let total = state
        .log_steps(GroupId(group), UserId(request.user), name, request.steps)
        .await?;

    Ok(StepTotal {
        name: name.to_owned(),
        total,
    })
}

/// Zero a participant's total; unknown participants are a `NotFound`.
pub async fn reset_steps(state: &SharedState, group: i64, user: i64) -> Result<(), ServiceError> {
    state.reset_steps(GroupId(group), UserId(user)).await
}

/// Ranked standings for one group; empty for groups nobody logged into.
pub async fn leaderboard(state: &SharedState, group: i64) -> LeaderboardResponse {
    let rows = state.leaderboard(GroupId(group)).await;
    LeaderboardResponse::from_rows(group, rows)
}
