//! Command handling for the challenge lifecycle.

use crate::{
    dto::{
        challenge::{ChallengeConfirmed, ChallengeProposed, ChallengeStatus},
        format_timestamp,
    },
    error::ServiceError,
    state::SharedState,
};

/// Record a challenge proposal, replacing any earlier unconfirmed one.
pub async fn propose(state: &SharedState, days: u32) -> Result<ChallengeProposed, ServiceError> {
    state.propose_challenge(days).await?;
    Ok(ChallengeProposed { days })
}

/// Confirm the pending proposal and return the armed deadline.
pub async fn confirm(state: &SharedState) -> Result<ChallengeConfirmed, ServiceError> {
    let ends_at = state.confirm_challenge().await?;
    Ok(ChallengeConfirmed {
        ends_at: format_timestamp(ends_at),
    })
}

/// Current lifecycle phase of the challenge.
pub async fn status(state: &SharedState) -> ChallengeStatus {
    state.challenge_phase().await.into()
}
