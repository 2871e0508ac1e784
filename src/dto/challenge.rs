//! Payloads for the challenge lifecycle endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::format_timestamp;
use crate::state::ChallengePhase;

/// Payload proposing a new challenge duration.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ProposeChallengeRequest {
    /// Challenge length in days; must be at least one.
    #[validate(range(min = 1, message = "challenge duration must be at least one day"))]
    pub days: u32,
}

/// Acknowledgement of a recorded proposal.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeProposed {
    /// Proposed duration in days, awaiting confirmation.
    pub days: u32,
}

/// Deadline returned once a challenge is confirmed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeConfirmed {
    /// RFC 3339 deadline of the now-active challenge.
    pub ends_at: String,
}

/// Snapshot of the challenge lifecycle for status queries.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChallengeStatus {
    /// One of `"idle"`, `"proposed"`, `"active"`.
    pub phase: String,
    /// Proposed duration, when one is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// RFC 3339 deadline, when a challenge is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
}

impl From<ChallengePhase> for ChallengeStatus {
    fn from(phase: ChallengePhase) -> Self {
        match phase {
            ChallengePhase::Idle => Self {
                phase: "idle".into(),
                days: None,
                ends_at: None,
            },
            ChallengePhase::Proposed { days } => Self {
                phase: "proposed".into(),
                days: Some(days),
                ends_at: None,
            },
            ChallengePhase::Active { ends_at } => Self {
                phase: "active".into(),
                days: None,
                ends_at: Some(format_timestamp(ends_at)),
            },
        }
    }
}
