//! Payloads for step logging, resets, and leaderboard queries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::LeaderboardRow;

/// Payload used to log steps for one participant.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LogStepsRequest {
    /// Identifier of the participant within the group.
    pub user: i64,
    /// Display name to record; refreshed on every log.
    #[validate(length(min = 1, message = "display name must not be empty"))]
    pub name: String,
    /// Signed step delta. Negative values are accepted and applied as-is.
    pub steps: i64,
}

/// New running total returned after a successful log.
#[derive(Debug, Serialize, ToSchema)]
pub struct StepTotal {
    /// Display name as recorded.
    pub name: String,
    /// Running total after applying the delta.
    pub total: i64,
}

/// Acknowledgement for mutations without a richer payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Short machine-readable outcome, e.g. `"reset"`.
    pub status: String,
}

/// One ranked leaderboard entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based rank, descending by steps.
    pub rank: usize,
    /// Participant display name.
    pub name: String,
    /// Step total.
    pub steps: i64,
}

/// Ranked standings for one group.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Group the standings belong to.
    pub group: i64,
    /// Entries in rank order; empty when nobody logged yet.
    pub entries: Vec<LeaderboardEntry>,
}

impl LeaderboardResponse {
    /// Assemble the response from already-ranked rows.
    pub fn from_rows(group: i64, rows: Vec<LeaderboardRow>) -> Self {
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| LeaderboardEntry {
                rank: index + 1,
                name: row.name,
                steps: row.steps,
            })
            .collect();
        Self { group, entries }
    }
}
