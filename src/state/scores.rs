//! In-memory score board: per-(group, user) step counters with stable ordering.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::dao::models::{ScoreSnapshot, parse_score_key, score_key};

/// Identifier of a chat group, opaque to the core (Telegram groups are negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a participant within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Latest known display name and running step total for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Display name, overwritten on every increment.
    pub name: String,
    /// Running total. Deltas are signed and nothing clamps, so this can go
    /// negative if callers log negative steps.
    pub steps: i64,
}

/// Error raised when resetting a participant that never logged steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no steps recorded for user {user} in group {group}")]
pub struct UnknownParticipant {
    /// Group the reset targeted.
    pub group: GroupId,
    /// Participant the reset targeted.
    pub user: UserId,
}

/// One row of a group leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// Participant display name.
    pub name: String,
    /// Step total at snapshot time.
    pub steps: i64,
}

/// Insertion-ordered map of participants to their records.
///
/// Insertion order is the tie-break for equal step totals, so the map must
/// preserve it across mutations; records are never removed, only zeroed.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    records: IndexMap<(GroupId, UserId), ScoreRecord>,
}

impl ScoreBoard {
    /// Rebuild a board from a persisted snapshot, keeping the stored order.
    ///
    /// Malformed composite keys are skipped with a warning rather than
    /// aborting startup.
    pub fn from_snapshot(snapshot: &ScoreSnapshot) -> Self {
        let mut board = Self::default();
        for (key, entity) in snapshot {
            match parse_score_key(key) {
                Some((group, user)) => {
                    board.records.insert(
                        (group, user),
                        ScoreRecord {
                            name: entity.name.clone(),
                            steps: entity.steps,
                        },
                    );
                }
                None => warn!(%key, "skipping malformed score key in snapshot"),
            }
        }
        board
    }

    /// Project the board into the persisted `"group:user"`-keyed layout.
    pub fn snapshot(&self) -> ScoreSnapshot {
        self.records
            .iter()
            .map(|(&(group, user), record)| {
                (
                    score_key(group, user),
                    crate::dao::models::ScoreEntity {
                        name: record.name.clone(),
                        steps: record.steps,
                    },
                )
            })
            .collect()
    }

    /// Apply a signed step delta, creating the record at zero if absent.
    ///
    /// The display name is refreshed on every call. Returns the new total.
    pub fn increment(&mut self, group: GroupId, user: UserId, name: &str, delta: i64) -> i64 {
        let record = self
            .records
            .entry((group, user))
            .or_insert_with(|| ScoreRecord {
                name: name.to_owned(),
                steps: 0,
            });
        record.name = name.to_owned();
        record.steps += delta;
        record.steps
    }

    /// Zero an existing participant's total.
    ///
    /// Unknown participants are an error, not a silent no-op; resetting an
    /// already-zero record succeeds.
    pub fn reset(&mut self, group: GroupId, user: UserId) -> Result<(), UnknownParticipant> {
        match self.records.get_mut(&(group, user)) {
            Some(record) => {
                record.steps = 0;
                Ok(())
            }
            None => Err(UnknownParticipant { group, user }),
        }
    }

    /// Ranked rows for one group: descending by steps, ties in insertion order.
    ///
    /// A group nobody logged into yields an empty vec, not an error.
    pub fn leaderboard(&self, group: GroupId) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self
            .records
            .iter()
            .filter(|&(&(record_group, _), _)| record_group == group)
            .map(|(_, record)| LeaderboardRow {
                name: record.name.clone(),
                steps: record.steps,
            })
            .collect();
        // Stable sort keeps first-inserted ahead among equal totals.
        rows.sort_by(|a, b| b.steps.cmp(&a.steps));
        rows
    }

    /// Distinct groups with at least one record, in first-seen order.
    pub fn groups(&self) -> Vec<GroupId> {
        let mut groups = Vec::new();
        for &(group, _) in self.records.keys() {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }
}
