//! On-disk score snapshot layout and composite-key helpers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::state::scores::{GroupId, UserId};

/// Persisted value for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntity {
    /// Latest known display name.
    pub name: String,
    /// Running step total.
    pub steps: i64,
}

/// Full persisted record set, one JSON object keyed by `"group:user"`.
///
/// An [`IndexMap`] keeps the document order stable across save/load cycles,
/// which is what preserves the leaderboard tie-break across restarts.
pub type ScoreSnapshot = IndexMap<String, ScoreEntity>;

/// Render the composite `"group:user"` key for a participant.
pub fn score_key(group: GroupId, user: UserId) -> String {
    format!("{group}:{user}")
}

/// Parse a composite key back into its identifiers.
///
/// Returns `None` for keys that do not split into two integers; group ids may
/// be negative, so only the first `:` separates the parts.
pub fn parse_score_key(key: &str) -> Option<(GroupId, UserId)> {
    let (group, user) = key.split_once(':')?;
    Some((GroupId(group.parse().ok()?), UserId(user.parse().ok()?)))
}
