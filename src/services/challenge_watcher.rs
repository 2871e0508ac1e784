//! Challenge deadline watcher: concludes the running challenge and announces
//! per-group winners exactly once.

use std::time::Duration;

use tokio::time::interval;
use tracing::{info, warn};

use crate::services::notifier::Notifier;
use crate::state::{LeaderboardRow, SharedState};

/// Announcement sent to a group whose board is empty when the challenge ends.
pub const NO_WINNER_TEXT: &str =
    "The challenge has ended, but no steps were logged. 😭 You'll do better next time!";

/// Run the watcher loop until the process exits.
pub async fn run(state: SharedState, notifier: std::sync::Arc<dyn Notifier>, tick: Duration) {
    info!(tick_secs = tick.as_secs(), "challenge watcher started");
    let mut ticker = interval(tick);
    loop {
        ticker.tick().await;
        tick_once(&state, notifier.as_ref()).await;
    }
}

/// One polling cycle: conclude the challenge if its deadline has passed.
///
/// The conclusion itself is the atomic check-and-clear inside the state, so
/// this function announces winners at most once per armed deadline even with
/// several watcher instances polling.
pub(crate) async fn tick_once(state: &SharedState, notifier: &dyn Notifier) {
    let now = state.now();
    let Some(ended_at) = state.conclude_challenge_if_due(now).await else {
        return;
    };

    info!(%ended_at, "challenge deadline reached; announcing winners");

    // Winner data is snapshotted under the lock; sends happen after release,
    // and one failed group never silences the rest.
    for (group, rows) in state.group_leaderboards().await {
        let text = match rows.first() {
            Some(top) => winner_announcement(top),
            None => NO_WINNER_TEXT.to_owned(),
        };
        if let Err(err) = notifier.send_message(group, &text).await {
            warn!(%group, error = %err, "winner announcement delivery failed");
        }
    }

    if let Err(err) = state.resave().await {
        warn!(error = %err, "post-challenge snapshot save failed");
    }
}

/// The first leaderboard row is the winner: max steps, first-inserted on ties.
fn winner_announcement(top: &LeaderboardRow) -> String {
    format!(
        "🏁 *Challenge Over!*\n🥇 The winner is *{}* with *{}* steps!",
        top.name, top.steps
    )
}
