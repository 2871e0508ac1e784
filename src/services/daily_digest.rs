//! Daily reminder and leaderboard broadcasts, fired at most once per calendar
//! date per event kind.

use std::time::Duration;

use time::Date;
use tokio::time::interval;
use tracing::{info, warn};

use crate::services::notifier::Notifier;
use crate::state::{LeaderboardRow, SharedState};

/// Nightly nudge sent to every group with at least one record.
pub const REMINDER_TEXT: &str = "🌙 Don't forget to log your steps before the day ends!";
/// Header prepended to the daily standings broadcast.
pub const DIGEST_HEADER: &str = "⭐ Daily Leaderboard:";

/// Target hours and polling cadence for the daily events.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Hour (0-23) at which the reminder fires.
    pub reminder_hour: u8,
    /// Hour (0-23) at which the leaderboard digest fires.
    pub leaderboard_hour: u8,
    /// Polling cadence; must stay below an hour so no window is skipped.
    pub tick: Duration,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            reminder_hour: 21,
            leaderboard_hour: 18,
            tick: Duration::from_secs(30),
        }
    }
}

/// Last-fired calendar date per daily event kind.
///
/// An event fires when the current hour matches its target and its cursor
/// date is not today; the cursor then moves to today, which caps each event
/// at once per date however often the loop ticks inside the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayCursor {
    reminder: Option<Date>,
    leaderboard: Option<Date>,
}

impl DayCursor {
    /// Seed the cursor at startup.
    ///
    /// Events whose hour already started (or passed) today are marked as
    /// fired, so a restart inside the window never double-sends; a window the
    /// process slept through entirely is skipped, never backfilled.
    pub fn seeded(now: time::OffsetDateTime, config: &DigestConfig) -> Self {
        let today = now.date();
        Self {
            reminder: (now.hour() >= config.reminder_hour).then_some(today),
            leaderboard: (now.hour() >= config.leaderboard_hour).then_some(today),
        }
    }
}

/// Run the digest loop until the process exits.
pub async fn run(state: SharedState, notifier: std::sync::Arc<dyn Notifier>, config: DigestConfig) {
    let mut cursor = DayCursor::seeded(state.now(), &config);
    info!(
        reminder_hour = config.reminder_hour,
        leaderboard_hour = config.leaderboard_hour,
        "daily digest loop started"
    );

    let mut ticker = interval(config.tick);
    loop {
        ticker.tick().await;
        tick_once(&state, notifier.as_ref(), &config, &mut cursor).await;
    }
}

/// One polling cycle: check both event windows against a single "now".
pub(crate) async fn tick_once(
    state: &SharedState,
    notifier: &dyn Notifier,
    config: &DigestConfig,
    cursor: &mut DayCursor,
) {
    let now = state.now();
    let today = now.date();

    if now.hour() == config.reminder_hour && cursor.reminder != Some(today) {
        broadcast_reminder(state, notifier).await;
        cursor.reminder = Some(today);
    }

    if now.hour() == config.leaderboard_hour && cursor.leaderboard != Some(today) {
        broadcast_leaderboards(state, notifier).await;
        cursor.leaderboard = Some(today);
    }
}

/// Render standings as `"{rank}. {name}: {steps} steps"` lines.
pub(crate) fn render_standings(rows: &[LeaderboardRow]) -> String {
    rows.iter()
        .enumerate()
        .map(|(index, row)| format!("{}. {}: {} steps", index + 1, row.name, row.steps))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn broadcast_reminder(state: &SharedState, notifier: &dyn Notifier) {
    // Snapshot the targets under the lock, send after releasing it.
    let groups = state.groups().await;
    info!(groups = groups.len(), "broadcasting daily reminder");
    for group in groups {
        if let Err(err) = notifier.send_message(group, REMINDER_TEXT).await {
            warn!(%group, error = %err, "reminder delivery failed");
        }
    }
}

async fn broadcast_leaderboards(state: &SharedState, notifier: &dyn Notifier) {
    let boards = state.group_leaderboards().await;
    info!(groups = boards.len(), "broadcasting daily leaderboards");
    for (group, rows) in boards {
        if rows.is_empty() {
            continue;
        }
        let text = format!("{DIGEST_HEADER}\n{}", render_standings(&rows));
        if let Err(err) = notifier.send_message(group, &text).await {
            warn!(%group, error = %err, "leaderboard delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::datetime;

    use super::*;
    use crate::clock::ManualClock;
    use crate::state::{AppState, GroupId, ScoreBoard, UserId};
    use crate::testing::{MemoryStore, RecordingNotifier};

    const G: GroupId = GroupId(-100);
    const OTHER: GroupId = GroupId(-200);

    fn config() -> DigestConfig {
        DigestConfig::default()
    }

    async fn seeded_state(clock: Arc<ManualClock>) -> SharedState {
        let state = AppState::new(
            ScoreBoard::default(),
            Arc::new(MemoryStore::default()),
            clock,
        );
        state.log_steps(G, UserId(1), "Ada", 10).await.unwrap();
        state.log_steps(G, UserId(2), "Grace", 15).await.unwrap();
        state.log_steps(OTHER, UserId(3), "Alan", 3).await.unwrap();
        state
    }

    #[tokio::test]
    async fn reminder_fires_once_per_date_despite_many_ticks() {
        let clock = Arc::new(ManualClock::starting_at(datetime!(2025-06-01 21:00 UTC)));
        let state = seeded_state(clock.clone()).await;
        let notifier = RecordingNotifier::default();
        let mut cursor = DayCursor::default();

        for _ in 0..100 {
            tick_once(&state, &notifier, &config(), &mut cursor).await;
            clock.advance(time::Duration::seconds(30));
        }

        let reminders: Vec<_> = notifier
            .sent()
            .into_iter()
            .filter(|(_, text)| text == REMINDER_TEXT)
            .collect();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].0, G);
        assert_eq!(reminders[1].0, OTHER);
    }

    #[tokio::test]
    async fn reminder_fires_again_on_the_next_date() {
        let clock = Arc::new(ManualClock::starting_at(datetime!(2025-06-01 21:10 UTC)));
        let state = seeded_state(clock.clone()).await;
        let notifier = RecordingNotifier::default();
        let mut cursor = DayCursor::default();

        tick_once(&state, &notifier, &config(), &mut cursor).await;
        clock.set(datetime!(2025-06-02 21:00 UTC));
        tick_once(&state, &notifier, &config(), &mut cursor).await;

        let reminders = notifier
            .sent()
            .into_iter()
            .filter(|(_, text)| text == REMINDER_TEXT)
            .count();
        assert_eq!(reminders, 4);
    }

    #[tokio::test]
    async fn nothing_fires_outside_the_target_hours() {
        let clock = Arc::new(ManualClock::starting_at(datetime!(2025-06-01 12:00 UTC)));
        let state = seeded_state(clock.clone()).await;
        let notifier = RecordingNotifier::default();
        let mut cursor = DayCursor::default();

        tick_once(&state, &notifier, &config(), &mut cursor).await;
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn seeded_cursor_skips_a_window_already_in_progress() {
        // Restart at 21:30: the reminder window is already running, so the
        // seeded cursor treats it as fired for today.
        let clock = Arc::new(ManualClock::starting_at(datetime!(2025-06-01 21:30 UTC)));
        let state = seeded_state(clock.clone()).await;
        let notifier = RecordingNotifier::default();
        let mut cursor = DayCursor::seeded(state.now(), &config());

        tick_once(&state, &notifier, &config(), &mut cursor).await;
        assert!(notifier.sent().is_empty());

        clock.set(datetime!(2025-06-02 21:00 UTC));
        tick_once(&state, &notifier, &config(), &mut cursor).await;
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn seeded_cursor_before_the_window_still_fires_today() {
        let clock = Arc::new(ManualClock::starting_at(datetime!(2025-06-01 17:00 UTC)));
        let state = seeded_state(clock.clone()).await;
        let notifier = RecordingNotifier::default();
        let mut cursor = DayCursor::seeded(state.now(), &config());

        clock.set(datetime!(2025-06-01 18:00 UTC));
        tick_once(&state, &notifier, &config(), &mut cursor).await;

        let digests: Vec<_> = notifier.sent();
        assert_eq!(digests.len(), 2);
        assert!(digests[0].1.starts_with(DIGEST_HEADER));
    }

    #[tokio::test]
    async fn leaderboard_digest_renders_ranked_standings() {
        let clock = Arc::new(ManualClock::starting_at(datetime!(2025-06-01 18:00 UTC)));
        let state = seeded_state(clock.clone()).await;
        let notifier = RecordingNotifier::default();
        let mut cursor = DayCursor::default();

        tick_once(&state, &notifier, &config(), &mut cursor).await;

        let (group, text) = notifier.sent().into_iter().next().unwrap();
        assert_eq!(group, G);
        assert_eq!(
            text,
            format!("{DIGEST_HEADER}\n1. Grace: 15 steps\n2. Ada: 10 steps")
        );
    }

    #[tokio::test]
    async fn failed_delivery_does_not_block_other_groups_or_refire() {
        let clock = Arc::new(ManualClock::starting_at(datetime!(2025-06-01 21:00 UTC)));
        let state = seeded_state(clock.clone()).await;
        let notifier = RecordingNotifier::failing_for(G);
        let mut cursor = DayCursor::default();

        tick_once(&state, &notifier, &config(), &mut cursor).await;
        // The other group still got its reminder.
        assert_eq!(notifier.sent(), vec![(OTHER, REMINDER_TEXT.to_owned())]);

        // The window counts as fired; the failed group is not retried today.
        tick_once(&state, &notifier, &config(), &mut cursor).await;
        assert_eq!(notifier.sent().len(), 1);
    }
}
