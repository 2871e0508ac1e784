//! Environment-driven runtime configuration.

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use time::UtcOffset;
use tracing::warn;

use crate::services::daily_digest::DigestConfig;

/// Default location of the persisted score snapshot.
const DEFAULT_DATA_PATH: &str = "data/scores.json";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REMINDER_HOUR: u8 = 21;
const DEFAULT_LEADERBOARD_HOUR: u8 = 18;
const DEFAULT_DIGEST_TICK_SECS: u64 = 30;
const DEFAULT_WATCHER_TICK_SECS: u64 = 3_600;
/// Polling slower than this could skip an entire hour window.
const MAX_DIGEST_TICK_SECS: u64 = 60;

/// Immutable runtime configuration assembled from `STRIDE_BACK_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP gateway listens on.
    pub port: u16,
    /// Path of the JSON score snapshot.
    pub data_path: PathBuf,
    /// Fixed offset applied to UTC when evaluating daily-event hours.
    pub utc_offset: UtcOffset,
    /// Daily digest hours and polling cadence.
    pub digest: DigestConfig,
    /// Challenge watcher polling cadence.
    pub watcher_tick: Duration,
    /// Telegram bot token; when absent, outbound messages are logged only.
    pub telegram_token: Option<String>,
}

impl AppConfig {
    /// Read the configuration from the environment, logging every fallback.
    pub fn from_env() -> Self {
        let port = parsed_env("STRIDE_BACK_PORT", DEFAULT_PORT);

        let data_path = env::var_os("STRIDE_BACK_DATA_PATH")
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let offset_hours: i8 = parsed_env("STRIDE_BACK_UTC_OFFSET_HOURS", 0);
        let utc_offset = UtcOffset::from_hms(offset_hours, 0, 0).unwrap_or_else(|_| {
            warn!(offset_hours, "invalid UTC offset; falling back to UTC");
            UtcOffset::UTC
        });

        let mut reminder_hour = hour_env("STRIDE_BACK_REMINDER_HOUR", DEFAULT_REMINDER_HOUR);
        let mut leaderboard_hour =
            hour_env("STRIDE_BACK_LEADERBOARD_HOUR", DEFAULT_LEADERBOARD_HOUR);
        if reminder_hour == leaderboard_hour {
            warn!(
                hour = reminder_hour,
                "reminder and leaderboard hours must differ; using defaults"
            );
            reminder_hour = DEFAULT_REMINDER_HOUR;
            leaderboard_hour = DEFAULT_LEADERBOARD_HOUR;
        }

        let mut digest_tick_secs: u64 =
            parsed_env("STRIDE_BACK_DIGEST_TICK_SECS", DEFAULT_DIGEST_TICK_SECS);
        if digest_tick_secs == 0 || digest_tick_secs > MAX_DIGEST_TICK_SECS {
            warn!(
                digest_tick_secs,
                "digest tick must be within 1-{MAX_DIGEST_TICK_SECS} seconds; using default"
            );
            digest_tick_secs = DEFAULT_DIGEST_TICK_SECS;
        }

        let mut watcher_tick_secs: u64 =
            parsed_env("STRIDE_BACK_WATCHER_TICK_SECS", DEFAULT_WATCHER_TICK_SECS);
        if watcher_tick_secs == 0 {
            warn!("watcher tick must be positive; using default");
            watcher_tick_secs = DEFAULT_WATCHER_TICK_SECS;
        }

        let telegram_token = env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        Self {
            port,
            data_path,
            utc_offset,
            digest: DigestConfig {
                reminder_hour,
                leaderboard_hour,
                tick: Duration::from_secs(digest_tick_secs),
            },
            watcher_tick: Duration::from_secs(watcher_tick_secs),
            telegram_token,
        }
    }
}

/// Parse an environment variable, falling back to the default with a warning
/// when the value does not parse.
fn parsed_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + Display,
{
    match env::var(key) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(key, %value, %default, "unparseable value; using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse an hour-of-day variable, rejecting values outside 0-23.
fn hour_env(key: &str, default: u8) -> u8 {
    let hour = parsed_env(key, default);
    if hour > 23 {
        warn!(key, hour, "hour must be within 0-23; using default");
        default
    } else {
        hour
    }
}
