//! Service layer: command handling, outbound notifications, and the two
//! time-driven background loops.

pub mod challenge_service;
pub mod challenge_watcher;
pub mod daily_digest;
pub mod documentation;
pub mod health_service;
pub mod notifier;
pub mod score_service;
#[cfg(feature = "telegram-sink")]
pub mod telegram;
