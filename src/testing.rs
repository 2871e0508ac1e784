//! Test doubles shared across unit tests: in-memory stores, a recording
//! notifier, and a fixed clock.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use time::macros::datetime;

use crate::clock::{Clock, ManualClock};
use crate::dao::models::ScoreSnapshot;
use crate::dao::score_store::SnapshotStore;
use crate::dao::storage::{StorageError, StorageResult};
use crate::services::notifier::{DeliveryError, DeliveryResult, Notifier};
use crate::state::GroupId;

/// Manual clock pinned to a mid-day instant.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::starting_at(datetime!(2025-06-01 12:00 UTC)))
}

/// Snapshot store that keeps the last persisted snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<ScoreSnapshot>>,
}

impl MemoryStore {
    /// Last snapshot handed to `persist`, if any.
    pub fn last_snapshot(&self) -> Option<ScoreSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn persist(&self, snapshot: ScoreSnapshot) -> BoxFuture<'static, StorageResult<()>> {
        *self.snapshot.lock().unwrap() = Some(snapshot);
        Box::pin(async { Ok(()) })
    }

    fn load(&self) -> BoxFuture<'static, StorageResult<ScoreSnapshot>> {
        let snapshot = self.snapshot.lock().unwrap().clone().unwrap_or_default();
        Box::pin(async move { Ok(snapshot) })
    }
}

/// Snapshot store whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingStore;

impl SnapshotStore for FailingStore {
    fn persist(&self, _snapshot: ScoreSnapshot) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async {
            Err(StorageError::Io {
                path: "/dev/full".into(),
                source: std::io::Error::other("disk unavailable"),
            })
        })
    }

    fn load(&self) -> BoxFuture<'static, StorageResult<ScoreSnapshot>> {
        Box::pin(async { Ok(ScoreSnapshot::default()) })
    }
}

/// Notifier that records every message, optionally failing for one group.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(GroupId, String)>>,
    failing_group: Option<GroupId>,
}

impl RecordingNotifier {
    /// Notifier that rejects deliveries to the given group.
    pub fn failing_for(group: GroupId) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_group: Some(group),
        }
    }

    /// Messages delivered so far, in send order.
    pub fn sent(&self) -> Vec<(GroupId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send_message(&self, group: GroupId, text: &str) -> BoxFuture<'static, DeliveryResult<()>> {
        if self.failing_group == Some(group) {
            return Box::pin(async move {
                Err(DeliveryError::Rejected { group, status: 502 })
            });
        }
        self.sent.lock().unwrap().push((group, text.to_owned()));
        Box::pin(async { Ok(()) })
    }
}
