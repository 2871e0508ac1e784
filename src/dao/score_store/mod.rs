//! Abstraction over the persistence backend for score snapshots.

pub mod json_file;

use futures::future::BoxFuture;

use crate::dao::models::ScoreSnapshot;
use crate::dao::storage::StorageResult;

/// Durable home of the score record set.
///
/// Every mutation of the board persists the full snapshot through this trait
/// before the change is acknowledged; the write is a whole-document overwrite,
/// never an append.
pub trait SnapshotStore: Send + Sync {
    /// Replace the persisted record set with the given snapshot.
    fn persist(&self, snapshot: ScoreSnapshot) -> BoxFuture<'static, StorageResult<()>>;
    /// Load the persisted record set; a missing file yields an empty snapshot.
    fn load(&self) -> BoxFuture<'static, StorageResult<ScoreSnapshot>>;
}
