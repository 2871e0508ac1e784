//! JSON file snapshot store: whole-document overwrite via a temp-file rename.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::models::ScoreSnapshot;
use crate::dao::score_store::SnapshotStore;
use crate::dao::storage::{StorageError, StorageResult};

/// Snapshot store backed by a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
}

impl JsonFileStore {
    /// Build a store writing to the given path. Parent directories are
    /// created lazily on the first persist.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
        }
    }

    fn io_error(path: &PathBuf, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn persist(&self, snapshot: ScoreSnapshot) -> BoxFuture<'static, StorageResult<()>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move {
            let bytes = serde_json::to_vec_pretty(&snapshot)
                .map_err(|source| StorageError::Encode { source })?;

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| Self::io_error(&path, source))?;
            }

            // Write to a sibling temp file first so a crash mid-write never
            // leaves a truncated snapshot behind.
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, &bytes)
                .await
                .map_err(|source| Self::io_error(&tmp, source))?;
            fs::rename(&tmp, path.as_ref())
                .await
                .map_err(|source| Self::io_error(&path, source))?;

            Ok(())
        })
    }

    fn load(&self) -> BoxFuture<'static, StorageResult<ScoreSnapshot>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move {
            let contents = match fs::read_to_string(path.as_ref()).await {
                Ok(contents) => contents,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    return Ok(ScoreSnapshot::default());
                }
                Err(source) => return Err(Self::io_error(&path, source)),
            };

            serde_json::from_str(&contents).map_err(|source| StorageError::Decode {
                path: path.as_ref().clone(),
                source,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::ScoreEntity;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stride-back-{}-{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_snapshot() {
        let store = JsonFileStore::new(scratch_path("missing"));
        let snapshot = store.load().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn persist_then_load_round_trips_in_order() {
        let path = scratch_path("round-trip");
        let store = JsonFileStore::new(path.clone());

        let mut snapshot = ScoreSnapshot::default();
        snapshot.insert(
            "-100:2".into(),
            ScoreEntity {
                name: "Grace".into(),
                steps: 15,
            },
        );
        snapshot.insert(
            "-100:1".into(),
            ScoreEntity {
                name: "Ada".into(),
                steps: 10,
            },
        );

        store.persist(snapshot.clone()).await.unwrap();
        let restored = store.load().await.unwrap();
        assert_eq!(restored, snapshot);
        let keys: Vec<&String> = restored.keys().collect();
        assert_eq!(keys, ["-100:2", "-100:1"]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn corrupt_file_reports_decode_error() {
        let path = scratch_path("corrupt");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = JsonFileStore::new(path.clone());
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));

        let _ = std::fs::remove_file(path);
    }
}
