use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use common::types::Counter;
use tokio::{fs, sync::Mutex};
use tracing::warn;

use crate::errors::ServiceError;
use crate::store::CounterStore;

/// JSON file-backed tally store.
///
/// The on-disk file is the single source of truth; every read goes to disk
/// and every write replaces the canonical file via temp-write-then-rename,
/// so a concurrent reader observes either the old or the new tally, never a
/// torn write. Mutations are serialized behind an in-process mutex, which
/// also keeps the shared temp path single-writer. Cross-process writers are
/// not coordinated.
pub struct FileCounterStore {
    file_path: PathBuf,
    tmp_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCounterStore {
    /// Initialize the store from a path. Creates parent directories, then
    /// validates and rewrites the file once so the first request finds a
    /// well-formed tally on disk.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        let mut tmp = file_path.clone().into_os_string();
        tmp.push(".tmp");

        let store = Arc::new(Self {
            file_path,
            tmp_path: PathBuf::from(tmp),
            write_lock: Mutex::new(()),
        });

        let current = store.read_normalized().await;
        store.persist(current).await?;
        Ok(store)
    }

    /// Read and normalize the tally without ever failing. Missing file,
    /// malformed JSON, wrong field types, negatives and fractions all
    /// collapse to well-formed non-negative integers, per field.
    async fn read_normalized(&self) -> Counter {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(_) => return Counter::default(),
        };
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => Counter {
                jajang: normalize_field(value.get("jajang")),
                jjamppong: normalize_field(value.get("jjamppong")),
            },
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e,
                    "votes file is not valid JSON; treating as uninitialized");
                Counter::default()
            }
        }
    }

    /// Write without taking the lock; callers hold it (or run before the
    /// store is shared, as in `new`).
    async fn persist(&self, counter: Counter) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(&counter)
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        fs::write(&self.tmp_path, data)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        fs::rename(&self.tmp_path, &self.file_path)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        Ok(())
    }
}

/// Coerce one stored field to a non-negative integer: negative or
/// non-numeric values become 0, fractional values truncate toward zero.
fn normalize_field(value: Option<&serde_json::Value>) -> u64 {
    match value.and_then(serde_json::Value::as_f64) {
        Some(n) if n.is_finite() && n >= 0.0 => n.trunc() as u64,
        _ => 0,
    }
}

#[async_trait]
impl CounterStore for FileCounterStore {
    async fn load(&self) -> Counter {
        self.read_normalized().await
    }

    async fn save(&self, counter: Counter) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.persist(counter).await
    }

    async fn update(
        &self,
        mutate: Box<dyn for<'a> FnOnce(&'a mut Counter) + Send>,
    ) -> Result<Counter, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut counter = self.read_normalized().await;
        mutate(&mut counter);
        self.persist(counter).await?;
        Ok(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("votes_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_loads_zeros() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = FileCounterStore::new(&tmp).await?;
        assert_eq!(store.load().await, Counter::default());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_round_trips() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = FileCounterStore::new(&tmp).await?;

        let c = Counter { jajang: 7, jjamppong: 42 };
        store.save(c).await?;
        assert_eq!(store.load().await, c);

        // a fresh store over the same file sees the persisted value
        let store2 = FileCounterStore::new(&tmp).await?;
        assert_eq!(store2.load().await, c);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file_behind() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = FileCounterStore::new(&tmp).await?;
        store.save(Counter { jajang: 1, jjamppong: 2 }).await?;

        let mut tmp_sibling = tmp.clone().into_os_string();
        tmp_sibling.push(".tmp");
        assert!(tokio::fs::metadata(PathBuf::from(tmp_sibling)).await.is_err());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_loads_zeros() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        tokio::fs::write(&tmp, b"{not json").await?;

        let store = FileCounterStore::new(&tmp).await?;
        assert_eq!(store.load().await, Counter::default());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn negative_and_fractional_fields_normalize() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        tokio::fs::write(&tmp, br#"{"jajang": -3.7, "jjamppong": 2.9}"#).await?;

        let store = FileCounterStore::new(&tmp).await?;
        assert_eq!(store.load().await, Counter { jajang: 0, jjamppong: 2 });

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn non_numeric_fields_normalize_independently() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        tokio::fs::write(&tmp, br#"{"jajang": "many", "jjamppong": 5}"#).await?;

        let store = FileCounterStore::new(&tmp).await?;
        assert_eq!(store.load().await, Counter { jajang: 0, jjamppong: 5 });

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn new_rewrites_file_normalized() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        tokio::fs::write(&tmp, br#"{"jajang": 1.9, "jjamppong": -1}"#).await?;

        let _store = FileCounterStore::new(&tmp).await?;
        let bytes = tokio::fs::read(&tmp).await?;
        let on_disk: Counter = serde_json::from_slice(&bytes)?;
        assert_eq!(on_disk, Counter { jajang: 1, jjamppong: 0 });

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_updates_all_land() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = FileCounterStore::new(&tmp).await?;

        let mut tasks = Vec::new();
        for _ in 0..20 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store
                    .update(Box::new(|c| c.jajang = c.jajang.saturating_add(1)))
                    .await
            }));
        }
        for t in tasks {
            t.await??;
        }
        assert_eq!(store.load().await, Counter { jajang: 20, jjamppong: 0 });

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
