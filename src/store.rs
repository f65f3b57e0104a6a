use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::{Database, MongoStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contents are not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Durable string storage split into named regions, like a preferences file per region.
pub trait KeyValueStore: Send + Sync {
    fn get(
        &self,
        region: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn put(
        &self,
        region: &str,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove(&self, region: &str, key: &str)
    -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, region: &str, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(&(region.to_string(), key.to_string()))
            .cloned())
    }

    async fn put(&self, region: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert((region.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    async fn remove(&self, region: &str, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.remove(&(region.to_string(), key.to_string()));
        Ok(())
    }
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One JSON object file per region under `dir`.
///
/// Writes go to a uniquely named sibling temp file that is renamed over the
/// original, so a reader never sees a half-written region. Read-modify-write
/// is serialized per instance only; two instances sharing a directory can
/// still lose each other's updates to the same region.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn region_path(&self, region: &str) -> PathBuf {
        self.dir.join(format!("{region}.json"))
    }

    async fn read_region(&self, region: &str) -> Result<BTreeMap<String, String>, StoreError> {
        // invalid utf-8 surfaces as a json error
        match tokio::fs::read(self.region_path(region)).await {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Same as `read_region`, but an unreadable region is replaced rather than fatal.
    async fn read_region_for_write(
        &self,
        region: &str,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read_region(region).await {
            Err(StoreError::Json(e)) => {
                log::warn!("discarding corrupt region {region}: {e}");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn write_region(
        &self,
        region: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.region_path(region);
        let tmp = self.dir.join(format!(
            ".{region}.json.{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&tmp, serde_json::to_vec(entries)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, region: &str, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.read_region(region).await?;
        Ok(entries.remove(key))
    }

    async fn put(&self, region: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_region_for_write(region).await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_region(region, &entries).await
    }

    async fn remove(&self, region: &str, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_region_for_write(region).await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_region(region, &entries).await
    }
}

/// Backend picked at startup: MongoDB when `MONGO_URI` is set, region files otherwise.
#[derive(Debug)]
pub enum PreferenceStore {
    File(FileStore),
    Mongo(MongoStore),
}

impl PreferenceStore {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        match Database::from_config(config).await? {
            Some(db) => {
                log::info!("recent queries stored in MongoDB database {}", db.name());
                Ok(PreferenceStore::Mongo(MongoStore::new(&db)))
            }
            None => {
                log::info!("recent queries stored under {}", config.data_dir.display());
                Ok(PreferenceStore::File(FileStore::new(config.data_dir.clone())))
            }
        }
    }
}

impl KeyValueStore for PreferenceStore {
    async fn get(&self, region: &str, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            PreferenceStore::File(store) => store.get(region, key).await,
            PreferenceStore::Mongo(store) => store.get(region, key).await,
        }
    }

    async fn put(&self, region: &str, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            PreferenceStore::File(store) => store.put(region, key, value).await,
            PreferenceStore::Mongo(store) => store.put(region, key, value).await,
        }
    }

    async fn remove(&self, region: &str, key: &str) -> Result<(), StoreError> {
        match self {
            PreferenceStore::File(store) => store.remove(region, key).await,
            PreferenceStore::Mongo(store) => store.remove(region, key).await,
        }
    }
}
