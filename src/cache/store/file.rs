use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use super::KvStore;
use crate::cache::clock::{Clock, SystemClock};
use crate::cache::models::{PutOptions, StoredEntry};
use crate::error::StoreError;

type Entries = HashMap<String, StoredEntry>;

/// 单个 JSON 文件保存全部键值
///
/// 每次操作都会读出整个文件、修改、再整体写回，
/// 整个过程由同一把锁保护，避免并发写入互相覆盖。
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_clock(path, Arc::new(SystemClock)).await
    }

    /// 目录或文件不存在时自动创建，新文件内容为 `{}`
    pub async fn open_with_clock(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&path).await? {
            fs::write(&path, b"{}").await?;
            tracing::info!("Created store file at {}", path.display());
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    // 先写临时文件再重命名，避免进程中断时留下半截文件
    async fn save(&self, entries: &Entries) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec(entries)?).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().await;

        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to read store {}: {}", self.path.display(), e);
                return None;
            }
        };

        let entry = entries.get(key)?;
        if !entry.is_expired(self.clock.now_millis()) {
            return Some(entry.value.clone());
        }

        entries.remove(key);
        tracing::debug!("Purged expired key: {}", key);
        if let Err(e) = self.save(&entries).await {
            tracing::warn!("Failed to purge expired key {}: {}", key, e);
        }
        None
    }

    async fn put(&self, key: &str, value: &str, options: PutOptions) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut entries = self.load().await?;
        entries.insert(
            key.to_string(),
            StoredEntry::new(value, options, self.clock.now_millis()),
        );
        self.save(&entries).await
    }
}
