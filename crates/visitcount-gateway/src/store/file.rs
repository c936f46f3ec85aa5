//! Durable single-file table.
//!
//! Layout: `<data_dir>/<table>.json`, a JSON object of rows keyed by `id`.
//! Writes go to `<table>.json.tmp`, are fsynced, then renamed over the
//! table file. The in-memory image only changes once the rename succeeds;
//! a failed directory sync after that is logged, not reported.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use visitcount_core::counter::{apply_add, new_row, Attributes};
use visitcount_core::error::{Result, VisitCountError};

use super::CounterStore;

type Rows = BTreeMap<String, Attributes>;

pub struct FileCounterStore {
    table: String,
    path: PathBuf,
    rows: Mutex<Rows>,
}

impl FileCounterStore {
    pub async fn open(data_dir: impl AsRef<Path>, table: &str) -> Result<Self> {
        let dir = data_dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            VisitCountError::StoreUnavailable(format!("create {} failed: {e}", dir.display()))
        })?;

        let path = dir.join(format!("{table}.json"));
        let rows = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Rows>(&bytes).map_err(|e| {
                VisitCountError::MalformedRecord(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Rows::new(),
            Err(e) => {
                return Err(VisitCountError::StoreUnavailable(format!(
                    "read {} failed: {e}",
                    path.display()
                )))
            }
        };

        tracing::debug!(path = %path.display(), rows = rows.len(), "file table opened");

        Ok(Self {
            table: table.to_string(),
            path,
            rows: Mutex::new(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, rows: &Rows) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(rows)
            .map_err(|e| VisitCountError::Internal(format!("encode table failed: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        let mut f = tokio::fs::File::create(&tmp).await?;
        f.write_all(&bytes).await?;
        f.sync_all().await?;
        drop(f);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Make the rename itself durable.
#[cfg(unix)]
async fn sync_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::File::open(parent).await?.sync_all().await?;
    }
    Ok(())
}

#[cfg(not(unix))]
async fn sync_parent(_path: &Path) -> Result<()> {
    Ok(())
}

#[async_trait]
impl CounterStore for FileCounterStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    fn table(&self) -> &str {
        &self.table
    }

    async fn add(&self, key: &str, attr: &str, delta: u64) -> Result<Attributes> {
        let mut rows = self.rows.lock().await;

        let mut row = rows.get(key).cloned().unwrap_or_else(|| new_row(key));
        let updated = apply_add(&mut row, attr, delta)?;

        let mut next = rows.clone();
        next.insert(key.to_string(), row);
        self.persist(&next).await?;

        // The rename is the commit point: the new count is visible on disk,
        // so it is the one this call reports.
        *rows = next;
        if let Err(e) = sync_parent(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "table directory sync failed");
        }
        Ok(updated)
    }

    async fn get(&self, key: &str) -> Result<Option<Attributes>> {
        Ok(self.rows.lock().await.get(key).cloned())
    }
}
