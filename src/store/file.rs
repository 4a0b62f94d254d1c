//! JSON-file persisted primary store.
//!
//! A single JSON document holds the whole report table, keyed by
//! fingerprint hex. Writes go through a temp file followed by a rename so
//! a crash mid-write never leaves a truncated table behind. Suited to the
//! dashboard's scale (one row per tool/source/language combination).

use super::{ReportStore, StoreError};
use crate::report::Report;
use crate::scenario::Fingerprint;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::debug;

const BACKEND: &str = "file";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileRow {
    report: Report,
    hit_count: u64,
    last_accessed_unix: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileTable {
    reports: HashMap<String, FileRow>,
}

/// Primary store persisted as a JSON file.
#[derive(Debug)]
pub struct FileReportStore {
    path: PathBuf,
    table: RwLock<FileTable>,
}

impl FileReportStore {
    /// Open a store at `path`, loading the existing table if the file is
    /// present. A missing file starts empty; an unreadable or unparsable
    /// file is a distinguishable error, never an empty-table fallback.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let table = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::corrupt(BACKEND, format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileTable::default(),
            Err(e) => {
                return Err(
                    StoreError::unavailable(BACKEND, format!("{}: {e}", path.display())).into(),
                )
            }
        };
        debug!(path = %path.display(), entries = table.reports.len(), "opened report store");
        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, table: &FileTable) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(table)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::unavailable(BACKEND, format!("{}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::unavailable(BACKEND, format!("{}: {e}", self.path.display())))?;
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Report>> {
        let mut table = self.table.write().await;
        let report = match table.reports.get_mut(fingerprint.as_str()) {
            Some(row) => {
                row.hit_count += 1;
                row.last_accessed_unix = Some(unix_now());
                row.report.clone()
            }
            None => return Ok(None),
        };
        self.persist(&table).await?;
        Ok(Some(report))
    }

    async fn put(&self, fingerprint: &Fingerprint, report: &Report) -> Result<()> {
        let mut table = self.table.write().await;
        table.reports.insert(
            fingerprint.as_str().to_string(),
            FileRow {
                report: report.clone(),
                hit_count: 0,
                last_accessed_unix: None,
            },
        );
        self.persist(&table).await?;
        debug!(fingerprint = %fingerprint, "persisted report");
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut table = self.table.write().await;
        let count = table.reports.len() as u64;
        table.reports.clear();
        self.persist(&table).await?;
        Ok(count)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.table.read().await.reports.len())
    }

    fn name(&self) -> &'static str {
        BACKEND
    }
}
