//! File-based persistence of verification runs.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::audit::ExecutionLogEntry;
use crate::errors::StoreError;
use crate::orchestrator::VerificationReport;
use crate::util::sanitize_filename;

/// Version tag written into every persisted record.
pub const WORKFLOW_VERSION: &str = "2.2_final";

/// Receives the report at the end of every run.
pub trait ResultSink: Send + Sync {
    /// Persist one run; returns where it was written, if anywhere.
    fn persist(
        &self,
        claim: &str,
        report: &VerificationReport,
    ) -> Result<Option<PathBuf>, StoreError>;
}

/// Sink for runs that must not leave anything behind.
pub struct NullSink;

impl ResultSink for NullSink {
    fn persist(&self, _claim: &str, _report: &VerificationReport) -> Result<Option<PathBuf>, StoreError> {
        Ok(None)
    }
}

/// On-disk record layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedResult {
    pub original_claim: String,
    pub timestamp: DateTime<Local>,
    pub workflow_version: String,
    pub execution_log: Vec<ExecutionLogEntry>,
    pub results: VerificationReport,
}

/// Listing entry for a stored result file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredResult {
    pub filename: String,
    pub created: DateTime<Local>,
    pub size: u64,
}

pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<YYYYmmdd_HHMMSS>_<claim excerpt>.json`
    pub fn filename_for(claim: &str, at: &DateTime<Local>) -> String {
        format!("{}_{}.json", at.format("%Y%m%d_%H%M%S"), sanitize_filename(claim))
    }

    pub fn save(&self, claim: &str, report: &VerificationReport) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let now = Local::now();
        let record = PersistedResult {
            original_claim: claim.to_string(),
            timestamp: now,
            workflow_version: WORKFLOW_VERSION.to_string(),
            execution_log: report.execution_log.clone(),
            results: report.clone(),
        };
        let path = self.dir.join(Self::filename_for(claim, &now));
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Stored `.json` files, newest first. A missing directory lists as empty.
    pub fn list(&self) -> Result<Vec<StoredResult>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut results: Vec<StoredResult> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|e| {
                let meta = e.metadata().ok()?;
                if !meta.is_file() {
                    return None;
                }
                let created = meta.created().or_else(|_| meta.modified()).ok()?;
                Some(StoredResult {
                    filename: e.file_name().to_string_lossy().into_owned(),
                    created: DateTime::<Local>::from(created),
                    size: meta.len(),
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(results)
    }

    /// Load one stored record by bare filename.
    pub fn load(&self, filename: &str) -> Result<Value, StoreError> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(StoreError::InvalidName(filename.to_string()));
        }
        let path = self.dir.join(filename);
        if !path.is_file() {
            return Err(StoreError::NotFound(filename.to_string()));
        }
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ResultSink for ResultStore {
    fn persist(&self, claim: &str, report: &VerificationReport) -> Result<Option<PathBuf>, StoreError> {
        let path = self.save(claim, report)?;
        tracing::info!(path = %path.display(), "Results saved");
        Ok(Some(path))
    }
}
