use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Scan, ScanId, ScanStatus};
use super::repository::{RepositoryError, ScanRepository};
use super::worklist::{sort_worklist, WorklistFilter, WorklistSummary};

pub const STATUS_REQUIRED: &str = "Status is required";

/// Read and review operations over the scan repository.
pub struct TriageService<R> {
    repository: Arc<R>,
}

impl<R> TriageService<R>
where
    R: ScanRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// All scans in load order.
    pub fn all(&self) -> Result<Vec<Scan>, TriageError> {
        Ok(self.repository.all()?)
    }

    /// Sorted worklist narrowed by the filter.
    pub fn worklist(&self, filter: &WorklistFilter) -> Result<Vec<Scan>, TriageError> {
        let sorted = sort_worklist(self.repository.all()?);
        Ok(filter.apply(sorted))
    }

    /// Dashboard statistics. Chart series follow worklist order.
    pub fn summary(&self) -> Result<WorklistSummary, TriageError> {
        let scans = sort_worklist(self.repository.all()?);
        Ok(WorklistSummary::from_scans(&scans))
    }

    pub fn get(&self, id: &ScanId) -> Result<Scan, TriageError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| TriageError::NotFound(id.clone()))
    }

    /// Sets a new status and stamps the review time. Unknown ids are reported
    /// before the status is validated.
    pub fn update_status(&self, id: &ScanId, status: Option<&str>) -> Result<Scan, TriageError> {
        self.get(id)?;

        let raw = status
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| TriageError::InvalidInput(STATUS_REQUIRED.to_string()))?;
        let status = ScanStatus::parse(raw)
            .ok_or_else(|| TriageError::InvalidInput(format!("Unsupported status '{raw}'")))?;

        let updated = self
            .repository
            .update_status(id, status, Utc::now())
            .map_err(|err| match err {
                RepositoryError::NotFound => TriageError::NotFound(id.clone()),
                other => TriageError::Repository(other),
            })?;

        info!(scan_id = %id, status = %updated.status, "scan status updated");
        Ok(updated)
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("Scan not found")]
    NotFound(ScanId),
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
