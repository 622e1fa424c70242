use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{Scan, ScanId, ScanStatus};

/// Storage abstraction so the service and router can be exercised in isolation.
pub trait ScanRepository: Send + Sync {
    /// Every scan in load order.
    fn all(&self) -> Result<Vec<Scan>, RepositoryError>;
    fn fetch(&self, id: &ScanId) -> Result<Option<Scan>, RepositoryError>;
    fn update_status(
        &self,
        id: &ScanId,
        status: ScanStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Scan, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
struct ScanTable {
    scans: Vec<Scan>,
    index: HashMap<ScanId, usize>,
}

/// Process-lifetime scan store. Reads share the lock; status updates take it exclusively.
#[derive(Debug, Default)]
pub struct InMemoryScanRepository {
    table: RwLock<ScanTable>,
}

impl InMemoryScanRepository {
    /// Builds the store from enriched scans. Repeated ids keep the first record.
    pub fn new(scans: Vec<Scan>) -> Self {
        let mut table = ScanTable::default();
        for scan in scans {
            if table.index.contains_key(&scan.scan_id) {
                warn!(
                    scan_id = %scan.scan_id,
                    "duplicate scan id in seed data; keeping first record"
                );
                continue;
            }
            table.index.insert(scan.scan_id.clone(), table.scans.len());
            table.scans.push(scan);
        }

        Self {
            table: RwLock::new(table),
        }
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.scans.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("scan table lock poisoned".to_string())
}

impl ScanRepository for InMemoryScanRepository {
    fn all(&self) -> Result<Vec<Scan>, RepositoryError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.scans.clone())
    }

    fn fetch(&self, id: &ScanId) -> Result<Option<Scan>, RepositoryError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table
            .index
            .get(id)
            .and_then(|&position| table.scans.get(position))
            .cloned())
    }

    fn update_status(
        &self,
        id: &ScanId,
        status: ScanStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Scan, RepositoryError> {
        let mut table = self.table.write().map_err(poisoned)?;
        let position = *table.index.get(id).ok_or(RepositoryError::NotFound)?;
        let scan = table
            .scans
            .get_mut(position)
            .ok_or(RepositoryError::NotFound)?;
        scan.status = status;
        scan.review_timestamp = Some(reviewed_at);
        Ok(scan.clone())
    }
}
