use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{PriorityLevel, Scan, ScanId, ScanStatus};

/// Orders scans by level, then score, then scan date, all descending.
/// The sort is stable, so full ties keep their input order.
pub fn sort_worklist(mut scans: Vec<Scan>) -> Vec<Scan> {
    scans.sort_by(Scan::worklist_cmp);
    scans
}

/// Dashboard filter: exact status match plus a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorklistFilter {
    pub status: Option<ScanStatus>,
    pub search: Option<String>,
}

impl WorklistFilter {
    pub fn matches(&self, scan: &Scan) -> bool {
        if let Some(status) = self.status {
            if scan.status != status {
                return false;
            }
        }

        match self.search_term() {
            Some(term) => {
                scan.patient_id.to_lowercase().contains(&term)
                    || scan.body_part.to_lowercase().contains(&term)
                    || scan
                        .patient_name
                        .as_deref()
                        .map(|name| name.to_lowercase().contains(&term))
                        .unwrap_or(false)
            }
            None => true,
        }
    }

    pub fn apply(&self, scans: Vec<Scan>) -> Vec<Scan> {
        scans.into_iter().filter(|scan| self.matches(scan)).collect()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

/// Header statistics and chart series for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklistSummary {
    pub total: usize,
    pub pending_review: usize,
    pub urgent: usize,
    pub requires_consultation: usize,
    pub by_scan_type: BTreeMap<String, usize>,
    pub by_level: BTreeMap<PriorityLevel, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f32>,
    pub confidence_by_scan: Vec<ScanConfidence>,
}

/// One bar of the confidence chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfidence {
    pub scan_id: ScanId,
    pub confidence: u8,
}

impl WorklistSummary {
    pub fn from_scans(scans: &[Scan]) -> Self {
        let mut by_scan_type = BTreeMap::new();
        let mut by_level: BTreeMap<PriorityLevel, usize> = PriorityLevel::ordered()
            .into_iter()
            .map(|level| (level, 0))
            .collect();
        let mut confidence_total: u64 = 0;
        let mut confidence_samples: u64 = 0;
        let mut confidence_by_scan = Vec::new();

        for scan in scans {
            *by_scan_type.entry(scan.scan_type.clone()).or_insert(0) += 1;
            *by_level.entry(scan.priority_level()).or_insert(0) += 1;
            if let Some(priority) = &scan.priority {
                confidence_total += u64::from(priority.confidence);
                confidence_samples += 1;
                confidence_by_scan.push(ScanConfidence {
                    scan_id: scan.scan_id.clone(),
                    confidence: priority.confidence,
                });
            }
        }

        let count_status = |status: ScanStatus| {
            scans
                .iter()
                .filter(|scan| scan.status == status)
                .count()
        };

        let average_confidence = if confidence_samples > 0 {
            Some(confidence_total as f32 / confidence_samples as f32)
        } else {
            None
        };

        Self {
            total: scans.len(),
            pending_review: count_status(ScanStatus::PendingReview),
            urgent: by_level
                .get(&PriorityLevel::Urgent)
                .copied()
                .unwrap_or_default(),
            requires_consultation: count_status(ScanStatus::RequiresConsultation),
            by_scan_type,
            by_level,
            average_confidence,
            confidence_by_scan,
        }
    }
}
