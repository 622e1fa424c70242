use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::triage::domain::{PriorityLevel, Scan, ScanId, ScanStatus};
use crate::triage::repository::{InMemoryScanRepository, RepositoryError, ScanRepository};
use crate::triage::rules::{AiAnalysisEntry, AnalysisTable, PriorityRule, RuleStore};
use crate::triage::{triage_router, TriageService};

pub(super) fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn scan(id: &str) -> Scan {
    Scan {
        scan_id: ScanId::from(id),
        patient_id: format!("P-{id}"),
        patient_name: None,
        body_part: String::new(),
        scan_type: String::new(),
        scan_date: date(2024, 1, 1),
        description: String::new(),
        findings: String::new(),
        consultant: "Dr. Osei".to_string(),
        status: ScanStatus::PendingReview,
        priority: None,
        review_timestamp: None,
        image_url: None,
    }
}

pub(super) fn described_scan(
    id: &str,
    description: &str,
    body_part: &str,
    scan_type: &str,
) -> Scan {
    Scan {
        description: description.to_string(),
        body_part: body_part.to_string(),
        scan_type: scan_type.to_string(),
        ..scan(id)
    }
}

pub(super) fn orthopedic_rules() -> RuleStore {
    RuleStore::new([
        PriorityRule::new(
            ["fracture", "emergency", "displaced"],
            PriorityLevel::Urgent,
            90,
            "Fracture suspected",
        ),
        PriorityRule::new(
            ["tear", "rupture"],
            PriorityLevel::High,
            70,
            "Soft tissue injury",
        ),
        PriorityRule::new(["wrist", "knee"], PriorityLevel::Medium, 40, "Joint review"),
        PriorityRule::new(["follow-up"], PriorityLevel::Low, 10, "Follow-up imaging"),
    ])
}

pub(super) fn analysis_table() -> AnalysisTable {
    AnalysisTable::new([AiAnalysisEntry {
        scan_id: ScanId::from("S-1"),
        ai_findings: "Cortical break at distal radius".to_string(),
        confidence: 94,
        key_structures: vec!["distal radius".to_string(), "ulnar styloid".to_string()],
        recommendations: "Orthopedic consult within 24h".to_string(),
    }])
}

pub(super) fn seeded_repository() -> Arc<InMemoryScanRepository> {
    let scans = vec![
        described_scan("S-1", "Suspected fracture after fall", "Left Wrist", "X-Ray"),
        described_scan("S-2", "Routine follow-up", "Right Knee", "MRI"),
        described_scan("S-3", "Chronic back pain", "Lumbar Spine", "CT"),
    ];
    let scans = crate::triage::enrich_scans(scans, &orthopedic_rules(), &analysis_table());
    Arc::new(InMemoryScanRepository::new(scans))
}

pub(super) fn build_service() -> (
    TriageService<InMemoryScanRepository>,
    Arc<InMemoryScanRepository>,
) {
    let repository = seeded_repository();
    (TriageService::new(repository.clone()), repository)
}

pub(super) fn router_with_service(service: TriageService<InMemoryScanRepository>) -> axum::Router {
    triage_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

impl ScanRepository for UnavailableRepository {
    fn all(&self) -> Result<Vec<Scan>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &ScanId) -> Result<Option<Scan>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ScanId,
        _status: ScanStatus,
        _reviewed_at: DateTime<Utc>,
    ) -> Result<Scan, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
