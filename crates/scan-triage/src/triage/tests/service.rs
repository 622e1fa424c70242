use std::sync::Arc;

use chrono::Utc;

use super::common::*;
use crate::triage::domain::{PriorityLevel, ScanId, ScanStatus};
use crate::triage::repository::{RepositoryError, ScanRepository};
use crate::triage::service::{TriageError, TriageService, STATUS_REQUIRED};
use crate::triage::worklist::WorklistFilter;

#[test]
fn all_returns_scans_in_load_order() {
    let (service, _) = build_service();
    let scans = service.all().expect("scans available");
    let ids: Vec<_> = scans.iter().map(|scan| scan.scan_id.as_str()).collect();
    assert_eq!(ids, vec!["S-1", "S-2", "S-3"]);
}

#[test]
fn worklist_is_sorted_by_priority() {
    let (service, _) = build_service();
    let scans = service
        .worklist(&WorklistFilter::default())
        .expect("worklist builds");
    let levels: Vec<_> = scans.iter().map(|scan| scan.priority_level()).collect();
    assert_eq!(
        levels,
        vec![PriorityLevel::Urgent, PriorityLevel::Medium, PriorityLevel::Low]
    );
}

#[test]
fn get_reports_unknown_ids() {
    let (service, _) = build_service();
    match service.get(&ScanId::from("S-404")) {
        Err(TriageError::NotFound(id)) => assert_eq!(id.as_str(), "S-404"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn update_status_on_unknown_id_is_not_found() {
    let (service, _) = build_service();
    match service.update_status(&ScanId::from("S-404"), Some("Completed")) {
        Err(TriageError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn unknown_id_wins_over_missing_status() {
    let (service, _) = build_service();
    assert!(matches!(
        service.update_status(&ScanId::from("S-404"), None),
        Err(TriageError::NotFound(_))
    ));
}

#[test]
fn empty_status_is_rejected_and_leaves_scan_unchanged() {
    let (service, repository) = build_service();
    let id = ScanId::from("S-1");

    for status in [Some(""), Some("   "), None] {
        match service.update_status(&id, status) {
            Err(TriageError::InvalidInput(message)) => assert_eq!(message, STATUS_REQUIRED),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("scan present");
    assert_eq!(stored.status, ScanStatus::PendingReview);
    assert!(stored.review_timestamp.is_none());
}

#[test]
fn unsupported_status_is_invalid_input() {
    let (service, _) = build_service();
    match service.update_status(&ScanId::from("S-1"), Some("Archived")) {
        Err(TriageError::InvalidInput(message)) => assert!(message.contains("Archived")),
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn update_status_sets_status_and_review_timestamp() {
    let (service, repository) = build_service();
    let id = ScanId::from("S-2");
    let before = Utc::now();

    let updated = service
        .update_status(&id, Some("requires_consultation"))
        .expect("status updates");
    assert_eq!(updated.status, ScanStatus::RequiresConsultation);
    let stamped = updated.review_timestamp.expect("review timestamp set");
    assert!(stamped >= before);

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("scan present");
    assert_eq!(stored, updated);
    assert_eq!(
        stored.priority.as_ref().map(|priority| priority.score),
        Some(40),
        "status updates must not touch the cached priority"
    );
}

#[test]
fn repeated_updates_restamp_the_review_time() {
    let (service, _) = build_service();
    let id = ScanId::from("S-3");

    let first = service
        .update_status(&id, Some("In Progress"))
        .expect("first update");
    let second = service
        .update_status(&id, Some("Completed"))
        .expect("second update");

    assert_eq!(second.status, ScanStatus::Completed);
    assert!(second.review_timestamp >= first.review_timestamp);
}

#[test]
fn repository_failures_propagate() {
    let service = TriageService::new(Arc::new(UnavailableRepository));
    match service.all() {
        Err(TriageError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "offline")
        }
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[test]
fn summary_reflects_status_updates() {
    let (service, _) = build_service();
    let before = service.summary().expect("summary builds");
    assert_eq!(before.total, 3);
    assert_eq!(before.pending_review, 3);
    assert_eq!(before.urgent, 1);

    service
        .update_status(&ScanId::from("S-1"), Some("Completed"))
        .expect("status updates");
    let after = service.summary().expect("summary builds");
    assert_eq!(after.pending_review, 2);
}
