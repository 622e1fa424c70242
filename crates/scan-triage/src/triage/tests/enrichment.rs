use std::collections::BTreeSet;

use super::common::*;
use crate::triage::domain::{Priority, PriorityLevel, AUTOMATED_ANALYSIS_FLAG};
use crate::triage::enrichment::{enrich_scan, enrich_scans};
use crate::triage::rules::AnalysisTable;

#[test]
fn attaches_scorer_output_and_analysis_entry() {
    let scans = vec![described_scan(
        "S-1",
        "Suspected fracture after fall",
        "Left Wrist",
        "X-Ray",
    )];
    let enriched = enrich_scans(scans, &orthopedic_rules(), &analysis_table());

    let priority = enriched[0].priority.as_ref().expect("priority attached");
    assert_eq!(priority.level, PriorityLevel::Urgent);
    assert_eq!(priority.score, 90);
    assert_eq!(priority.ai_analysis, "Cortical break at distal radius");
    assert_eq!(priority.confidence, 94);
    assert_eq!(priority.reasoning, "Fracture suspected");
    assert_eq!(priority.key_structures.len(), 2);
    assert_eq!(
        priority.flags,
        BTreeSet::from([AUTOMATED_ANALYSIS_FLAG.to_string()])
    );
}

#[test]
fn missing_analysis_falls_back_to_default_entry() {
    let mut scan = described_scan("S-2", "Routine follow-up", "Right Knee", "MRI");
    assert!(enrich_scan(
        &mut scan,
        &orthopedic_rules(),
        &AnalysisTable::default()
    ));

    let priority = scan.priority.expect("priority attached");
    assert_eq!(priority.level, PriorityLevel::Medium);
    assert_eq!(priority.ai_analysis, "AI analysis in progress...");
    assert_eq!(priority.confidence, 50);
    assert_eq!(priority.recommendations, "Clinical correlation recommended");
    assert!(priority.key_structures.is_empty());
}

#[test]
fn existing_priority_is_never_overwritten() {
    let existing = Priority {
        level: PriorityLevel::High,
        score: 72,
        ai_analysis: "Radiologist supplied".to_string(),
        confidence: 99,
        flags: BTreeSet::from(["manual".to_string()]),
        reasoning: "Escalated by referrer".to_string(),
        key_structures: Vec::new(),
        recommendations: String::new(),
    };
    let mut scan = described_scan("S-1", "Suspected fracture", "Wrist", "X-Ray");
    scan.priority = Some(existing.clone());

    assert!(!enrich_scan(&mut scan, &orthopedic_rules(), &analysis_table()));
    assert_eq!(scan.priority, Some(existing));
}

#[test]
fn enrichment_is_idempotent() {
    let scans = vec![
        described_scan("S-1", "Suspected fracture", "Wrist", "X-Ray"),
        described_scan("S-2", "Partial tear", "Shoulder", "MRI"),
        scan("S-3"),
    ];
    let rules = orthopedic_rules();
    let analysis = analysis_table();

    let once = enrich_scans(scans, &rules, &analysis);
    let twice = enrich_scans(once.clone(), &rules, &analysis);
    assert_eq!(once, twice);
    assert!(twice.iter().all(|scan| scan.priority.is_some()));
}
