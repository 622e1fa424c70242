use crate::infra::build_triage_service;
use clap::Args;
use scan_triage::config::AppConfig;
use scan_triage::error::AppError;
use scan_triage::triage::{Scan, ScanStatus, WorklistFilter, WorklistSummary};

#[derive(Args, Debug, Default)]
pub(crate) struct WorklistReportArgs {
    /// Only list scans in this review status (e.g. "Pending Review")
    #[arg(long, value_parser = crate::infra::parse_status)]
    pub(crate) status: Option<ScanStatus>,
    /// Case-insensitive match on patient id, patient name, or body part
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Emit the worklist as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_worklist_report(args: WorklistReportArgs) -> Result<(), AppError> {
    let WorklistReportArgs {
        status,
        search,
        json,
    } = args;

    let config = AppConfig::load()?;
    let service = build_triage_service(&config.data);

    let filter = WorklistFilter { status, search };
    let worklist = service.worklist(&filter)?;

    if json {
        let rendered = serde_json::to_string_pretty(&worklist)?;
        println!("{}", rendered);
        return Ok(());
    }

    let summary = service.summary()?;
    render_summary(&summary);
    render_worklist(&worklist);
    Ok(())
}

fn render_summary(summary: &WorklistSummary) {
    println!("Imaging triage worklist");
    println!(
        "- {} scans | {} pending review | {} urgent | {} requiring consultation",
        summary.total, summary.pending_review, summary.urgent, summary.requires_consultation
    );
    if let Some(confidence) = summary.average_confidence {
        println!("- average AI confidence {:.0}%", confidence);
    }

    println!("\nBy priority");
    for (level, count) in summary.by_level.iter().rev() {
        println!("  - {}: {}", level.label(), count);
    }

    if !summary.by_scan_type.is_empty() {
        println!("\nBy modality");
        for (scan_type, count) in &summary.by_scan_type {
            println!("  - {}: {}", scan_type, count);
        }
    }
}

fn render_worklist(worklist: &[Scan]) {
    if worklist.is_empty() {
        println!("\nWorklist: no matching scans");
        return;
    }

    println!("\nWorklist");
    for scan in worklist {
        println!("{}", worklist_row(scan));
        if let Some(priority) = &scan.priority {
            println!("      {}", priority.reasoning);
        }
    }
}

fn worklist_row(scan: &Scan) -> String {
    format!(
        "  [{:<6} {:>3}] {} | {} | {} {} | {} | {}",
        scan.priority_level().label(),
        scan.priority_score(),
        scan.scan_id,
        scan.patient_id,
        scan.body_part,
        scan.scan_type,
        scan.scan_date.format("%Y-%m-%d"),
        scan.status.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use scan_triage::triage::{Priority, PriorityLevel, ScanId};
    use std::collections::BTreeSet;

    #[test]
    fn worklist_row_shows_priority_and_status() {
        let scan = Scan {
            scan_id: ScanId::from("SCAN-9"),
            patient_id: "P-9".to_string(),
            patient_name: None,
            body_part: "Left Wrist".to_string(),
            scan_type: "X-Ray".to_string(),
            scan_date: Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).single().expect("valid date"),
            description: String::new(),
            findings: String::new(),
            consultant: String::new(),
            status: ScanStatus::InProgress,
            priority: Some(Priority {
                level: PriorityLevel::Urgent,
                score: 95,
                ai_analysis: String::new(),
                confidence: 90,
                flags: BTreeSet::new(),
                reasoning: "Fracture suspected".to_string(),
                key_structures: Vec::new(),
                recommendations: String::new(),
            }),
            review_timestamp: None,
            image_url: None,
        };

        let row = worklist_row(&scan);
        assert!(row.contains("95"));
        assert!(row.contains("SCAN-9"));
        assert!(row.contains("2024-03-04"));
        assert!(row.contains("In Progress"));
        assert!(row.to_lowercase().contains("urgent"));
    }
}
