use std::collections::BTreeSet;

use super::domain::{Priority, Scan, AUTOMATED_ANALYSIS_FLAG};
use super::rules::{AnalysisTable, RuleStore};
use super::scorer::score_scan;

/// Attaches a priority to every scan that lacks one. Existing priorities are kept.
pub fn enrich_scans(scans: Vec<Scan>, rules: &RuleStore, analysis: &AnalysisTable) -> Vec<Scan> {
    scans
        .into_iter()
        .map(|mut scan| {
            enrich_scan(&mut scan, rules, analysis);
            scan
        })
        .collect()
}

/// Returns `true` when a priority was computed for this scan.
pub fn enrich_scan(scan: &mut Scan, rules: &RuleStore, analysis: &AnalysisTable) -> bool {
    if scan.priority.is_some() {
        return false;
    }

    let decision = score_scan(scan, rules);
    let entry = analysis.lookup_or_default(&scan.scan_id);

    scan.priority = Some(Priority {
        level: decision.level,
        score: decision.score,
        ai_analysis: entry.ai_findings,
        confidence: entry.confidence,
        flags: BTreeSet::from([AUTOMATED_ANALYSIS_FLAG.to_string()]),
        reasoning: decision.reasoning,
        key_structures: entry.key_structures,
        recommendations: entry.recommendations,
    });
    true
}
