//! Scan triage: rule-based priority scoring, enrichment, the in-memory scan
//! repository, and the worklist ordering served to the dashboard.

pub mod domain;
pub mod enrichment;
pub mod loader;
pub mod repository;
pub mod router;
pub mod rules;
pub mod scorer;
pub mod service;
pub mod worklist;

#[cfg(test)]
mod tests;

pub use domain::{
    clamp_confidence, parse_scan_date, Priority, PriorityLevel, Scan, ScanId, ScanStatus,
    AUTOMATED_ANALYSIS_FLAG,
};
pub use enrichment::{enrich_scan, enrich_scans};
pub use loader::{
    load_analysis, load_rules, load_scans, scans_from_reader, SeedData, SeedLoadError,
};
pub use repository::{InMemoryScanRepository, RepositoryError, ScanRepository};
pub use router::triage_router;
pub use rules::{AiAnalysisEntry, AnalysisTable, PriorityRule, RuleStore};
pub use scorer::{score_scan, search_corpus, TriageDecision, DEFAULT_REASONING};
pub use service::{TriageError, TriageService, STATUS_REQUIRED};
pub use worklist::{sort_worklist, ScanConfidence, WorklistFilter, WorklistSummary};
