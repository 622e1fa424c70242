use metrics_exporter_prometheus::PrometheusHandle;
use scan_triage::config::DataConfig;
use scan_triage::triage::{InMemoryScanRepository, ScanStatus, SeedData, TriageService};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) public_dir: Arc<PathBuf>,
}

/// Loads and enriches the seed files, then wraps them in the process-lifetime repository.
pub(crate) fn build_triage_service(data: &DataConfig) -> TriageService<InMemoryScanRepository> {
    let seed = SeedData::load(data);
    let repository = Arc::new(InMemoryScanRepository::new(seed.scans));
    TriageService::new(repository)
}

pub(crate) fn parse_status(raw: &str) -> Result<ScanStatus, String> {
    ScanStatus::parse(raw).ok_or_else(|| {
        let known: Vec<_> = ScanStatus::ordered()
            .iter()
            .map(|status| status.label())
            .collect();
        format!("unknown status '{raw}' (expected one of: {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_lists_known_labels_on_error() {
        assert_eq!(parse_status("in-progress"), Ok(ScanStatus::InProgress));
        let err = parse_status("archived").expect_err("unknown status rejected");
        assert!(err.contains("Requires Consultation"));
    }

    #[test]
    fn missing_seed_files_yield_an_empty_service() {
        let missing =
            std::env::temp_dir().join(format!("scan-triage-api-{}", std::process::id()));
        let service = build_triage_service(&DataConfig {
            scans_path: missing.join("scans.json"),
            rules_path: missing.join("priority_rules.json"),
            analysis_path: missing.join("ai_analysis.json"),
            public_dir: missing.join("public"),
        });
        assert!(service.all().expect("repository readable").is_empty());
    }
}
