use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::DataConfig;

use super::domain::{Priority, Scan};
use super::enrichment::enrich_scans;
use super::rules::{AiAnalysisEntry, AnalysisTable, PriorityRule, RuleStore};

/// Seed file could not be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum SeedLoadError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the service needs at startup, already enriched.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub rules: RuleStore,
    pub analysis: AnalysisTable,
    pub scans: Vec<Scan>,
}

impl SeedData {
    /// Loads all seed files. A file that fails to load is logged and treated as empty.
    pub fn load(config: &DataConfig) -> Self {
        let rules = load_rules(&config.rules_path)
            .map(RuleStore::new)
            .unwrap_or_else(|err| {
                warn!(error = %err, "priority rules unavailable; every scan will be routine");
                RuleStore::default()
            });

        let analysis = load_analysis(&config.analysis_path)
            .map(AnalysisTable::new)
            .unwrap_or_else(|err| {
                warn!(error = %err, "AI analysis table unavailable; using default findings");
                AnalysisTable::default()
            });

        let scans = load_scans(&config.scans_path).unwrap_or_else(|err| {
            warn!(error = %err, "scan seed unavailable; starting with an empty worklist");
            Vec::new()
        });

        let scans = enrich_scans(scans, &rules, &analysis);

        info!(
            rules = rules.len(),
            analysis_entries = analysis.len(),
            scans = scans.len(),
            "seed data loaded"
        );

        Self {
            rules,
            analysis,
            scans,
        }
    }
}

pub fn load_rules(path: &Path) -> Result<Vec<PriorityRule>, SeedLoadError> {
    read_json(path)
}

/// Reads the analysis table. Entries that fail to parse are skipped so one bad
/// record cannot empty the table.
pub fn load_analysis(path: &Path) -> Result<Vec<AiAnalysisEntry>, SeedLoadError> {
    let raw: Vec<Value> = read_json(path)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(position, error = %err, "skipping malformed analysis entry");
                None
            }
        })
        .collect())
}

pub fn load_scans(path: &Path) -> Result<Vec<Scan>, SeedLoadError> {
    let raw: Vec<Value> = read_json(path)?;
    Ok(normalize_scans(raw))
}

/// Parses scans from any reader, applying the same normalization as [`load_scans`].
pub fn scans_from_reader<R: Read>(reader: R) -> Result<Vec<Scan>, serde_json::Error> {
    let raw: Vec<Value> = serde_json::from_reader(reader)?;
    Ok(normalize_scans(raw))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SeedLoadError> {
    let file = std::fs::File::open(path).map_err(|source| SeedLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| SeedLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Drops unparseable records and legacy priority shapes so enrichment can
/// recompute them from the rule table.
fn normalize_scans(raw: Vec<Value>) -> Vec<Scan> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(position, mut value)| {
            let priority = value
                .as_object_mut()
                .and_then(|object| object.remove("priority"));

            let mut scan: Scan = match serde_json::from_value(value) {
                Ok(scan) => scan,
                Err(err) => {
                    warn!(position, error = %err, "skipping malformed scan record");
                    return None;
                }
            };

            scan.priority = match priority {
                None | Some(Value::Null) => None,
                Some(Value::Object(object)) => {
                    match serde_json::from_value::<Priority>(Value::Object(object)) {
                        Ok(priority) => Some(priority),
                        Err(err) => {
                            warn!(
                                scan_id = %scan.scan_id,
                                error = %err,
                                "discarding malformed priority"
                            );
                            None
                        }
                    }
                }
                Some(legacy) => {
                    warn!(
                        scan_id = %scan.scan_id,
                        legacy = %legacy,
                        "discarding legacy priority label"
                    );
                    None
                }
            };

            Some(scan)
        })
        .collect()
}
