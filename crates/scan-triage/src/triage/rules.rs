use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{PriorityLevel, ScanId};

/// Keyword rule mapping matched terms to a triage level and score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityRule {
    pub keywords: Vec<String>,
    #[serde(alias = "priority", alias = "level")]
    pub priority_label: PriorityLevel,
    pub score: u32,
    #[serde(default)]
    pub reasoning: String,
}

impl PriorityRule {
    pub fn new(
        keywords: impl IntoIterator<Item = impl Into<String>>,
        priority_label: PriorityLevel,
        score: u32,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            priority_label,
            score,
            reasoning: reasoning.into(),
        }
        .normalized()
    }

    /// Lowercases keywords, drops blanks, and collapses duplicates in first-seen order.
    pub fn normalized(mut self) -> Self {
        let mut keywords: Vec<String> = Vec::with_capacity(self.keywords.len());
        for keyword in self.keywords.drain(..) {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        self.keywords = keywords;
        self
    }

    /// Keywords contained in an already-lowercased corpus.
    pub fn matched_keywords<'a>(&'a self, corpus: &str) -> Vec<&'a str> {
        self.keywords
            .iter()
            .filter(|keyword| corpus.contains(keyword.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// Ordered, read-only rule collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStore {
    rules: Vec<PriorityRule>,
}

impl RuleStore {
    pub fn new(rules: impl IntoIterator<Item = PriorityRule>) -> Self {
        Self {
            rules: rules.into_iter().map(PriorityRule::normalized).collect(),
        }
    }

    pub fn rules(&self) -> &[PriorityRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Precomputed findings for a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisEntry {
    pub scan_id: ScanId,
    #[serde(default)]
    pub ai_findings: String,
    #[serde(
        default,
        alias = "aiConfidenceScore",
        deserialize_with = "super::domain::deserialize_confidence"
    )]
    pub confidence: u8,
    #[serde(default)]
    pub key_structures: Vec<String>,
    #[serde(default)]
    pub recommendations: String,
}

impl AiAnalysisEntry {
    /// Entry used when a scan has no precomputed analysis.
    pub fn fallback(scan_id: ScanId) -> Self {
        Self {
            scan_id,
            ai_findings: "AI analysis in progress...".to_string(),
            confidence: 50,
            key_structures: Vec::new(),
            recommendations: "Clinical correlation recommended".to_string(),
        }
    }
}

/// Analysis entries keyed by scan id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisTable {
    entries: HashMap<ScanId, AiAnalysisEntry>,
}

impl AnalysisTable {
    /// Builds the table; the first entry wins for repeated scan ids and
    /// confidence is clamped to 100.
    pub fn new(entries: impl IntoIterator<Item = AiAnalysisEntry>) -> Self {
        let mut table = HashMap::new();
        for mut entry in entries {
            entry.confidence = entry.confidence.min(100);
            table.entry(entry.scan_id.clone()).or_insert(entry);
        }
        Self { entries: table }
    }

    pub fn get(&self, scan_id: &ScanId) -> Option<&AiAnalysisEntry> {
        self.entries.get(scan_id)
    }

    pub fn lookup_or_default(&self, scan_id: &ScanId) -> AiAnalysisEntry {
        self.get(scan_id)
            .cloned()
            .unwrap_or_else(|| AiAnalysisEntry::fallback(scan_id.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
