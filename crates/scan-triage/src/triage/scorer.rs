use serde::Serialize;

use super::domain::{PriorityLevel, Scan};
use super::rules::RuleStore;

pub const DEFAULT_REASONING: &str = "Routine study";

/// Level, score, and reasoning taken from a single winning rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageDecision {
    pub level: PriorityLevel,
    pub score: u32,
    pub reasoning: String,
    pub matched_keywords: Vec<String>,
}

impl TriageDecision {
    pub fn routine() -> Self {
        Self {
            level: PriorityLevel::Low,
            score: 0,
            reasoning: DEFAULT_REASONING.to_string(),
            matched_keywords: Vec::new(),
        }
    }
}

/// Lowercased search text built from the free-text fields of a scan.
pub fn search_corpus(scan: &Scan) -> String {
    [
        scan.description.as_str(),
        scan.body_part.as_str(),
        scan.scan_type.as_str(),
        scan.findings.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Picks the highest scoring matching rule. Equal scores keep the earlier rule.
pub fn score_scan(scan: &Scan, rules: &RuleStore) -> TriageDecision {
    score_corpus(&search_corpus(scan), rules)
}

pub(crate) fn score_corpus(corpus: &str, rules: &RuleStore) -> TriageDecision {
    let mut best = TriageDecision::routine();

    for rule in rules.rules() {
        let matched = rule.matched_keywords(corpus);
        if matched.is_empty() {
            continue;
        }

        if rule.score > best.score {
            best = TriageDecision {
                level: rule.priority_label,
                score: rule.score,
                reasoning: rule.reasoning.clone(),
                matched_keywords: matched.into_iter().map(str::to_string).collect(),
            };
        }
    }

    best
}
