use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Flag attached to every priority produced by the rule-based scorer.
pub const AUTOMATED_ANALYSIS_FLAG: &str = "automated_analysis";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(pub String);

impl ScanId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScanId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Triage level ordered by clinical urgency.
///
/// Unrecognized labels deserialize as [`PriorityLevel::Low`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Urgent,
}

impl PriorityLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Urgent, Self::High, Self::Medium, Self::Low]
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::Urgent => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "urgent" => Self::Urgent,
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl From<String> for PriorityLevel {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Review state of a scan. Serialized by its dashboard label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScanStatus {
    #[default]
    PendingReview,
    InProgress,
    Completed,
    RequiresConsultation,
}

impl ScanStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::PendingReview,
            Self::InProgress,
            Self::Completed,
            Self::RequiresConsultation,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingReview => "Pending Review",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::RequiresConsultation => "Requires Consultation",
        }
    }

    /// Accepts labels in any casing, with spaces, dashes or underscores.
    /// The legacy `Reviewed` label maps to `Completed`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "pendingreview" | "pending" => Some(Self::PendingReview),
            "inprogress" => Some(Self::InProgress),
            "completed" | "reviewed" => Some(Self::Completed),
            "requiresconsultation" => Some(Self::RequiresConsultation),
            _ => None,
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for ScanStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown scan status '{value}'"))
    }
}

impl From<ScanStatus> for String {
    fn from(value: ScanStatus) -> Self {
        value.label().to_string()
    }
}

/// Triage outcome cached on a scan after enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub level: PriorityLevel,
    pub score: u32,
    #[serde(default)]
    pub ai_analysis: String,
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub confidence: u8,
    #[serde(default)]
    pub flags: BTreeSet<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub key_structures: Vec<String>,
    #[serde(default)]
    pub recommendations: String,
}

/// A scan record as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub scan_id: ScanId,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub body_part: String,
    #[serde(default)]
    pub scan_type: String,
    #[serde(deserialize_with = "deserialize_scan_date")]
    pub scan_date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub findings: String,
    #[serde(default, alias = "assignedRadiologist")]
    pub consultant: String,
    #[serde(default)]
    pub status: ScanStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Scan {
    /// Level used for ordering; scans without a priority rank as low.
    pub fn priority_level(&self) -> PriorityLevel {
        self.priority
            .as_ref()
            .map(|priority| priority.level)
            .unwrap_or(PriorityLevel::Low)
    }

    pub fn priority_score(&self) -> u32 {
        self.priority
            .as_ref()
            .map(|priority| priority.score)
            .unwrap_or(0)
    }

    /// Worklist comparison: higher level, then higher score, then newer scan first.
    pub fn worklist_cmp(&self, other: &Self) -> Ordering {
        other
            .priority_level()
            .rank()
            .cmp(&self.priority_level().rank())
            .then_with(|| other.priority_score().cmp(&self.priority_score()))
            .then_with(|| other.scan_date.cmp(&self.scan_date))
    }
}

/// Parses RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` values, or bare dates.
pub fn parse_scan_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| {
            format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD")
        })
}

fn deserialize_scan_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_scan_date(&raw).map_err(serde::de::Error::custom)
}

/// Confidence as stored in seed files: whole percentages or `0.0..=1.0` ratios.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfidence {
    Whole(u64),
    Negative(i64),
    Fraction(f64),
}

/// Normalizes a confidence to a whole percentage in `0..=100`.
///
/// Ratios in `0.0..=1.0` are scaled to percentages; everything else is
/// rounded and clamped.
pub fn clamp_confidence(raw: f64) -> u8 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let percent = if raw <= 1.0 { raw * 100.0 } else { raw };
    percent.round().min(100.0) as u8
}

pub(crate) fn deserialize_confidence<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match RawConfidence::deserialize(deserializer)? {
        RawConfidence::Whole(value) => value.min(100) as u8,
        RawConfidence::Negative(_) => 0,
        RawConfidence::Fraction(value) => clamp_confidence(value),
    })
}
