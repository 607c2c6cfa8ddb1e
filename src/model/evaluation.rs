use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::StageRecord;
use super::lenient::{self, lenient_enum};

lenient_enum! {
    pub enum Verdict {
        True => "TRUE",
        False => "FALSE",
        PartiallyTrue => "PARTIALLY_TRUE",
        Misleading => "MISLEADING",
        Unverified => "UNVERIFIED",
        Unsupported => "UNSUPPORTED",
    }
    default = Unverified
}

impl Verdict {
    /// Whether the verdict asserts something about the claim's truth.
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Verdict::Unverified | Verdict::Unsupported)
    }
}

lenient_enum! {
    pub enum DependencyStatus {
        Foundational => "foundational",
        Derived => "derived",
        Independent => "independent",
    }
    default = Independent
}

/// Free text that may arrive as a list; list items are joined with `"; "`.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .filter_map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .or_else(|| v.is_number().then(|| v.to_string()))
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn tier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let n = lenient::count(deserializer)?;
    Ok(n.clamp(1, 4) as u8)
}

fn default_tier() -> u8 {
    4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvidence {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    /// 1 (official, peer-reviewed) through 4 (unverified).
    #[serde(default = "default_tier", deserialize_with = "tier")]
    pub credibility_tier: u8,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub supports_claim: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubClaimVerdict {
    #[serde(default, deserialize_with = "lenient::string")]
    pub claim_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub statement: String,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub supporting_count: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub refuting_count: u32,
    #[serde(default)]
    pub dependency_status: DependencyStatus,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub key_evidence: Vec<KeyEvidence>,
    #[serde(default, deserialize_with = "text")]
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyAnalysis {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub foundational_claims_verified: bool,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub broken_dependencies: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    pub notes: String,
}

/// Evaluator stage record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub overall_verdict: Verdict,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub sub_claim_verdicts: Vec<SubClaimVerdict>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub dependency_analysis: DependencyAnalysis,
    #[serde(default, deserialize_with = "text")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub key_findings: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    pub limitations: String,
}

/// Confidence may come back as a percentage; fold it into [0, 1].
fn unit_interval(value: f64) -> f64 {
    let value = if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    };
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Evaluation {
    /// Downgrade a decisive verdict that no retrieved evidence can back.
    pub fn apply_evidence_floor(&mut self, successful_searches: usize) {
        if successful_searches > 0 || !self.overall_verdict.is_decisive() {
            return;
        }
        let note = format!(
            "Verdict {} downgraded to UNVERIFIED: no search returned usable evidence.",
            self.overall_verdict
        );
        self.overall_verdict = Verdict::Unverified;
        self.confidence_score = self.confidence_score.min(0.3);
        self.limitations = if self.limitations.trim().is_empty() {
            note
        } else {
            format!("{} {}", self.limitations.trim_end(), note)
        };
    }
}

impl StageRecord for Evaluation {
    const REQUIRED: &'static [&'static str] = &["overall_verdict"];

    fn normalize(&mut self) {
        self.confidence_score = unit_interval(self.confidence_score);
        for sub in &mut self.sub_claim_verdicts {
            sub.confidence = unit_interval(sub.confidence);
        }
        self.key_findings.retain(|f| !f.trim().is_empty());
    }
}
