use serde::{Deserialize, Serialize};

use super::StageRecord;
use super::lenient::{self, lenient_enum};

lenient_enum! {
    pub enum Domain {
        Politics => "Politics",
        Health => "Health",
        Science => "Science",
        Economics => "Economics",
        Social => "Social",
        Other => "Other",
    }
    default = Other
}

lenient_enum! {
    pub enum ClaimType {
        Factual => "Factual",
        Opinion => "Opinion",
        Prediction => "Prediction",
        Satire => "Satire",
        Mixed => "Mixed",
    }
    default = Mixed
}

lenient_enum! {
    pub enum Complexity {
        Simple => "Simple",
        Compound => "Compound",
        Complex => "Complex",
    }
    default = Simple
}

lenient_enum! {
    pub enum Urgency {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
    default = Medium
}

/// Classifier stage record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub domain: Domain,
    #[serde(default)]
    pub claim_type: ClaimType,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default, deserialize_with = "lenient::string")]
    pub rationale: String,
}

impl StageRecord for Classification {
    const REQUIRED: &'static [&'static str] = &["domain"];
}
