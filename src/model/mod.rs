//! Structured records exchanged between workflow stages.
//!
//! Every stage produces a [`StageOutput`]: either a typed record that passed
//! normalization, or one of the explicit fallback shapes that downstream stages
//! treat as empty input. The serialized form of each variant is the wire shape
//! callers see in reports and persisted results.

pub mod classification;
pub mod decomposition;
pub mod evaluation;
pub mod evidence;
pub(crate) mod lenient;
pub mod query;

pub use classification::{ClaimType, Classification, Complexity, Domain, Urgency};
pub use decomposition::{AtomicClaim, ClaimKind, Decomposition, DependencyGraph};
pub use evaluation::{DependencyAnalysis, DependencyStatus, Evaluation, KeyEvidence, SubClaimVerdict, Verdict};
pub use evidence::{CondensedHit, CondensedResult, SearchHit, SearchResultSet};
pub use query::{QueryPlan, QueryType, SearchQuery};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

lenient::lenient_enum! {
    /// Relative importance shared by atomic claims and search queries.
    pub enum Priority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
    default = Medium
}

/// A typed stage record that can be validated after extraction.
pub trait StageRecord: Serialize + DeserializeOwned + Default {
    /// Top-level keys that must be present and non-null for the record to be usable.
    const REQUIRED: &'static [&'static str];

    /// Repair or annotate the record after deserialization.
    fn normalize(&mut self) {}
}

/// The outcome of one reasoning stage.
///
/// Serialized untagged, so a parsed record looks exactly like the schema the
/// model was asked for and each fallback keeps its marker field
/// (`parse_error`, `validation_error` or `error`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageOutput<T> {
    /// Reasoning call failed before producing text.
    Failed { error: String },
    /// No JSON object could be recovered from the response text.
    Unparsed { raw_output: String, parse_error: bool },
    /// An object was recovered but lacks a required field.
    Rejected {
        record: Value,
        validation_error: String,
    },
    Parsed(T),
}

impl<T> StageOutput<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        StageOutput::Failed {
            error: message.into(),
        }
    }

    pub fn unparsed(raw_output: impl Into<String>) -> Self {
        StageOutput::Unparsed {
            raw_output: raw_output.into(),
            parse_error: true,
        }
    }

    pub fn parsed(&self) -> Option<&T> {
        match self {
            StageOutput::Parsed(record) => Some(record),
            _ => None,
        }
    }

    pub fn parsed_mut(&mut self) -> Option<&mut T> {
        match self {
            StageOutput::Parsed(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, StageOutput::Parsed(_))
    }

    /// Short description of why the stage produced no usable record.
    pub fn problem(&self) -> Option<String> {
        match self {
            StageOutput::Parsed(_) => None,
            StageOutput::Failed { error } => Some(error.clone()),
            StageOutput::Unparsed { .. } => Some("response contained no JSON object".to_string()),
            StageOutput::Rejected {
                validation_error, ..
            } => Some(validation_error.clone()),
        }
    }
}

impl<T: Clone + Default> StageOutput<T> {
    /// The parsed record, or the empty default that downstream stages consume.
    pub fn or_empty(&self) -> T {
        self.parsed().cloned().unwrap_or_default()
    }
}
