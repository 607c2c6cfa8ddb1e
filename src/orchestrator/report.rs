use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::audit::ExecutionLogEntry;
use crate::errors::WorkflowError;
use crate::model::{Classification, Decomposition, Evaluation, QueryPlan, SearchResultSet, StageOutput};

/// Minimum length of a claim worth verifying.
pub const MIN_CLAIM_CHARS: usize = 10;

/// A claim that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimText(String);

impl ClaimText {
    pub fn parse(raw: &str) -> Result<Self, WorkflowError> {
        let claim = raw.trim();
        if claim.is_empty() {
            return Err(WorkflowError::EmptyClaim);
        }
        if claim.chars().count() < MIN_CLAIM_CHARS {
            return Err(WorkflowError::ClaimTooShort);
        }
        Ok(Self(claim.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything one run produced. All five stage fields are always present,
/// holding a fallback shape when the stage failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub classification: StageOutput<Classification>,
    pub decomposition: StageOutput<Decomposition>,
    pub questions: StageOutput<QueryPlan>,
    pub search_results: Vec<SearchResultSet>,
    pub evaluation: StageOutput<Evaluation>,
    pub execution_log: Vec<ExecutionLogEntry>,
}

/// Caller-facing envelope around a run.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResponse {
    pub success: bool,
    pub claim: String,
    pub timestamp: DateTime<Local>,
    pub classification: Option<StageOutput<Classification>>,
    pub decomposition: Option<StageOutput<Decomposition>>,
    pub questions: Option<StageOutput<QueryPlan>>,
    pub search_results: Option<Vec<SearchResultSet>>,
    pub evaluation: Option<StageOutput<Evaluation>>,
    pub execution_log: Vec<ExecutionLogEntry>,
    pub error: Option<String>,
    /// Where the result store wrote the run, if it did.
    #[serde(skip)]
    pub saved_to: Option<PathBuf>,
}

impl VerificationResponse {
    pub fn completed(claim: &str, report: VerificationReport, saved_to: Option<PathBuf>) -> Self {
        Self {
            success: true,
            claim: claim.to_string(),
            timestamp: Local::now(),
            classification: Some(report.classification),
            decomposition: Some(report.decomposition),
            questions: Some(report.questions),
            search_results: Some(report.search_results),
            evaluation: Some(report.evaluation),
            execution_log: report.execution_log,
            error: None,
            saved_to,
        }
    }

    pub fn aborted(
        claim: &str,
        execution_log: Vec<ExecutionLogEntry>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            claim: claim.to_string(),
            timestamp: Local::now(),
            classification: None,
            decomposition: None,
            questions: None,
            search_results: None,
            evaluation: None,
            execution_log,
            error: Some(error.into()),
            saved_to: None,
        }
    }

    /// The parsed evaluation, when the run got that far.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref().and_then(StageOutput::parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_text_validation() {
        assert!(matches!(ClaimText::parse("   "), Err(WorkflowError::EmptyClaim)));
        assert!(matches!(ClaimText::parse("too short"), Err(WorkflowError::ClaimTooShort)));
        let claim = ClaimText::parse("  Water boils at 100C at sea level ").unwrap();
        assert_eq!(claim.as_str(), "Water boils at 100C at sea level");
    }

    #[test]
    fn test_aborted_response_shape() {
        let response = VerificationResponse::aborted("some claim text", Vec::new(), "boom");
        let v = serde_json::to_value(&response).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "boom");
        assert!(v["evaluation"].is_null());
        assert!(v.get("saved_to").is_none());
        assert!(response.evaluation().is_none());
    }
}
