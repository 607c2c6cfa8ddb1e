use serde::Serialize;

/// Position of a run in the fixed stage sequence. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Classify,
    Decompose,
    GenerateQueries,
    RetrieveEvidence,
    Evaluate,
    Done,
}

impl WorkflowState {
    pub fn next(self) -> Self {
        match self {
            WorkflowState::Classify => WorkflowState::Decompose,
            WorkflowState::Decompose => WorkflowState::GenerateQueries,
            WorkflowState::GenerateQueries => WorkflowState::RetrieveEvidence,
            WorkflowState::RetrieveEvidence => WorkflowState::Evaluate,
            WorkflowState::Evaluate | WorkflowState::Done => WorkflowState::Done,
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowState::Classify => "CLASSIFY",
            WorkflowState::Decompose => "DECOMPOSE",
            WorkflowState::GenerateQueries => "GENERATE_QUERIES",
            WorkflowState::RetrieveEvidence => "RETRIEVE_EVIDENCE",
            WorkflowState::Evaluate => "EVALUATE",
            WorkflowState::Done => "DONE",
        };
        write!(f, "{}", name)
    }
}
