use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::truncate_chars;

/// Preview fields keep at most this many characters.
pub const PREVIEW_CHARS: usize = 200;

/// Workflow steps that write to the execution log, with the agent label each
/// one records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Classification,
    Decomposition,
    QuestionGeneration,
    SearchExecution,
    Evaluation,
}

impl Step {
    pub fn agent(&self) -> &'static str {
        match self {
            Step::Classification => "classifier_agent",
            Step::Decomposition => "decomposer_agent",
            Step::QuestionGeneration => "question_agent",
            Step::SearchExecution => "perplexity_api",
            Step::Evaluation => "evaluator_agent",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Classification => write!(f, "classification"),
            Step::Decomposition => write!(f, "decomposition"),
            Step::QuestionGeneration => write!(f, "question_generation"),
            Step::SearchExecution => write!(f, "search_execution"),
            Step::Evaluation => write!(f, "evaluation"),
        }
    }
}

/// One stage's input and output, captured for replay and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    pub timestamp: DateTime<Local>,
    pub step: Step,
    pub agent: String,
    pub input_preview: Option<String>,
    pub output_preview: Option<String>,
    pub full_output: Value,
}

impl ExecutionLogEntry {
    pub fn new(step: Step, input: &Value, output: Value) -> Self {
        Self {
            timestamp: Local::now(),
            step,
            agent: step.agent().to_string(),
            input_preview: preview(input),
            output_preview: preview(&output),
            full_output: output,
        }
    }
}

/// Compact text form of a value, truncated; `None` for empty values.
fn preview(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) if s.is_empty() => return None,
        Value::Array(items) if items.is_empty() => return None,
        Value::Object(map) if map.is_empty() => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some(truncate_chars(&text, PREVIEW_CHARS).to_string())
}

pub mod logger;
pub use logger::ExecutionLog;
