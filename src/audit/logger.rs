use serde::Serialize;
use serde_json::Value;

use super::{ExecutionLogEntry, Step};

/// Append-only record of one verification run.
///
/// Owned by the orchestrating task; search workers never touch it, so no
/// locking is involved. Entries are never removed or reordered.
#[derive(Debug, Default, Clone)]
pub struct ExecutionLog {
    entries: Vec<ExecutionLogEntry>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for `step`.
    ///
    /// Values that fail to serialize are logged as their error text so a
    /// diagnostic record is still produced.
    pub fn record<I, O>(&mut self, step: Step, input: &I, output: &O)
    where
        I: Serialize + ?Sized,
        O: Serialize + ?Sized,
    {
        let input = to_value(input);
        let output = to_value(output);
        tracing::debug!(step = %step, agent = step.agent(), "Execution log entry");
        self.entries.push(ExecutionLogEntry::new(step, &input, output));
    }

    pub fn entries(&self) -> &[ExecutionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ExecutionLogEntry> {
        self.entries
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value)
        .unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_starts_empty() {
        let log = ExecutionLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_entries_keep_append_order() {
        let mut log = ExecutionLog::new();
        log.record(Step::Classification, "claim text", &json!({"domain": "Health"}));
        log.record(Step::Decomposition, &json!({"domain": "Health"}), &json!({"atomic_claims": []}));
        log.record(Step::Evaluation, &Vec::<u8>::new(), &json!({"error": "throttled"}));

        let steps: Vec<Step> = log.entries().iter().map(|e| e.step).collect();
        assert_eq!(
            steps,
            vec![Step::Classification, Step::Decomposition, Step::Evaluation]
        );
        assert_eq!(log.entries()[2].full_output["error"], "throttled");
    }

    #[test]
    fn test_into_entries_serializes_wire_fields() {
        let mut log = ExecutionLog::new();
        log.record(Step::SearchExecution, &json!([{"id": "q1"}]), &json!([]));
        let entries = log.into_entries();
        let v = serde_json::to_value(&entries).unwrap();
        for key in ["timestamp", "step", "agent", "input_preview", "output_preview", "full_output"] {
            assert!(v[0].get(key).is_some(), "missing {}", key);
        }
        assert_eq!(v[0]["step"], "search_execution");
    }
}
