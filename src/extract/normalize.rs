//! Typed validation pass applied after extraction.

use serde_json::Value;

use super::Extraction;
use crate::model::{StageOutput, StageRecord};

/// Turn an extraction into a typed stage output.
///
/// Missing optional fields fall back to defaults through the lenient
/// deserializers; a missing or null required field rejects the record.
pub fn validate<T: StageRecord>(extraction: Extraction) -> StageOutput<T> {
    let map = match extraction {
        Extraction::Unparsed { raw_output } => return StageOutput::unparsed(raw_output),
        Extraction::Record(map) => map,
    };

    let missing: Vec<&str> = T::REQUIRED
        .iter()
        .copied()
        .filter(|key| map.get(*key).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return StageOutput::Rejected {
            validation_error: format!("missing required field(s): {}", missing.join(", ")),
            record: Value::Object(map),
        };
    }

    let record = Value::Object(map);
    match serde_json::from_value::<T>(record.clone()) {
        Ok(mut parsed) => {
            parsed.normalize();
            StageOutput::Parsed(parsed)
        }
        Err(e) => StageOutput::Rejected {
            validation_error: format!("record does not match schema: {}", e),
            record,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::model::{Classification, Domain, Evaluation, Verdict};

    #[test]
    fn test_valid_record_is_parsed() {
        let out: StageOutput<Classification> =
            validate(extract(r#"{"domain": "Science", "claim_type": "Factual"}"#));
        assert_eq!(out.parsed().unwrap().domain, Domain::Science);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let out: StageOutput<Evaluation> = validate(extract(r#"{"summary": "no verdict here"}"#));
        match out {
            StageOutput::Rejected {
                validation_error,
                record,
            } => {
                assert!(validation_error.contains("overall_verdict"));
                assert_eq!(record["summary"], "no verdict here");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_null_required_field_is_rejected() {
        let out: StageOutput<Evaluation> = validate(extract(r#"{"overall_verdict": null}"#));
        assert!(matches!(out, StageOutput::Rejected { .. }));
    }

    #[test]
    fn test_unparsed_passes_through() {
        let out: StageOutput<Evaluation> = validate(extract("the claim seems true"));
        assert!(matches!(out, StageOutput::Unparsed { parse_error: true, .. }));
    }

    #[test]
    fn test_normalize_runs_after_parse() {
        let out: StageOutput<Evaluation> =
            validate(extract(r#"{"overall_verdict": "misleading", "confidence_score": 140}"#));
        let e = out.parsed().unwrap();
        assert_eq!(e.overall_verdict, Verdict::Misleading);
        assert_eq!(e.confidence_score, 1.0);
    }
}
