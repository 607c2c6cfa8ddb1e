//! Recover a JSON object from free-form reasoning-service text.
//!
//! Strategies are tried in order and the first JSON *object* wins:
//!
//! 1. the whole text parses as JSON
//! 2. a balanced top-level `{...}` region found by the brace scanner, first
//!    string-aware, then counting braces alone
//! 3. the body of a fenced code block
//!
//! If none succeeds the text is returned as [`Extraction::Unparsed`]. The
//! extractor never fails.

pub mod normalize;

pub use normalize::validate;

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::util::{balanced_brace_regions, depth_only_regions};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("static regex"));

/// Result of running the extraction cascade over one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Record(Map<String, Value>),
    Unparsed { raw_output: String },
}

impl Extraction {
    pub fn is_record(&self) -> bool {
        matches!(self, Extraction::Record(_))
    }

    /// The wire form: the record itself, or `{raw_output, parse_error: true}`.
    pub fn into_value(self) -> Value {
        match self {
            Extraction::Record(map) => Value::Object(map),
            Extraction::Unparsed { raw_output } => {
                let mut map = Map::new();
                map.insert("raw_output".to_string(), Value::String(raw_output));
                map.insert("parse_error".to_string(), Value::Bool(true));
                Value::Object(map)
            }
        }
    }

    /// Classify an already-parsed object, recognizing the fallback wire form.
    fn from_object(map: Map<String, Value>) -> Self {
        let is_fallback = map.len() == 2
            && map.get("parse_error") == Some(&Value::Bool(true))
            && map.get("raw_output").is_some_and(Value::is_string);
        if is_fallback {
            let raw_output = match map.get("raw_output") {
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            };
            Extraction::Unparsed { raw_output }
        } else {
            Extraction::Record(map)
        }
    }
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Run the extraction cascade over `text`.
pub fn extract(text: &str) -> Extraction {
    if let Some(map) = parse_object(text) {
        return Extraction::from_object(map);
    }

    let regions = balanced_brace_regions(text);
    for region in &regions {
        if let Some(map) = parse_object(region) {
            return Extraction::from_object(map);
        }
    }

    for region in depth_only_regions(text) {
        if regions.contains(&region) {
            continue;
        }
        if let Some(map) = parse_object(region) {
            return Extraction::from_object(map);
        }
    }

    for caps in FENCED_BLOCK.captures_iter(text) {
        if let Some(map) = caps.get(1).and_then(|body| parse_object(body.as_str())) {
            return Extraction::from_object(map);
        }
    }

    tracing::warn!(chars = text.len(), "No JSON object found in reasoning output");
    Extraction::Unparsed {
        raw_output: text.to_string(),
    }
}
