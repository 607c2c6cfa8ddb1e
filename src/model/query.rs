use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::lenient::{self, lenient_enum};
use super::{Priority, StageRecord};

lenient_enum! {
    pub enum QueryType {
        DirectFact => "direct_fact",
        SourceVerification => "source_verification",
        ExpertConsensus => "expert_consensus",
        Statistical => "statistical",
        Contradiction => "contradiction",
    }
    default = DirectFact
}

fn unknown_claim() -> String {
    "unknown".to_string()
}

/// One search query aimed at a specific atomic claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub query: String,
    #[serde(default = "unknown_claim", deserialize_with = "lenient::string")]
    pub claim_id: String,
    #[serde(default)]
    pub query_type: QueryType,
    #[serde(default)]
    pub priority: Priority,
}

/// Query generator stage record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    #[serde(default, deserialize_with = "lenient::string")]
    pub current_date_used: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub queries: Vec<SearchQuery>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_queries: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub strategy_rationale: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_notes: Vec<String>,
}

impl QueryPlan {
    /// Note queries that target a claim id the decomposition never defined.
    ///
    /// Such queries are still executed; the evaluator sees them under the id
    /// they were issued for.
    pub fn check_claim_refs(&mut self, known_ids: &[String]) {
        if known_ids.is_empty() {
            return;
        }
        for q in &self.queries {
            if !known_ids.contains(&q.claim_id) {
                self.validation_notes.push(format!(
                    "Query {} references unknown claim {}",
                    q.id, q.claim_id
                ));
            }
        }
    }
}

impl StageRecord for QueryPlan {
    const REQUIRED: &'static [&'static str] = &["queries"];

    /// Drop blank queries, then give every remaining query a unique id.
    fn normalize(&mut self) {
        let before = self.queries.len();
        self.queries.retain(|q| !q.query.trim().is_empty());
        let dropped = before - self.queries.len();
        if dropped > 0 {
            self.validation_notes
                .push(format!("Dropped {} query(ies) with empty text", dropped));
        }

        let mut seen: HashSet<String> = HashSet::new();
        for (index, q) in self.queries.iter_mut().enumerate() {
            q.query = q.query.trim().to_string();
            let original = q.id.trim().to_string();
            let mut id = if original.is_empty() {
                format!("q{}", index + 1)
            } else {
                original.clone()
            };
            let base = id.clone();
            let mut suffix = 2;
            while seen.contains(&id) {
                id = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            if !original.is_empty() && id != original {
                self.validation_notes
                    .push(format!("Renamed duplicate query id {} to {}", original, id));
            }
            if q.claim_id.trim().is_empty() {
                q.claim_id = unknown_claim();
            }
            seen.insert(id.clone());
            q.id = id;
        }
        self.total_queries = self.queries.len() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> QueryPlan {
        let mut plan: QueryPlan = serde_json::from_value(value).unwrap();
        plan.normalize();
        plan
    }

    #[test]
    fn test_query_plan_parses_schema() {
        let plan = parse(json!({
            "current_date_used": "2026-10-18",
            "queries": [
                {"id": "q1", "query": "unemployment rate 2024", "claim_id": "claim_1",
                 "query_type": "statistical", "priority": "high"}
            ],
            "total_queries": 10,
            "strategy_rationale": "official stats first"
        }));
        assert_eq!(plan.queries.len(), 1);
        assert_eq!(plan.queries[0].query_type, QueryType::Statistical);
        assert_eq!(plan.total_queries, 1);
        assert!(plan.validation_notes.is_empty());
    }

    #[test]
    fn test_blank_queries_dropped_and_ids_assigned() {
        let plan = parse(json!({
            "queries": [
                {"query": "  "},
                {"query": "first"},
                {"id": "q2", "query": "second"},
                {"id": "q2", "query": "third"}
            ]
        }));
        let ids: Vec<_> = plan.queries.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q2_2"]);
        assert_eq!(plan.queries[0].claim_id, "unknown");
        assert_eq!(plan.validation_notes.len(), 2);
    }

    #[test]
    fn test_unknown_claim_refs_are_noted() {
        let mut plan = parse(json!({
            "queries": [
                {"id": "q1", "query": "a", "claim_id": "claim_1"},
                {"id": "q2", "query": "b", "claim_id": "claim_5"}
            ]
        }));
        plan.check_claim_refs(&["claim_1".to_string()]);
        assert_eq!(plan.validation_notes.len(), 1);
        assert!(plan.validation_notes[0].contains("claim_5"));
        assert_eq!(plan.queries.len(), 2);
    }
}
