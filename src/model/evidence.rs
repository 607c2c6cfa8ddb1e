use serde::{Deserialize, Serialize};

use super::{Priority, QueryType, SearchQuery};
use crate::errors::SearchFailure;
use crate::util::truncate_chars;

/// One normalized search result item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based rank within the provider response.
    pub position: u32,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub domain: String,
}

/// Evidence gathered for one query. Built once by the search coordinator and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub query_id: String,
    pub query: String,
    pub claim_id: String,
    pub query_type: QueryType,
    pub priority: Priority,
    pub results: Vec<SearchHit>,
    pub success: bool,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl SearchResultSet {
    pub fn succeeded(query: &SearchQuery, results: Vec<SearchHit>) -> Self {
        Self {
            query_id: query.id.clone(),
            query: query.query.clone(),
            claim_id: query.claim_id.clone(),
            query_type: query.query_type,
            priority: query.priority,
            results,
            success: true,
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(query: &SearchQuery, failure: &SearchFailure) -> Self {
        Self {
            query_id: query.id.clone(),
            query: query.query.clone(),
            claim_id: query.claim_id.clone(),
            query_type: query.query_type,
            priority: query.priority,
            results: Vec::new(),
            success: false,
            error: Some(failure.to_string()),
            error_kind: Some(failure.kind().to_string()),
        }
    }

    /// Shrink the record for the evaluator prompt: the first `top` hits with
    /// snippets cut to `snippet_chars`.
    pub fn condense(&self, top: usize, snippet_chars: usize) -> CondensedResult {
        CondensedResult {
            query_id: self.query_id.clone(),
            query: self.query.clone(),
            claim_id: self.claim_id.clone(),
            success: self.success,
            result_count: self.results.len(),
            top_results: self
                .results
                .iter()
                .take(top)
                .map(|hit| CondensedHit {
                    title: hit.title.clone(),
                    url: hit.url.clone(),
                    snippet: truncate_chars(&hit.snippet, snippet_chars).to_string(),
                    domain: hit.domain.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub domain: String,
}

/// Search evidence as handed to the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedResult {
    pub query_id: String,
    pub query: String,
    pub claim_id: String,
    pub success: bool,
    pub result_count: usize,
    pub top_results: Vec<CondensedHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SearchQuery {
        SearchQuery {
            id: "q1".into(),
            query: "unemployment rate 2024".into(),
            claim_id: "claim_1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_failed_record_carries_text_and_kind() {
        let set = SearchResultSet::failed(&query(), &SearchFailure::RateLimited);
        assert!(!set.success);
        assert!(set.results.is_empty());
        assert_eq!(set.error_kind.as_deref(), Some("rate_limited"));
        assert!(set.error.unwrap().contains("Rate limit"));
    }

    #[test]
    fn test_succeeded_record_keeps_query_identity() {
        let set = SearchResultSet::succeeded(&query(), Vec::new());
        assert_eq!(set.query_id, "q1");
        assert_eq!(set.claim_id, "claim_1");
        let v = serde_json::to_value(&set).unwrap();
        assert!(v["error"].is_null());
        assert!(v.get("error_kind").is_none());
    }

    #[test]
    fn test_condense_keeps_top_hits_and_cuts_snippets() {
        let hits = (1..=5)
            .map(|i| SearchHit {
                position: i,
                title: format!("t{}", i),
                url: format!("https://bls.gov/{}", i),
                snippet: "é".repeat(400),
                domain: "bls.gov".into(),
            })
            .collect();
        let condensed = SearchResultSet::succeeded(&query(), hits).condense(3, 300);
        assert_eq!(condensed.result_count, 5);
        assert_eq!(condensed.top_results.len(), 3);
        assert_eq!(condensed.top_results[2].title, "t3");
        assert_eq!(condensed.top_results[0].snippet.chars().count(), 300);
    }

    #[test]
    fn test_condense_failed_record() {
        let condensed = SearchResultSet::failed(&query(), &SearchFailure::Timeout).condense(3, 300);
        assert!(!condensed.success);
        assert_eq!(condensed.result_count, 0);
        assert!(condensed.top_results.is_empty());
    }
}
