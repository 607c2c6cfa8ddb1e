//! Evidence retrieval.
//!
//! A [`SearchProvider`] performs one call per query and reports every failure
//! as data. The [`SearchCoordinator`] fans a query plan out over a bounded
//! worker pool.

pub mod coordinator;
pub mod perplexity;

pub use coordinator::SearchCoordinator;
pub use perplexity::PerplexityClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::SearchFailure;
use crate::model::SearchHit;

/// Normalized outcome of one search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub failure: Option<SearchFailure>,
}

impl SearchOutcome {
    pub fn from_result(query: &str, result: Result<Vec<SearchHit>, SearchFailure>) -> Self {
        match result {
            Ok(results) => Self {
                success: true,
                query: query.to_string(),
                count: results.len(),
                results,
                error: None,
                failure: None,
            },
            Err(failure) => Self {
                success: false,
                query: query.to_string(),
                results: Vec::new(),
                count: 0,
                error: Some(failure.to_string()),
                failure: Some(failure),
            },
        }
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query. Must not panic or hang past its own timeout; every
    /// failure is reported inside the outcome.
    async fn search(&self, query: &str) -> SearchOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_failure() {
        let out = SearchOutcome::from_result("q", Err(SearchFailure::NoResults));
        assert!(!out.success);
        assert_eq!(out.count, 0);
        assert_eq!(out.error.as_deref(), Some("No results found for this query"));
        assert_eq!(out.failure, Some(SearchFailure::NoResults));
    }

    #[test]
    fn test_outcome_from_hits() {
        let hit = SearchHit {
            position: 1,
            title: "t".into(),
            url: "https://example.org".into(),
            snippet: "s".into(),
            domain: "example.org".into(),
        };
        let out = SearchOutcome::from_result("q", Ok(vec![hit]));
        assert!(out.success);
        assert_eq!(out.count, 1);
        let v = serde_json::to_value(&out).unwrap();
        assert!(v.get("error").is_none());
        assert!(v.get("failure").is_none());
    }
}
