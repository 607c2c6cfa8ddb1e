//! Bounded parallel execution of a query plan.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::SearchProvider;
use crate::errors::SearchFailure;
use crate::model::{SearchQuery, SearchResultSet};

/// Runs every query of a plan against a [`SearchProvider`] with at most
/// `max_workers` calls in flight.
///
/// Each call runs under a collection timeout (the provider's own timeout plus
/// a grace margin) so the retrieval phase always terminates. Exactly one
/// [`SearchResultSet`] comes back per submitted query, in completion order.
pub struct SearchCoordinator {
    provider: Arc<dyn SearchProvider>,
    max_queries: usize,
    max_workers: usize,
    collect_timeout: Duration,
}

impl SearchCoordinator {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        max_queries: usize,
        max_workers: usize,
        collect_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            max_queries,
            max_workers: max_workers.max(1),
            collect_timeout,
        }
    }

    /// Number of queries that will actually be submitted for a plan of `planned`.
    pub fn submitted(&self, planned: usize) -> usize {
        planned.min(self.max_queries)
    }

    pub async fn run(&self, queries: &[SearchQuery]) -> Vec<SearchResultSet> {
        let submitted = &queries[..self.submitted(queries.len())];
        if submitted.len() < queries.len() {
            warn!(
                planned = queries.len(),
                cap = self.max_queries,
                "Query plan exceeds cap; extra queries skipped"
            );
        }
        info!(
            queries = submitted.len(),
            workers = self.max_workers,
            "Executing searches"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        let mut by_task = HashMap::new();

        for query in submitted {
            let task_query = query.clone();
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let limit = self.collect_timeout;

            let handle = tasks.spawn(async move {
                let query = task_query;
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        let failure = SearchFailure::WorkerFailed(e.to_string());
                        return SearchResultSet::failed(&query, &failure);
                    }
                };
                match tokio::time::timeout(limit, provider.search(&query.query)).await {
                    Ok(outcome) => match outcome.failure {
                        None => SearchResultSet::succeeded(&query, outcome.results),
                        Some(failure) => SearchResultSet::failed(&query, &failure),
                    },
                    Err(_) => SearchResultSet::failed(
                        &query,
                        &SearchFailure::ExecutionTimeout(limit.as_secs()),
                    ),
                }
            });
            by_task.insert(handle.id(), query.clone());
        }

        let mut results = Vec::with_capacity(submitted.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            let set = match joined {
                Ok((_, set)) => set,
                Err(e) => {
                    let failure = SearchFailure::WorkerFailed(e.to_string());
                    match by_task.get(&e.id()) {
                        Some(query) => SearchResultSet::failed(query, &failure),
                        None => continue,
                    }
                }
            };
            if set.success {
                info!(query_id = %set.query_id, hits = set.results.len(), "Search complete");
            } else {
                warn!(
                    query_id = %set.query_id,
                    error = set.error.as_deref().unwrap_or("unknown"),
                    "Search failed"
                );
            }
            results.push(set);
        }
        results
    }
}
