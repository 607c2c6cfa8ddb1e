use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::report::{VerificationReport, VerificationResponse};
use super::state::WorkflowState;
use crate::audit::{ExecutionLog, Step};
use crate::model::CondensedResult;
use crate::search::SearchCoordinator;
use crate::stages::{Clock, RunContext, StageRunner};
use crate::store::ResultSink;

/// How much of each search record the evaluator sees.
#[derive(Debug, Clone, Copy)]
pub struct CondenseSettings {
    pub results_per_query: usize,
    pub snippet_chars: usize,
}

impl Default for CondenseSettings {
    fn default() -> Self {
        Self {
            results_per_query: 3,
            snippet_chars: 300,
        }
    }
}

/// The workflow orchestrator.
///
/// Built once from configuration and shared by `Arc` between the CLI and the
/// HTTP server. Each call to [`Detector::verify_claim`] is an independent run
/// with its own execution log; nothing is carried between runs.
pub struct Detector {
    stages: StageRunner,
    search: SearchCoordinator,
    sink: Arc<dyn ResultSink>,
    condense: CondenseSettings,
}

impl Detector {
    pub fn new(stages: StageRunner, search: SearchCoordinator, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            stages,
            search,
            sink,
            condense: CondenseSettings::default(),
        }
    }

    pub fn with_condense(mut self, condense: CondenseSettings) -> Self {
        self.condense = condense;
        self
    }

    /// Run the full pipeline for one claim and persist the report.
    pub async fn verify_claim(&self, claim: &str) -> VerificationReport {
        let mut log = ExecutionLog::new();
        let mut state = WorkflowState::Classify;
        let report = self
            .run(claim, &mut log, &mut state)
            .instrument(run_span())
            .await;
        self.persist(claim, &report).await;
        report
    }

    /// Like [`Detector::verify_claim`], but never fails: a panic anywhere in
    /// the pipeline becomes an unsuccessful response that keeps the execution
    /// log gathered up to that point.
    pub async fn verify(&self, claim: &str) -> VerificationResponse {
        let mut log = ExecutionLog::new();
        let mut state = WorkflowState::Classify;

        let outcome = AssertUnwindSafe(self.run(claim, &mut log, &mut state).instrument(run_span()))
            .catch_unwind()
            .await;

        match outcome {
            Ok(report) => {
                let saved_to = self.persist(claim, &report).await;
                VerificationResponse::completed(claim, report, saved_to)
            }
            Err(payload) => {
                let message = format!(
                    "Workflow failed during {}: {}",
                    state,
                    panic_message(payload.as_ref())
                );
                warn!(state = %state, error = %message, "Verification aborted");
                VerificationResponse::aborted(claim, log.into_entries(), message)
            }
        }
    }

    async fn run(
        &self,
        claim: &str,
        log: &mut ExecutionLog,
        state: &mut WorkflowState,
    ) -> VerificationReport {
        let ctx = RunContext::new(claim, self.stages.clock().now());
        info!(claim = %claim, "Verification started");

        let classification = self.stages.classify(&ctx, log).await;
        advance(state);

        let decomposition = self.stages.decompose(&ctx, &classification, log).await;
        advance(state);

        let questions = self.stages.generate_queries(&ctx, &decomposition, log).await;
        advance(state);

        let queries = questions.or_empty().queries;
        let search_results = self.search.run(&queries).await;
        let condensed: Vec<CondensedResult> = search_results
            .iter()
            .map(|r| r.condense(self.condense.results_per_query, self.condense.snippet_chars))
            .collect();
        let submitted = &queries[..self.search.submitted(queries.len())];
        log.record(Step::SearchExecution, submitted, &condensed);
        advance(state);

        let evaluation = self
            .stages
            .evaluate(&ctx, &decomposition, &condensed, log)
            .await;
        advance(state);

        info!(
            verdict = evaluation
                .parsed()
                .map(|e| e.overall_verdict.as_str())
                .unwrap_or("none"),
            searches = search_results.len(),
            "Verification finished"
        );

        VerificationReport {
            classification,
            decomposition,
            questions,
            search_results,
            evaluation,
            execution_log: log.entries().to_vec(),
        }
    }

    /// Hand the report to the sink on the blocking pool; sinks do file I/O.
    async fn persist(&self, claim: &str, report: &VerificationReport) -> Option<PathBuf> {
        let sink = Arc::clone(&self.sink);
        let claim = claim.to_string();
        let report = report.clone();
        match tokio::task::spawn_blocking(move || sink.persist(&claim, &report)).await {
            Ok(Ok(path)) => path,
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to persist verification results");
                None
            }
            Err(e) => {
                warn!(error = %e, "Persistence task failed");
                None
            }
        }
    }
}

fn advance(state: &mut WorkflowState) {
    *state = state.next();
    tracing::debug!(state = %state, "Workflow advanced");
}

/// Span tagging every log line of one run.
fn run_span() -> tracing::Span {
    info_span!("verify", run_id = %Uuid::new_v4())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
