use serde_json::json;

use super::{RunContext, StageRunner, clock, prompt_json, prompts};
use crate::audit::{ExecutionLog, Step};
use crate::model::{Decomposition, QueryPlan, StageOutput};

impl StageRunner {
    /// Generate search queries for the atomic claims.
    ///
    /// Looks up the current date first and grounds the prompt in it. Exactly
    /// `num_search_queries` are requested; a shorter plan is accepted as-is.
    pub async fn generate_queries(
        &self,
        ctx: &RunContext,
        decomposition: &StageOutput<Decomposition>,
        log: &mut ExecutionLog,
    ) -> StageOutput<QueryPlan> {
        let now = clock::current_datetime(self.clock());
        let num_queries = self.settings.num_search_queries;
        let claims = decomposition.or_empty();

        let prompt = prompts::question_prompt(
            num_queries,
            &now.to_string(),
            &ctx.claim,
            &prompt_json(&claims.atomic_claims),
            &prompt_json(&claims.dependency_graph),
        );
        let mut output = self
            .invoke::<QueryPlan>(
                Step::QuestionGeneration,
                prompts::question_generator_system_prompt(num_queries),
                prompt,
                self.settings.temperature,
            )
            .await;

        if let Some(plan) = output.parsed_mut() {
            if plan.current_date_used.trim().is_empty() {
                plan.current_date_used = now["current_date"].as_str().unwrap_or_default().to_string();
            }
            plan.check_claim_refs(&claims.claim_ids());
            if plan.queries.len() != num_queries {
                tracing::info!(
                    requested = num_queries,
                    received = plan.queries.len(),
                    "Query count differs from request"
                );
            }
        }
        log.record(
            Step::QuestionGeneration,
            &json!({ "decomposition": decomposition, "current_datetime": now }),
            &output,
        );
        output
    }
}
