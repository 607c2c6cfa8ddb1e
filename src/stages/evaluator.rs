use serde_json::json;

use super::{RunContext, StageRunner, prompt_json, prompts};
use crate::audit::{ExecutionLog, Step};
use crate::model::{CondensedResult, Decomposition, Evaluation, StageOutput};

impl StageRunner {
    /// Synthesize a verdict from the atomic claims and the condensed evidence.
    ///
    /// A decisive verdict with no successful search behind it is downgraded
    /// before the entry is logged.
    pub async fn evaluate(
        &self,
        ctx: &RunContext,
        decomposition: &StageOutput<Decomposition>,
        evidence: &[CondensedResult],
        log: &mut ExecutionLog,
    ) -> StageOutput<Evaluation> {
        let claims = decomposition.or_empty();
        let successful = evidence.iter().filter(|r| r.success).count();

        let prompt = prompts::evaluation_prompt(
            &ctx.date_context,
            &ctx.claim,
            &prompt_json(&claims.atomic_claims),
            &prompt_json(&claims.dependency_graph),
            &prompt_json(evidence),
        );
        let mut output = self
            .invoke::<Evaluation>(
                Step::Evaluation,
                prompts::EVALUATOR_SYSTEM_PROMPT.to_string(),
                prompt,
                self.settings.evaluator_temperature,
            )
            .await;

        if let Some(evaluation) = output.parsed_mut() {
            evaluation.apply_evidence_floor(successful);
        }
        log.record(
            Step::Evaluation,
            &json!({ "successful_searches": successful, "search_results": evidence }),
            &output,
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CondensedHit, Verdict};
    use crate::stages::testing::{ScriptedReasoner, context, runner};

    fn evidence(success: bool) -> Vec<CondensedResult> {
        vec![CondensedResult {
            query_id: "q1".into(),
            query: "unemployment 2024".into(),
            claim_id: "claim_1".into(),
            success,
            result_count: usize::from(success),
            top_results: if success {
                vec![CondensedHit {
                    title: "Employment Situation".into(),
                    url: "https://www.bls.gov/news.release/empsit.nr0.htm".into(),
                    snippet: "The unemployment rate was 3.7 percent".into(),
                    domain: "www.bls.gov".into(),
                }]
            } else {
                Vec::new()
            },
        }]
    }

    const TRUE_REPLY: &str = r#"{"overall_verdict": "TRUE", "confidence_score": 0.9, "summary": "BLS data confirms it"}"#;

    #[tokio::test]
    async fn test_evaluate_with_evidence_keeps_verdict() {
        let (runner, reasoner) = runner(ScriptedReasoner::new().reply(Step::Evaluation, TRUE_REPLY));
        let mut log = ExecutionLog::new();

        let out = runner
            .evaluate(&context("c"), &StageOutput::failed("x"), &evidence(true), &mut log)
            .await;

        let e = out.parsed().unwrap();
        assert_eq!(e.overall_verdict, Verdict::True);
        assert_eq!(e.confidence_score, 0.9);
        let prompt = reasoner.prompt_for(Step::Evaluation).unwrap();
        assert!(prompt.contains("bls.gov"));
        assert_eq!(log.entries()[0].agent, "evaluator_agent");
    }

    #[tokio::test]
    async fn test_evaluate_without_evidence_downgrades() {
        let (runner, _) = runner(ScriptedReasoner::new().reply(Step::Evaluation, TRUE_REPLY));
        let mut log = ExecutionLog::new();

        let out = runner
            .evaluate(&context("c"), &StageOutput::failed("x"), &evidence(false), &mut log)
            .await;

        let e = out.parsed().unwrap();
        assert_eq!(e.overall_verdict, Verdict::Unverified);
        assert!(e.confidence_score <= 0.3);
        assert_eq!(log.entries()[0].full_output["overall_verdict"], "UNVERIFIED");
    }

    #[tokio::test]
    async fn test_evaluate_failure_is_error_record() {
        let (runner, _) = runner(ScriptedReasoner::new());
        let mut log = ExecutionLog::new();

        let out = runner
            .evaluate(&context("c"), &StageOutput::failed("x"), &[], &mut log)
            .await;

        assert!(matches!(out, StageOutput::Failed { .. }));
        assert_eq!(log.len(), 1);
    }
}
