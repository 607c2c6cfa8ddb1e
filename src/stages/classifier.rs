use super::{RunContext, StageRunner, prompts};
use crate::audit::{ExecutionLog, Step};
use crate::model::{Classification, StageOutput};

impl StageRunner {
    /// Classify the claim by domain, type, complexity and urgency.
    pub async fn classify(
        &self,
        ctx: &RunContext,
        log: &mut ExecutionLog,
    ) -> StageOutput<Classification> {
        let output = self
            .invoke::<Classification>(
                Step::Classification,
                prompts::CLASSIFIER_SYSTEM_PROMPT.to_string(),
                prompts::classification_prompt(&ctx.date_context, &ctx.claim),
                self.settings.temperature,
            )
            .await;
        log.record(Step::Classification, ctx.claim.as_str(), &output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ReasoningError;
    use crate::model::{Domain, Urgency};
    use crate::stages::testing::{ScriptedReasoner, context, runner};

    fn ctx() -> RunContext {
        context("The unemployment rate fell in 2024")
    }

    #[tokio::test]
    async fn test_classify_parses_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"domain\": \"Economics\", \"claim_type\": \"Factual\", \"complexity\": \"Simple\", \"urgency\": \"low\", \"rationale\": \"labor data\"}\n```";
        let (runner, reasoner) = runner(ScriptedReasoner::new().reply(Step::Classification, reply));
        let mut log = ExecutionLog::new();

        let out = runner.classify(&ctx(), &mut log).await;

        let c = out.parsed().unwrap();
        assert_eq!(c.domain, Domain::Economics);
        assert_eq!(c.urgency, Urgency::Low);
        assert_eq!(log.len(), 1);
        let entry = &log.entries()[0];
        assert_eq!(entry.agent, "classifier_agent");
        assert_eq!(
            entry.input_preview.as_deref(),
            Some("The unemployment rate fell in 2024")
        );
        let prompt = reasoner.prompt_for(Step::Classification).unwrap();
        assert!(prompt.contains("Current Date: June 01, 2024 (2024-06-01)"));
    }

    #[tokio::test]
    async fn test_classify_failure_becomes_error_record() {
        let (runner, _) = runner(
            ScriptedReasoner::new().fail(Step::Classification, || ReasoningError::Throttled),
        );
        let mut log = ExecutionLog::new();

        let out = runner.classify(&ctx(), &mut log).await;

        assert!(!out.is_parsed());
        assert!(log.entries()[0].full_output["error"]
            .as_str()
            .unwrap()
            .contains("throttled"));
        assert_eq!(out.or_empty(), Classification::default());
    }

    #[tokio::test]
    async fn test_classify_prose_reply_is_flagged() {
        let (runner, _) = runner(
            ScriptedReasoner::new().reply(Step::Classification, "I think it is economics."),
        );
        let mut log = ExecutionLog::new();

        let out = runner.classify(&ctx(), &mut log).await;

        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["parse_error"], true);
        assert_eq!(v["raw_output"], "I think it is economics.");
    }
}
