use super::{RunContext, StageRunner, prompt_json, prompts};
use crate::audit::{ExecutionLog, Step};
use crate::model::{Classification, Decomposition, StageOutput};

impl StageRunner {
    /// Break the claim into atomic sub-claims with a dependency graph.
    ///
    /// The classification is embedded as-is, including its fallback shape when
    /// classification failed.
    pub async fn decompose(
        &self,
        ctx: &RunContext,
        classification: &StageOutput<Classification>,
        log: &mut ExecutionLog,
    ) -> StageOutput<Decomposition> {
        let mut output = self
            .invoke::<Decomposition>(
                Step::Decomposition,
                prompts::DECOMPOSER_SYSTEM_PROMPT.to_string(),
                prompts::decomposition_prompt(
                    &ctx.date_context,
                    &ctx.claim,
                    &prompt_json(classification),
                ),
                self.settings.temperature,
            )
            .await;
        if let Some(decomposition) = output.parsed_mut()
            && decomposition.original_claim.trim().is_empty()
        {
            decomposition.original_claim = ctx.claim.clone();
        }
        log.record(Step::Decomposition, classification, &output);
        output
    }
}
