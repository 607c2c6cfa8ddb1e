//! Reasoning stage runners.
//!
//! Each runner renders its prompt, calls the reasoning service, runs the
//! response through extraction and validation, and appends one execution log
//! entry. A reasoning-service failure never escapes a runner; it becomes a
//! `{error}` stage output and later stages work from empty defaults.
//!
//! | Module            | Stage                  | Record           |
//! |-------------------|------------------------|------------------|
//! | `classifier`      | classification         | `Classification` |
//! | `decomposer`      | decomposition          | `Decomposition`  |
//! | `query_generator` | question generation    | `QueryPlan`      |
//! | `evaluator`       | evaluation             | `Evaluation`     |

pub mod classifier;
pub mod clock;
pub mod decomposer;
pub mod evaluator;
pub mod prompts;
pub mod query_generator;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::audit::Step;
use crate::extract::{extract, validate};
use crate::model::{StageOutput, StageRecord};
use crate::reasoning::{ReasoningRequest, ReasoningService};

/// Sampling and sizing knobs shared by the stage runners.
#[derive(Debug, Clone)]
pub struct StageSettings {
    pub temperature: f32,
    pub evaluator_temperature: f32,
    pub max_tokens: u32,
    pub num_search_queries: usize,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            evaluator_temperature: 0.2,
            max_tokens: 4096,
            num_search_queries: 10,
        }
    }
}

/// Per-run values every prompt embeds.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub claim: String,
    pub started_at: DateTime<Local>,
    pub date_context: String,
}

impl RunContext {
    pub fn new(claim: &str, started_at: DateTime<Local>) -> Self {
        Self {
            claim: claim.to_string(),
            date_context: clock::date_context(&started_at),
            started_at,
        }
    }
}

pub struct StageRunner {
    reasoner: Arc<dyn ReasoningService>,
    clock: Arc<dyn Clock>,
    settings: StageSettings,
}

impl StageRunner {
    pub fn new(
        reasoner: Arc<dyn ReasoningService>,
        clock: Arc<dyn Clock>,
        settings: StageSettings,
    ) -> Self {
        Self {
            reasoner,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &StageSettings {
        &self.settings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Call the reasoning service and turn its reply into a typed stage output.
    async fn invoke<T: StageRecord>(
        &self,
        stage: Step,
        system_prompt: String,
        prompt: String,
        temperature: f32,
    ) -> StageOutput<T> {
        let request = ReasoningRequest {
            stage,
            system_prompt,
            prompt,
            temperature,
            max_tokens: self.settings.max_tokens,
        };

        info!(stage = %stage, backend = self.reasoner.name(), "Stage started");
        let output = match self.reasoner.complete(request).await {
            Ok(text) => validate::<T>(extract(&text)),
            Err(e) => StageOutput::failed(e.to_string()),
        };
        match output.problem() {
            None => info!(stage = %stage, "Stage complete"),
            Some(problem) => warn!(stage = %stage, problem = %problem, "Stage degraded"),
        }
        output
    }
}

/// Pretty JSON for prompt embedding; serialization of model types cannot fail
/// in practice, but an empty object keeps the prompt well-formed if it does.
pub(crate) fn prompt_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted reasoning service shared by stage and orchestrator tests.

    use super::*;
    use crate::errors::ReasoningError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub enum Reply {
        Text(String),
        Fail(fn() -> ReasoningError),
        Panic,
    }

    /// Replies per stage; unscripted stages fail with a transport error.
    #[derive(Default)]
    pub struct ScriptedReasoner {
        replies: HashMap<String, Reply>,
        pub prompts: Mutex<Vec<(Step, String)>>,
    }

    impl ScriptedReasoner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(mut self, stage: Step, text: impl Into<String>) -> Self {
            self.replies.insert(stage.to_string(), Reply::Text(text.into()));
            self
        }

        pub fn fail(mut self, stage: Step, err: fn() -> ReasoningError) -> Self {
            self.replies.insert(stage.to_string(), Reply::Fail(err));
            self
        }

        pub fn panic_on(mut self, stage: Step) -> Self {
            self.replies.insert(stage.to_string(), Reply::Panic);
            self
        }

        pub fn prompt_for(&self, stage: Step) -> Option<String> {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .find(|(s, _)| *s == stage)
                .map(|(_, p)| p.clone())
        }
    }

    #[async_trait]
    impl ReasoningService for ScriptedReasoner {
        async fn complete(&self, request: ReasoningRequest) -> Result<String, ReasoningError> {
            self.prompts
                .lock()
                .unwrap()
                .push((request.stage, request.prompt.clone()));
            match self.replies.get(&request.stage.to_string()) {
                Some(Reply::Text(text)) => Ok(text.clone()),
                Some(Reply::Fail(make)) => Err(make()),
                Some(Reply::Panic) => panic!("scripted panic in {}", request.stage),
                None => Err(ReasoningError::Transport("unscripted stage".into())),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    pub fn fixed_clock() -> Arc<dyn Clock> {
        use chrono::TimeZone;
        Arc::new(FixedClock(
            Local.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        ))
    }

    pub fn context(claim: &str) -> RunContext {
        RunContext::new(claim, fixed_clock().now())
    }

    pub fn runner(reasoner: ScriptedReasoner) -> (StageRunner, Arc<ScriptedReasoner>) {
        let reasoner = Arc::new(reasoner);
        let runner = StageRunner::new(reasoner.clone(), fixed_clock(), StageSettings::default());
        (runner, reasoner)
    }
}
