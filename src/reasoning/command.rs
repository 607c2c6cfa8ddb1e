//! Reasoning through a local model CLI.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{ReasoningRequest, ReasoningService};
use crate::errors::ReasoningError;

/// Runs a command per request, writing the prompt to stdin and reading the
/// reply from stdout.
///
/// With the default `claude --print` the system prompt and user prompt are
/// sent as one document separated by a blank line.
pub struct CommandReasoner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandReasoner {
    pub fn new(program: &str, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args,
            timeout,
        }
    }

    fn failure(&self, message: impl Into<String>) -> ReasoningError {
        ReasoningError::Command {
            command: self.program.clone(),
            message: message.into(),
        }
    }

    async fn run(&self, input: String) -> Result<String, ReasoningError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure(format!("failed to start: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| self.failure(format!("failed to write prompt: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.failure(format!("failed to collect output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("exited with {}: {}", output.status, stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl ReasoningService for CommandReasoner {
    async fn complete(&self, request: ReasoningRequest) -> Result<String, ReasoningError> {
        let input = format!("{}\n\n{}", request.system_prompt, request.prompt);
        tracing::debug!(command = %self.program, stage = %request.stage, "Running reasoning command");
        match tokio::time::timeout(self.timeout, self.run(input)).await {
            Ok(result) => result,
            Err(_) => Err(ReasoningError::Timeout),
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}
