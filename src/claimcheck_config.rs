//! File configuration for claimcheck, read from `claimcheck.toml`.
//!
//! Settings are layered file → environment → CLI. Every key is optional;
//! missing keys take the defaults shown below.
//!
//! ```toml
//! [workflow]
//! num_search_queries = 10
//! max_parallel_workers = 3
//! search_timeout_secs = 30
//! collect_grace_secs = 5
//! condensed_results_per_query = 3
//! condensed_snippet_chars = 300
//!
//! [search]
//! base_url = "https://api.perplexity.ai"
//! max_results = 10
//!
//! [reasoning]
//! backend = "http"
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! command = "claude"
//! command_args = ["--print"]
//! max_tokens = 4096
//! temperature = 0.3
//! evaluator_temperature = 0.2
//! request_timeout_secs = 120
//!
//! [storage]
//! results_dir = "verification_results"
//! enabled = true
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! allowed_origins = ["http://localhost:3000", "http://localhost:3001"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "claimcheck.toml";

/// Which adapter answers reasoning requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningBackend {
    /// OpenAI-compatible `/chat/completions` endpoint
    #[default]
    Http,
    /// Local model CLI fed through stdin
    Command,
}

impl std::fmt::Display for ReasoningBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasoningBackend::Http => write!(f, "http"),
            ReasoningBackend::Command => write!(f, "command"),
        }
    }
}

impl std::str::FromStr for ReasoningBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(ReasoningBackend::Http),
            "command" => Ok(ReasoningBackend::Command),
            _ => anyhow::bail!("Invalid reasoning backend '{}'. Valid values: http, command", s),
        }
    }
}

/// Pipeline sizing and timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSection {
    /// Number of search queries requested from the query generator
    #[serde(default = "default_num_search_queries")]
    pub num_search_queries: usize,
    /// Concurrent search calls
    #[serde(default = "default_max_parallel_workers")]
    pub max_parallel_workers: usize,
    /// Per-call search timeout
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,
    /// Extra time the coordinator waits beyond the per-call timeout
    #[serde(default = "default_collect_grace_secs")]
    pub collect_grace_secs: u64,
    #[serde(default = "default_condensed_results_per_query")]
    pub condensed_results_per_query: usize,
    #[serde(default = "default_condensed_snippet_chars")]
    pub condensed_snippet_chars: usize,
}

fn default_num_search_queries() -> usize {
    10
}

fn default_max_parallel_workers() -> usize {
    3
}

fn default_search_timeout_secs() -> u64 {
    30
}

fn default_collect_grace_secs() -> u64 {
    5
}

fn default_condensed_results_per_query() -> usize {
    3
}

fn default_condensed_snippet_chars() -> usize {
    300
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            num_search_queries: default_num_search_queries(),
            max_parallel_workers: default_max_parallel_workers(),
            search_timeout_secs: default_search_timeout_secs(),
            collect_grace_secs: default_collect_grace_secs(),
            condensed_results_per_query: default_condensed_results_per_query(),
            condensed_snippet_chars: default_condensed_snippet_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Results kept per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_search_base_url() -> String {
    crate::search::perplexity::DEFAULT_BASE_URL.to_string()
}

fn default_max_results() -> usize {
    10
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningSection {
    #[serde(default)]
    pub backend: ReasoningBackend,
    #[serde(default = "default_reasoning_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Program run by the `command` backend
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_command_args")]
    pub command_args: Vec<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_evaluator_temperature")]
    pub evaluator_temperature: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_reasoning_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_command() -> String {
    "claude".to_string()
}

fn default_command_args() -> Vec<String> {
    vec!["--print".to_string()]
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.3
}

fn default_evaluator_temperature() -> f32 {
    0.2
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ReasoningSection {
    fn default() -> Self {
        Self {
            backend: ReasoningBackend::default(),
            base_url: default_reasoning_base_url(),
            model: default_model(),
            command: default_command(),
            command_args: default_command_args(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            evaluator_temperature: default_evaluator_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Persist every run
    #[serde(default = "default_storage_enabled")]
    pub enabled: bool,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("verification_results")
}

fn default_storage_enabled() -> bool {
    true
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            enabled: default_storage_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

pub fn default_allowed_origins() -> Vec<String> {
    [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:3001",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Contents of `claimcheck.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimcheckToml {
    #[serde(default)]
    pub workflow: WorkflowSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub reasoning: ReasoningSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub server: ServerSection,
}

impl ClaimcheckToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;
        let content =
            toml::to_string_pretty(self).context("Failed to serialize claimcheck.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `CLAIMCHECK_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`; empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("CLAIMCHECK_RESULTS_DIR") {
            self.storage.results_dir = PathBuf::from(dir);
        }
        if let Some(model) = get("CLAIMCHECK_REASONING_MODEL") {
            self.reasoning.model = model;
        }
        if let Some(url) = get("CLAIMCHECK_REASONING_URL") {
            self.reasoning.base_url = url;
        }
        if let Some(backend) = get("CLAIMCHECK_REASONING_BACKEND") {
            self.reasoning.backend = backend.parse().map_err(|e: anyhow::Error| {
                ConfigError::Invalid {
                    field: "CLAIMCHECK_REASONING_BACKEND".to_string(),
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(url) = get("CLAIMCHECK_PERPLEXITY_URL") {
            self.search.base_url = url;
        }
        Ok(())
    }

    /// Reject values the workflow cannot run with.
    pub fn check(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, message: &str| {
            Err(ConfigError::Invalid {
                field: field.to_string(),
                message: message.to_string(),
            })
        };

        if self.workflow.num_search_queries == 0 {
            return invalid("workflow.num_search_queries", "must be at least 1");
        }
        if self.workflow.max_parallel_workers == 0 {
            return invalid("workflow.max_parallel_workers", "must be at least 1");
        }
        if self.workflow.search_timeout_secs == 0 {
            return invalid("workflow.search_timeout_secs", "must be at least 1");
        }
        if self.search.max_results == 0 {
            return invalid("search.max_results", "must be at least 1");
        }
        for (field, value) in [
            ("reasoning.temperature", self.reasoning.temperature),
            ("reasoning.evaluator_temperature", self.reasoning.evaluator_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return invalid(field, "must be between 0.0 and 2.0");
            }
        }
        if self.reasoning.max_tokens == 0 {
            return invalid("reasoning.max_tokens", "must be at least 1");
        }
        Ok(())
    }

    /// Validate configuration and return warnings for odd but usable values.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.workflow.max_parallel_workers > self.workflow.num_search_queries {
            warnings.push(format!(
                "max_parallel_workers ({}) exceeds num_search_queries ({}); extra workers stay idle",
                self.workflow.max_parallel_workers, self.workflow.num_search_queries
            ));
        }
        if self.search.max_results > 10 {
            warnings.push(format!(
                "search.max_results = {}: the provider returns at most 10 results",
                self.search.max_results
            ));
        }
        if self.workflow.condensed_results_per_query == 0 {
            warnings.push(
                "condensed_results_per_query = 0: the evaluator will see no search snippets"
                    .to_string(),
            );
        }
        if self.server.allowed_origins.is_empty() {
            warnings.push("server.allowed_origins is empty; browsers cannot call the API".to_string());
        }
        if self.reasoning.backend == ReasoningBackend::Command && self.reasoning.command.trim().is_empty() {
            warnings.push("reasoning.command is empty".to_string());
        }

        warnings
    }
}
