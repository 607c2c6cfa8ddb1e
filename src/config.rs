use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::claimcheck_config::{CONFIG_FILE, ClaimcheckToml, ReasoningBackend};
use crate::errors::ConfigError;
use crate::orchestrator::{CondenseSettings, Detector};
use crate::reasoning::{CommandReasoner, HttpReasoner, ReasoningService};
use crate::search::{PerplexityClient, SearchCoordinator, SearchProvider};
use crate::server::{AppState, ServerConfig, SharedState};
use crate::stages::{StageRunner, StageSettings, SystemClock};
use crate::store::{NullSink, ResultSink, ResultStore};

pub const PERPLEXITY_KEY_VAR: &str = "PERPLEXITY_API_KEY";
pub const REASONING_KEY_VAR: &str = "CLAIMCHECK_REASONING_API_KEY";
const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Credentials read from the environment (after `.env` is loaded).
#[derive(Clone, Default)]
pub struct Secrets {
    pub perplexity_api_key: Option<String>,
    pub reasoning_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            perplexity_api_key: get(PERPLEXITY_KEY_VAR),
            reasoning_api_key: get(REASONING_KEY_VAR).or_else(|| get(OPENAI_KEY_VAR)),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("perplexity_api_key", &redact(&self.perplexity_api_key))
            .field("reasoning_api_key", &redact(&self.reasoning_api_key))
            .finish()
    }
}

/// Runtime configuration for claimcheck.
///
/// Bridges `claimcheck.toml` (with environment overrides applied) and the
/// credentials, and builds the long-lived components from them.
#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub toml: ClaimcheckToml,
    secrets: Secrets,
}

impl Config {
    /// Load `config_path` (default `./claimcheck.toml`), apply environment
    /// overrides and read credentials.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        let mut toml = ClaimcheckToml::load_or_default(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        toml.apply_env()?;
        let config = Self::from_parts(config_path, toml, Secrets::from_env())?;
        for warning in config.validate() {
            tracing::warn!("{}", warning);
        }
        Ok(config)
    }

    pub fn from_parts(
        config_path: PathBuf,
        toml: ClaimcheckToml,
        secrets: Secrets,
    ) -> Result<Self, ConfigError> {
        toml.check()?;
        Ok(Self {
            config_path,
            toml,
            secrets,
        })
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }

    /// Whether the search credential is present.
    pub fn search_configured(&self) -> bool {
        self.secrets.perplexity_api_key.is_some()
    }

    pub fn stage_settings(&self) -> StageSettings {
        let reasoning = &self.toml.reasoning;
        StageSettings {
            temperature: reasoning.temperature,
            evaluator_temperature: reasoning.evaluator_temperature,
            max_tokens: reasoning.max_tokens,
            num_search_queries: self.toml.workflow.num_search_queries,
        }
    }

    pub fn condense_settings(&self) -> CondenseSettings {
        CondenseSettings {
            results_per_query: self.toml.workflow.condensed_results_per_query,
            snippet_chars: self.toml.workflow.condensed_snippet_chars,
        }
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.toml.workflow.search_timeout_secs)
    }

    /// Per-call timeout plus the collection grace period.
    pub fn collect_timeout(&self) -> Duration {
        self.search_timeout() + Duration::from_secs(self.toml.workflow.collect_grace_secs)
    }

    pub fn reasoner(&self) -> Result<Arc<dyn ReasoningService>> {
        let reasoning = &self.toml.reasoning;
        let timeout = Duration::from_secs(reasoning.request_timeout_secs);
        match reasoning.backend {
            ReasoningBackend::Http => {
                if self.secrets.reasoning_api_key.is_none() {
                    tracing::warn!(
                        "No {} or {} set; calling {} without credentials",
                        REASONING_KEY_VAR,
                        OPENAI_KEY_VAR,
                        reasoning.base_url
                    );
                }
                let reasoner = HttpReasoner::new(
                    &reasoning.base_url,
                    &reasoning.model,
                    self.secrets.reasoning_api_key.clone(),
                    timeout,
                )
                .context("Failed to build reasoning client")?;
                Ok(Arc::new(reasoner))
            }
            ReasoningBackend::Command => Ok(Arc::new(CommandReasoner::new(
                &reasoning.command,
                reasoning.command_args.clone(),
                timeout,
            ))),
        }
    }

    pub fn search_provider(&self) -> Result<Arc<dyn SearchProvider>> {
        let api_key = self
            .secrets
            .perplexity_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential(PERPLEXITY_KEY_VAR))?;
        let client = PerplexityClient::new(
            &self.toml.search.base_url,
            api_key,
            self.search_timeout(),
            self.toml.search.max_results,
        )
        .context("Failed to build search client")?;
        Ok(Arc::new(client))
    }

    pub fn result_store(&self) -> ResultStore {
        ResultStore::new(&self.toml.storage.results_dir)
    }

    /// The store, unless persistence is disabled in config or by the caller.
    pub fn result_sink(&self, save: bool) -> Arc<dyn ResultSink> {
        if save && self.toml.storage.enabled {
            Arc::new(self.result_store())
        } else {
            Arc::new(NullSink)
        }
    }

    /// Build the orchestrator. Fails without a search credential.
    pub fn build_detector(&self, save: bool) -> Result<Detector> {
        let stages = StageRunner::new(self.reasoner()?, Arc::new(SystemClock), self.stage_settings());
        let search = SearchCoordinator::new(
            self.search_provider()?,
            self.toml.workflow.num_search_queries,
            self.toml.workflow.max_parallel_workers,
            self.collect_timeout(),
        );
        Ok(Detector::new(stages, search, self.result_sink(save)).with_condense(self.condense_settings()))
    }

    /// Server state; the detector is left out when search is not configured.
    pub fn app_state(&self) -> Result<SharedState> {
        let detector = if self.search_configured() {
            Some(Arc::new(self.build_detector(true)?))
        } else {
            None
        };
        Ok(Arc::new(AppState {
            detector,
            store: Arc::new(self.result_store()),
        }))
    }

    pub fn server_config(&self, host: Option<String>, port: Option<u16>) -> ServerConfig {
        let server = &self.toml.server;
        ServerConfig {
            host: host.unwrap_or_else(|| server.host.clone()),
            port: port.unwrap_or(server.port),
            allowed_origins: server.allowed_origins.clone(),
        }
    }
}
