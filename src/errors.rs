//! Typed error hierarchy for claimcheck.
//!
//! One enum per boundary:
//! - `ReasoningError`: reasoning-service invocation failures (caught per stage)
//! - `SearchFailure`: search-provider failures, always carried as data
//! - `StoreError`: result persistence and lookup failures
//! - `ConfigError`: configuration loading and validation failures
//! - `WorkflowError`: run-level failures surfaced to the caller

use thiserror::Error;

/// Errors from a reasoning-service call.
#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("Reasoning service rejected the credentials")]
    Unauthorized,

    #[error("Reasoning service throttled the request (HTTP 429)")]
    Throttled,

    #[error("Reasoning service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Reasoning request timed out")]
    Timeout,

    #[error("Reasoning transport error: {0}")]
    Transport(String),

    #[error("Reasoning response could not be decoded: {0}")]
    Decode(String),

    #[error("Reasoning command `{command}` failed: {message}")]
    Command { command: String, message: String },
}

/// Why a single search call produced no usable evidence.
///
/// Display strings are the caller-facing `error` text of a search record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchFailure {
    #[error("Authentication failed. Please check your API key.")]
    Authentication,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("No results found for this query")]
    NoResults,

    #[error("Unexpected response format: {0}")]
    MalformedResponse(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("Execution timeout: search did not finish within {0}s")]
    ExecutionTimeout(u64),

    #[error("Search worker failed: {0}")]
    WorkerFailed(String),
}

impl SearchFailure {
    /// Machine-readable tag, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchFailure::Authentication => "authentication",
            SearchFailure::RateLimited => "rate_limited",
            SearchFailure::Timeout => "timeout",
            SearchFailure::NoResults => "no_results",
            SearchFailure::MalformedResponse(_) => "malformed_response",
            SearchFailure::Http { .. } => "http",
            SearchFailure::Transport(_) => "transport",
            SearchFailure::ExecutionTimeout(_) => "execution_timeout",
            SearchFailure::WorkerFailed(_) => "worker_failed",
        }
    }
}

/// Errors from the result store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Result file not found: {0}")]
    NotFound(String),

    #[error("Invalid result filename: {0}")]
    InvalidName(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode or decode result record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse claimcheck.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("Missing credential: set {0}")]
    MissingCredential(&'static str),
}

/// Run-level failures.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Claim cannot be empty")]
    EmptyClaim,

    #[error("Claim is too short. Please provide a meaningful statement.")]
    ClaimTooShort,

    #[error("Workflow aborted unexpectedly: {0}")]
    Aborted(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
