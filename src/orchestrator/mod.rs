//! Workflow orchestration.
//!
//! The [`Detector`] drives one claim through
//! CLASSIFY → DECOMPOSE → GENERATE_QUERIES → RETRIEVE_EVIDENCE → EVALUATE → DONE,
//! owns the run's execution log, and hands the finished report to a
//! [`ResultSink`](crate::store::ResultSink).

pub mod report;
pub mod runner;
pub mod state;

pub use report::{ClaimText, MIN_CLAIM_CHARS, VerificationReport, VerificationResponse};
pub use runner::{CondenseSettings, Detector};
pub use state::WorkflowState;
