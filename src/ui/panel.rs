//! Console rendering of verdicts and stored results.

use console::style;

use crate::model::{Evaluation, StageOutput};
use crate::orchestrator::VerificationResponse;
use crate::store::StoredResult;
use crate::ui::icons::{CHART, CHECK, CROSS, FOLDER, LINK, SAVED, WARNING, verdict_icon};

const RULE_WIDTH: usize = 60;
const WRAP_WIDTH: usize = 76;
const MAX_FINDINGS: usize = 3;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn wrap(text: &str, indent: &str) -> String {
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::fill(text, options)
}

/// The verdict panel for a finished evaluation.
pub fn render_evaluation(evaluation: &Evaluation) -> String {
    let mut lines = vec![
        rule(),
        format!(
            "{}VERDICT: {}",
            verdict_icon(evaluation.overall_verdict),
            style(evaluation.overall_verdict).bold()
        ),
        format!(
            "{}Confidence: {:.1}%",
            CHART,
            evaluation.confidence_score * 100.0
        ),
        rule(),
    ];

    if !evaluation.summary.trim().is_empty() {
        lines.push(String::new());
        lines.push(style("Summary:").bold().to_string());
        lines.push(wrap(evaluation.summary.trim(), "  "));
    }

    if !evaluation.key_findings.is_empty() {
        lines.push(String::new());
        lines.push(style("Key Findings:").bold().to_string());
        for (i, finding) in evaluation.key_findings.iter().take(MAX_FINDINGS).enumerate() {
            lines.push(wrap(&format!("{}. {}", i + 1, finding), "  "));
        }
    }

    let deps = &evaluation.dependency_analysis;
    lines.push(String::new());
    lines.push(format!("{}{}", LINK, style("Dependency Analysis:").bold()));
    lines.push(format!(
        "  Foundational claims verified: {}",
        if deps.foundational_claims_verified { &CHECK } else { &CROSS }
    ));
    if !deps.broken_dependencies.is_empty() {
        lines.push(format!(
            "  {}Broken dependencies: {}",
            WARNING,
            deps.broken_dependencies.join(", ")
        ));
    }

    if !evaluation.limitations.trim().is_empty() {
        lines.push(String::new());
        lines.push(style("Limitations:").dim().to_string());
        lines.push(wrap(evaluation.limitations.trim(), "  "));
    }

    lines.join("\n")
}

/// Panel for any evaluation outcome, including fallback shapes.
pub fn render_stage_evaluation(evaluation: &StageOutput<Evaluation>) -> String {
    match evaluation.parsed() {
        Some(parsed) => render_evaluation(parsed),
        None => format!(
            "{}\n{}VERDICT: unavailable\n{}\n  {}",
            rule(),
            CROSS,
            rule(),
            evaluation
                .problem()
                .unwrap_or_else(|| "evaluation produced no verdict".to_string())
        ),
    }
}

/// Everything printed after a CLI run.
pub fn render_response(response: &VerificationResponse) -> String {
    let mut out = match (&response.evaluation, &response.error) {
        (Some(evaluation), _) => render_stage_evaluation(evaluation),
        (None, Some(error)) => format!("{}Verification failed: {}", CROSS, error),
        (None, None) => format!("{}Verification produced no result", CROSS),
    };
    if let Some(path) = &response.saved_to {
        out.push_str(&format!("\n\n{}Results saved to: {}", SAVED, path.display()));
    }
    out
}

/// Table of stored result files.
pub fn render_results_table(results: &[StoredResult]) -> String {
    if results.is_empty() {
        return "No stored results.".to_string();
    }
    let mut lines = vec![format!(
        "{}{} stored result(s)",
        FOLDER,
        style(results.len()).bold()
    )];
    for result in results {
        lines.push(format!(
            "  {}  {:>8}  {}",
            style(result.created.format("%Y-%m-%d %H:%M:%S")).dim(),
            format_size(result.size),
            result.filename
        ));
    }
    lines.join("\n")
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
