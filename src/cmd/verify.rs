//! One-shot and interactive verification: `claimcheck verify`, `claimcheck interactive`.

use anyhow::{Context, Result, bail};
use console::style;
use std::path::PathBuf;

use claimcheck::config::{Config, PERPLEXITY_KEY_VAR};
use claimcheck::orchestrator::{ClaimText, Detector, VerificationResponse};
use claimcheck::ui::icons::{CROSS, WARNING};
use claimcheck::ui::{VerifyUI, render_response};

const EXIT_WORDS: [&str; 4] = ["exit", "quit", "q", "bye"];

fn load_detector(config_path: Option<PathBuf>, save: bool) -> Result<Detector> {
    let config = Config::load(config_path)?;
    if !config.search_configured() {
        bail!(
            "{} is not set. Add it to your environment or a .env file.",
            PERPLEXITY_KEY_VAR
        );
    }
    config.build_detector(save)
}

async fn run_with_spinner(detector: &Detector, claim: &ClaimText) -> VerificationResponse {
    let ui = VerifyUI::start(claim.as_str());
    let response = detector.verify(claim.as_str()).await;
    ui.finish();
    response
}

pub async fn cmd_verify(
    config_path: Option<PathBuf>,
    claim: &str,
    json: bool,
    save: bool,
) -> Result<()> {
    let claim = ClaimText::parse(claim)?;
    let detector = load_detector(config_path, save)?;

    let response = if json {
        detector.verify(claim.as_str()).await
    } else {
        run_with_spinner(&detector, &claim).await
    };

    if json {
        let out = serde_json::to_string_pretty(&response)
            .context("Failed to serialize verification response")?;
        println!("{}", out);
    } else {
        println!();
        println!("{}", render_response(&response));
    }

    if !response.success {
        bail!(
            "Verification failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn is_exit_word(input: &str) -> bool {
    EXIT_WORDS.contains(&input.trim().to_lowercase().as_str())
}

pub async fn cmd_interactive(config_path: Option<PathBuf>) -> Result<()> {
    use dialoguer::Input;

    let detector = load_detector(config_path, true)?;

    println!();
    println!("{}", style("Claim Verification").bold());
    println!("Type a factual claim to verify, or 'exit' to quit.");

    loop {
        println!();
        let input: String = Input::new()
            .with_prompt("Claim")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read claim")?;

        if is_exit_word(&input) {
            break;
        }

        let claim = match ClaimText::parse(&input) {
            Ok(claim) => claim,
            Err(e) => {
                println!("{}{}", WARNING, e);
                continue;
            }
        };

        let response = run_with_spinner(&detector, &claim).await;
        println!();
        if response.success {
            println!("{}", render_response(&response));
        } else {
            println!(
                "{}Verification failed: {}",
                CROSS,
                response.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!("Goodbye.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_words() {
        for word in ["exit", "QUIT", " q ", "Bye"] {
            assert!(is_exit_word(word), "{word}");
        }
        assert!(!is_exit_word("quitting smoking lowers risk"));
        assert!(!is_exit_word(""));
    }
}
