//! Configuration view, initialization and validation: `claimcheck config`.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use claimcheck::claimcheck_config::{CONFIG_FILE, ClaimcheckToml};
use claimcheck::config::{Config, PERPLEXITY_KEY_VAR, REASONING_KEY_VAR, Secrets};
use claimcheck::ui::icons::{CHECK, CROSS, WARNING};

use super::super::ConfigCommands;

pub fn cmd_config(config_path: Option<PathBuf>, command: Option<ConfigCommands>) -> Result<()> {
    let path = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Claimcheck Configuration");
            println!("========================");
            println!();

            if path.exists() {
                println!("Config file: {}", path.display());
            } else {
                println!("No {} found at {}; using defaults", CONFIG_FILE, path.display());
            }
            println!();

            // Effective values include CLAIMCHECK_* overrides.
            let config = Config::load(Some(path))?;
            let rendered = toml::to_string_pretty(&config.toml)
                .context("Failed to render configuration")?;
            println!("{}", rendered.trim_end());
            println!();

            let secrets = Secrets::from_env();
            println!("Credentials:");
            let status = |set: bool| if set { &CHECK } else { &CROSS };
            println!(
                "  {}{}",
                status(secrets.perplexity_api_key.is_some()),
                PERPLEXITY_KEY_VAR
            );
            println!(
                "  {}{} (or OPENAI_API_KEY)",
                status(secrets.reasoning_api_key.is_some()),
                REASONING_KEY_VAR
            );
        }
        Some(ConfigCommands::Init { force }) => {
            if path.exists() && !force {
                bail!(
                    "{} already exists. Use --force to overwrite it.",
                    path.display()
                );
            }
            ClaimcheckToml::default().save(&path)?;
            println!("{}Wrote default configuration to {}", CHECK, path.display());
        }
        Some(ConfigCommands::Validate) => {
            if !path.exists() {
                println!("No {} found at {}; defaults are valid", CONFIG_FILE, path.display());
                return Ok(());
            }
            let toml = ClaimcheckToml::load(&path)?;
            toml.check()?;
            let warnings = toml.validate();
            if warnings.is_empty() {
                println!("{}{} is valid", CHECK, path.display());
            } else {
                println!("{} has {} warning(s):", path.display(), warnings.len());
                for warning in warnings {
                    println!("  {}{}", WARNING, warning);
                }
            }
        }
    }

    Ok(())
}
