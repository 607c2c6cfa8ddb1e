//! Stored result browsing: `claimcheck results`.

use anyhow::{Context, Result};
use std::path::PathBuf;

use claimcheck::config::Config;
use claimcheck::ui::render_results_table;

use super::super::ResultsCommands;

pub fn cmd_results(config_path: Option<PathBuf>, command: Option<ResultsCommands>) -> Result<()> {
    let config = Config::load(config_path)?;
    let store = config.result_store();

    match command {
        None | Some(ResultsCommands::List) => {
            let results = store
                .list()
                .with_context(|| format!("Failed to list {}", store.dir().display()))?;
            println!("{}", render_results_table(&results));
        }
        Some(ResultsCommands::Show { filename }) => {
            let record = store.load(&filename)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&record).context("Failed to format stored result")?
            );
        }
    }

    Ok(())
}
