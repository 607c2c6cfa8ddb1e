use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "claimcheck")]
#[command(version, about = "Multi-stage claim verification")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to claimcheck.toml (defaults to ./claimcheck.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a single claim and print the verdict
    Verify {
        /// The claim to verify
        claim: String,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
        /// Do not write the result to the results directory
        #[arg(long)]
        no_save: bool,
    },
    /// Verify claims one after another from a prompt
    Interactive,
    /// Start the HTTP API
    Serve {
        /// Port to listen on (overrides claimcheck.toml)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind (overrides claimcheck.toml)
        #[arg(long)]
        host: Option<String>,
    },
    /// List or show stored verification results
    Results {
        #[command(subcommand)]
        command: Option<ResultsCommands>,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ResultsCommands {
    /// List stored results, newest first
    List,
    /// Print one stored result
    Show {
        /// File name as printed by `results list`
        filename: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default claimcheck.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate claimcheck.toml and report warnings
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    claimcheck::logging::init(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Verify {
            claim,
            json,
            no_save,
        } => {
            cmd::cmd_verify(cli.config, &claim, json, !no_save).await?;
        }
        Commands::Interactive => {
            cmd::cmd_interactive(cli.config).await?;
        }
        Commands::Serve { port, host } => {
            cmd::cmd_serve(cli.config, host, port).await?;
        }
        Commands::Results { command } => {
            cmd::cmd_results(cli.config, command)?;
        }
        Commands::Config { command } => {
            cmd::cmd_config(cli.config, command)?;
        }
    }

    Ok(())
}
