//! HTTP API server: `claimcheck serve`.

use anyhow::Result;
use std::path::PathBuf;

use claimcheck::config::Config;
use claimcheck::server::start_server;

pub async fn cmd_serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let state = config.app_state()?;
    let server_config = config.server_config(host, port);
    start_server(state, &server_config).await
}
