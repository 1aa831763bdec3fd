//! Command dispatch.

use std::path::Path;

use super::args::{Cli, Command};
use super::errors::CliResult;
use crate::http_server::{HttpConfig, HttpServer};
use crate::observability::Logger;

/// Execute the parsed command
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Serve { config } => serve(&config),
    }
}

fn serve(config_path: &Path) -> CliResult<()> {
    let config = if config_path.exists() {
        HttpConfig::load(config_path)?
    } else {
        Logger::info(
            "CONFIG_DEFAULTED",
            &[("path", &config_path.display().to_string())],
        );
        HttpConfig::default()
    };

    let server = HttpServer::with_config(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.start())?;
    Ok(())
}
