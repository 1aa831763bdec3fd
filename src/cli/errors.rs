//! CLI errors.

use thiserror::Error;

use crate::auth::errors::AuthError;
use crate::http_server::ConfigError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("startup error: {0}")]
    Startup(#[from] AuthError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
