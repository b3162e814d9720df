//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    #[error(transparent)]
    Storage(#[from] storage::Error),

    #[error(transparent)]
    Server(#[from] server::ServerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
