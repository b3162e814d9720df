use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

pub type Result<T> = std::result::Result<T, Error>;
