use thiserror::Error;

use crate::config::ConfigError;
use crate::resolver::ResolveError;

#[derive(Debug, Error)]
pub enum DepsortError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DepsortError>;
