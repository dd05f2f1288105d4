pub mod resolve;
pub mod settings;

pub use resolve::{resolve_settings, Overrides, Settings};
pub use settings::{DepsortConfig, ManifestConfig, OutputConfig, OutputFormat};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("no manifest found; pass --manifest, set DEPSORT_MANIFEST, or set [manifest] path in .depsort.toml")]
    ManifestNotConfigured,
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
