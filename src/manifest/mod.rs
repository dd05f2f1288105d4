use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::core::PackageRecord;

pub mod json_parser;
pub mod toml_parser;
pub mod traits;
pub mod yaml_parser;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl ManifestError {
    pub(crate) fn malformed(path: &Path, err: impl fmt::Display) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    Json,
    Toml,
    Yaml,
}

impl ManifestFormat {
    /// Picks the format from the file extension, falling back to JSON.
    pub fn detect(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        [Self::Json, Self::Toml, Self::Yaml]
            .into_iter()
            .find(|format| {
                ext.as_deref().is_some_and(|ext| {
                    parser_for(*format)
                        .extensions()
                        .iter()
                        .any(|candidate| *candidate == ext)
                })
            })
            .unwrap_or(Self::Json)
    }
}

impl FromStr for ManifestFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unknown manifest format '{other}'")),
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(parser_for(*self).id())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PackageList {
    pub packages: Vec<PackageRecord>,
}

pub fn parser_for(format: ManifestFormat) -> Box<dyn traits::ManifestParser> {
    match format {
        ManifestFormat::Json => Box::new(json_parser::JsonParser),
        ManifestFormat::Toml => Box::new(toml_parser::TomlParser),
        ManifestFormat::Yaml => Box::new(yaml_parser::YamlParser),
    }
}

/// Reads the manifest at `path`. Without an explicit `format` the file
/// extension decides.
pub fn load_manifest(
    path: &Path,
    format: Option<ManifestFormat>,
) -> Result<Vec<PackageRecord>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = format.unwrap_or_else(|| ManifestFormat::detect(path));
    parser_for(format).parse(path, &content)
}
