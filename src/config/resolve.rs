use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, DepsortConfig, OutputFormat, Result};
use crate::manifest::ManifestFormat;

pub const CONFIG_FILE_NAME: &str = ".depsort.toml";

const DEFAULT_MANIFEST_NAMES: &[&str] = &[
    "packages.json",
    "packages.toml",
    "packages.yaml",
    "packages.yml",
];

/// Values supplied on the command line or through the environment. Anything
/// set here wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub manifest_format: Option<ManifestFormat>,
    pub no_color: bool,
}

impl Overrides {
    /// Fills unset fields from `DEPSORT_CONFIG`, `DEPSORT_MANIFEST` and
    /// `DEPSORT_FORMAT`.
    pub fn with_env(mut self) -> Result<Self> {
        if self.config.is_none() {
            self.config = env::var_os("DEPSORT_CONFIG").map(PathBuf::from);
        }
        if self.manifest.is_none() {
            self.manifest = env::var_os("DEPSORT_MANIFEST").map(PathBuf::from);
        }
        if self.manifest_format.is_none() {
            if let Ok(value) = env::var("DEPSORT_FORMAT") {
                let format = value
                    .parse::<ManifestFormat>()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: "DEPSORT_FORMAT".to_string(),
                        value,
                    })?;
                self.manifest_format = Some(format);
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub manifest_format: Option<ManifestFormat>,
    pub output: OutputFormat,
    pub color: bool,
}

impl Settings {
    pub fn require_manifest(&self) -> Result<&Path> {
        self.manifest
            .as_deref()
            .ok_or(ConfigError::ManifestNotConfigured)
    }
}

pub fn resolve_settings(start: impl AsRef<Path>, overrides: Overrides) -> Result<Settings> {
    resolve_with_overrides(start.as_ref(), overrides.with_env()?)
}

pub fn resolve_with_overrides(start: &Path, overrides: Overrides) -> Result<Settings> {
    let config_path = match overrides.config {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::ConfigNotFound(path));
            }
            Some(path)
        }
        None => find_config_from(start),
    };

    let config = match config_path.as_deref() {
        Some(path) => load_config(path)?,
        None => DepsortConfig::default(),
    };

    let manifest = overrides
        .manifest
        .or_else(|| {
            let configured = config.manifest.path.as_ref()?;
            let base = config_path
                .as_deref()
                .and_then(Path::parent)
                .unwrap_or(start);
            Some(base.join(configured))
        })
        .or_else(|| default_manifest_in(start));

    Ok(Settings {
        config_path,
        manifest,
        manifest_format: overrides.manifest_format.or(config.manifest.format),
        output: config.output.format,
        color: config.output.color && !overrides.no_color,
    })
}

pub fn load_config(path: &Path) -> Result<DepsortConfig> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn default_manifest_in(dir: &Path) -> Option<PathBuf> {
    DEFAULT_MANIFEST_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
