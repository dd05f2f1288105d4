use std::path::Path;

use crate::core::PackageRecord;
use crate::manifest::traits::ManifestParser;
use crate::manifest::{ManifestError, PackageList};

pub struct TomlParser;

impl ManifestParser for TomlParser {
    fn id(&self) -> &'static str {
        "toml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<PackageRecord>, ManifestError> {
        let list: PackageList =
            toml::from_str(content).map_err(|err| ManifestError::malformed(path, err))?;
        Ok(list.packages)
    }
}
