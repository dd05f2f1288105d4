use std::path::Path;

use crate::core::PackageRecord;
use crate::manifest::traits::ManifestParser;
use crate::manifest::{ManifestError, PackageList};

pub struct YamlParser;

impl ManifestParser for YamlParser {
    fn id(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<PackageRecord>, ManifestError> {
        let list: PackageList =
            serde_yaml::from_str(content).map_err(|err| ManifestError::malformed(path, err))?;
        Ok(list.packages)
    }
}
