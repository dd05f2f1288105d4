use std::path::Path;

use crate::core::PackageRecord;
use crate::manifest::traits::ManifestParser;
use crate::manifest::{ManifestError, PackageList};

pub struct JsonParser;

impl ManifestParser for JsonParser {
    fn id(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<PackageRecord>, ManifestError> {
        let list: PackageList =
            serde_json::from_str(content).map_err(|err| ManifestError::malformed(path, err))?;
        Ok(list.packages)
    }
}
