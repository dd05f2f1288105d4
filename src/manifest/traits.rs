use std::path::Path;

use crate::core::PackageRecord;
use crate::manifest::ManifestError;

pub trait ManifestParser: Send + Sync {
    fn id(&self) -> &'static str;
    fn extensions(&self) -> &'static [&'static str];
    fn parse(&self, path: &Path, content: &str) -> Result<Vec<PackageRecord>, ManifestError>;
}
