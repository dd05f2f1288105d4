use std::path::Path;

use indexmap::IndexSet;
use thiserror::Error;

use crate::core::{PackageId, PackageRecord};
use crate::graph::ops::{self, CycleDetected};
use crate::graph::Graph;
use crate::manifest::{self, ManifestError, ManifestFormat};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("package not found: {0}")]
    PackageNotFound(PackageId),
    #[error("cycle encountered while finding the installation order for {package}: {}", .cycle.join(" -> "))]
    Cycle {
        package: PackageId,
        cycle: Vec<String>,
    },
    #[error("malformed dependency description: {0}")]
    MalformedInput(String),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Package-level queries over a dependency graph where an edge `a -> b`
/// means "a depends on b".
#[derive(Debug, Default)]
pub struct DependencyResolver {
    graph: Graph,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[PackageRecord]) -> Result<Self> {
        let mut resolver = Self::new();
        resolver.build_graph(records)?;
        Ok(resolver)
    }

    /// Reads a manifest file and builds a resolver from it. Unparseable
    /// content and records rejected by `build_graph` both surface as
    /// `MalformedInput`; read failures stay `Manifest`.
    pub fn from_manifest(path: &Path, format: Option<ManifestFormat>) -> Result<Self> {
        let records = manifest::load_manifest(path, format).map_err(|err| match err {
            ManifestError::Malformed { path, message } => {
                ResolveError::MalformedInput(format!("{}: {}", path.display(), message))
            }
            other => ResolveError::Manifest(other),
        })?;
        Self::from_records(&records).map_err(|err| match err {
            ResolveError::MalformedInput(message) => {
                ResolveError::MalformedInput(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Adds every record's package, its dependencies, and the edges between
    /// them, in declaration order. Records are validated before the graph is
    /// touched.
    pub fn build_graph(&mut self, records: &[PackageRecord]) -> Result<()> {
        for (idx, record) in records.iter().enumerate() {
            if record.name.is_empty() {
                return Err(ResolveError::MalformedInput(format!(
                    "package #{} has an empty name",
                    idx + 1
                )));
            }
            if record.dependencies.iter().any(String::is_empty) {
                return Err(ResolveError::MalformedInput(format!(
                    "package {} lists an empty dependency name",
                    record.name
                )));
            }
        }

        for record in records {
            self.graph.add_vertex(&record.name);
            for dep in &record.dependencies {
                self.graph.add_vertex(dep);
                self.graph.add_edge(&record.name, dep);
            }
        }
        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn all_packages(&self) -> IndexSet<String> {
        self.graph.all_vertices()
    }

    /// `pkg` and all of its transitive dependencies, each listed after
    /// everything it depends on.
    pub fn installation_order(&self, pkg: &str) -> Result<Vec<String>> {
        self.require_package(pkg)?;
        ops::installation_order(&self.graph, pkg).map_err(|CycleDetected { path }| {
            ResolveError::Cycle {
                package: PackageId::new(pkg),
                cycle: path,
            }
        })
    }

    /// Packages still to install for `new_pkg` when `installed_pkg` and its
    /// dependencies are already present.
    pub fn incremental_install(&self, new_pkg: &str, installed_pkg: &str) -> Result<Vec<String>> {
        self.require_package(new_pkg)?;
        self.require_package(installed_pkg)?;

        let wanted = self.installation_order(new_pkg)?;
        let present: IndexSet<String> = self
            .installation_order(installed_pkg)?
            .into_iter()
            .collect();
        Ok(wanted
            .into_iter()
            .filter(|pkg| !present.contains(pkg))
            .collect())
    }

    pub fn installation_order_for_all(&self) -> Result<Vec<String>> {
        let mut merged: IndexSet<String> = IndexSet::new();
        for pkg in self.graph.vertices() {
            merged.extend(self.installation_order(pkg)?);
        }
        Ok(merged.into_iter().collect())
    }

    /// Number of transitive dependencies of `pkg`, not counting itself.
    pub fn dependency_count(&self, pkg: &str) -> Result<usize> {
        Ok(self.installation_order(pkg)?.len().saturating_sub(1))
    }

    /// The package with the most transitive dependencies, first in graph
    /// order on ties. A cycle reachable from any package aborts the query.
    pub fn package_with_max_dependencies(&self) -> Result<Option<PackageId>> {
        let mut best: Option<(&str, usize)> = None;
        for pkg in self.graph.vertices() {
            let count = self.dependency_count(pkg)?;
            if best.map_or(true, |(_, max)| count > max) {
                best = Some((pkg, count));
            }
        }
        Ok(best.map(|(pkg, _)| PackageId::new(pkg)))
    }

    pub fn require_package(&self, pkg: &str) -> Result<()> {
        if self.graph.contains(pkg) {
            Ok(())
        } else {
            Err(ResolveError::PackageNotFound(PackageId::new(pkg)))
        }
    }
}
