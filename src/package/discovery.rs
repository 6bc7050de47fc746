//! Package discovery below a discovery root.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::entry_point::is_identifier;

/// File marking a directory as an importable package.
pub const INITIALIZER: &str = "__init__.py";

/// Discovery settings declared under `[find]` in a descriptor file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FindOptions {
    /// Discovery root relative to the project root (defaults to the project root)
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_: Option<PathBuf>,
    /// Glob patterns a dotted package name must match (defaults to `*`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// Glob patterns excluding dotted package names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl FindOptions {
    pub fn discovery_root(&self, project_root: &Path) -> PathBuf {
        match self.where_ {
            Some(ref dir) => project_root.join(dir),
            None => project_root.to_path_buf(),
        }
    }

    /// Compile the include/exclude patterns.
    pub fn filter(&self) -> Result<PackageFilter> {
        let compile = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| {
                    glob::Pattern::new(p).with_context(|| format!("Invalid package pattern '{}'", p))
                })
                .collect::<Result<Vec<_>>>()
        };
        Ok(PackageFilter {
            include: compile(&self.include)?,
            exclude: compile(&self.exclude)?,
        })
    }
}

/// Compiled include/exclude patterns over dotted package names.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
}

impl PackageFilter {
    pub fn accepts(&self, package: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(package));
        included && !self.exclude.iter().any(|p| p.matches(package))
    }
}

/// Find every package below `root`.
///
/// A directory is a package when it contains an `__init__.py`; discovery
/// only descends into packages. A missing root yields an empty set.
pub fn resolve_packages<R: Runtime>(runtime: &R, root: &Path) -> BTreeSet<String> {
    resolve_packages_with(runtime, root, &PackageFilter::default())
}

/// Like [`resolve_packages`], keeping only packages accepted by `filter`.
///
/// Excluding a package does not stop discovery of its subpackages, so
/// `exclude = ["tests"]` still finds `tests.unit` unless `tests.*` is
/// excluded as well.
#[tracing::instrument(skip(runtime, filter))]
pub fn resolve_packages_with<R: Runtime>(
    runtime: &R,
    root: &Path,
    filter: &PackageFilter,
) -> BTreeSet<String> {
    let mut packages = BTreeSet::new();

    if !runtime.is_dir(root) {
        debug!("Discovery root {} does not exist, no packages", root.display());
        return packages;
    }

    scan(runtime, root, &[], filter, &mut packages);
    debug!("Discovered {} packages under {}", packages.len(), root.display());
    packages
}

fn scan<R: Runtime>(
    runtime: &R,
    dir: &Path,
    prefix: &[String],
    filter: &PackageFilter,
    packages: &mut BTreeSet<String>,
) {
    let entries = match runtime.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable directory {}: {:#}", dir.display(), e);
            return;
        }
    };

    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // Only identifiers can be imported as a package component
        if !is_identifier(name) || !runtime.is_dir(&path) {
            continue;
        }
        if !runtime.exists(&path.join(INITIALIZER)) {
            continue;
        }

        let mut components = prefix.to_vec();
        components.push(name.to_string());
        let package = components.join(".");

        if filter.accepts(&package) {
            packages.insert(package);
        }
        scan(runtime, &path, &components, filter, packages);
    }
}
