//! Loading descriptor fields from a TOML descriptor file.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use crate::runtime::Runtime;

use super::discovery::resolve_packages_with;
use super::{DescriptorFields, PackageDescriptor};

/// Default descriptor file name inside a project root.
pub const DESCRIPTOR_FILE: &str = "package.toml";

/// Read and deserialize a descriptor file without validating it.
#[tracing::instrument(skip(runtime))]
pub fn load_fields<R: Runtime>(runtime: &R, path: &Path) -> Result<DescriptorFields> {
    let content = runtime.read_to_string(path)?;
    toml::from_str::<DescriptorFields>(&content)
        .with_context(|| format!("Error parsing {} as a package descriptor", path.display()))
}

/// Fill in discovered packages when the fields do not list them explicitly.
///
/// Discovery starts at `find.where` relative to `project_root`, or at the
/// project root itself.
#[tracing::instrument(skip(runtime, fields))]
pub fn discover_packages<R: Runtime>(
    runtime: &R,
    project_root: &Path,
    mut fields: DescriptorFields,
) -> Result<DescriptorFields> {
    if fields.packages.is_some() {
        debug!("Using explicitly declared packages");
        return Ok(fields);
    }

    let find = fields.find.clone().unwrap_or_default();
    let filter = find.filter()?;
    let root = find.discovery_root(project_root);
    let packages = resolve_packages_with(runtime, &root, &filter);
    info!("Discovered {} packages under {}", packages.len(), root.display());

    fields.packages = Some(packages.into_iter().collect());
    Ok(fields)
}

/// Load, discover and validate a descriptor in one step.
pub fn load_descriptor<R: Runtime>(
    runtime: &R,
    path: &Path,
    project_root: &Path,
) -> Result<PackageDescriptor> {
    let fields = load_fields(runtime, path)?;
    let fields = discover_packages(runtime, project_root, fields)?;
    let descriptor = PackageDescriptor::build(fields)
        .with_context(|| format!("Invalid package descriptor {}", path.display()))?;
    Ok(descriptor)
}
