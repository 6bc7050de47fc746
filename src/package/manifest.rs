//! On-disk renderings of a package descriptor.
//!
//! The JSON manifest is the canonical form and can be read back with
//! [`parse`]. The core-metadata and entry-point renderings mirror the
//! files an installer expects next to an installed distribution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::{DescriptorFields, PackageDescriptor};

/// Core metadata version written by [`render_pkg_info`].
pub const METADATA_VERSION: &str = "2.1";

/// Output format of the `emit` operation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestFormat {
    /// Canonical JSON manifest
    #[default]
    Json,
    /// Core metadata (`PKG-INFO`)
    PkgInfo,
    /// INI-style `entry_points.txt`
    EntryPoints,
}

impl ManifestFormat {
    /// Conventional file name for this rendering.
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestFormat::Json => "manifest.json",
            ManifestFormat::PkgInfo => "PKG-INFO",
            ManifestFormat::EntryPoints => "entry_points.txt",
        }
    }
}

/// Render a descriptor in the requested format.
pub fn render(descriptor: &PackageDescriptor, format: ManifestFormat) -> Result<String> {
    match format {
        ManifestFormat::Json => emit(descriptor),
        ManifestFormat::PkgInfo => Ok(render_pkg_info(descriptor)),
        ManifestFormat::EntryPoints => Ok(render_entry_points(descriptor)),
    }
}

/// Serialize to the canonical JSON manifest.
///
/// Packages are sorted, dependencies and entries keep their declared order
/// and categories are sorted, so equal descriptors produce identical bytes.
#[tracing::instrument(skip(descriptor), fields(name = descriptor.name()))]
pub fn emit(descriptor: &PackageDescriptor) -> Result<String> {
    let mut json = serde_json::to_string_pretty(descriptor)?;
    json.push('\n');
    Ok(json)
}

/// Read a JSON manifest back into a validated descriptor.
#[tracing::instrument(skip(manifest))]
pub fn parse(manifest: &str) -> Result<PackageDescriptor> {
    let fields: DescriptorFields =
        serde_json::from_str(manifest).context("Failed to parse manifest JSON")?;
    Ok(PackageDescriptor::build(fields)?)
}

/// Render core metadata in the `Key: value` header format.
pub fn render_pkg_info(descriptor: &PackageDescriptor) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "Metadata-Version: {}", METADATA_VERSION);
    let _ = writeln!(out, "Name: {}", descriptor.name());
    let _ = writeln!(out, "Version: {}", descriptor.version());
    if let Some(summary) = descriptor.description() {
        let _ = writeln!(out, "Summary: {}", single_line(summary));
    }
    if let Some(author) = descriptor.author() {
        let _ = writeln!(out, "Author: {}", single_line(author));
    }
    if let Some(license) = descriptor.license() {
        let _ = writeln!(out, "License: {}", single_line(license));
    }
    if let Some(keywords) = descriptor.keywords() {
        let _ = writeln!(out, "Keywords: {}", keywords.iter().collect::<Vec<_>>().join(","));
    }
    for requirement in descriptor.dependencies() {
        let _ = writeln!(out, "Requires-Dist: {}", requirement);
    }
    out
}

/// Render entry points as INI sections, one per category.
pub fn render_entry_points(descriptor: &PackageDescriptor) -> String {
    let mut out = String::new();
    for (i, (category, entries)) in descriptor.entry_points().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}]", category);
        for entry in entries {
            let _ = writeln!(out, "{}", entry);
        }
    }
    out
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
