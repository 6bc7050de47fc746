use anyhow::{Context, Result};
use log::{info, warn};
use std::io::Write;
use std::path::Path;

use crate::{
    package::{
        self, DescriptorFields, ManifestFormat, PackageDescriptor, discover_packages,
        load_descriptor, load_fields, manifest, unresolved_targets,
    },
    runtime::Runtime,
};

pub mod config;

use config::Config;

/// Validate the descriptor and report entry points that do not resolve.
#[tracing::instrument(skip(config, out))]
pub fn check<R: Runtime>(config: &Config<R>, out: &mut dyn Write) -> Result<()> {
    let descriptor = load(config)?;

    let unresolved = unresolved_targets(&config.runtime, &config.project_root, &descriptor);
    for ep in &unresolved {
        warn!("Entry point '{}' does not resolve", ep);
        writeln!(
            out,
            "warning: entry point '{}' does not resolve to a module under {}",
            ep,
            config.project_root.display()
        )?;
    }

    let entry_count: usize = descriptor.entry_points().values().map(Vec::len).sum();
    writeln!(
        out,
        "ok: {} {} ({} packages, {} dependencies, {} entry points)",
        descriptor.name(),
        descriptor.version(),
        descriptor.packages().len(),
        descriptor.dependencies().len(),
        entry_count
    )?;
    Ok(())
}

/// Print discovered packages, one per line.
///
/// Works without a descriptor file; the project root is scanned with
/// default settings in that case.
#[tracing::instrument(skip(config, out))]
pub fn packages<R: Runtime>(config: &Config<R>, out: &mut dyn Write) -> Result<()> {
    let fields = if config.runtime.exists(&config.descriptor_path) {
        load_fields(&config.runtime, &config.descriptor_path)?
    } else {
        info!(
            "No descriptor at {}, scanning project root",
            config.descriptor_path.display()
        );
        DescriptorFields::default()
    };
    let fields = discover_packages(&config.runtime, &config.project_root, fields)?;

    for name in fields.packages.unwrap_or_default() {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

/// Render the descriptor, to `output` when given and to `out` otherwise.
#[tracing::instrument(skip(config, out))]
pub fn emit<R: Runtime>(
    config: &Config<R>,
    format: ManifestFormat,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let descriptor = load(config)?;
    let rendered = manifest::render(&descriptor, format)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                config.runtime.create_dir_all(parent)?;
            }
            config
                .runtime
                .write(path, rendered.as_bytes())
                .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
            info!("Wrote {:?} manifest to {}", format, path.display());
            writeln!(out, "Wrote {}", path.display())?;
        }
        None => out.write_all(rendered.as_bytes())?,
    }
    Ok(())
}

/// Print a human-readable summary of the descriptor.
#[tracing::instrument(skip(config, out))]
pub fn show<R: Runtime>(config: &Config<R>, out: &mut dyn Write) -> Result<()> {
    let descriptor = load(config)?;

    writeln!(out, "Name:        {}", descriptor.name())?;
    writeln!(out, "Version:     {}", descriptor.version())?;
    if let Some(description) = descriptor.description() {
        writeln!(out, "Description: {}", description)?;
    }
    if let Some(author) = descriptor.author() {
        writeln!(out, "Author:      {}", author)?;
    }
    if let Some(license) = descriptor.license() {
        writeln!(out, "License:     {}", license)?;
    }
    if let Some(keywords) = descriptor.keywords() {
        writeln!(out, "Keywords:    {}", keywords.iter().collect::<Vec<_>>().join(", "))?;
    }

    print_list(out, "Packages", descriptor.packages().iter())?;
    print_list(out, "Dependencies", descriptor.dependencies().iter())?;

    for (category, entries) in descriptor.entry_points() {
        writeln!(out, "Entry points [{}]:", category)?;
        for ep in entries {
            writeln!(out, "  {} -> {}", ep.command, ep.target)?;
        }
    }
    Ok(())
}

fn print_list<T: std::fmt::Display>(
    out: &mut dyn Write,
    title: &str,
    items: impl ExactSizeIterator<Item = T>,
) -> Result<()> {
    if items.len() == 0 {
        writeln!(out, "{}: (none)", title)?;
        return Ok(());
    }
    writeln!(out, "{}:", title)?;
    for item in items {
        writeln!(out, "  {}", item)?;
    }
    Ok(())
}

fn load<R: Runtime>(config: &Config<R>) -> Result<PackageDescriptor> {
    load_descriptor(&config.runtime, &config.descriptor_path, &config.project_root)
}
