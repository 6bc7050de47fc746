//! The package descriptor and its validating constructor.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::discovery::FindOptions;
use super::entry_point::is_dotted_path;
use super::{EntryPoint, Keywords, Requirement, ValidationError};

/// Category holding the commands installed onto the user's PATH.
pub const CONSOLE_SCRIPTS: &str = "console_scripts";

/// License identifiers accepted without a warning.
const KNOWN_LICENSES: &[&str] = &[
    "0BSD",
    "AGPL-3.0",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "BSL-1.0",
    "CC0-1.0",
    "EPL-2.0",
    "GPL-2.0",
    "GPL-3.0",
    "ISC",
    "LGPL-2.1",
    "LGPL-3.0",
    "MIT",
    "MPL-2.0",
    "Proprietary",
    "Unlicense",
    "Zlib",
];

/// Unvalidated descriptor fields, as declared in a descriptor file or read
/// back from an emitted manifest.
///
/// Every field is optional at this level; [`PackageDescriptor::build`]
/// decides what is actually required.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DescriptorFields {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Explicit package list. When absent, packages are discovered using `find`.
    pub packages: Option<Vec<String>>,
    /// Discovery settings, only consulted when `packages` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<FindOptions>,
    #[serde(default)]
    pub install_requires: Vec<String>,
    #[serde(default)]
    pub entry_points: BTreeMap<String, Vec<String>>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub keywords: Option<Keywords>,
}

/// Validated, immutable metadata of a distributable package.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    name: String,
    version: String,
    packages: BTreeSet<String>,
    #[serde(rename = "install_requires")]
    dependencies: Vec<Requirement>,
    entry_points: BTreeMap<String, Vec<EntryPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<Keywords>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_dotted_numeric(version: &str) -> bool {
    version
        .split('.')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

fn is_category_name(category: &str) -> bool {
    category
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'))
}

impl PackageDescriptor {
    /// Validate a set of fields into a descriptor.
    ///
    /// `name` and `version` must be present and non-empty, every dependency
    /// and entry point must parse, and a command may only appear once per
    /// category. Everything else defaults to empty.
    #[tracing::instrument(skip(fields))]
    pub fn build(fields: DescriptorFields) -> Result<Self, ValidationError> {
        let name = required(fields.name, "name")?;
        let version = required(fields.version, "version")?;

        if !is_dotted_numeric(&version) {
            warn!(
                "Version '{}' of {} does not follow the dotted-numeric convention",
                version, name
            );
        }

        let mut packages = BTreeSet::new();
        for package in fields.packages.unwrap_or_default() {
            let package = package.trim();
            if !is_dotted_path(package) {
                return Err(ValidationError::InvalidPackage(package.to_string()));
            }
            packages.insert(package.to_string());
        }

        let dependencies = fields
            .install_requires
            .iter()
            .map(|spec| {
                spec.parse::<Requirement>()
                    .map_err(|e| ValidationError::InvalidRequirement {
                        requirement: spec.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut entry_points = BTreeMap::new();
        for (category, entries) in fields.entry_points {
            let category = category.trim().to_string();
            if category.is_empty() {
                return Err(ValidationError::EmptyCategory);
            }
            if !is_category_name(&category) {
                return Err(ValidationError::InvalidCategory(category));
            }

            let mut parsed: Vec<EntryPoint> = Vec::with_capacity(entries.len());
            for entry in entries {
                let ep = entry.parse::<EntryPoint>().map_err(|e| {
                    ValidationError::InvalidEntryPoint {
                        category: category.clone(),
                        entry: entry.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if parsed.iter().any(|p| p.command == ep.command) {
                    return Err(ValidationError::DuplicateCommand {
                        category,
                        command: ep.command,
                    });
                }
                parsed.push(ep);
            }

            // Two keys differing only by surrounding whitespace collapse into one
            if entry_points.insert(category.clone(), parsed).is_some() {
                return Err(ValidationError::InvalidEntryPoint {
                    category,
                    entry: String::new(),
                    reason: "category is declared more than once".to_string(),
                });
            }
        }

        let license = optional(fields.license);
        if let Some(ref id) = license {
            if !KNOWN_LICENSES.iter().any(|known| known.eq_ignore_ascii_case(id)) {
                warn!("License '{}' is not a recognised license identifier", id);
            }
        }

        let keywords = fields.keywords.filter(|k| !k.is_empty());

        debug!(
            "Built descriptor {} {} ({} packages, {} dependencies)",
            name,
            version,
            packages.len(),
            dependencies.len()
        );

        Ok(PackageDescriptor {
            name,
            version,
            packages,
            dependencies,
            entry_points,
            author: optional(fields.author),
            description: optional(fields.description),
            license,
            keywords,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    pub fn dependencies(&self) -> &[Requirement] {
        &self.dependencies
    }

    pub fn entry_points(&self) -> &BTreeMap<String, Vec<EntryPoint>> {
        &self.entry_points
    }

    /// Entry points registered as console commands.
    pub fn console_scripts(&self) -> &[EntryPoint] {
        self.entry_points
            .get(CONSOLE_SCRIPTS)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn keywords(&self) -> Option<&Keywords> {
        self.keywords.as_ref()
    }
}

impl TryFrom<DescriptorFields> for PackageDescriptor {
    type Error = ValidationError;

    fn try_from(fields: DescriptorFields) -> Result<Self, Self::Error> {
        Self::build(fields)
    }
}
