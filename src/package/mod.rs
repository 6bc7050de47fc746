//! Package descriptor module
//!
//! This module holds the static metadata of a distributable package:
//! validation of declared fields, package discovery, entry-point
//! resolution and the manifest renderings consumed by installers.

pub(crate) mod descriptor;
mod discovery;
mod entry_point;
mod error;
mod keywords;
pub mod manifest;
mod requirement;
mod resolve;
mod source;

pub use descriptor::{CONSOLE_SCRIPTS, DescriptorFields, PackageDescriptor};
pub use discovery::{FindOptions, INITIALIZER, PackageFilter, resolve_packages, resolve_packages_with};
pub use entry_point::{EntryPoint, EntryPointTarget};
pub use error::ValidationError;
pub use keywords::Keywords;
pub use manifest::{ManifestFormat, emit, parse};
pub use requirement::Requirement;
pub use resolve::{is_resolvable, module_candidates, unresolved_targets};
pub use source::{DESCRIPTOR_FILE, discover_packages, load_descriptor, load_fields};
