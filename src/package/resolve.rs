//! Checking that entry-point targets name importable modules.

use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::discovery::INITIALIZER;
use super::{EntryPoint, EntryPointTarget, PackageDescriptor};

/// Candidate files that would make `target.module` importable from `root`.
///
/// `a.b` resolves to `<root>/a/b.py` or `<root>/a/b/__init__.py`.
pub fn module_candidates(root: &Path, target: &EntryPointTarget) -> [PathBuf; 2] {
    let mut dir = root.to_path_buf();
    for part in target.module_parts() {
        dir.push(part);
    }
    [dir.with_extension("py"), dir.join(INITIALIZER)]
}

pub fn is_resolvable<R: Runtime>(runtime: &R, root: &Path, target: &EntryPointTarget) -> bool {
    module_candidates(root, target)
        .iter()
        .any(|candidate| runtime.exists(candidate))
}

/// Entry points, across all categories, whose module cannot be found below
/// `root`. Whether the named attribute is actually callable is not checked.
#[tracing::instrument(skip(runtime, descriptor))]
pub fn unresolved_targets<'a, R: Runtime>(
    runtime: &R,
    root: &Path,
    descriptor: &'a PackageDescriptor,
) -> Vec<&'a EntryPoint> {
    descriptor
        .entry_points()
        .values()
        .flatten()
        .filter(|ep| !is_resolvable(runtime, root, &ep.target))
        .collect()
}
