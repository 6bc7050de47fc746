use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{package::DESCRIPTOR_FILE, runtime::Runtime};

/// Resolved settings shared by every command.
pub struct Config<R: Runtime> {
    pub runtime: R,
    /// Project root; default discovery root and base for entry-point resolution
    pub project_root: PathBuf,
    /// Descriptor file to load
    pub descriptor_path: PathBuf,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, project_root: Option<PathBuf>, file: Option<PathBuf>) -> Result<Self> {
        let project_root = match project_root {
            Some(root) => root,
            None => runtime.current_dir()?,
        };
        let descriptor_path = file.unwrap_or_else(|| project_root.join(DESCRIPTOR_FILE));
        debug!(
            "Project root {}, descriptor {}",
            project_root.display(),
            descriptor_path.display()
        );

        Ok(Self {
            runtime,
            project_root,
            descriptor_path,
        })
    }
}
