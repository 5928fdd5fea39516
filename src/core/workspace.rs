//! Workspace discovery and structure
//!
//! A workspace is any directory containing `.packlist/`. Checklist and
//! operation-log blobs live under `.packlist/data/`, workspace-local
//! configuration in `.packlist/config.yaml`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a packlist workspace
#[derive(Debug)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .packlist/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        loop {
            if current.join(".packlist").is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new workspace structure at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let packlist_dir = root.join(".packlist");
        if packlist_dir.exists() {
            return Err(WorkspaceError::AlreadyExists(root.clone()));
        }

        Self::create_skeleton(&packlist_dir)?;
        Ok(Self { root })
    }

    /// Force initialization even if .packlist/ exists
    pub fn init_force(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_skeleton(&root.join(".packlist"))?;
        Ok(Self { root })
    }

    fn create_skeleton(packlist_dir: &Path) -> Result<(), WorkspaceError> {
        std::fs::create_dir_all(packlist_dir.join("data"))
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        let config_path = packlist_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        }
        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# Packlist Workspace Configuration

# Icon assigned to categories created without one
# default_icon: "✨"

# Quantity unit assigned to items created without one
# default_quantity_unit: "个"

# Ask before destructive operations (delete, clear, import)
# confirm_destructive: true
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .packlist configuration directory
    pub fn packlist_dir(&self) -> PathBuf {
        self.root.join(".packlist")
    }

    /// Get the directory storage blobs live under
    pub fn data_dir(&self) -> PathBuf {
        self.packlist_dir().join("data")
    }

    /// Get the workspace config file path
    pub fn config_path(&self) -> PathBuf {
        self.packlist_dir().join("config.yaml")
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not a packlist workspace (searched from {searched_from:?}). Run 'packlist init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("packlist workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
