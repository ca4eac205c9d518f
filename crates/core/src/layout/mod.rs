//! On-disk layout of the Synchron root tree and its module subtrees.
//!
//! These types are derived from an explicitly supplied root path and do *not*
//! perform any IO themselves. The orchestrator and CLI are responsible for
//! actually creating directories and files based on a layout.

use std::path::{Path, PathBuf};

use crate::model::SEED_SUFFIX;

/// Directory-name prefix shared by every module subtree (`db<suffix>`).
pub const MODULE_DIR_PREFIX: &str = "db";

/// Logical layout of the Synchron root.
#[derive(Debug, Clone)]
pub struct RootLayout {
    /// Root directory of the whole tree.
    pub root: PathBuf,
    /// Directory for root-level configuration (config).
    pub config_dir: PathBuf,
    /// Path to the kernel config file (JSON).
    pub config_path: PathBuf,
    /// Path to the suffix manifest (CSV).
    pub suffix_manifest_path: PathBuf,
    /// Path to the merge protocol document (Markdown).
    pub protocol_path: PathBuf,
    /// Path to the root metadata file (JSON).
    pub metadata_path: PathBuf,
    /// Directory of the immutable seed module (db0).
    pub seed_dir: PathBuf,
}

impl RootLayout {
    /// Compute the layout for a tree rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let config_dir = root.join("config");
        let config_path = config_dir.join("synchron_config.json");
        let suffix_manifest_path = config_dir.join("tiangan_suffix_manifest.csv");
        let protocol_path = config_dir.join("merge_protocol.md");
        let metadata_path = root.join("metadata.json");
        let seed_dir = root.join(module_dir_name(SEED_SUFFIX));

        Self {
            root,
            config_dir,
            config_path,
            suffix_manifest_path,
            protocol_path,
            metadata_path,
            seed_dir,
        }
    }

    /// Directory a module with the given suffix would occupy.
    pub fn module_dir(&self, suffix: &str) -> PathBuf {
        self.root.join(module_dir_name(suffix))
    }
}

/// Logical layout of a single module subtree.
#[derive(Debug, Clone)]
pub struct ModuleLayout {
    /// The module directory itself (db<suffix>).
    pub module_dir: PathBuf,
    /// Directory for module-local configuration.
    pub config_dir: PathBuf,
    /// Path to the module manifest (JSON).
    pub manifest_path: PathBuf,
    /// Directory for module-local logic and artifacts.
    pub workspace_dir: PathBuf,
    /// Path to the module README.
    pub readme_path: PathBuf,
}

impl ModuleLayout {
    /// Compute the layout for the module `db<suffix>` under `root`.
    pub fn new(root: impl AsRef<Path>, suffix: &str) -> Self {
        let module_dir = root.as_ref().join(module_dir_name(suffix));
        let config_dir = module_dir.join("config");
        let manifest_path = config_dir.join("module_config.json");
        let workspace_dir = module_dir.join("workspace");
        let readme_path = module_dir.join("README.md");

        Self { module_dir, config_dir, manifest_path, workspace_dir, readme_path }
    }
}

/// Directory name for a module suffix (`db` + suffix).
pub fn module_dir_name(suffix: &str) -> String {
    format!("{MODULE_DIR_PREFIX}{suffix}")
}

/// Extract the suffix from a directory name matching the module convention.
///
/// Returns `None` for names that do not start with the prefix or carry an
/// empty suffix.
pub fn suffix_from_dir_name(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(MODULE_DIR_PREFIX)?;
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}
