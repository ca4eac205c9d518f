//! Lifecycle orchestrator: the only component that mutates the root tree.
//!
//! Every operation takes a fully validated intent from the ritual parser.
//! Semantic rules enforced here (and deliberately *not* in the parser):
//! suffixes must be plain path components, suffix `"0"` is the immutable
//! seed, module directories must not collide, and role changes must land
//! inside the fixed role enumeration.
//!
//! Single-operator, single-process model: no file locking is taken around
//! mutations. Concurrent invocation from multiple processes is out of scope.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::config::{ConfigError, SynchronConfig, STATUS_CLOSED};
use crate::layout::{ModuleLayout, RootLayout};
use crate::model::{Module, ModuleManifest, Role, RoleAssignment, SEED_SUFFIX};
use crate::ritual::{KernelSyncIntent, RemoveIntent, RoleChangeIntent, SpawnIntent, SIGNATURE};

/// Error type for lifecycle operations.
///
/// `NotFound` on remove is non-fatal and idempotent; every other variant
/// aborts the requested mutation.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The suffix is not a single plain path component, so `db<suffix>`
    /// could resolve outside its own directory.
    #[error("invalid module suffix: {0:?}")]
    InvalidSuffix(String),

    /// Suffix `"0"` names the seed module, which is never spawned or removed.
    #[error("suffix 0 is reserved for the seed module")]
    SeedImmutable,

    /// A subtree for this suffix already exists.
    #[error("module db{0} already exists")]
    NodeCollision(String),

    /// No subtree exists for this suffix. Removal treats this as a warning,
    /// not a failure.
    #[error("module db{0} not found")]
    NotFound(String),

    /// The module directories were created but the manifest could not be
    /// written. Spawn rolls the directories back before surfacing this.
    #[error("failed to write module manifest")]
    ManifestWriteFailed(#[source] io::Error),

    /// The requested role is outside the fixed enumeration.
    #[error("unknown role: {0}")]
    InvalidRole(String),

    /// The root kernel config could not be read, parsed, or written.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Filesystem failure during a mutation (e.g. permission denied on
    /// delete). Never silently swallowed.
    #[error("io failure: {0}")]
    Io(#[from] io::Error),
}

/// Executes validated intents against a Synchron root tree.
///
/// The root path is supplied explicitly at construction; nothing is derived
/// from the call site.
pub struct Orchestrator {
    root: PathBuf,
}

impl Orchestrator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Spawn an isolated branch module `db<suffix>`.
    ///
    /// Creates the config and workspace areas, writes the manifest and a
    /// module README, and returns the new module. If the manifest write
    /// fails, the created directories are removed best-effort so no
    /// half-built subtree is left behind.
    pub fn spawn(&self, intent: &SpawnIntent) -> Result<Module, LifecycleError> {
        self.spawn_with(intent, write_manifest)
    }

    /// Spawn with a substitutable manifest writer, so the rollback path can
    /// be exercised without provoking a real filesystem failure.
    fn spawn_with(
        &self,
        intent: &SpawnIntent,
        write: impl Fn(&Path, &ModuleManifest) -> io::Result<()>,
    ) -> Result<Module, LifecycleError> {
        validate_suffix(&intent.suffix)?;
        if intent.suffix == SEED_SUFFIX {
            return Err(LifecycleError::SeedImmutable);
        }

        let layout = ModuleLayout::new(&self.root, &intent.suffix);
        if layout.module_dir.exists() {
            return Err(LifecycleError::NodeCollision(intent.suffix.clone()));
        }

        fs::create_dir_all(&layout.config_dir)?;
        fs::create_dir_all(&layout.workspace_dir)?;

        let now = Local::now();
        let manifest = ModuleManifest::branch(&intent.suffix, &intent.username, intent.mode, &now);

        if let Err(source) = write(&layout.manifest_path, &manifest) {
            // Roll the spawn back; a module without a manifest is malformed.
            let _ = fs::remove_dir_all(&layout.module_dir);
            return Err(LifecycleError::ManifestWriteFailed(source));
        }

        // The README is advisory; the manifest is the authoritative record,
        // so a failure here is surfaced but does not undo the spawn.
        fs::write(&layout.readme_path, module_readme(&manifest))?;

        Ok(Module::from_manifest(&manifest))
    }

    /// Remove the branch module `db<suffix>` recursively and irreversibly.
    ///
    /// Removing an absent module yields `NotFound`, which callers treat as a
    /// warning: removal is idempotent and repeat calls are safe.
    pub fn remove(&self, intent: &RemoveIntent) -> Result<(), LifecycleError> {
        validate_suffix(&intent.suffix)?;
        if intent.suffix == SEED_SUFFIX {
            return Err(LifecycleError::SeedImmutable);
        }

        let layout = ModuleLayout::new(&self.root, &intent.suffix);
        if !layout.module_dir.exists() {
            return Err(LifecycleError::NotFound(intent.suffix.clone()));
        }

        fs::remove_dir_all(&layout.module_dir)?;
        Ok(())
    }

    /// Validate a role change and return the assignment to apply.
    ///
    /// Pure: the assignment is not durably persisted.
    pub fn change_role(&self, intent: &RoleChangeIntent) -> Result<RoleAssignment, LifecycleError> {
        let role = Role::parse(&intent.role)
            .ok_or_else(|| LifecycleError::InvalidRole(intent.role.clone()))?;
        Ok(RoleAssignment { role, username: intent.username.clone() })
    }

    /// Update the admin handles in the root kernel config.
    pub fn kernel_sync(&self, intent: &KernelSyncIntent) -> Result<(), LifecycleError> {
        let layout = RootLayout::new(&self.root);
        let mut config = SynchronConfig::load(&layout.config_path)?;

        config
            .security_protocols
            .admin_roles
            .insert("adminp".to_string(), intent.adminp.clone());
        config
            .security_protocols
            .admin_roles
            .insert("admins".to_string(), intent.admins.clone());
        config.metadata.last_sync = Some(Local::now().to_rfc3339());

        config.store(&layout.config_path)?;
        Ok(())
    }

    /// Mark the session closed in the root kernel config.
    ///
    /// Interactive confirmation happens at the frontend; by the time this
    /// runs the operator has already affirmed the shutdown.
    pub fn close_session(&self) -> Result<(), LifecycleError> {
        let layout = RootLayout::new(&self.root);
        let mut config = SynchronConfig::load(&layout.config_path)?;

        config.metadata.status = STATUS_CLOSED.to_string();
        config.metadata.last_shutdown = Some(Local::now().to_rfc3339());

        config.store(&layout.config_path)?;
        Ok(())
    }
}

/// A suffix is only accepted as a single plain path component. Anything
/// containing a separator or dot segment would make `db<suffix>` name a
/// location other than its own module directory, letting removal reach the
/// seed or the root itself.
fn validate_suffix(suffix: &str) -> Result<(), LifecycleError> {
    if suffix.is_empty() || suffix == "." || suffix == ".." || suffix.contains(['/', '\\']) {
        return Err(LifecycleError::InvalidSuffix(suffix.to_string()));
    }
    Ok(())
}

fn write_manifest(path: &Path, manifest: &ModuleManifest) -> io::Result<()> {
    let body = serde_json::to_vec_pretty(manifest)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    fs::write(path, body)
}

fn module_readme(manifest: &ModuleManifest) -> String {
    let suffix = &manifest.module_id;
    format!(
        "# Branch Module: {suffix}\n\
         ## Repository: {repo}\n\
         ## Owner: @{owner}\n\
         ## Mode: {status} (OFF {factor})\n\n\
         This is a self-contained functional node within the Synchron OS.\n\
         All settings and logic for this branch are isolated within this directory.\n\n\
         - Config: `db{suffix}/config/module_config.json`\n\
         - Logic: `db{suffix}/workspace/`\n\n\
         ---\n\
         \"{signature}\"\n",
        repo = manifest.repo_name,
        owner = manifest.owner,
        status = manifest.status,
        factor = manifest.off_factor,
        signature = SIGNATURE,
    )
}
