//! Module directory model: identity, manifest shape, modes, and roles.
//!
//! A module is an isolated `db<suffix>` subtree under the Synchron root.
//! Suffix `"0"` names the immutable seed module; it is recognized by name
//! and never carries the generic branch manifest.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Suffix reserved for the immutable seed module.
pub const SEED_SUFFIX: &str = "0";

/// Version stamped into every branch manifest.
pub const ARCHITECTURE_VERSION: &str = "0.2.8";

/// Output factor for a spawned module.
///
/// Unrecognized factor tokens map to `Unknown` but do not block execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffMode {
    Silent,
    Buffered,
    Live,
    Unknown,
}

impl OffMode {
    /// Decode a ritual `--OFF` value token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "0" => OffMode::Silent,
            "1" => OffMode::Buffered,
            "2" => OffMode::Live,
            _ => OffMode::Unknown,
        }
    }

    /// Human-readable label used in status lines and manifest status fields.
    pub fn label(self) -> &'static str {
        match self {
            OffMode::Silent => "SILENT",
            OffMode::Buffered => "BUFFERED",
            OffMode::Live => "LIVE",
            OffMode::Unknown => "UNKNOWN",
        }
    }

    /// Canonical factor token stored in the manifest `off_factor` field.
    pub fn factor(self) -> &'static str {
        match self {
            OffMode::Silent => "0",
            OffMode::Buffered => "1",
            OffMode::Live => "2",
            OffMode::Unknown => "?",
        }
    }
}

impl Default for OffMode {
    fn default() -> Self {
        OffMode::Silent
    }
}

/// Fixed role enumeration for identity shifts.
///
/// The canonical names are the long kebab-case labels; the short aliases are
/// the admin handles from the kernel config role map and remain accepted on
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    PrimaryHumanAdmin,
    PrimaryAiAdmin,
    AuthorizedDebugger,
    GenericViewer,
}

impl Role {
    /// Parse a role token; accepts both the canonical label and the short
    /// admin alias. Returns `None` for anything outside the enumeration.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "primary-human-admin" | "adminp" => Some(Role::PrimaryHumanAdmin),
            "primary-ai-admin" | "admins" => Some(Role::PrimaryAiAdmin),
            "authorized-debugger" | "dbugx" => Some(Role::AuthorizedDebugger),
            "generic-viewer" | "user" => Some(Role::GenericViewer),
            _ => None,
        }
    }

    /// Canonical label for display and serialization.
    pub fn label(self) -> &'static str {
        match self {
            Role::PrimaryHumanAdmin => "primary-human-admin",
            Role::PrimaryAiAdmin => "primary-ai-admin",
            Role::AuthorizedDebugger => "authorized-debugger",
            Role::GenericViewer => "generic-viewer",
        }
    }

    /// Short admin alias as it appears in the kernel config role map.
    pub fn alias(self) -> &'static str {
        match self {
            Role::PrimaryHumanAdmin => "adminp",
            Role::PrimaryAiAdmin => "admins",
            Role::AuthorizedDebugger => "dbugx",
            Role::GenericViewer => "user",
        }
    }
}

/// Result of a validated role change.
///
/// This is intent-to-apply only: role assignments are not durably persisted
/// by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub username: String,
}

/// Per-module manifest record, written as pretty JSON at
/// `db<suffix>/config/module_config.json`.
///
/// The key set is stable; dashboards and the registry scanner rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub module_id: String,
    pub repo_type: String,
    pub repo_name: String,
    pub owner: String,
    pub off_factor: String,
    pub spawned_at: String,
    pub status: String,
    pub complexity: u32,
    pub architecture_version: String,
}

impl ModuleManifest {
    /// Build the manifest for a freshly spawned branch module.
    pub fn branch(suffix: &str, owner: &str, mode: OffMode, spawned_at: &DateTime<Local>) -> Self {
        Self {
            module_id: suffix.to_string(),
            repo_type: "branch_module".to_string(),
            repo_name: derive_repo_name(suffix, owner, spawned_at),
            owner: owner.to_string(),
            off_factor: mode.factor().to_string(),
            spawned_at: spawned_at.to_rfc3339(),
            status: format!("ISOLATED_{}", mode.label()),
            complexity: 50,
            architecture_version: ARCHITECTURE_VERSION.to_string(),
        }
    }
}

/// In-memory view of a module, assembled from its manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub suffix: String,
    pub owner: String,
    pub mode: OffMode,
    pub status: String,
    pub created_at: String,
    pub repo_name: String,
}

impl Module {
    pub fn from_manifest(manifest: &ModuleManifest) -> Self {
        Self {
            suffix: manifest.module_id.clone(),
            owner: manifest.owner.clone(),
            mode: OffMode::from_token(&manifest.off_factor),
            status: manifest.status.clone(),
            created_at: manifest.spawned_at.clone(),
            repo_name: manifest.repo_name.clone(),
        }
    }
}

/// Derive the deterministic repository name for a module.
///
/// Shape: `synchron<suffix_lower>_<YYYYmmdd_HHMMSS>_<owner>`. The prefix is a
/// pure function of suffix and owner, which lets the scanner cross-check a
/// manifest against the directory it lives in.
pub fn derive_repo_name(suffix: &str, owner: &str, at: &DateTime<Local>) -> String {
    format!("synchron{}_{}_{}", suffix.to_lowercase(), at.format("%Y%m%d_%H%M%S"), owner)
}
