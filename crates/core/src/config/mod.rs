//! Root kernel configuration (`config/synchron_config.json`).
//!
//! This record describes the seed kernel, the admin role map, and the ritual
//! formats accepted by the parser. It is one of the integrity baseline files
//! and is mutated only by session close and kernel sync.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::SEED_SUFFIX;
use crate::ritual::SIGNATURE;

/// Metadata status while the orchestration session is open.
pub const STATUS_STABLE: &str = "TIANGAN_DECENTRALIZED_STABLE";

/// Metadata status after a confirmed session close.
pub const STATUS_CLOSED: &str = "TIANGAN_SESSION_CLOSED";

/// Error type for kernel config load/store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read kernel config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write kernel config at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("kernel config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Identity of the seed kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelInfo {
    pub version: String,
    pub codename: String,
    pub architecture: String,
    pub suffix: String,
    pub node_identifier: String,
}

/// Admin role map and the ritual formats the parser accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityProtocols {
    pub admin_roles: BTreeMap<String, String>,
    pub rituals: BTreeMap<String, String>,
}

/// Mutable session metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub last_build_timestamp: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shutdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

/// The root kernel configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynchronConfig {
    pub kernel: KernelInfo,
    pub security_protocols: SecurityProtocols,
    pub metadata: ConfigMetadata,
}

impl SynchronConfig {
    /// Build the default config written when a root tree is scaffolded.
    pub fn seeded() -> Self {
        let mut admin_roles = BTreeMap::new();
        admin_roles.insert("adminp".to_string(), "dbugpro".to_string());
        admin_roles.insert("admins".to_string(), "synchron".to_string());
        admin_roles.insert("dbugx".to_string(), "authorized_debugger".to_string());
        admin_roles.insert("user".to_string(), "generic_viewer".to_string());

        let mut rituals = BTreeMap::new();
        rituals.insert(
            "1_spawn".to_string(),
            format!(
                "command synchron module --init --<SUFFIX> <T> --<USERNAME> <U> --OFF <B> --{SIGNATURE} <S>"
            ),
        );
        rituals.insert(
            "2_remove".to_string(),
            format!(
                "command synchron remove --init --<SUFFIX> <T> --<USERNAME> <U> --OFF <B> --{SIGNATURE} <S>"
            ),
        );
        rituals.insert("3_close".to_string(), "command synchron --close".to_string());
        rituals.insert(
            "4_sync".to_string(),
            format!("command synchron kernel --sync --adminp <M> --admins <Y> --{SIGNATURE} <S>"),
        );
        rituals.insert(
            "5_role".to_string(),
            format!(
                "command synchron role --change --<ROLE> <R> --<USERNAME> <U> --OFF <B> --{SIGNATURE} <S>"
            ),
        );
        rituals.insert(
            "6_integrity".to_string(),
            format!("command synchron integrity --check --{SIGNATURE} <S>"),
        );

        Self {
            kernel: KernelInfo {
                version: format!("{}-alpha", crate::version()),
                codename: "Synchron OS project A".to_string(),
                architecture: "Tiangan".to_string(),
                suffix: SEED_SUFFIX.to_string(),
                node_identifier: "synchron0_dbugpro_seed_module".to_string(),
            },
            security_protocols: SecurityProtocols { admin_roles, rituals },
            metadata: ConfigMetadata {
                last_build_timestamp: Local::now().to_rfc3339(),
                status: STATUS_STABLE.to_string(),
                last_shutdown: None,
                last_sync: None,
            },
        }
    }

    /// Load the kernel config from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Write the kernel config back to disk as pretty JSON.
    pub fn store(&self, path: &Path) -> Result<(), ConfigError> {
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body)
            .map_err(|source| ConfigError::Write { path: path.display().to_string(), source })
    }
}
