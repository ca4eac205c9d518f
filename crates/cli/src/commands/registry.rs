use anyhow::{Context, Result};
use serde::Serialize;

use synchron_core::model::ModuleManifest;
use synchron_core::registry::{self, ModuleEntry};

use crate::canonicalize_or_current;

#[derive(Serialize)]
struct RegistrySnapshot {
    total: usize,
    entries: Vec<RegistryEntrySnapshot>,
}

#[derive(Serialize)]
struct RegistryEntrySnapshot {
    suffix: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<ModuleManifest>,
}

/// Scan the root tree and report every module directory found.
///
/// Read-only: the registry is rebuilt from disk on each invocation and never
/// persisted.
pub fn registry_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let registry = registry::scan(&root_path)
        .with_context(|| format!("Failed to scan root: {}", root_path.display()))?;

    if json {
        let entries = registry
            .iter()
            .map(|(suffix, entry)| {
                let (kind, manifest) = match entry {
                    ModuleEntry::Seed => ("seed", None),
                    ModuleEntry::Branch(manifest) => ("branch", Some(manifest.clone())),
                    ModuleEntry::Malformed => ("malformed", None),
                };
                RegistryEntrySnapshot { suffix: suffix.to_string(), kind: kind.to_string(), manifest }
            })
            .collect::<Vec<_>>();
        let snapshot = RegistrySnapshot { total: registry.len(), entries };
        let serialized = serde_json::to_string_pretty(&snapshot)
            .context("Failed to serialize registry to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Module registry ({}):", registry.len());
    if registry.is_empty() {
        println!("  (none)");
        return Ok(());
    }

    for (suffix, entry) in registry.iter() {
        match entry {
            ModuleEntry::Seed => {
                println!("  - db{suffix} [seed] baseline kernel");
            }
            ModuleEntry::Branch(manifest) => {
                println!(
                    "  - db{suffix} [branch] {} owner=@{} status={}",
                    manifest.repo_name, manifest.owner, manifest.status
                );
            }
            ModuleEntry::Malformed => {
                println!("  - db{suffix} [malformed] manifest missing or unreadable");
            }
        }
    }

    let malformed = registry.malformed().count();
    if malformed > 0 {
        println!("[!] {malformed} malformed module(s) excluded from the usable set.");
    }

    Ok(())
}
