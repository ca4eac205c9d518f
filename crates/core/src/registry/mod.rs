//! Registry scanner: rebuilds the in-memory module registry from disk.
//!
//! The filesystem is authoritative; the registry is a read-only snapshot and
//! is never persisted. Scanning never creates, writes, or deletes anything.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::layout::{suffix_from_dir_name, ModuleLayout};
use crate::model::{ModuleManifest, SEED_SUFFIX};

/// What the scanner found under a module directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleEntry {
    /// The seed module, recognized by name. It does not carry the generic
    /// branch manifest.
    Seed,
    /// A branch module with a loadable manifest.
    Branch(ModuleManifest),
    /// A directory matching the naming convention whose manifest is missing
    /// or unreadable.
    Malformed,
}

/// Snapshot mapping suffixes to scanned module entries.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, ModuleEntry>,
}

impl Registry {
    pub fn get(&self, suffix: &str) -> Option<&ModuleEntry> {
        self.entries.get(suffix)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All scanned entries, ordered by suffix.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleEntry)> {
        self.entries.iter().map(|(suffix, entry)| (suffix.as_str(), entry))
    }

    /// Branch modules with a valid manifest.
    pub fn branches(&self) -> impl Iterator<Item = (&str, &ModuleManifest)> {
        self.entries.iter().filter_map(|(suffix, entry)| match entry {
            ModuleEntry::Branch(manifest) => Some((suffix.as_str(), manifest)),
            _ => None,
        })
    }

    /// Suffixes whose directories matched the convention but lack a loadable
    /// manifest.
    pub fn malformed(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(suffix, entry)| match entry {
            ModuleEntry::Malformed => Some(suffix.as_str()),
            _ => None,
        })
    }
}

/// Scan the immediate children of `root` for module directories.
///
/// Only directories named `db<suffix>` are considered. `db0` is always
/// registered as the seed; any other match is a branch when its manifest
/// loads and `Malformed` otherwise.
pub fn scan(root: &Path) -> io::Result<Registry> {
    let mut entries = BTreeMap::new();

    for dir_entry in fs::read_dir(root)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_dir() {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().to_string();
        let Some(suffix) = suffix_from_dir_name(&name) else {
            continue;
        };

        let entry = if suffix == SEED_SUFFIX {
            ModuleEntry::Seed
        } else {
            match load_manifest(root, suffix) {
                Some(manifest) => ModuleEntry::Branch(manifest),
                None => ModuleEntry::Malformed,
            }
        };
        entries.insert(suffix.to_string(), entry);
    }

    Ok(Registry { entries })
}

/// Attempt to load a branch manifest; any read or parse failure makes the
/// entry malformed rather than aborting the scan.
fn load_manifest(root: &Path, suffix: &str) -> Option<ModuleManifest> {
    let layout = ModuleLayout::new(root, suffix);
    let body = fs::read_to_string(&layout.manifest_path).ok()?;
    serde_json::from_str(&body).ok()
}
