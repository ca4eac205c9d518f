//! Integrity verifier: tamper-evidence for the root baseline files.
//!
//! The baseline set is fixed and root-relative; it is never discovered
//! dynamically. Verification recomputes every hash from scratch on each call
//! and only ever reads; drift is reported, never corrected.

use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Root-relative paths whose content hashes are tracked.
pub const BASELINE_FILES: [&str; 4] = [
    "config/synchron_config.json",
    "config/tiangan_suffix_manifest.csv",
    "config/merge_protocol.md",
    "metadata.json",
];

/// Verification outcome for a single baseline file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "hash")]
pub enum BaselineOutcome {
    /// File present; carries its SHA-256 hex digest.
    Verified(String),
    /// File absent.
    Missing,
}

/// One line of an integrity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityEntry {
    pub path: String,
    #[serde(flatten)]
    pub outcome: BaselineOutcome,
}

/// Overall verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntegrityStatus {
    Clean,
    Violations(usize),
}

/// Ordered verification results for the full baseline set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub entries: Vec<IntegrityEntry>,
}

impl IntegrityReport {
    /// Count of baseline files that failed verification.
    pub fn violations(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, BaselineOutcome::Missing))
            .count()
    }

    /// `Clean` iff every baseline file verified.
    pub fn status(&self) -> IntegrityStatus {
        match self.violations() {
            0 => IntegrityStatus::Clean,
            n => IntegrityStatus::Violations(n),
        }
    }
}

/// Verify every baseline file under `root`, in the fixed baseline order.
///
/// A missing file is an outcome, not an error; any other read failure
/// propagates as `io::Error`.
pub fn verify(root: &Path) -> io::Result<IntegrityReport> {
    let mut entries = Vec::with_capacity(BASELINE_FILES.len());

    for rel in BASELINE_FILES {
        let outcome = match sha256_file(&root.join(rel)) {
            Ok(hash) => BaselineOutcome::Verified(hash),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BaselineOutcome::Missing,
            Err(err) => return Err(err),
        };
        entries.push(IntegrityEntry { path: rel.to_string(), outcome });
    }

    Ok(IntegrityReport { entries })
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
///
/// The file is streamed in fixed-size chunks; the digest is identical to
/// hashing the whole file at once.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
