use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use synchron_core::integrity::{
    sha256_file, verify, BaselineOutcome, IntegrityStatus, BASELINE_FILES,
};

fn write_baseline(root: &Path) {
    fs::create_dir_all(root.join("config")).unwrap();
    for (idx, rel) in BASELINE_FILES.iter().enumerate() {
        fs::write(root.join(rel), format!("baseline file {idx}\n")).unwrap();
    }
}

#[test]
fn clean_root_verifies_every_baseline_file() {
    let root = tempfile::tempdir().unwrap();
    write_baseline(root.path());

    let report = verify(root.path()).unwrap();
    assert_eq!(report.entries.len(), BASELINE_FILES.len());
    assert_eq!(report.status(), IntegrityStatus::Clean);
    assert_eq!(report.violations(), 0);

    for (entry, expected) in report.entries.iter().zip(BASELINE_FILES) {
        assert_eq!(entry.path, expected);
        assert!(matches!(entry.outcome, BaselineOutcome::Verified(_)));
    }
}

/// Two verifications of byte-identical files return identical hashes.
#[test]
fn verification_is_deterministic() {
    let root = tempfile::tempdir().unwrap();
    write_baseline(root.path());

    let first = verify(root.path()).unwrap();
    let second = verify(root.path()).unwrap();
    assert_eq!(first, second);
}

/// Deleting one baseline file flips exactly that path to Missing and bumps
/// the violation count by exactly one.
#[test]
fn deleting_one_file_adds_exactly_one_violation() {
    let root = tempfile::tempdir().unwrap();
    write_baseline(root.path());

    let before = verify(root.path()).unwrap();
    assert_eq!(before.violations(), 0);

    fs::remove_file(root.path().join("metadata.json")).unwrap();

    let after = verify(root.path()).unwrap();
    assert_eq!(after.violations(), 1);
    assert_eq!(after.status(), IntegrityStatus::Violations(1));

    for entry in &after.entries {
        if entry.path == "metadata.json" {
            assert_eq!(entry.outcome, BaselineOutcome::Missing);
        } else {
            assert!(matches!(entry.outcome, BaselineOutcome::Verified(_)));
        }
    }
}

#[test]
fn empty_root_reports_all_missing() {
    let root = tempfile::tempdir().unwrap();
    let report = verify(root.path()).unwrap();
    assert_eq!(report.status(), IntegrityStatus::Violations(BASELINE_FILES.len()));
}

/// Chunked streaming must produce the same digest as hashing the whole file
/// at once, including for files larger than one chunk.
#[test]
fn streamed_hash_matches_one_shot_digest() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("large.bin");

    let content: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(&path, &content).unwrap();

    let streamed = sha256_file(&path).unwrap();
    let one_shot = format!("{:x}", Sha256::digest(&content));
    assert_eq!(streamed, one_shot);
}

#[test]
fn hashing_a_missing_file_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    let err = sha256_file(&root.path().join("absent")).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
