use predicates::str::contains;
use synchron_core::config::{SynchronConfig, STATUS_CLOSED, STATUS_STABLE};
use synchron_core::layout::RootLayout;
use synchron_core::ritual::SIGNATURE;
use tempfile::tempdir;

fn spawn_ritual(suffix: &str, username: &str) -> String {
    format!(
        "command synchron module --init --{suffix} X --{username} Y --OFF 2 --{SIGNATURE} {SIGNATURE}"
    )
}

/// init-root scaffolds every integrity baseline file plus the seed module.
#[test]
fn init_root_scaffolds_baseline_and_seed() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("init-root")
        .arg("--root")
        .arg(root)
        .assert()
        .success();

    let layout = RootLayout::new(root);
    assert!(layout.config_path.is_file());
    assert!(layout.suffix_manifest_path.is_file());
    assert!(layout.protocol_path.is_file());
    assert!(layout.metadata_path.is_file());
    assert!(layout.seed_dir.is_dir());

    let config = SynchronConfig::load(&layout.config_path).expect("seeded config loads");
    assert_eq!(config.metadata.status, STATUS_STABLE);
}

/// A well-formed spawn ritual creates the module subtree.
#[test]
fn spawn_ritual_creates_a_branch_module() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("init-root")
        .arg("--root")
        .arg(root)
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg(spawn_ritual("7", "tester"))
        .assert()
        .success()
        .stdout(contains("Spawned branch module db7"));

    assert!(root.join("db7").join("config").join("module_config.json").is_file());
    assert!(root.join("db7").join("workspace").is_dir());
}

/// An altered signature is rejected with the parse-error exit code and no
/// side effects.
#[test]
fn bad_signature_is_rejected_with_parse_exit_code() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    let forged = format!("command synchron module --init --7 X --tester Y --{SIGNATURE} forged");
    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg(forged)
        .assert()
        .failure()
        .code(2);

    assert!(!root.join("db7").exists());
}

/// Spawning the seed suffix is a lifecycle rejection (exit code 3).
#[test]
fn spawning_the_seed_uses_lifecycle_exit_code() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg(spawn_ritual("0", "tester"))
        .assert()
        .failure()
        .code(3)
        .stderr(contains("seed"));
}

/// Removing an absent module warns and still exits successfully; a second
/// attempt behaves identically.
#[test]
fn remove_missing_module_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    let remove =
        format!("command synchron remove --init --42 X --tester Y --OFF 0 --{SIGNATURE} {SIGNATURE}");
    for _ in 0..2 {
        assert_cmd::cargo::cargo_bin_cmd!("synchron")
            .arg("ritual")
            .arg("--root")
            .arg(root)
            .arg(&remove)
            .assert()
            .success()
            .stdout(contains("not found"));
    }
}

#[test]
fn remove_after_spawn_purges_the_subtree() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg(spawn_ritual("5", "tester"))
        .assert()
        .success();
    assert!(root.join("db5").is_dir());

    let remove =
        format!("command synchron remove --init --5 X --tester Y --OFF 0 --{SIGNATURE} {SIGNATURE}");
    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg(remove)
        .assert()
        .success()
        .stdout(contains("purged"));
    assert!(!root.join("db5").exists());
}

/// A removal ritual whose suffix tries to climb out of the module tree is
/// refused with the lifecycle exit code and deletes nothing.
#[test]
fn path_climbing_remove_ritual_is_refused() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("init-root")
        .arg("--root")
        .arg(root)
        .assert()
        .success();

    let remove =
        format!("command synchron remove --init --x/.. X --tester Y --OFF 0 --{SIGNATURE} {SIGNATURE}");
    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg(remove)
        .assert()
        .failure()
        .code(3)
        .stderr(contains("invalid module suffix"));

    let layout = RootLayout::new(root);
    assert!(layout.seed_dir.is_dir());
    assert!(layout.config_path.is_file());
    assert!(layout.metadata_path.is_file());
}

/// Declining the close confirmation is a no-op, not an error.
#[test]
fn declined_close_leaves_the_session_open() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("init-root")
        .arg("--root")
        .arg(root)
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg("command synchron --close")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("declined"));

    let layout = RootLayout::new(root);
    let config = SynchronConfig::load(&layout.config_path).unwrap();
    assert_eq!(config.metadata.status, STATUS_STABLE);
}

#[test]
fn confirmed_close_marks_the_session_closed() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("init-root")
        .arg("--root")
        .arg(root)
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .arg("command synchron --close")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("terminated"));

    let layout = RootLayout::new(root);
    let config = SynchronConfig::load(&layout.config_path).unwrap();
    assert_eq!(config.metadata.status, STATUS_CLOSED);
    assert!(config.metadata.last_shutdown.is_some());
}

/// A ritual supplied on stdin (no argument) is parsed the same way.
#[test]
fn ritual_is_read_from_stdin_when_not_an_argument() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("synchron")
        .arg("ritual")
        .arg("--root")
        .arg(root)
        .write_stdin(format!("{}\n", spawn_ritual("8", "tester")))
        .assert()
        .success()
        .stdout(contains("Spawned branch module db8"));
}
