use std::fs;

use anyhow::{Context, Result};

use synchron_core::config::SynchronConfig;
use synchron_core::layout::RootLayout;
use synchron_core::model::ARCHITECTURE_VERSION;
use synchron_core::ritual::SIGNATURE;

use crate::canonicalize_or_current;

/// Scaffold a Synchron root tree: baseline config files plus the immutable
/// seed module `db0`.
///
/// After this runs, every integrity baseline file exists and the registry
/// scanner will report the seed.
pub fn init_root_command(root: &str) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = RootLayout::new(&root_path);

    fs::create_dir_all(&layout.config_dir)
        .with_context(|| format!("Failed to create config dir: {}", layout.config_dir.display()))?;
    let seed_workspace = layout.seed_dir.join("workspace");
    fs::create_dir_all(&seed_workspace).with_context(|| {
        format!("Failed to create seed workspace: {}", seed_workspace.display())
    })?;

    let config = SynchronConfig::seeded();
    config
        .store(&layout.config_path)
        .with_context(|| format!("Failed to write kernel config: {}", layout.config_path.display()))?;

    let generated_at = config.metadata.last_build_timestamp.clone();

    let manifest_csv = suffix_manifest_csv(&generated_at);
    fs::write(&layout.suffix_manifest_path, manifest_csv).with_context(|| {
        format!("Failed to write suffix manifest: {}", layout.suffix_manifest_path.display())
    })?;

    fs::write(&layout.protocol_path, merge_protocol(&generated_at)).with_context(|| {
        format!("Failed to write merge protocol: {}", layout.protocol_path.display())
    })?;

    let metadata = serde_json::json!({
        "system": "Synchron OS",
        "architecture": "Tiangan",
        "architecture_version": ARCHITECTURE_VERSION,
        "seed": "db0",
        "generated_at": generated_at,
    });
    fs::write(&layout.metadata_path, serde_json::to_string_pretty(&metadata)?).with_context(
        || format!("Failed to write root metadata: {}", layout.metadata_path.display()),
    )?;

    println!("Initialized Synchron root:");
    println!("  Root: {}", layout.root.display());
    println!("  Kernel config: {}", layout.config_path.display());
    println!("  Suffix manifest: {}", layout.suffix_manifest_path.display());
    println!("  Merge protocol: {}", layout.protocol_path.display());
    println!("  Metadata: {}", layout.metadata_path.display());
    println!("  Seed module: {}", layout.seed_dir.display());

    Ok(())
}

/// Root manifest identifying suffix 0 as the core seed.
fn suffix_manifest_csv(generated_at: &str) -> String {
    format!(
        "# TIANGAN_BASELINE_MANIFEST_V1\n\
         # GENERATED_AT,{generated_at}\n\
         # SIGNATURE,{SIGNATURE}\n\
         \n\
         suffix,repo_name,work_directory,status,priority\n\
         0,synchron0,db0,STABLE,CORE_SEED\n"
    )
}

/// Documentation for the collision-free merge strategy.
fn merge_protocol(generated_at: &str) -> String {
    format!(
        "# Synchron OS | Merge Protocol\n\n\
         **Generated:** {generated_at}\n\
         **Signature:** {SIGNATURE}\n\n\
         ## Module Classification\n\
         1. **seed_module**: suffix 0, immutable genesis.\n\
         2. **branch_module**: isolated functional node (db<suffix>).\n\n\
         ## Isolated Branch Orchestration\n\
         Every branch module is self-contained to prevent merge collisions:\n\
         - All branch settings live in `db<suffix>/config/module_config.json`.\n\
         - All logic resides in `db<suffix>/workspace/`.\n\
         - Branch modules must not modify the root `config/` or `db0` files.\n"
    )
}
