use anyhow::{Context, Result};

use synchron_core::integrity::{self, BaselineOutcome, IntegrityReport, IntegrityStatus};

use crate::canonicalize_or_current;

/// Verify the root baseline files and print the report.
pub fn integrity_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let report = integrity::verify(&root_path)
        .with_context(|| format!("Failed to verify root: {}", root_path.display()))?;

    if json {
        let serialized = serde_json::to_string_pretty(&report)
            .context("Failed to serialize integrity report to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    print_integrity_report(&report);
    Ok(())
}

/// Human-readable rendering of an integrity report.
pub fn print_integrity_report(report: &IntegrityReport) {
    for entry in &report.entries {
        match &entry.outcome {
            BaselineOutcome::Verified(hash) => {
                println!("[*] {}: VERIFIED [{}...]", entry.path, &hash[..8]);
            }
            BaselineOutcome::Missing => {
                println!("[X] {}: MISSING", entry.path);
            }
        }
    }

    match report.status() {
        IntegrityStatus::Clean => {
            println!("[+] System integrity verified. Seed is stable.");
        }
        IntegrityStatus::Violations(n) => {
            println!("[X] {n} integrity violation(s) detected. Protocol lock advised.");
        }
    }
}
