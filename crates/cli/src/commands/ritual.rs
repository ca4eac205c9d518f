use anyhow::Result;

use synchron_core::integrity;
use synchron_core::lifecycle::{LifecycleError, Orchestrator};
use synchron_core::ritual::{self, CommandIntent};

use crate::commands::print_integrity_report;
use crate::{canonicalize_or_current, confirm, prompt_line, RITUAL_PROMPT};

/// Read, validate, and execute one ritual against the root at `root`.
///
/// When no ritual string is supplied, one line is read interactively from
/// stdin. Parse and lifecycle rejections propagate as their typed errors so
/// the binary can map them to distinct exit codes.
pub fn ritual_command(root: &str, ritual: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;

    let raw = match ritual {
        Some(raw) => raw,
        None => {
            println!("[?] Awaiting ritual (see config/synchron_config.json for formats)");
            prompt_line(RITUAL_PROMPT)?
        }
    };

    let intent = ritual::parse(&raw).map_err(anyhow::Error::new)?;
    let orchestrator = Orchestrator::new(&root_path);

    match intent {
        CommandIntent::Spawn(spawn) => {
            println!("[*] Ritual accepted. Mode: {}", spawn.mode.label());
            let module =
                orchestrator.spawn(&spawn).map_err(anyhow::Error::new)?;
            println!(
                "[+] Spawned branch module db{} (@{})",
                module.suffix, module.owner
            );
            println!("[+] Repository: {}", module.repo_name);
            println!("[+] Status: {}", module.status);
        }
        CommandIntent::Remove(remove) => match orchestrator.remove(&remove) {
            Ok(()) => {
                println!("[+] Branch module db{} purged from root.", remove.suffix);
            }
            // Removal is idempotent: an absent module is a warning, not a
            // failure.
            Err(LifecycleError::NotFound(suffix)) => {
                println!("[!] Warning: branch db{suffix} not found; nothing to remove.");
            }
            Err(err) => return Err(anyhow::Error::new(err)),
        },
        CommandIntent::RoleChange(change) => {
            let assignment =
                orchestrator.change_role(&change).map_err(anyhow::Error::new)?;
            println!(
                "[+] Identity shift accepted: @{} -> {}",
                assignment.username,
                assignment.role.label()
            );
        }
        CommandIntent::KernelSync(sync) => {
            orchestrator.kernel_sync(&sync).map_err(anyhow::Error::new)?;
            println!(
                "[+] Kernel synced: adminp={} admins={}",
                sync.adminp, sync.admins
            );
        }
        CommandIntent::IntegrityCheck => {
            let report = integrity::verify(&root_path)?;
            print_integrity_report(&report);
        }
        CommandIntent::Close => {
            if !confirm("Confirm termination? (y/n): ")? {
                println!("[*] Termination declined; session remains open.");
                return Ok(());
            }
            orchestrator.close_session().map_err(anyhow::Error::new)?;
            println!("[+] Session terminated. Branch modules remain self-contained.");
        }
    }

    Ok(())
}
