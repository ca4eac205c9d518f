use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use synchron_cli::commands::{
    init_root_command, integrity_command, registry_command, ritual_command,
};
use synchron_core::lifecycle::LifecycleError;
use synchron_core::ritual::ParseError;

/// Synchron OS module orchestration CLI.
///
/// This binary is a thin wrapper around `synchron-core`. All substantive
/// logic lives in the library so it can be tested thoroughly and reused from
/// other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "synchron",
    version,
    about = "Decentralized module orchestration for the Synchron OS root tree",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scaffold a Synchron root: baseline config files and the db0 seed.
    InitRoot {
        /// Root directory of the tree. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,
    },

    /// Execute a signature-terminated ritual (spawn, remove, role change,
    /// kernel sync, integrity check, or session close).
    ///
    /// The ritual may be given as an argument; otherwise one line is read
    /// from stdin.
    Ritual {
        /// Root directory of the tree. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// The raw ritual string.
        ritual: Option<String>,
    },

    /// Scan the root for module directories and report the registry.
    Registry {
        /// Root directory of the tree. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Verify the content hashes of the root baseline files.
    Integrity {
        /// Root directory of the tree. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("[X] {err:#}");
        process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::InitRoot { root } => init_root_command(&root),
        Command::Ritual { root, ritual } => ritual_command(&root, ritual),
        Command::Registry { root, json } => registry_command(&root, json),
        Command::Integrity { root, json } => integrity_command(&root, json),
    }
}

/// Exit codes: 2 for ritual parse rejections, 3 for lifecycle rejections,
/// 1 for anything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ParseError>().is_some() {
        2
    } else if err.downcast_ref::<LifecycleError>().is_some() {
        3
    } else {
        1
    }
}
