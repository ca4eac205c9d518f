use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod commands;

/// Interactive prompt shown when a ritual is read from stdin.
pub const RITUAL_PROMPT: &str = "adminp@synchronos:~$ ";

/// Resolve a root argument to an absolute path.
///
/// Canonicalization fails for roots that do not exist yet (init-root targets
/// in particular), so those are anchored under the current working directory
/// instead.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(_) => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            Ok(cwd.join(path))
        }
    }
}

/// Print `prompt` without a newline and read one trimmed line from stdin.
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read a line from stdin")?;
    Ok(line.trim().to_string())
}

/// Ask a y/n question on stdin; only a literal `y` counts as affirmative.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(question)?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
