//! Ritual grammar and validator.
//!
//! A ritual is a whitespace-tokenized, signature-terminated command string.
//! Parsing is all-or-nothing: a [`CommandIntent`] is only constructed after
//! the whole string validates, and any missing or malformed field rejects the
//! command outright. Semantic rules (seed immutability, role enumeration)
//! live in the lifecycle layer, not here, so suffix `"0"` and unknown role
//! tokens are syntactically acceptable.
//!
//! Grammar, with `<sig>` required to equal [`SIGNATURE`]:
//!
//! ```text
//! command synchron module --init --<SUFFIX> <t> --<USERNAME> <u> --OFF <b> --bugsarefree <sig>
//! command synchron remove --init --<SUFFIX> <t> --<USERNAME> <u> --OFF <b> --bugsarefree <sig>
//! command synchron role --change --<ROLE> <r> --<USERNAME> <u> --OFF <b> --bugsarefree <sig>
//! command synchron kernel --sync --adminp <m> --admins <y> --bugsarefree <sig>
//! command synchron integrity --check --bugsarefree <sig>
//! command synchron --close
//! ```
//!
//! `--<SUFFIX>`, `--<ROLE>`, and `--<USERNAME>` are carrier flags: the value
//! is embedded in the flag token itself (`--A` carries `A`) and the token
//! that follows is a free-form placeholder. The `--OFF <v>` pair is optional
//! and may appear anywhere between the prefix and the signature; it defaults
//! to factor `0`.

use thiserror::Error;

use crate::model::OffMode;

/// The reserved signature literal terminating every authorized ritual.
///
/// This is a static shared authorization token compared by equality, not a
/// security mechanism.
pub const SIGNATURE: &str = "bugsarefree";

/// Error type for ritual parsing. Always recoverable: callers re-prompt or
/// report and retry; parsing never panics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The token shape does not match any known command family.
    #[error("malformed ritual grammar: {0}")]
    MalformedGrammar(String),

    /// The trailing signature pair is absent or does not match the reserved
    /// literal.
    #[error("ritual is not terminated by the reserved signature")]
    MissingSignature,

    /// Too few tokens for the command family, or a flag with no value token.
    #[error("ritual token stream is too short for its command family")]
    OutOfRange,
}

/// A spawn request for a new branch module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnIntent {
    pub suffix: String,
    pub username: String,
    pub mode: OffMode,
}

/// A removal request for an existing branch module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveIntent {
    pub suffix: String,
    pub username: String,
    pub mode: OffMode,
}

/// An identity-shift request. The role token is validated against the fixed
/// enumeration by the orchestrator, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChangeIntent {
    pub role: String,
    pub username: String,
    pub mode: OffMode,
}

/// A kernel sync request updating the admin handles in the root config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSyncIntent {
    pub adminp: String,
    pub admins: String,
}

/// Fully validated result of parsing a ritual string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandIntent {
    Spawn(SpawnIntent),
    Remove(RemoveIntent),
    RoleChange(RoleChangeIntent),
    KernelSync(KernelSyncIntent),
    IntegrityCheck,
    Close,
}

/// Parse a raw ritual string into a typed intent.
///
/// Fail-closed: any violation yields a [`ParseError`] and no intent.
pub fn parse(raw: &str) -> Result<CommandIntent, ParseError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    if tokens.len() < 3 {
        return Err(ParseError::OutOfRange);
    }
    if tokens[0] != "command" || tokens[1] != "synchron" {
        return Err(ParseError::MalformedGrammar(
            "rituals must open with 'command synchron'".to_string(),
        ));
    }

    // Session close is the one unsigned ritual.
    if tokens[2] == "--close" {
        if tokens.len() != 3 {
            return Err(ParseError::MalformedGrammar(
                "'--close' takes no further tokens".to_string(),
            ));
        }
        return Ok(CommandIntent::Close);
    }

    let family = tokens[2];
    let verb = *tokens.get(3).ok_or(ParseError::OutOfRange)?;

    match (family, verb) {
        // 'branch' is the legacy spelling of 'module'.
        ("module", "--init") | ("branch", "--init") => {
            let fields = signed_fields(&tokens, 10)?;
            let (suffix, username) = fields.two_carriers()?;
            Ok(CommandIntent::Spawn(SpawnIntent { suffix, username, mode: fields.mode }))
        }
        ("remove", "--init") => {
            let fields = signed_fields(&tokens, 10)?;
            let (suffix, username) = fields.two_carriers()?;
            Ok(CommandIntent::Remove(RemoveIntent { suffix, username, mode: fields.mode }))
        }
        ("role", "--change") => {
            let fields = signed_fields(&tokens, 10)?;
            let (role, username) = fields.two_carriers()?;
            Ok(CommandIntent::RoleChange(RoleChangeIntent { role, username, mode: fields.mode }))
        }
        ("kernel", "--sync") => {
            let fields = signed_fields(&tokens, 10)?;
            fields.no_carriers()?;
            let adminp = fields.tagged("--adminp")?;
            let admins = fields.tagged("--admins")?;
            Ok(CommandIntent::KernelSync(KernelSyncIntent { adminp, admins }))
        }
        ("integrity", "--check") => {
            let fields = signed_fields(&tokens, 6)?;
            fields.no_carriers()?;
            Ok(CommandIntent::IntegrityCheck)
        }
        _ => Err(ParseError::MalformedGrammar(format!("unknown command family '{family} {verb}'"))),
    }
}

/// Flag/value fields extracted from the body of a signed ritual.
struct Fields {
    /// Values embedded in carrier flags, in order of appearance.
    carriers: Vec<String>,
    /// Resolved `--OFF` mode (default when absent).
    mode: OffMode,
    /// Values of the fixed `--adminp` / `--admins` tags.
    adminp: Option<String>,
    admins: Option<String>,
}

impl Fields {
    fn two_carriers(&self) -> Result<(String, String), ParseError> {
        match self.carriers.as_slice() {
            [first, second] => Ok((first.clone(), second.clone())),
            _ => Err(ParseError::MalformedGrammar(
                "expected exactly two carrier flags (value and username)".to_string(),
            )),
        }
    }

    fn no_carriers(&self) -> Result<(), ParseError> {
        if self.carriers.is_empty() {
            Ok(())
        } else {
            Err(ParseError::MalformedGrammar("unexpected carrier flags".to_string()))
        }
    }

    fn tagged(&self, tag: &str) -> Result<String, ParseError> {
        let value = match tag {
            "--adminp" => self.adminp.as_ref(),
            "--admins" => self.admins.as_ref(),
            _ => None,
        };
        value.cloned().ok_or_else(|| {
            ParseError::MalformedGrammar(format!("missing required '{tag}' pair"))
        })
    }
}

/// Validate the signature pair and walk the flag/value body of a signed
/// ritual.
///
/// The minimum token count is enforced *before* any positional access; the
/// final token must equal [`SIGNATURE`] and be tagged by `--bugsarefree`.
fn signed_fields(tokens: &[&str], min_len: usize) -> Result<Fields, ParseError> {
    if tokens.len() < min_len {
        return Err(ParseError::OutOfRange);
    }

    let len = tokens.len();
    if tokens[len - 2] != format!("--{SIGNATURE}") || tokens[len - 1] != SIGNATURE {
        return Err(ParseError::MissingSignature);
    }

    let body = &tokens[4..len - 2];
    if body.len() % 2 != 0 {
        // A flag with no value token counts as an out-of-range access.
        return Err(ParseError::OutOfRange);
    }

    let mut fields =
        Fields { carriers: Vec::new(), mode: OffMode::default(), adminp: None, admins: None };

    for pair in body.chunks_exact(2) {
        let (flag, value) = (pair[0], pair[1]);
        if !flag.starts_with("--") {
            return Err(ParseError::MalformedGrammar(format!(
                "expected a '--' flag, found '{flag}'"
            )));
        }
        match flag {
            "--OFF" => fields.mode = OffMode::from_token(value),
            "--adminp" => fields.adminp = Some(value.to_string()),
            "--admins" => fields.admins = Some(value.to_string()),
            _ => {
                let carrier = &flag[2..];
                if carrier.is_empty() {
                    return Err(ParseError::MalformedGrammar(
                        "carrier flag has no embedded value".to_string(),
                    ));
                }
                fields.carriers.push(carrier.to_string());
            }
        }
    }

    Ok(fields)
}
