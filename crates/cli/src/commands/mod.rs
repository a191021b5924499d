//! Subcommand implementations.

pub mod auth;
pub mod dashboard;

use hris_portal::{FlowError, PortalError, StorageError};
use secrecy::SecretString;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading a secret from stdin failed.
    #[error("Could not read {0} from stdin: {1}")]
    Stdin(&'static str, std::io::Error),

    /// Stdin closed before the expected line.
    #[error("Expected {0} on stdin")]
    MissingInput(&'static str),

    /// The command needs a signed-in session.
    #[error("Not signed in. Run `hris login` first.")]
    SignedOut,

    /// The stored role is not one the portal knows.
    #[error("Stored role {0:?} is not recognized")]
    UnknownRole(String),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Read `count` secrets, one per line, from stdin.
pub(crate) async fn read_secrets(
    what: &'static str,
    count: usize,
) -> Result<Vec<SecretString>, CommandError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut secrets = Vec::with_capacity(count);
    for _ in 0..count {
        let line = lines
            .next_line()
            .await
            .map_err(|e| CommandError::Stdin(what, e))?
            .ok_or(CommandError::MissingInput(what))?;
        secrets.push(SecretString::from(line.trim_end_matches('\r').to_owned()));
    }
    Ok(secrets)
}
