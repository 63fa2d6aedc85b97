use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::command::ExitCode;

/// Errors raised by the command-execution core.
///
/// None of these end the shell: the current command is abandoned, a diagnostic is printed and
/// the read loop carries on.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The operating system refused to create a child process.
    #[error("{program}: cannot create process: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The target program could not be launched (not found, not executable).
    #[error("{program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Waiting for an already running child failed.
    #[error("{program}: cannot wait for process: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot create pipe: {0}")]
    PipeCreation(#[source] io::Error),

    /// A redirection target could not be opened.
    #[error("{}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("too many variables (limit is {limit})")]
    CapacityExceeded { limit: usize },

    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// A `${` marker with no closing brace. Substitution skips it and carries on.
    #[error("unterminated variable reference at byte {offset}")]
    MalformedReference { offset: usize },

    #[error("command line longer than {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("empty command")]
    EmptyCommand,

    #[error("missing file name after '{0}'")]
    MissingRedirectTarget(char),
}

impl ShellError {
    /// Exit status reported to the caller when a command is abandoned with this error.
    pub fn status(&self) -> ExitCode {
        match self {
            ShellError::Exec { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => 127,
                _ => 126,
            },
            _ => 1,
        }
    }
}
