//! Splitting command lines into argument vectors.

use std::fmt;

use crate::error::ShellError;

/// A single line of user input, checked against the configured length bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    /// Accept `raw` with its trailing newline and surrounding whitespace removed.
    ///
    /// Lines over `limit` bytes are rejected rather than truncated.
    pub fn new(raw: &str, limit: usize) -> Result<Self, ShellError> {
        let line = raw.trim();
        if line.len() > limit {
            return Err(ShellError::LineTooLong { limit });
        }
        Ok(Self(line.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Argument vector of one command: program name first, then its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argv(Vec<String>);

impl Argv {
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove and return the last token.
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Argv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Split `line` on spaces. Runs of spaces never produce empty tokens; tabs and every other
/// character, quotes included, are ordinary token text.
pub fn tokenize(line: &str) -> Argv {
    Argv(
        line.split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
