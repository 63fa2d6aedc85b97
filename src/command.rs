use std::io::{Read, Write};
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// A readable stream that can be handed to a child as its standard input.
///
/// Converting into [`Stdio`] consumes the handle: the descriptor moves into the child and the
/// shell keeps no copy of it. A blanket implementation covers files and pipe ends.
pub trait Stdin {
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Read + Into<Stdio>> Stdin for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// A writable stream that can be handed to a child as its standard output.
pub trait Stdout {
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// The shell's own terminal streams, shared with the child rather than moved.
pub struct Inherited;

impl Stdin for Inherited {
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::inherit()
    }
}

impl Stdout for Inherited {
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::inherit()
    }
}

/// Standard input and output for one command.
pub struct Io {
    pub stdin: Box<dyn Stdin>,
    pub stdout: Box<dyn Stdout>,
}

impl Io {
    pub fn new(stdin: Box<dyn Stdin>, stdout: Box<dyn Stdout>) -> Self {
        Self { stdin, stdout }
    }

    /// Both streams connected to the shell's terminal.
    pub fn inherited() -> Self {
        Self::new(Box::new(Inherited), Box::new(Inherited))
    }

    pub fn with_stdout(stdout: Box<dyn Stdout>) -> Self {
        Self::new(Box::new(Inherited), stdout)
    }
}

impl Default for Io {
    fn default() -> Self {
        Self::inherited()
    }
}

/// What a spawned child is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Awaited before the command returns (direct, redirect or pipeline stage).
    Foreground,
    /// Never awaited by the shell.
    Background,
}

/// Identity of a spawned child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
    pub program: String,
    pub role: Role,
}
