//! The four ways of running an external command: direct, pipeline, redirect and background.
//!
//! Every descriptor handed to a child (pipe end or opened file) is moved into that child's
//! [`Command`](std::process::Command) and released by the shell as soon as the child is
//! launched, on success and error paths alike.

use std::fs::File;
use std::path::Path;

use crate::command::{ExitCode, Io, ProcessHandle, Role};
use crate::dispatch::{RedirectKind, Strategy};
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::{ExternalCommand, wait_child};
use crate::lexer::Argv;

/// Result of running one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: ExitCode,
    /// Set for background commands: the child that was started and left running.
    pub started: Option<ProcessHandle>,
}

impl Outcome {
    fn finished(status: ExitCode) -> Self {
        Self {
            status,
            started: None,
        }
    }
}

/// Exit codes of both pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStatus {
    pub producer: ExitCode,
    pub consumer: ExitCode,
}

impl PipelineStatus {
    /// The consumer's code, unless it succeeded and the producer did not.
    pub fn status(&self) -> ExitCode {
        if self.consumer != 0 {
            self.consumer
        } else {
            self.producer
        }
    }
}

/// Run `strategy` with `io` as the standard streams of the command as a whole.
pub fn execute(strategy: &Strategy, env: &Environment, io: Io) -> Result<Outcome, ShellError> {
    log::debug!("running {strategy} command");
    match strategy {
        Strategy::Direct(argv) => run_direct(argv, env, io).map(Outcome::finished),
        Strategy::Pipeline { producer, consumer } => {
            run_pipeline(producer, consumer, env, io)
                .map(|status| Outcome::finished(status.status()))
        }
        Strategy::Redirect { argv, kind, target } => {
            run_redirect(argv, *kind, target, env, io).map(Outcome::finished)
        }
        Strategy::Background(argv) => run_background(argv, env, io).map(|handle| Outcome {
            status: 0,
            started: Some(handle),
        }),
    }
}

/// Spawn one child and wait for it.
pub fn run_direct(argv: &Argv, env: &Environment, io: Io) -> Result<ExitCode, ShellError> {
    log::debug!("direct: {argv}");
    let command = ExternalCommand::resolve(argv, env)?;
    let (mut child, handle) = command.spawn(io, Role::Foreground)?;
    wait_child(&mut child, &handle)
}

/// Connect `producer`'s standard output to `consumer`'s standard input and wait for both.
///
/// Both programs are resolved before the pipe exists, so an unknown name spawns nothing. If the
/// consumer cannot be launched after the producer was, the read end is already closed and the
/// producer is still awaited before the error is returned.
pub fn run_pipeline(
    producer: &Argv,
    consumer: &Argv,
    env: &Environment,
    io: Io,
) -> Result<PipelineStatus, ShellError> {
    let producer = ExternalCommand::resolve(producer, env)?;
    let consumer = ExternalCommand::resolve(consumer, env)?;

    let (reader, writer) = os_pipe::pipe().map_err(ShellError::PipeCreation)?;
    let Io { stdin, stdout } = io;

    let (mut first, first_handle) =
        producer.spawn(Io::new(stdin, Box::new(writer)), Role::Foreground)?;
    let (mut second, second_handle) =
        match consumer.spawn(Io::new(Box::new(reader), stdout), Role::Foreground) {
            Ok(spawned) => spawned,
            Err(err) => {
                if let Err(wait_err) = wait_child(&mut first, &first_handle) {
                    log::warn!("{wait_err}");
                }
                return Err(err);
            }
        };

    // Await both regardless of which one exits first or fails to be awaited.
    let producer_status = wait_child(&mut first, &first_handle);
    let consumer_status = wait_child(&mut second, &second_handle);
    Ok(PipelineStatus {
        producer: producer_status?,
        consumer: consumer_status?,
    })
}

/// Open `target`, bind it to the command's standard output (`>`) or input (`<`) and wait.
///
/// The file is opened before anything is spawned; if that fails no child is created.
pub fn run_redirect(
    argv: &Argv,
    kind: RedirectKind,
    target: &str,
    env: &Environment,
    io: Io,
) -> Result<ExitCode, ShellError> {
    let path = env.current_dir.join(target);
    let file = open_target(&path, kind)?;
    log::debug!("redirect '{}' bound to {}", kind.symbol(), path.display());

    let command = ExternalCommand::resolve(argv, env)?;
    let io = match kind {
        RedirectKind::Output => Io::new(io.stdin, Box::new(file)),
        RedirectKind::Input => Io::new(Box::new(file), io.stdout),
    };
    let (mut child, handle) = command.spawn(io, Role::Foreground)?;
    wait_child(&mut child, &handle)
}

fn open_target(path: &Path, kind: RedirectKind) -> Result<File, ShellError> {
    let opened = match kind {
        RedirectKind::Output => File::create(path),
        RedirectKind::Input => File::open(path),
    };
    opened.map_err(|source| ShellError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Spawn one child and return without waiting for it.
///
/// The child is not tracked or reaped afterwards: once it exits it stays in the process table
/// until the shell itself exits.
pub fn run_background(argv: &Argv, env: &Environment, io: Io) -> Result<ProcessHandle, ShellError> {
    let command = ExternalCommand::resolve(argv, env)?;
    let (child, handle) = command.spawn(io, Role::Background)?;
    drop(child);
    log::info!("{} running in background as pid {}", handle.program, handle.pid);
    Ok(handle)
}
