use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::{Child, Command, ExitStatus};

use crate::command::{ExitCode, Io, ProcessHandle, Role};
use crate::env::Environment;
use crate::error::ShellError;
use crate::lexer::Argv;

/// A program invocation, resolved and ready to be launched as a child process.
#[derive(Debug)]
pub struct ExternalCommand {
    program: String,
    path: PathBuf,
    args: Vec<String>,
    current_dir: PathBuf,
}

impl ExternalCommand {
    /// Resolve `argv[0]` against the shell's `PATH` variable.
    ///
    /// Fails with [`ShellError::Exec`] when no such program exists; nothing is spawned then.
    pub fn resolve(argv: &Argv, env: &Environment) -> Result<Self, ShellError> {
        let program = argv.program().ok_or(ShellError::EmptyCommand)?;
        let candidate = Path::new(program);
        let search_paths = env.vars.get("PATH");
        let path = match find_command_path(
            OsStr::new(search_paths.unwrap_or("")),
            candidate,
            &env.current_dir,
        ) {
            Some(found) => found.into_owned(),
            // Without PATH in the store a bare name is left to the OS lookup.
            None if search_paths.is_none() && is_bare_name(candidate) => PathBuf::from(program),
            None => {
                return Err(ShellError::Exec {
                    program: program.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "command not found"),
                });
            }
        };
        Ok(Self {
            program: program.to_string(),
            path,
            args: argv.args().to_vec(),
            current_dir: env.current_dir.clone(),
        })
    }

    /// Launch the child with `io` moved into its standard input and output.
    ///
    /// The [`Command`] is dropped before returning, so the shell holds no copy of a descriptor
    /// that was handed to the child.
    pub fn spawn(&self, io: Io, role: Role) -> Result<(Child, ProcessHandle), ShellError> {
        let mut cmd = Command::new(&self.path);
        cmd.args(&self.args)
            .current_dir(&self.current_dir)
            .stdin(io.stdin.stdio())
            .stdout(io.stdout.stdio());
        log::debug!("launching {} from {}", self.program, self.path.display());
        let child = cmd.spawn().map_err(|source| self.launch_error(source))?;
        drop(cmd);

        let handle = ProcessHandle {
            pid: child.id(),
            program: self.program.clone(),
            role,
        };
        log::debug!("spawned {} ({:?}) as pid {}", self.program, role, handle.pid);
        Ok((child, handle))
    }

    fn launch_error(&self, source: io::Error) -> ShellError {
        let program = self.program.clone();
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                ShellError::Exec { program, source }
            }
            _ if source.raw_os_error() == Some(ENOEXEC) => ShellError::Exec { program, source },
            _ => ShellError::Spawn { program, source },
        }
    }
}

// ENOEXEC on Linux and the BSDs.
const ENOEXEC: i32 = 8;

/// Block until `child` exits and translate its status.
pub fn wait_child(child: &mut Child, handle: &ProcessHandle) -> Result<ExitCode, ShellError> {
    let status = child.wait().map_err(|source| ShellError::Wait {
        program: handle.program.clone(),
        source,
    })?;
    let code = exit_code(status);
    log::debug!("pid {} ({}) exited with {}", handle.pid, handle.program, code);
    Ok(code)
}

pub fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// - Absolute path: returned if it exists.
/// - Anything containing a separator (`bin/tool`, `./tool`): looked up relative to `cwd`.
/// - Single component: searched in each directory of `search_paths`, first executable match
///   wins. A non-executable file of that name is skipped.
/// - Empty path: `None`.
pub fn find_command_path<'a>(
    search_paths: &OsStr,
    path: &'a Path,
    cwd: &Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    if path.as_os_str().is_empty() {
        return None;
    }
    if is_bare_name(path) {
        return find_in_path(search_paths, path.as_os_str()).map(Cow::Owned);
    }
    let joined = cwd.join(path);
    joined.exists().then_some(Cow::Owned(joined))
}

fn is_bare_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
