use std::env as stdenv;
use std::path::PathBuf;

use crate::config::ShellConfig;
use crate::vars::VarStore;

/// Mutable state of a shell session, passed to every operation that needs it.
///
/// - `vars`: shell variables used for `${NAME}` substitution and program lookup.
/// - `current_dir`: the working directory children are started in.
/// - `should_exit`: set by `quit`/`exit` to end the read loop.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: VarStore,
    pub current_dir: PathBuf,
    pub should_exit: bool,
}

impl Environment {
    /// Capture the process state: `PATH` is imported into the variable store and the working
    /// directory is taken from `std::env::current_dir()`.
    pub fn new(config: &ShellConfig) -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars: VarStore::from_process_env(config.max_vars),
            current_dir,
            should_exit: false,
        }
    }

    /// An environment with no variables, rooted at the process working directory.
    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        Self {
            vars: VarStore::new(),
            current_dir: stdenv::current_dir().unwrap(),
            should_exit: false,
        }
    }
}
