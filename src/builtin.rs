use crate::command::ExitCode;
use crate::env::Environment;
use anyhow::{Context, Result, bail};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and run in-process, before any
/// `${NAME}` substitution takes place.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Names the command answers to, e.g. `["quit", "exit"]`.
    fn names() -> &'static [&'static str];

    /// Return value follows shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// A parsed builtin ready to run.
pub(crate) trait Runnable {
    fn run(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> Runnable for T {
    fn run(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        T::execute(*self, stdout, env)
    }
}

/// Output of `--help` or of an argument parse failure.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl Runnable for InvalidArgs {
    fn run(self: Box<Self>, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", self.output.trim_end())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

/// Creates a builtin from a command name and its arguments.
pub(crate) trait BuiltinFactory {
    /// `None` when `name` is not this factory's command.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn Runnable>>;
}

pub(crate) struct Factory<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand + 'static> BuiltinFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn Runnable>> {
        if !T::names().contains(&name) {
            return None;
        }
        Some(match T::from_args(&[name], args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

/// The builtins every shell session has.
pub(crate) fn default_builtins() -> Vec<Box<dyn BuiltinFactory>> {
    vec![
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Pwd>::default()),
        Box::new(Factory::<Set>::default()),
        Box::new(Factory::<Unset>::default()),
        Box::new(Factory::<Quit>::default()),
    ]
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Pwd {
    fn names() -> &'static [&'static str] {
        &["pwd"]
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir.to_string_lossy())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn names() -> &'static [&'static str] {
        &["cd"]
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => bail!("Usage: cd <directory>"),
        };

        let new_dir = env.current_dir.join(target);
        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: {}", new_dir.display()))?;
        if !canonical.is_dir() {
            bail!("cd: {}: not a directory", canonical.display());
        }

        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Set a shell variable.
pub struct Set {
    #[argh(positional, greedy)]
    /// variable name followed by its value; several value words are joined with single spaces.
    pub args: Vec<String>,
}

impl BuiltinCommand for Set {
    fn names() -> &'static [&'static str] {
        &["set"]
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some((name, value)) = self.args.split_first().filter(|(_, value)| !value.is_empty())
        else {
            bail!("Usage: set <variable> <value>");
        };
        env.vars.set(name.as_str(), value.join(" "))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Remove a shell variable.
pub struct Unset {
    #[argh(positional)]
    /// variable name.
    pub name: Option<String>,
}

impl BuiltinCommand for Unset {
    fn names() -> &'static [&'static str] {
        &["unset"]
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some(name) = self.name else {
            bail!("Usage: unset <variable>");
        };
        env.vars.unset(&name)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Leave the shell.
pub struct Quit {}

impl BuiltinCommand for Quit {
    fn names() -> &'static [&'static str] {
        &["quit", "exit"]
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}
