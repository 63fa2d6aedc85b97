use crate::builtin::{BuiltinFactory, default_builtins};
use crate::command::{ExitCode, Io};
use crate::config::ShellConfig;
use crate::dispatch;
use crate::env::Environment;
use crate::error::ShellError;
use crate::exec;
use crate::lexer::{CommandLine, tokenize};
use crate::substitute::{check_references, substitute};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};

/// An interactive shell session.
///
/// Each line is first checked against the builtins (`cd`, `pwd`, `set`, `unset`, `quit`,
/// `exit`). Anything else has its `${NAME}` references substituted and is run as an external
/// command: directly, as a two-stage pipeline, with a redirection or in the background.
///
/// Example
/// ```
/// use xsh::{Shell, ShellConfig};
/// let mut sh = Shell::new(ShellConfig::default());
/// let mut out = Vec::new();
/// assert_eq!(sh.eval("set GREETING hello", Default::default(), &mut out), 0);
/// assert_eq!(sh.env().vars.get("GREETING"), Some("hello"));
/// ```
pub struct Shell {
    env: Environment,
    config: ShellConfig,
    builtins: Vec<Box<dyn BuiltinFactory>>,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            env: Environment::new(&config),
            config,
            builtins: default_builtins(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// `xsh<cwd>$ `
    pub fn prompt(&self) -> String {
        format!("{}{}$ ", self.config.prompt, self.env.current_dir.display())
    }

    /// Evaluate one line of input and return its status.
    ///
    /// Builtin output and background notices go to `out`; external commands use `io`. Errors are
    /// reported on standard error and never end the session.
    pub fn eval(&mut self, raw: &str, io: Io, out: &mut dyn Write) -> ExitCode {
        let line = match CommandLine::new(raw, self.config.max_line_len) {
            Ok(line) => line,
            Err(err) => return report(err),
        };
        if line.is_empty() {
            return 0;
        }

        let argv = tokenize(line.as_str());
        if let Some(name) = argv.program() {
            let args: Vec<&str> = argv.args().iter().map(String::as_str).collect();
            if let Some(cmd) = self
                .builtins
                .iter()
                .find_map(|factory| factory.try_create(name, &args))
            {
                return match cmd.run(out, &mut self.env) {
                    Ok(code) => code,
                    Err(err) => {
                        eprintln!("xsh: {err:#}");
                        1
                    }
                };
            }
        }

        match self.run_external(&line, io) {
            Ok(outcome) => {
                if let Some(handle) = outcome.started {
                    let notice = writeln!(out, "Started {} in the background.", handle.program);
                    if let Err(err) = notice {
                        log::warn!("cannot print background notice: {err}");
                    }
                }
                outcome.status
            }
            Err(err) => report(err),
        }
    }

    fn run_external(&self, line: &CommandLine, io: Io) -> Result<exec::Outcome, ShellError> {
        if let Err(err) = check_references(line.as_str()) {
            eprintln!("xsh: warning: {err}");
        }
        let expanded = substitute(line.as_str(), &self.env.vars);
        if expanded.trim().is_empty() {
            return Ok(exec::Outcome {
                status: 0,
                started: None,
            });
        }
        let strategy = dispatch::classify(&expanded)?;
        exec::execute(&strategy, &self.env, io)
    }

    /// Read-eval-print loop on the terminal until `quit`, `exit` or end of input.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    let status = self.eval(&line, Io::inherited(), &mut io::stdout());
                    log::debug!("status {status}");
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

fn report(err: ShellError) -> ExitCode {
    eprintln!("xsh: {err}");
    err.status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::fs::File;
    use std::time::{Duration, Instant};

    fn shell_in(dir: &std::path::Path) -> Shell {
        let mut sh = Shell::default();
        sh.env_mut().current_dir = dir.to_path_buf();
        sh
    }

    fn eval(sh: &mut Shell, line: &str) -> (ExitCode, String) {
        let mut out = Vec::new();
        let code = sh.eval(line, Io::inherited(), &mut out);
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_line_is_noop() {
        let mut sh = Shell::default();
        assert_eq!(eval(&mut sh, ""), (0, String::new()));
        assert_eq!(eval(&mut sh, "   \n"), (0, String::new()));
    }

    #[test]
    fn test_prompt_shows_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sh = shell_in(tmp.path());
        assert_eq!(sh.prompt(), format!("xsh{}$ ", tmp.path().display()));
    }

    #[test]
    fn test_variables_flow_into_external_commands() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sh = shell_in(tmp.path());

        assert_eq!(eval(&mut sh, "set WORD hi").0, 0);
        assert_eq!(eval(&mut sh, "printf ${WORD}${MISSING} > out.txt").0, 0);
        assert_eq!(fs::read_to_string(tmp.path().join("out.txt")).unwrap(), "hi");
    }

    #[test]
    fn test_builtins_are_not_substituted() {
        let mut sh = Shell::default();
        eval(&mut sh, "set A one");
        eval(&mut sh, "set B ${A}");
        assert_eq!(sh.env().vars.get("B"), Some("${A}"));
    }

    #[test]
    fn test_pipeline_through_shell() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sh = shell_in(tmp.path());
        let out_path = tmp.path().join("piped.txt");
        let io = Io::with_stdout(Box::new(File::create(&out_path).unwrap()));

        let code = sh.eval("printf one | tr a-z A-Z", io, &mut Vec::new());

        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(out_path).unwrap(), "ONE");
    }

    #[test]
    fn test_background_prints_started_notice() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sh = shell_in(tmp.path());

        let started = Instant::now();
        let (code, out) = eval(&mut sh, "sleep 3 &");

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(code, 0);
        assert_eq!(out, "Started sleep in the background.\n");
    }

    #[test]
    fn test_failures_do_not_end_session() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sh = shell_in(tmp.path());

        assert_eq!(eval(&mut sh, "no-such-program-4242").0, 127);
        assert_eq!(eval(&mut sh, "unset NEVER_SET").0, 1);
        assert_eq!(eval(&mut sh, "cat < absent.txt").0, 1);
        assert_eq!(eval(&mut sh, "| wc").0, 1);
        assert!(!sh.env().should_exit);
        assert_eq!(eval(&mut sh, "true").0, 0);
    }

    #[test]
    fn test_line_too_long_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sh = shell_in(tmp.path());
        let line = format!("printf {} > long.txt", "x".repeat(1100));

        assert_eq!(eval(&mut sh, &line).0, 1);
        assert!(!tmp.path().join("long.txt").exists());
    }

    #[test]
    fn test_malformed_reference_still_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sh = shell_in(tmp.path());

        assert_eq!(eval(&mut sh, "printf a${b > out.txt").0, 0);
        assert_eq!(fs::read_to_string(tmp.path().join("out.txt")).unwrap(), "a${b");
    }

    #[test]
    fn test_reference_to_nothing_is_noop() {
        let mut sh = Shell::default();
        assert_eq!(eval(&mut sh, "${NOTHING}"), (0, String::new()));
    }

    #[test]
    fn test_exit_stops_session() {
        let mut sh = Shell::default();
        assert_eq!(eval(&mut sh, "exit").0, 0);
        assert!(sh.env().should_exit);
    }
}
