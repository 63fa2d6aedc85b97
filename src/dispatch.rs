//! Choosing how an external command line is run.
//!
//! Recognized forms, checked in this order with the first match winning:
//!
//! | Syntax            | Strategy   |
//! |-------------------|------------|
//! | `CMD1 \| CMD2`    | Pipeline   |
//! | `CMD > FILE`      | Redirect   |
//! | `CMD < FILE`      | Redirect   |
//! | `CMD &`           | Background |
//! | anything else     | Direct     |
//!
//! Combinations are not supported: a line matching several forms is handled by the first one
//! and the remaining operators become ordinary argument text.

use std::fmt;

use crate::error::ShellError;
use crate::lexer::{Argv, tokenize};

/// Direction of a redirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `>`: standard output goes to a created/truncated file.
    Output,
    /// `<`: standard input comes from an existing file.
    Input,
}

impl RedirectKind {
    pub fn symbol(self) -> char {
        match self {
            RedirectKind::Output => '>',
            RedirectKind::Input => '<',
        }
    }
}

/// One way of running an external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Direct(Argv),
    Pipeline { producer: Argv, consumer: Argv },
    Redirect {
        argv: Argv,
        kind: RedirectKind,
        target: String,
    },
    Background(Argv),
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Direct(_) => f.write_str("direct"),
            Strategy::Pipeline { .. } => f.write_str("pipeline"),
            Strategy::Redirect { kind, .. } => write!(f, "redirect '{}'", kind.symbol()),
            Strategy::Background(_) => f.write_str("background"),
        }
    }
}

/// Classify an already substituted command line.
pub fn classify(line: &str) -> Result<Strategy, ShellError> {
    let line = line.trim();

    if let Some((left, right)) = line.split_once('|') {
        let producer = command_argv(left)?;
        let consumer = command_argv(right)?;
        return Ok(Strategy::Pipeline { producer, consumer });
    }

    let redirect = if line.contains('>') {
        Some(RedirectKind::Output)
    } else if line.contains('<') {
        Some(RedirectKind::Input)
    } else {
        None
    };
    if let Some(kind) = redirect {
        return redirect_strategy(line, kind);
    }

    if let Some(command) = line.strip_suffix('&') {
        return Ok(Strategy::Background(command_argv(command)?));
    }

    Ok(Strategy::Direct(command_argv(line)?))
}

/// Split at the operator; the file name is the last token after it. Tokens between the operator
/// and the file name stay arguments of the command.
fn redirect_strategy(line: &str, kind: RedirectKind) -> Result<Strategy, ShellError> {
    let (command, rest) = line
        .split_once(kind.symbol())
        .ok_or(ShellError::MissingRedirectTarget(kind.symbol()))?;

    let mut trailing = tokenize(rest);
    let target = trailing
        .pop()
        .ok_or(ShellError::MissingRedirectTarget(kind.symbol()))?;

    let mut argv = command_argv(command)?;
    for token in trailing.as_slice() {
        argv.push(token.as_str());
    }
    Ok(Strategy::Redirect { argv, kind, target })
}

fn command_argv(text: &str) -> Result<Argv, ShellError> {
    let argv = tokenize(text);
    if argv.is_empty() {
        return Err(ShellError::EmptyCommand);
    }
    Ok(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(line: &str) -> Argv {
        tokenize(line)
    }

    #[test]
    fn plain_command_is_direct() {
        assert_eq!(classify("ls -l").unwrap(), Strategy::Direct(argv("ls -l")));
    }

    #[test]
    fn pipe_splits_at_first_bar() {
        assert_eq!(
            classify("printf abc | tr a-z A-Z").unwrap(),
            Strategy::Pipeline {
                producer: argv("printf abc"),
                consumer: argv("tr a-z A-Z"),
            }
        );
    }

    #[test]
    fn pipe_takes_precedence_over_redirect() {
        let strategy = classify("cat notes | sort > out.txt").unwrap();
        assert_eq!(
            strategy,
            Strategy::Pipeline {
                producer: argv("cat notes"),
                consumer: argv("sort > out.txt"),
            }
        );
    }

    #[test]
    fn second_pipe_is_argument_text() {
        let strategy = classify("a | b | c").unwrap();
        assert_eq!(
            strategy,
            Strategy::Pipeline {
                producer: argv("a"),
                consumer: argv("b | c"),
            }
        );
    }

    #[test]
    fn output_redirect_drops_operator_and_target() {
        assert_eq!(
            classify("echo hi > out.txt").unwrap(),
            Strategy::Redirect {
                argv: argv("echo hi"),
                kind: RedirectKind::Output,
                target: "out.txt".into(),
            }
        );
        assert_eq!(
            classify("echo hi >out.txt").unwrap(),
            Strategy::Redirect {
                argv: argv("echo hi"),
                kind: RedirectKind::Output,
                target: "out.txt".into(),
            }
        );
    }

    #[test]
    fn input_redirect() {
        assert_eq!(
            classify("sort < data.txt").unwrap(),
            Strategy::Redirect {
                argv: argv("sort"),
                kind: RedirectKind::Input,
                target: "data.txt".into(),
            }
        );
    }

    #[test]
    fn output_checked_before_input() {
        let strategy = classify("sort < in.txt > out.txt").unwrap();
        assert_eq!(
            strategy,
            Strategy::Redirect {
                argv: argv("sort < in.txt"),
                kind: RedirectKind::Output,
                target: "out.txt".into(),
            }
        );
    }

    #[test]
    fn target_is_last_token_after_operator() {
        let strategy = classify("grep x > -i notes.txt").unwrap();
        assert_eq!(
            strategy,
            Strategy::Redirect {
                argv: argv("grep x -i"),
                kind: RedirectKind::Output,
                target: "notes.txt".into(),
            }
        );
    }

    #[test]
    fn redirect_without_target_is_rejected() {
        assert!(matches!(
            classify("echo hi >"),
            Err(ShellError::MissingRedirectTarget('>'))
        ));
        assert!(matches!(
            classify("> out.txt"),
            Err(ShellError::EmptyCommand)
        ));
    }

    #[test]
    fn trailing_ampersand_is_background() {
        assert_eq!(
            classify("sleep 10 &").unwrap(),
            Strategy::Background(argv("sleep 10"))
        );
        assert_eq!(
            classify("sleep 10&").unwrap(),
            Strategy::Background(argv("sleep 10"))
        );
    }

    #[test]
    fn ampersand_elsewhere_is_direct() {
        assert_eq!(
            classify("echo a&b").unwrap(),
            Strategy::Direct(argv("echo a&b"))
        );
    }

    #[test]
    fn empty_sides_are_rejected() {
        assert!(matches!(classify("| wc"), Err(ShellError::EmptyCommand)));
        assert!(matches!(classify("ls |"), Err(ShellError::EmptyCommand)));
        assert!(matches!(classify("&"), Err(ShellError::EmptyCommand)));
        assert!(matches!(classify("   "), Err(ShellError::EmptyCommand)));
    }
}
