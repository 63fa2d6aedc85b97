//! A small interactive command shell.
//!
//! A command line goes through `${NAME}` substitution against a [`VarStore`], is split into an
//! argument vector on spaces and then run with one of four strategies chosen from its surface
//! syntax: directly, as a two-stage pipeline (`a | b`), with a redirection (`a > f`, `a < f`)
//! or in the background (`a &`).
//!
//! The main entry point is [`Shell`], which adds the builtins (`cd`, `pwd`, `set`, `unset`,
//! `quit`/`exit`) and the interactive read loop. The [`dispatch`] and [`exec`] modules can be
//! used on their own to classify and run an already expanded command line.

mod builtin;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod exec;
pub mod external;
mod interpreter;
pub mod lexer;
pub mod substitute;
pub mod vars;

pub use config::ShellConfig;
pub use error::ShellError;
pub use interpreter::Shell;
pub use vars::VarStore;
