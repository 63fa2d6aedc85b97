use argh::FromArgs;
use std::io;
use std::process::ExitCode;
use xsh::command::Io;
use xsh::{Shell, ShellConfig};

#[derive(FromArgs)]
/// A small interactive shell with variables, pipes, redirection and background jobs.
struct Args {
    #[argh(option, short = 'c')]
    /// run this command line and exit with its status.
    command: Option<String>,

    #[argh(switch, short = 'v')]
    /// log debug information to standard error.
    verbose: bool,

    #[argh(option)]
    /// maximum number of shell variables (default 128, 0 for no limit).
    max_vars: Option<usize>,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = ShellConfig::default();
    if let Some(limit) = args.max_vars {
        config.max_vars = (limit > 0).then_some(limit);
    }
    let mut shell = Shell::new(config);

    if let Some(line) = args.command {
        let status = shell.eval(&line, Io::inherited(), &mut io::stdout());
        return ExitCode::from(u8::try_from(status).unwrap_or(1));
    }

    match shell.repl() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("xsh: {err}");
            ExitCode::FAILURE
        }
    }
}
