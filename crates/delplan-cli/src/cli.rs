use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::commands;
use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};
use crate::formatter::{OutputFormat, emit_result};
use crate::util::Verbosity;

const NAME: &str = "delplan";

pub fn run() -> ExitCode {
    init_tracing();
    match run_cli(std::env::args()) {
        Ok(code) => code,
        Err(err) => {
            err.print();
            err.exit_code()
        }
    }
}

/// Parses arguments, resolves the workspace and dispatches to the selected command.
/// Returns a `sysexits`-compatible `ExitCode`.
pub fn run_cli<I, S>(args: I) -> Result<ExitCode, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let command = build_cli();
    let matches = command.try_get_matches_from(args)?;

    let verbosity = Verbosity {
        json: matches.get_flag("json"),
        verbose: matches.get_flag("verbose"),
    };
    let output = if verbosity.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Schemas describe the file formats and need no workspace.
    if let Some(("schema", sub)) = matches.subcommand() {
        let result = commands::schema::run(sub)?;
        return emit_result(result, output);
    }

    let workspace_override = matches.get_one::<String>("workspace").cloned();
    let session = CliSession::bootstrap(workspace_override, verbosity)?;
    if session.verbosity.verbose {
        tracing::info!(
            workspace = %session.workspace_paths.root().display(),
            model = %session.workspace_paths.model_file().display(),
            config = %session.workspace_paths.config_file().display(),
            "resolved workspace context"
        );
    }

    let result = dispatch(&session, &matches)?;
    emit_result(result, output)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    Command::new(NAME)
        .about("Plans hierarchical deletions over a workspace model")
        .arg(
            Arg::new("workspace")
                .long("workspace")
                .value_name("PATH")
                .global(true)
                .help("Workspace root. Defaults to the nearest ancestor with a .delplan folder."),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit JSON instead of human-readable text."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log the resolved workspace paths."),
        )
        .subcommand_required(true)
        .subcommand(commands::plan::command())
        .subcommand(commands::check::command())
        .subcommand(commands::config::command())
        .subcommand(commands::schema::command())
}

fn dispatch(
    session: &CliSession,
    matches: &ArgMatches,
) -> Result<commands::CommandResult, CliError> {
    match matches.subcommand() {
        Some(("plan", sub)) => commands::plan::run(session, sub),
        Some(("check", sub)) => commands::check::run(session, sub),
        Some(("config", sub)) => commands::config::run(session, sub),
        _ => Err(CliError::new("missing command", ExitStatus::Usage)),
    }
}
