use clap::{ArgMatches, Command};

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;

pub fn command() -> Command {
    Command::new("config").about("Show the planner configuration in effect")
}

pub fn run(session: &CliSession, _matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let path = session.workspace_paths.config_file();
    Ok(CommandResult::Config {
        exists: path.is_file(),
        path: path.display().to_string(),
        config: session.config.clone(),
    })
}
