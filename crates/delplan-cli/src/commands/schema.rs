use clap::{Arg, ArgMatches, Command};
use delplan::{ModelDocument, PlannerConfig};

use crate::commands::CommandResult;
use crate::error::{CliError, ExitStatus};

pub fn command() -> Command {
    Command::new("schema")
        .about("Print the JSON schema of a workspace file format")
        .arg(
            Arg::new("kind")
                .value_name("KIND")
                .value_parser(["model", "config"])
                .default_value("model"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let kind = matches
        .get_one::<String>("kind")
        .map(String::as_str)
        .unwrap_or("model");
    let schema = match kind {
        "model" => serde_json::to_value(schemars::schema_for!(ModelDocument))?,
        "config" => serde_json::to_value(schemars::schema_for!(PlannerConfig))?,
        other => {
            return Err(CliError::new(
                format!("unknown schema '{other}'"),
                ExitStatus::Usage,
            ));
        }
    };
    Ok(CommandResult::Schema {
        name: kind.to_string(),
        schema,
    })
}
