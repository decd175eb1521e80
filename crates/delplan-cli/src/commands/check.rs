use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command};
use delplan::{DeletePlanner, ModelResolver};

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;
use crate::util::validate_handles;

pub fn command() -> Command {
    Command::new("check")
        .about("Report unknown handles and whether selected namespaces have subpackages")
        .arg(
            Arg::new("handles")
                .value_name("HANDLE")
                .required(true)
                .num_args(1..),
        )
        .arg(Arg::new("model").long("model").value_name("FILE"))
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let handles: Vec<String> = matches
        .get_many::<String>("handles")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    validate_handles(&handles)?;

    let model_path = matches.get_one::<String>("model").map(PathBuf::from);
    let model = session.load_model(model_path.as_deref())?;

    let unknown: Vec<String> = handles
        .iter()
        .filter(|handle| model.classify(handle).is_none())
        .cloned()
        .collect();

    let planner = DeletePlanner::new(&model, session.config.clone());
    let applicable = planner.is_applicable(&handles);
    let has_subpackages = if applicable {
        planner.has_subpackages_to_delete(&handles)?
    } else {
        false
    };

    Ok(CommandResult::Check {
        applicable,
        has_subpackages,
        unknown,
    })
}
