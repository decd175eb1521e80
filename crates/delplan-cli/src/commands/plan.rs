use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use delplan::{ConfirmationOracle, DeletePlanner, FixedPrompter, PlanOutcome, Prompter};
use tracing::debug;

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;
use crate::prompt::TerminalPrompter;
use crate::util::{AssumeMode, validate_handles};

pub fn command() -> Command {
    Command::new("plan")
        .about("Compute the ordered set of entities a deletion would remove")
        .arg(
            Arg::new("handles")
                .value_name("HANDLE")
                .required(true)
                .num_args(1..)
                .help("Resource paths (starting with '/') or symbol handles to delete."),
        )
        .arg(
            Arg::new("subpackages")
                .long("subpackages")
                .action(ArgAction::SetTrue)
                .help("Also delete namespaces nested under selected namespaces."),
        )
        .arg(
            Arg::new("no-accessors")
                .long("no-accessors")
                .action(ArgAction::SetTrue)
                .help("Do not offer to delete getters and setters of selected fields."),
        )
        .arg(
            Arg::new("assume")
                .long("assume")
                .value_name("ask|yes|no")
                .default_value("ask")
                .help("Answer every question 'to all' instead of prompting."),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("FILE")
                .help("Model document to plan against. Defaults to .delplan/model.yaml."),
        )
}

pub fn run(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let handles: Vec<String> = matches
        .get_many::<String>("handles")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    validate_handles(&handles)?;

    let assume = AssumeMode::parse(
        matches
            .get_one::<String>("assume")
            .map(String::as_str)
            .unwrap_or("ask"),
    )?;

    let mut config = session.config.clone();
    if matches.get_flag("subpackages") {
        config.expand_subpackages = true;
    }
    if matches.get_flag("no-accessors") {
        config.suggest_accessor_deletion = false;
    }

    let model_path = matches.get_one::<String>("model").map(PathBuf::from);
    let model = session.load_model(model_path.as_deref())?;

    let terminal = TerminalPrompter;
    let fixed = assume.fixed_answer().map(FixedPrompter);
    let prompter: &dyn Prompter = match &fixed {
        Some(fixed) => fixed,
        None => &terminal,
    };

    let planner = DeletePlanner::new(&model, config);
    let mut oracle = ConfirmationOracle::new(prompter);
    debug!(handles = handles.len(), ?assume, "running planner");
    match planner.plan(&handles, &mut oracle)? {
        PlanOutcome::Planned(plan) => Ok(CommandResult::Plan {
            fingerprint: plan.fingerprint(),
            settings: plan.settings(),
            plan,
        }),
        PlanOutcome::Cancelled => Ok(CommandResult::PlanCancelled),
    }
}
