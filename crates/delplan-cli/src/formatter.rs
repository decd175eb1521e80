use std::process::ExitCode;

use delplan::OrderedPlan;
use serde_json::json;

use crate::commands::CommandResult;
use crate::error::CliError;

pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a `CommandResult` as text or a single JSON line and maps it to an exit code.
pub fn emit_result(result: CommandResult, format: OutputFormat) -> Result<ExitCode, CliError> {
    match format {
        OutputFormat::Text => print_text(&result)?,
        OutputFormat::Json => print_json(&result)?,
    };
    Ok(ExitCode::from(result.exit_status().code()))
}

fn print_text(result: &CommandResult) -> Result<(), CliError> {
    match result {
        CommandResult::Plan {
            plan,
            fingerprint,
            settings,
        } => {
            for line in settings {
                println!("{line}");
            }
            print_plan(plan);
            println!("fingerprint: {fingerprint}");
        }
        CommandResult::PlanCancelled => {
            println!("Planning cancelled; nothing will be deleted.");
        }
        CommandResult::Check {
            applicable,
            has_subpackages,
            unknown,
        } => {
            if *applicable {
                println!("Selection can be deleted.");
                if *has_subpackages {
                    println!("Selected namespaces have subpackages.");
                }
            } else if unknown.is_empty() {
                println!("Selection cannot be deleted.");
            } else {
                println!("Selection cannot be deleted; unknown handles:");
                for handle in unknown {
                    println!("  - {handle}");
                }
            }
        }
        CommandResult::Schema { schema, .. } => {
            println!("{}", serde_json::to_string_pretty(schema)?);
        }
        CommandResult::Config {
            path,
            exists,
            config,
        } => {
            if *exists {
                println!("# {path}");
            } else {
                println!("# {path} (not found, using defaults)");
            }
            print!("{}", serde_yaml::to_string(config)?);
        }
    }
    Ok(())
}

fn print_plan(plan: &OrderedPlan) {
    if plan.is_empty() {
        println!("Nothing to delete.");
        return;
    }
    if !plan.resources.is_empty() {
        println!("Resources:");
        for resource in &plan.resources {
            println!("  [{}] {}", resource.kind.label(), resource.path);
        }
    }
    if !plan.elements.is_empty() {
        println!("Elements:");
        for element in &plan.elements {
            println!("  [{}] {}", element.kind.label(), element.id);
        }
    }
}

fn print_json(result: &CommandResult) -> Result<(), CliError> {
    let payload = json!(result);
    println!("{payload}");
    Ok(())
}
