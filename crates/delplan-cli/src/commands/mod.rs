use delplan::{OrderedPlan, PlannerConfig};
use serde::Serialize;

use crate::error::ExitStatus;

pub mod check;
pub mod config;
pub mod plan;
pub mod schema;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    Plan {
        plan: OrderedPlan,
        fingerprint: String,
        settings: Vec<String>,
    },
    PlanCancelled,
    Check {
        applicable: bool,
        has_subpackages: bool,
        unknown: Vec<String>,
    },
    Schema {
        name: String,
        schema: serde_json::Value,
    },
    Config {
        path: String,
        exists: bool,
        config: PlannerConfig,
    },
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CommandResult::PlanCancelled => ExitStatus::Cancelled,
            CommandResult::Check { applicable, .. } if !applicable => ExitStatus::Data,
            _ => ExitStatus::Ok,
        }
    }
}
