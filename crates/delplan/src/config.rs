use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Naming conventions used to derive accessor names from field names.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct AccessorConventions {
    /// Prefixes stripped from field names, e.g. `m_` or `f`.
    pub field_prefixes: Vec<String>,
    /// Suffixes stripped from field names, e.g. `_`.
    pub field_suffixes: Vec<String>,
}

impl AccessorConventions {
    /// Strips the first matching prefix and suffix. A strip that would leave nothing is skipped.
    pub fn base_name<'a>(&self, field: &'a str) -> &'a str {
        let mut name = field;
        if let Some(stripped) = self
            .field_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .find_map(|prefix| name.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty())
        {
            name = stripped;
        }
        if let Some(stripped) = self
            .field_suffixes
            .iter()
            .filter(|suffix| !suffix.is_empty())
            .find_map(|suffix| name.strip_suffix(suffix.as_str()))
            .filter(|rest| !rest.is_empty())
        {
            name = stripped;
        }
        name
    }
}

/// Planner behaviour switches, read from `.delplan/config.yaml`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Replace each selected namespace by itself plus all nested namespaces.
    pub expand_subpackages: bool,
    /// Offer to delete getters and setters of selected fields.
    pub suggest_accessor_deletion: bool,
    pub accessor_conventions: AccessorConventions,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            expand_subpackages: false,
            suggest_accessor_deletion: true,
            accessor_conventions: AccessorConventions::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, PlanError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|err| err.context(path.display()))
    }

    /// Human-readable description of the active switches.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![
            format!("expand subpackages: {}", yes_no(self.expand_subpackages)),
            format!(
                "suggest accessor deletion: {}",
                yes_no(self.suggest_accessor_deletion)
            ),
        ];
        if !self.accessor_conventions.field_prefixes.is_empty() {
            lines.push(format!(
                "field prefixes: {}",
                self.accessor_conventions.field_prefixes.join(", ")
            ));
        }
        if !self.accessor_conventions.field_suffixes.is_empty() {
            lines.push(format!(
                "field suffixes: {}",
                self.accessor_conventions.field_suffixes.join(", ")
            ));
        }
        lines
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = PlannerConfig::from_yaml_str("expand_subpackages: true\n").unwrap();
        assert!(config.expand_subpackages);
        assert!(config.suggest_accessor_deletion);
        assert_eq!(PlannerConfig::from_yaml_str("").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn base_name_strips_configured_affixes() {
        let conventions = AccessorConventions {
            field_prefixes: vec!["m_".into(), "f".into()],
            field_suffixes: vec!["_".into()],
        };
        assert_eq!(conventions.base_name("m_count_"), "count");
        assert_eq!(conventions.base_name("fName"), "Name");
        assert_eq!(conventions.base_name("f"), "f");
        assert_eq!(AccessorConventions::default().base_name("m_x"), "m_x");
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        assert_eq!(
            PlannerConfig::load_or_default(&path).unwrap(),
            PlannerConfig::default()
        );

        fs::write(&path, "suggest_accessor_deletion: false\n").unwrap();
        assert!(!PlannerConfig::load_or_default(&path).unwrap().suggest_accessor_deletion);
    }
}
