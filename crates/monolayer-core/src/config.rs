//! Planning configuration
//!
//! Constructed once per planning run and passed to [`crate::plan_changeset`].

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// How declared identifiers map to physical ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierCase {
    /// Translate to snake_case
    #[default]
    SnakeCase,
    /// Use declared identifiers as-is
    Preserve,
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_validate_declarations() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfig {
    /// Database schema name, reported in warning payloads
    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default)]
    pub identifier_case: IdentifierCase,

    /// Run catalog legality checks on the declared schema before diffing
    #[serde(default = "default_validate_declarations")]
    pub validate_declarations: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            identifier_case: IdentifierCase::default(),
            validate_declarations: default_validate_declarations(),
        }
    }
}

impl PlanConfig {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Self::default()
        }
    }

    pub fn with_identifier_case(mut self, case: IdentifierCase) -> Self {
        self.identifier_case = case;
        self
    }

    pub fn without_declaration_checks(mut self) -> Self {
        self.validate_declarations = false;
        self
    }

    /// Parse a TOML fragment; unknown keys are rejected
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
