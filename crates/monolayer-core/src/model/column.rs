use serde::{Deserialize, Serialize};

use super::value::HostValue;
use crate::catalog::ColumnType;

/// Identity generation mode for integer-family columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// `GENERATED ALWAYS AS IDENTITY` - user values are rejected
    Always,
    /// `GENERATED BY DEFAULT AS IDENTITY` - user values are accepted
    ByDefault,
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::Always => write!(f, "ALWAYS"),
            Identity::ByDefault => write!(f, "BY DEFAULT"),
        }
    }
}

/// Column default
///
/// A `Value` is formatted by the catalog according to the column type; an
/// `Expression` is raw SQL and passes through unmodified. Defaults read back
/// from the database arrive as expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColumnDefault {
    Value(HostValue),
    Expression(String),
}

/// A column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (declared or physical, depending on translation stage)
    pub name: String,

    pub data_type: ColumnType,

    /// Declared `NOT NULL`
    #[serde(default)]
    pub not_null: bool,

    #[serde(default)]
    pub default: Option<ColumnDefault>,

    #[serde(default)]
    pub identity: Option<Identity>,

    /// Previous name when this column is the target of a rename
    #[serde(default)]
    pub renamed_from: Option<String>,
}

impl Column {
    /// Create a nullable column without default
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            not_null: false,
            default: None,
            identity: None,
            renamed_from: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<HostValue>) -> Self {
        self.default = Some(ColumnDefault::Value(value.into()));
        self
    }

    pub fn with_default_expression(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(ColumnDefault::Expression(expression.into()));
        self
    }

    pub fn generated_always_as_identity(mut self) -> Self {
        self.identity = Some(Identity::Always);
        self
    }

    pub fn generated_by_default_as_identity(mut self) -> Self {
        self.identity = Some(Identity::ByDefault);
        self
    }

    pub fn renamed_from(mut self, previous: impl Into<String>) -> Self {
        self.renamed_from = Some(previous.into());
        self
    }

    /// Whether the stored column rejects NULL.
    ///
    /// Primary-key membership, identity and the serial family all imply
    /// `NOT NULL` regardless of the declared flag.
    pub fn effective_not_null(&self, in_primary_key: bool) -> bool {
        self.not_null || in_primary_key || self.identity.is_some() || self.data_type.is_serial()
    }

    /// Whether the column value is filled in by the database when omitted
    pub fn has_implicit_value(&self) -> bool {
        self.default.is_some() || self.identity.is_some() || self.data_type.is_serial()
    }
}
