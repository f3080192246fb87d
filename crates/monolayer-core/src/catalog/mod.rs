//! Column type catalog
//!
//! Pure lookups over the fixed set of column types: the canonical type name,
//! default-value formatting (see [`defaults`]) and the static legality rules
//! a declared column must satisfy before it can be planned.

pub mod defaults;
pub mod legality;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use defaults::{format_default, format_value, normalize_boolean};
pub use legality::{check_column, check_schema};

/// Highest precision Postgres accepts for `numeric(p, s)`
pub const NUMERIC_MAX_PRECISION: u32 = 1000;

/// Highest fractional-seconds precision for time and timestamp types
pub const TIME_MAX_PRECISION: u32 = 6;

/// Logical column type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    Text,
    Bytea,
    Date,
    DoublePrecision,
    Real,
    Smallint,
    Integer,
    Bigint,
    Json,
    Jsonb,
    Numeric {
        #[serde(default)]
        precision: Option<u32>,
        #[serde(default)]
        scale: Option<u32>,
    },
    Uuid,
    Varchar {
        #[serde(default)]
        max_length: Option<u32>,
    },
    Char {
        #[serde(default)]
        max_length: Option<u32>,
    },
    Time {
        #[serde(default)]
        precision: Option<u32>,
    },
    TimeTz {
        #[serde(default)]
        precision: Option<u32>,
    },
    Timestamp {
        #[serde(default)]
        precision: Option<u32>,
    },
    TimestampTz {
        #[serde(default)]
        precision: Option<u32>,
    },
    Enum {
        name: String,
        members: Vec<String>,
    },
    Serial,
    Bigserial,
}

impl ColumnType {
    pub fn numeric(precision: u32, scale: u32) -> Self {
        ColumnType::Numeric {
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    pub fn varchar(max_length: u32) -> Self {
        ColumnType::Varchar {
            max_length: Some(max_length),
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnType::Enum {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical type name including parametrization
    pub fn type_name(&self) -> String {
        match self {
            ColumnType::Boolean => "boolean".to_string(),
            ColumnType::Text => "text".to_string(),
            ColumnType::Bytea => "bytea".to_string(),
            ColumnType::Date => "date".to_string(),
            ColumnType::DoublePrecision => "double precision".to_string(),
            ColumnType::Real => "real".to_string(),
            ColumnType::Smallint => "smallint".to_string(),
            ColumnType::Integer => "integer".to_string(),
            ColumnType::Bigint => "bigint".to_string(),
            ColumnType::Json => "json".to_string(),
            ColumnType::Jsonb => "jsonb".to_string(),
            ColumnType::Numeric { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("numeric({}, {})", p, s),
                (Some(p), None) => format!("numeric({})", p),
                _ => "numeric".to_string(),
            },
            ColumnType::Uuid => "uuid".to_string(),
            ColumnType::Varchar { max_length } => parametrized("varchar", *max_length),
            ColumnType::Char { max_length } => parametrized("char", *max_length),
            ColumnType::Time { precision } => parametrized("time", *precision),
            ColumnType::TimeTz { precision } => {
                format!("{} with time zone", parametrized("time", *precision))
            }
            ColumnType::Timestamp { precision } => parametrized("timestamp", *precision),
            ColumnType::TimestampTz { precision } => {
                format!("{} with time zone", parametrized("timestamp", *precision))
            }
            ColumnType::Enum { name, .. } => name.clone(),
            ColumnType::Serial => "serial".to_string(),
            ColumnType::Bigserial => "bigserial".to_string(),
        }
    }

    /// Serial family: value, default and not-null are fixed by the type
    pub fn is_serial(&self) -> bool {
        matches!(self, ColumnType::Serial | ColumnType::Bigserial)
    }

    /// Types that may be declared `GENERATED ... AS IDENTITY`
    pub fn supports_identity(&self) -> bool {
        matches!(
            self,
            ColumnType::Smallint | ColumnType::Integer | ColumnType::Bigint
        )
    }

    /// Types whose defaults are emitted as bare numbers
    pub fn emits_bare_number(&self) -> bool {
        matches!(
            self,
            ColumnType::Smallint | ColumnType::Integer | ColumnType::Serial
        )
    }

    /// Inclusive value range of the integer family
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        match self {
            ColumnType::Smallint => Some((i16::MIN.into(), i16::MAX.into())),
            ColumnType::Integer | ColumnType::Serial => Some((i32::MIN.into(), i32::MAX.into())),
            ColumnType::Bigint | ColumnType::Bigserial => Some((i64::MIN.into(), i64::MAX.into())),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

fn parametrized(base: &str, param: Option<u32>) -> String {
    match param {
        Some(p) => format!("{}({})", base, p),
        None => base.to_string(),
    }
}
