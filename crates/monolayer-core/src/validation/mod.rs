//! Validation schema compiler
//!
//! Compiles a column declaration into a [`ColumnValidator`]: which input
//! representations the column accepts, the normalized shape it produces, and
//! whether a value must, may or must not be supplied.
//!
//! ## Presence Rules
//!
//! | Column | Accepted | Required | Nullable (input) |
//! |---|---|---|---|
//! | identity `ALWAYS` | no | no | no |
//! | default, serial or identity `BY DEFAULT` | yes | no | yes |
//! | not null, no default | yes | yes | no |
//! | nullable | yes | no | yes |
//!
//! Compilation is a pure function of the column; validators can be cached
//! per column.

pub mod coerce;

use serde::{Deserialize, Serialize};

use crate::catalog::{check_column, ColumnType};
use crate::errors::{Result, ValueError};
use crate::model::{Column, HostValue, Identity, Table};

pub use coerce::{coerce, safe_integer, MAX_SAFE_INTEGER};

/// Representation of a value on either side of a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    Boolean,
    /// `true/false/yes/no/on/off/1/0`
    BooleanText,
    Integer,
    /// Integral float with |x| ≤ 2^53 − 1
    SafeNumber,
    Float,
    Decimal,
    NumericText,
    Text,
    Bytes,
    /// `\x` followed by hex digits
    HexText,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    IsoText,
    Uuid,
    UuidText,
    Json,
    JsonText,
}

/// Input presence rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// Whether a value may be supplied at all
    pub accepted: bool,
    /// Whether a value must be supplied
    pub required: bool,
    /// Whether an explicit null is accepted
    pub nullable: bool,
}

/// Compiled validator for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValidator {
    pub field: String,
    pub data_type: ColumnType,
    pub input: Presence,
    /// Whether a stored value may be null
    pub output_nullable: bool,
    pub accepted_inputs: Vec<ValueShape>,
    pub output_shape: ValueShape,
}

/// Compile the validator for `column` of `table`.
///
/// # Errors
///
/// The column must satisfy the catalog legality rules; see
/// [`crate::catalog::check_column`].
pub fn compile_validator(table: &str, column: &Column, in_primary_key: bool) -> Result<ColumnValidator> {
    check_column(table, column)?;

    let not_null = column.effective_not_null(in_primary_key);
    let input = if column.identity == Some(Identity::Always) {
        Presence {
            accepted: false,
            required: false,
            nullable: false,
        }
    } else if column.has_implicit_value() {
        Presence {
            accepted: true,
            required: false,
            nullable: true,
        }
    } else {
        Presence {
            accepted: true,
            required: not_null,
            nullable: !not_null,
        }
    };

    let (accepted_inputs, output_shape) = shapes(&column.data_type);
    Ok(ColumnValidator {
        field: column.name.clone(),
        data_type: column.data_type.clone(),
        input,
        output_nullable: !not_null,
        accepted_inputs,
        output_shape,
    })
}

/// Compile validators for every column of `table`, in column order
///
/// # Errors
///
/// The first column that fails the catalog legality rules.
pub fn compile_table_validators(table: &Table) -> Result<Vec<ColumnValidator>> {
    table
        .columns
        .iter()
        .map(|c| compile_validator(&table.name, c, table.in_primary_key(&c.name)))
        .collect()
}

fn shapes(data_type: &ColumnType) -> (Vec<ValueShape>, ValueShape) {
    use ValueShape::*;
    match data_type {
        ColumnType::Boolean => (vec![Boolean, Integer, BooleanText], Boolean),
        ColumnType::Smallint
        | ColumnType::Integer
        | ColumnType::Bigint
        | ColumnType::Serial
        | ColumnType::Bigserial => (vec![Integer, SafeNumber, Decimal, NumericText], Integer),
        ColumnType::Real | ColumnType::DoublePrecision => {
            (vec![Float, Integer, Decimal, NumericText], Float)
        }
        ColumnType::Numeric { .. } => (vec![Decimal, Integer, Float, NumericText], Decimal),
        ColumnType::Text
        | ColumnType::Varchar { .. }
        | ColumnType::Char { .. }
        | ColumnType::Enum { .. } => (vec![Text], Text),
        ColumnType::Bytea => (vec![Bytes, HexText], Bytes),
        ColumnType::Date => (vec![Date, IsoText], Date),
        ColumnType::Time { .. } | ColumnType::TimeTz { .. } => (vec![Time, IsoText], Time),
        ColumnType::Timestamp { .. } => (vec![Timestamp, Date, IsoText], Timestamp),
        ColumnType::TimestampTz { .. } => {
            (vec![TimestampTz, Timestamp, Date, IsoText], TimestampTz)
        }
        ColumnType::Uuid => (vec![Uuid, UuidText], Uuid),
        ColumnType::Json | ColumnType::Jsonb => {
            (vec![Json, JsonText, Boolean, Integer, Float], Json)
        }
    }
}

impl ColumnValidator {
    /// Validate and normalize an application value for insertion.
    ///
    /// `None` means the value was omitted. Returns `Ok(None)` when an
    /// omission is allowed.
    pub fn parse_input(&self, value: Option<&HostValue>) -> std::result::Result<Option<HostValue>, ValueError> {
        if !self.input.accepted {
            return match value {
                None => Ok(None),
                Some(v) => Err(ValueError::NotAllowed {
                    field: self.field.clone(),
                    received: v.kind(),
                }),
            };
        }
        match value {
            None if self.input.required => Err(ValueError::Required {
                field: self.field.clone(),
            }),
            None => Ok(None),
            Some(HostValue::Null) if self.input.nullable => Ok(Some(HostValue::Null)),
            Some(HostValue::Null) => Err(ValueError::NotNullable {
                field: self.field.clone(),
            }),
            Some(v) => coerce(&self.field, &self.data_type, v).map(Some),
        }
    }

    /// Check a stored value read back from the column
    pub fn parse_output(&self, value: &HostValue) -> std::result::Result<HostValue, ValueError> {
        match value {
            HostValue::Null if self.output_nullable => Ok(HostValue::Null),
            HostValue::Null => Err(ValueError::NotNullable {
                field: self.field.clone(),
            }),
            v => coerce(&self.field, &self.data_type, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(column: Column) -> ColumnValidator {
        compile_validator("books", &column, false).unwrap()
    }

    #[test]
    fn test_presence_rules() {
        let v = validator(Column::new("id", ColumnType::Bigint).generated_always_as_identity());
        assert!(!v.input.accepted);
        assert!(!v.output_nullable);

        let v = validator(Column::new("id", ColumnType::Bigint).generated_by_default_as_identity());
        assert_eq!(
            v.input,
            Presence {
                accepted: true,
                required: false,
                nullable: true
            }
        );

        let v = validator(Column::new("pages", ColumnType::Integer).not_null().with_default(0));
        assert!(!v.input.required);
        assert!(v.input.nullable);
        assert!(!v.output_nullable);

        let v = validator(Column::new("title", ColumnType::Text).not_null());
        assert!(v.input.required);
        assert!(!v.input.nullable);
    }

    #[test]
    fn test_primary_key_membership_implies_required() {
        let v = compile_validator("books", &Column::new("id", ColumnType::Integer), true).unwrap();
        assert!(v.input.required);
        assert!(!v.output_nullable);
    }

    #[test]
    fn test_identity_always_rejects_values() {
        let v = validator(Column::new("id", ColumnType::Integer).generated_always_as_identity());
        assert_eq!(v.parse_input(None), Ok(None));
        assert_eq!(
            v.parse_input(Some(&HostValue::Integer(1))),
            Err(ValueError::NotAllowed {
                field: "id".into(),
                received: "integer"
            })
        );
    }

    #[test]
    fn test_bigint_shapes() {
        let v = validator(Column::new("n", ColumnType::Bigint));
        assert_eq!(
            v.accepted_inputs,
            vec![
                ValueShape::Integer,
                ValueShape::SafeNumber,
                ValueShape::Decimal,
                ValueShape::NumericText
            ]
        );
        assert_eq!(v.output_shape, ValueShape::Integer);
    }

    #[test]
    fn test_compile_rejects_illegal_column() {
        let err = compile_validator("books", &Column::new("id", ColumnType::Serial).not_null(), false)
            .unwrap_err();
        assert!(matches!(err, crate::errors::PlanError::FixedByType { .. }));
    }

    #[test]
    fn test_table_validators_follow_column_order() {
        let table = Table::new("books")
            .column(Column::new("id", ColumnType::Integer))
            .column(Column::new("title", ColumnType::Text))
            .primary_key(["id"]);
        let validators = compile_table_validators(&table).unwrap();
        let fields: Vec<&str> = validators.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "title"]);
        assert!(validators[0].input.required);
        assert!(!validators[1].input.required);
    }
}
