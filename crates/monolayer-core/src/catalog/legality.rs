//! Static legality rules for declared schemas
//!
//! Violations are configuration errors: fatal to the planning run and
//! reported with the table and column that need fixing.

use std::collections::BTreeSet;

use super::defaults::format_default;
use super::{ColumnType, NUMERIC_MAX_PRECISION, TIME_MAX_PRECISION};
use crate::errors::{PlanError, Result};
use crate::model::{Column, ConstraintKind, Schema, Table};

/// Check every table of a declared schema
pub fn check_schema(schema: &Schema) -> Result<()> {
    for table in &schema.tables {
        check_table(schema, table)?;
    }
    Ok(())
}

/// Check one table: its columns, then every column reference of its
/// constraints and indexes
pub fn check_table(schema: &Schema, table: &Table) -> Result<()> {
    for column in &table.columns {
        check_column(&table.name, column)?;
    }

    if let Some(pk) = &table.primary_key {
        check_columns(table, &pk.columns, &ConstraintKind::PrimaryKey.to_string())?;
    }
    for unique in &table.uniques {
        check_columns(table, &unique.columns, &ConstraintKind::Unique.to_string())?;
    }
    for fk in &table.foreign_keys {
        let object = ConstraintKind::ForeignKey.to_string();
        check_columns(table, &fk.columns, &object)?;
        if fk.columns.len() != fk.target_columns.len() {
            return Err(PlanError::ForeignKeyArity {
                table: table.name.clone(),
                columns: fk.columns.len(),
                target_columns: fk.target_columns.len(),
            });
        }
        let target = schema.find_table(&fk.target_table).ok_or_else(|| {
            PlanError::UnknownForeignKeyTarget {
                table: table.name.clone(),
                target_table: fk.target_table.clone(),
            }
        })?;
        check_columns(target, &fk.target_columns, &object)?;
    }
    for index in &table.indexes {
        check_columns(table, &index.columns, "index")?;
        for predicate in &index.predicates {
            check_columns(table, std::slice::from_ref(&predicate.column), "index")?;
        }
    }
    Ok(())
}

fn check_columns(table: &Table, columns: &[String], object: &str) -> Result<()> {
    if columns.is_empty() {
        return Err(PlanError::EmptyColumnList {
            table: table.name.clone(),
            object: object.to_string(),
        });
    }
    for column in columns {
        if !table.has_column(column) {
            return Err(PlanError::UnknownColumn {
                table: table.name.clone(),
                column: column.clone(),
                object: object.to_string(),
            });
        }
    }
    Ok(())
}

/// Check the static legality rules for one declared column
pub fn check_column(table: &str, column: &Column) -> Result<()> {
    let data_type = &column.data_type;

    if column.identity.is_some() {
        if !data_type.supports_identity() {
            return Err(PlanError::IdentityNotAllowed {
                table: table.to_string(),
                column: column.name.clone(),
                data_type: data_type.type_name(),
            });
        }
        if column.default.is_some() {
            return Err(PlanError::IdentityWithDefault {
                table: table.to_string(),
                column: column.name.clone(),
            });
        }
    }

    if data_type.is_serial() {
        let attribute = if column.default.is_some() {
            Some("default")
        } else if column.not_null {
            Some("not null")
        } else {
            None
        };
        if let Some(attribute) = attribute {
            return Err(PlanError::FixedByType {
                table: table.to_string(),
                column: column.name.clone(),
                data_type: data_type.type_name(),
                attribute: attribute.to_string(),
            });
        }
    }

    check_parameters(table, column)?;

    // Fails with InvalidDefault when the host value does not fit the type
    format_default(table, column)?;

    Ok(())
}

fn check_parameters(table: &str, column: &Column) -> Result<()> {
    let invalid = |reason: String| PlanError::InvalidTypeParameter {
        table: table.to_string(),
        column: column.name.clone(),
        reason,
    };
    let missing = |parameter: &str| PlanError::MissingTypeParameter {
        table: table.to_string(),
        column: column.name.clone(),
        parameter: parameter.to_string(),
    };

    match &column.data_type {
        ColumnType::Varchar { max_length } | ColumnType::Char { max_length } => {
            if *max_length == Some(0) {
                return Err(invalid("length must be at least 1".to_string()));
            }
        }
        ColumnType::Numeric { precision, scale } => match (precision, scale) {
            (None, Some(_)) => return Err(missing("precision")),
            (Some(p), _) if *p == 0 || *p > NUMERIC_MAX_PRECISION => {
                return Err(invalid(format!(
                    "precision {} must be between 1 and {}",
                    p, NUMERIC_MAX_PRECISION
                )));
            }
            (Some(p), Some(s)) if s > p => {
                return Err(invalid(format!(
                    "scale {} exceeds precision {}",
                    s, p
                )));
            }
            _ => {}
        },
        ColumnType::Time { precision }
        | ColumnType::TimeTz { precision }
        | ColumnType::Timestamp { precision }
        | ColumnType::TimestampTz { precision } => {
            if let Some(p) = precision {
                if *p > TIME_MAX_PRECISION {
                    return Err(invalid(format!(
                        "precision {} must be between 0 and {}",
                        p, TIME_MAX_PRECISION
                    )));
                }
            }
        }
        ColumnType::Enum { name, members } => {
            if name.trim().is_empty() {
                return Err(missing("name"));
            }
            if members.is_empty() {
                return Err(missing("members"));
            }
            let mut seen = BTreeSet::new();
            for member in members {
                if !seen.insert(member.as_str()) {
                    return Err(invalid(format!("duplicate enum member '{}'", member)));
                }
            }
        }
        _ => {}
    }
    Ok(())
}
