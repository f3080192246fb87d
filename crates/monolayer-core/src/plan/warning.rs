use serde::{Deserialize, Serialize};
use std::fmt;

/// Warning severity class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Breaks consumers bound to the previous shape or name
    BackwardIncompatible,
    /// Loses data
    Destructive,
    /// Takes locks that block reads or writes
    Blocking,
    /// Existing rows may violate the new rule
    MightFail,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::BackwardIncompatible => "backward incompatible",
            WarningKind::Destructive => "destructive",
            WarningKind::Blocking => "blocking",
            WarningKind::MightFail => "might fail",
        };
        write!(f, "{}", s)
    }
}

/// Non-fatal annotation on a migration operation
///
/// Warnings never block emission; they are surfaced for operator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Warning {
    TableRename {
        schema: String,
        from: String,
        to: String,
    },
    ColumnRename {
        schema: String,
        table: String,
        from: String,
        to: String,
    },
    TableDrop {
        schema: String,
        table: String,
    },
    ColumnDrop {
        schema: String,
        table: String,
        column: String,
    },
    ChangeColumnType {
        schema: String,
        table: String,
        column: String,
        from: String,
        to: String,
    },
    AddNonNullableColumn {
        schema: String,
        table: String,
        column: String,
    },
    ChangeColumnToNonNullable {
        schema: String,
        table: String,
        column: String,
    },
    AddPrimaryKeyToExistingTable {
        schema: String,
        table: String,
    },
    AddUniqueToExistingTable {
        schema: String,
        table: String,
    },
    AddForeignKeyToExistingTable {
        schema: String,
        table: String,
    },
}

impl Warning {
    pub fn kind(&self) -> WarningKind {
        match self {
            Warning::TableRename { .. } | Warning::ColumnRename { .. } => {
                WarningKind::BackwardIncompatible
            }
            Warning::TableDrop { .. } | Warning::ColumnDrop { .. } => WarningKind::Destructive,
            Warning::ChangeColumnType { .. } => WarningKind::Blocking,
            Warning::AddNonNullableColumn { .. }
            | Warning::ChangeColumnToNonNullable { .. }
            | Warning::AddPrimaryKeyToExistingTable { .. }
            | Warning::AddUniqueToExistingTable { .. }
            | Warning::AddForeignKeyToExistingTable { .. } => WarningKind::MightFail,
        }
    }

    /// Stable code, as serialized in the `code` tag
    pub fn code(&self) -> &'static str {
        match self {
            Warning::TableRename { .. } => "table_rename",
            Warning::ColumnRename { .. } => "column_rename",
            Warning::TableDrop { .. } => "table_drop",
            Warning::ColumnDrop { .. } => "column_drop",
            Warning::ChangeColumnType { .. } => "change_column_type",
            Warning::AddNonNullableColumn { .. } => "add_non_nullable_column",
            Warning::ChangeColumnToNonNullable { .. } => "change_column_to_non_nullable",
            Warning::AddPrimaryKeyToExistingTable { .. } => "add_primary_key_to_existing_table",
            Warning::AddUniqueToExistingTable { .. } => "add_unique_to_existing_table",
            Warning::AddForeignKeyToExistingTable { .. } => "add_foreign_key_to_existing_table",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TableRename { schema, from, to } => {
                write!(f, "table {}.{} renamed to {}", schema, from, to)
            }
            Warning::ColumnRename {
                schema,
                table,
                from,
                to,
            } => write!(f, "column {}.{}.{} renamed to {}", schema, table, from, to),
            Warning::TableDrop { schema, table } => write!(f, "table {}.{} dropped", schema, table),
            Warning::ColumnDrop {
                schema,
                table,
                column,
            } => write!(f, "column {}.{}.{} dropped", schema, table, column),
            Warning::ChangeColumnType {
                schema,
                table,
                column,
                from,
                to,
            } => write!(
                f,
                "column {}.{}.{} changes type from {} to {}",
                schema, table, column, from, to
            ),
            Warning::AddNonNullableColumn {
                schema,
                table,
                column,
            } => write!(
                f,
                "non-nullable column {}.{}.{} added without default",
                schema, table, column
            ),
            Warning::ChangeColumnToNonNullable {
                schema,
                table,
                column,
            } => write!(f, "column {}.{}.{} becomes non-nullable", schema, table, column),
            Warning::AddPrimaryKeyToExistingTable { schema, table } => {
                write!(f, "primary key added to existing table {}.{}", schema, table)
            }
            Warning::AddUniqueToExistingTable { schema, table } => {
                write!(f, "unique constraint added to existing table {}.{}", schema, table)
            }
            Warning::AddForeignKeyToExistingTable { schema, table } => {
                write!(f, "foreign key added to existing table {}.{}", schema, table)
            }
        }
    }
}
