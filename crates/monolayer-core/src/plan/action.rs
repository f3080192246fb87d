//! Executable steps of a migration operation.
//!
//! Actions are opaque to the planner beyond their ordering; the executor
//! renders them. Every action has an exact structural inverse, which is how
//! down lists are derived.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::format_default;
use crate::errors::Result;
use crate::model::{Column, Constraint, Identity, Index};

/// Column as it is physically created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    /// Canonical type name
    pub data_type: String,
    pub not_null: bool,
    /// Formatted default text
    pub default: Option<String>,
    pub identity: Option<Identity>,
}

impl ColumnDefinition {
    /// Physical definition of `column` in `table`
    pub fn from_column(table: &str, column: &Column, in_primary_key: bool) -> Result<Self> {
        Ok(Self {
            name: column.name.clone(),
            data_type: column.data_type.type_name(),
            not_null: column.effective_not_null(in_primary_key),
            default: format_default(table, column)?,
            identity: column.identity,
        })
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if let Some(identity) = self.identity {
            write!(f, " GENERATED {} AS IDENTITY", identity)?;
        }
        if let Some(default) = &self.default {
            write!(f, " DEFAULT {}", default)?;
        }
        if self.not_null {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateTable {
        table: String,
        columns: Vec<ColumnDefinition>,
    },
    DropTable {
        table: String,
        columns: Vec<ColumnDefinition>,
    },
    RenameTable {
        from: String,
        to: String,
    },
    AddColumn {
        table: String,
        column: ColumnDefinition,
    },
    DropColumn {
        table: String,
        column: ColumnDefinition,
    },
    RenameColumn {
        table: String,
        from: String,
        to: String,
    },
    AlterColumnType {
        table: String,
        column: String,
        from: String,
        to: String,
    },
    ChangeDefault {
        table: String,
        column: String,
        from: Option<String>,
        to: Option<String>,
    },
    ChangeIdentity {
        table: String,
        column: String,
        from: Option<Identity>,
        to: Option<Identity>,
    },
    SetNotNull {
        table: String,
        column: String,
    },
    DropNotNull {
        table: String,
        column: String,
    },
    AddConstraint {
        table: String,
        name: String,
        constraint: Constraint,
    },
    DropConstraint {
        table: String,
        name: String,
        constraint: Constraint,
    },
    RenameConstraint {
        table: String,
        from: String,
        to: String,
    },
    CreateIndex {
        table: String,
        name: String,
        index: Index,
    },
    DropIndex {
        table: String,
        name: String,
        index: Index,
    },
    RenameIndex {
        table: String,
        from: String,
        to: String,
    },
}

impl Action {
    /// The action that undoes this one
    pub fn inverse(&self) -> Action {
        match self.clone() {
            Action::CreateTable { table, columns } => Action::DropTable { table, columns },
            Action::DropTable { table, columns } => Action::CreateTable { table, columns },
            Action::RenameTable { from, to } => Action::RenameTable { from: to, to: from },
            Action::AddColumn { table, column } => Action::DropColumn { table, column },
            Action::DropColumn { table, column } => Action::AddColumn { table, column },
            Action::RenameColumn { table, from, to } => Action::RenameColumn {
                table,
                from: to,
                to: from,
            },
            Action::AlterColumnType {
                table,
                column,
                from,
                to,
            } => Action::AlterColumnType {
                table,
                column,
                from: to,
                to: from,
            },
            Action::ChangeDefault {
                table,
                column,
                from,
                to,
            } => Action::ChangeDefault {
                table,
                column,
                from: to,
                to: from,
            },
            Action::ChangeIdentity {
                table,
                column,
                from,
                to,
            } => Action::ChangeIdentity {
                table,
                column,
                from: to,
                to: from,
            },
            Action::SetNotNull { table, column } => Action::DropNotNull { table, column },
            Action::DropNotNull { table, column } => Action::SetNotNull { table, column },
            Action::AddConstraint {
                table,
                name,
                constraint,
            } => Action::DropConstraint {
                table,
                name,
                constraint,
            },
            Action::DropConstraint {
                table,
                name,
                constraint,
            } => Action::AddConstraint {
                table,
                name,
                constraint,
            },
            Action::RenameConstraint { table, from, to } => Action::RenameConstraint {
                table,
                from: to,
                to: from,
            },
            Action::CreateIndex { table, name, index } => Action::DropIndex { table, name, index },
            Action::DropIndex { table, name, index } => Action::CreateIndex { table, name, index },
            Action::RenameIndex { table, from, to } => Action::RenameIndex {
                table,
                from: to,
                to: from,
            },
        }
    }

    /// Table the action addresses; the source name for table renames
    pub fn table(&self) -> &str {
        match self {
            Action::RenameTable { from, .. } => from,
            Action::CreateTable { table, .. }
            | Action::DropTable { table, .. }
            | Action::AddColumn { table, .. }
            | Action::DropColumn { table, .. }
            | Action::RenameColumn { table, .. }
            | Action::AlterColumnType { table, .. }
            | Action::ChangeDefault { table, .. }
            | Action::ChangeIdentity { table, .. }
            | Action::SetNotNull { table, .. }
            | Action::DropNotNull { table, .. }
            | Action::AddConstraint { table, .. }
            | Action::DropConstraint { table, .. }
            | Action::RenameConstraint { table, .. }
            | Action::CreateIndex { table, .. }
            | Action::DropIndex { table, .. }
            | Action::RenameIndex { table, .. } => table,
        }
    }
}

/// Inverse of an ordered action list
pub fn invert(actions: &[Action]) -> Vec<Action> {
    actions.iter().rev().map(Action::inverse).collect()
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("none")
}

fn identity_label(identity: &Option<Identity>) -> String {
    identity.map_or_else(|| "none".to_string(), |i| i.to_string())
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreateTable { table, columns } => {
                write!(f, "create table {} ({} columns)", table, columns.len())
            }
            Action::DropTable { table, .. } => write!(f, "drop table {}", table),
            Action::RenameTable { from, to } => write!(f, "rename table {} to {}", from, to),
            Action::AddColumn { table, column } => write!(f, "add column {}.{}", table, column),
            Action::DropColumn { table, column } => {
                write!(f, "drop column {}.{}", table, column.name)
            }
            Action::RenameColumn { table, from, to } => {
                write!(f, "rename column {}.{} to {}", table, from, to)
            }
            Action::AlterColumnType {
                table,
                column,
                from,
                to,
            } => write!(f, "alter column {}.{} type {} -> {}", table, column, from, to),
            Action::ChangeDefault {
                table,
                column,
                from,
                to,
            } => write!(
                f,
                "change default of {}.{} {} -> {}",
                table,
                column,
                or_none(from),
                or_none(to)
            ),
            Action::ChangeIdentity {
                table,
                column,
                from,
                to,
            } => write!(
                f,
                "change identity of {}.{} {} -> {}",
                table,
                column,
                identity_label(from),
                identity_label(to)
            ),
            Action::SetNotNull { table, column } => {
                write!(f, "set not null on {}.{}", table, column)
            }
            Action::DropNotNull { table, column } => {
                write!(f, "drop not null on {}.{}", table, column)
            }
            Action::AddConstraint {
                table,
                name,
                constraint,
            } => write!(f, "add constraint {} on {} {}", name, table, constraint),
            Action::DropConstraint { table, name, .. } => {
                write!(f, "drop constraint {} on {}", name, table)
            }
            Action::RenameConstraint { table, from, to } => {
                write!(f, "rename constraint {} on {} to {}", from, table, to)
            }
            Action::CreateIndex { table, name, index } => write!(
                f,
                "create {}index {} on {} ({})",
                if index.unique { "unique " } else { "" },
                name,
                table,
                index.columns.join(", ")
            ),
            Action::DropIndex { name, .. } => write!(f, "drop index {}", name),
            Action::RenameIndex { from, to, .. } => write!(f, "rename index {} to {}", from, to),
        }
    }
}
