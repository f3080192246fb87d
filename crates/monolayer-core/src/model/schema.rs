use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::table::Table;

/// A named set of tables
///
/// Table order carries no meaning for the database but is kept as the
/// declaration order the planner tie-breaks on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.find_table(name).is_some()
    }
}

/// A `{from, to}` rename pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Rename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Externally supplied rename facts
///
/// Column hints are keyed by the declared (post-rename) table name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenameHints {
    #[serde(default)]
    pub tables: Vec<Rename>,
    #[serde(default)]
    pub columns: BTreeMap<String, Vec<Rename>>,
}

impl RenameHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename_table(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.tables.push(Rename::new(from, to));
        self
    }

    pub fn rename_column(
        mut self,
        table: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.columns
            .entry(table.into())
            .or_default()
            .push(Rename::new(from, to));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.columns.values().all(Vec::is_empty)
    }

    /// Previous name of a declared table, if it was renamed
    pub fn previous_table_name(&self, declared: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|r| r.to == declared)
            .map(|r| r.from.as_str())
    }

    /// Column hints of a declared table
    pub fn column_renames(&self, declared_table: &str) -> &[Rename] {
        self.columns
            .get(declared_table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
