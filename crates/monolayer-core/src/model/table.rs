use serde::{Deserialize, Serialize};

use super::column::Column;
use super::constraint::{Check, Constraint, ForeignKey, PrimaryKey, Unique};
use super::index::Index;

/// A table: ordered columns plus constraints and indexes
///
/// Column, constraint and index order is preserved; the planner uses it as
/// the tie-break between operations of equal priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,

    pub columns: Vec<Column>,

    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,

    #[serde(default)]
    pub uniques: Vec<Unique>,

    #[serde(default)]
    pub checks: Vec<Check>,

    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            uniques: Vec::new(),
            checks: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(PrimaryKey::new(columns));
        self
    }

    pub fn unique(mut self, unique: Unique) -> Self {
        self.uniques.push(unique);
        self
    }

    pub fn check(mut self, expression: impl Into<String>) -> Self {
        self.checks.push(Check::new(expression));
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    pub fn in_primary_key(&self, column: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.columns.iter().any(|c| c == column))
    }

    /// All constraints in planning order: primary key, uniques, checks, foreign keys
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut out = Vec::new();
        if let Some(pk) = &self.primary_key {
            out.push(Constraint::PrimaryKey(pk.clone()));
        }
        out.extend(self.uniques.iter().cloned().map(Constraint::Unique));
        out.extend(self.checks.iter().cloned().map(Constraint::Check));
        out.extend(self.foreign_keys.iter().cloned().map(Constraint::ForeignKey));
        out
    }
}
