//! Rename hint resolution.
//!
//! Hints are trusted as ground truth for *which* objects were renamed, but
//! they must agree with both snapshots. A hint naming an object absent from
//! either side means the hints are stale and planning stops.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{PlanError, Result};
use crate::model::{Rename, RenameHints, Schema, Table};

const TABLE_SCOPE: &str = "table";
const COLUMN_SCOPE: &str = "column";

/// Validated renames, keyed by declared names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    /// declared table -> previous table
    tables: BTreeMap<String, String>,
    /// declared table -> (declared column -> previous column)
    columns: BTreeMap<String, BTreeMap<String, String>>,
}

impl RenameMap {
    /// Previous name of a declared table
    pub fn previous_table<'a>(&'a self, declared: &'a str) -> &'a str {
        self.tables.get(declared).map(String::as_str).unwrap_or(declared)
    }

    /// Declared name of a current table
    pub fn declared_table<'a>(&'a self, previous: &'a str) -> &'a str {
        self.tables
            .iter()
            .find(|(_, from)| from.as_str() == previous)
            .map(|(to, _)| to.as_str())
            .unwrap_or(previous)
    }

    /// Whether a current table is the source of a table rename
    pub fn is_renamed_away(&self, previous: &str) -> bool {
        self.tables.values().any(|from| from == previous)
    }

    /// Current counterpart of a declared table
    pub fn current_table<'a>(&self, current: &'a Schema, declared: &str) -> Option<&'a Table> {
        match self.tables.get(declared) {
            Some(previous) => current.find_table(previous),
            None if self.is_renamed_away(declared) => None,
            None => current.find_table(declared),
        }
    }

    /// Column renames of a declared table as `declared -> previous`
    pub fn column_renames(&self, declared_table: &str) -> Option<&BTreeMap<String, String>> {
        self.columns.get(declared_table)
    }

    /// Previous name of a declared column
    pub fn previous_column<'a>(&'a self, declared_table: &str, declared: &'a str) -> &'a str {
        self.columns
            .get(declared_table)
            .and_then(|cols| cols.get(declared))
            .map(String::as_str)
            .unwrap_or(declared)
    }

    /// Declared name of a current column of `declared_table`
    pub fn declared_column(&self, declared_table: &str, previous: &str) -> String {
        self.columns
            .get(declared_table)
            .and_then(|cols| {
                cols.iter()
                    .find(|(_, from)| from.as_str() == previous)
                    .map(|(to, _)| to.clone())
            })
            .unwrap_or_else(|| previous.to_string())
    }

    /// Whether a current column is the source of a column rename
    pub fn is_column_renamed_away(&self, declared_table: &str, previous: &str) -> bool {
        self.columns
            .get(declared_table)
            .is_some_and(|cols| cols.values().any(|from| from == previous))
    }
}

fn stale(scope: &str, rename: &Rename, reason: impl Into<String>) -> PlanError {
    PlanError::StaleRenameHint {
        scope: scope.to_string(),
        from: rename.from.clone(),
        to: rename.to.clone(),
        reason: reason.into(),
    }
}

fn conflicting(scope: &str, name: &str) -> PlanError {
    PlanError::ConflictingRenameHint {
        scope: scope.to_string(),
        name: name.to_string(),
    }
}

/// Check hints against both schemas and build the rename map.
///
/// Declared columns carrying `renamed_from` contribute implicit column
/// hints. An implicit hint that was already applied (the current table has
/// the new name and not the old one) is ignored.
pub fn resolve_hints(declared: &Schema, current: &Schema, hints: &RenameHints) -> Result<RenameMap> {
    let mut map = RenameMap::default();

    let mut sources = BTreeSet::new();
    let mut targets = BTreeSet::new();
    for rename in &hints.tables {
        if rename.from == rename.to {
            return Err(stale(TABLE_SCOPE, rename, "source and target are the same"));
        }
        if !current.has_table(&rename.from) {
            return Err(stale(TABLE_SCOPE, rename, "table is not in the current schema"));
        }
        if !declared.has_table(&rename.to) {
            return Err(stale(TABLE_SCOPE, rename, "table is not in the declared schema"));
        }
        if !sources.insert(rename.from.as_str()) {
            return Err(conflicting(TABLE_SCOPE, &rename.from));
        }
        if !targets.insert(rename.to.as_str()) {
            return Err(conflicting(TABLE_SCOPE, &rename.to));
        }
        map.tables.insert(rename.to.clone(), rename.from.clone());
    }
    for rename in &hints.tables {
        // Renames share one priority band, so a chain or swap has no safe order
        if sources.contains(rename.to.as_str()) {
            return Err(conflicting(TABLE_SCOPE, &rename.to));
        }
        if current.has_table(&rename.to) {
            return Err(stale(
                TABLE_SCOPE,
                rename,
                "target name is still used by a current table",
            ));
        }
    }

    for (table, renames) in collect_column_hints(declared, current, hints, &map) {
        let declared_table = declared.find_table(&table).ok_or_else(|| {
            PlanError::StaleRenameHint {
                scope: COLUMN_SCOPE.to_string(),
                from: table.clone(),
                to: table.clone(),
                reason: format!("table '{}' is not in the declared schema", table),
            }
        })?;
        let previous = map.previous_table(&table).to_string();
        let current_table = map.current_table(current, &table);

        let mut sources = BTreeSet::new();
        let mut targets = BTreeSet::new();
        let mut columns = BTreeMap::new();
        for rename in &renames {
            let Some(current_table) = current_table else {
                return Err(stale(
                    COLUMN_SCOPE,
                    rename,
                    format!("table '{}' is not in the current schema", previous),
                ));
            };
            if rename.from == rename.to {
                return Err(stale(COLUMN_SCOPE, rename, "source and target are the same"));
            }
            if !current_table.has_column(&rename.from) {
                return Err(stale(
                    COLUMN_SCOPE,
                    rename,
                    format!("column is not in current table '{}'", previous),
                ));
            }
            if !declared_table.has_column(&rename.to) {
                return Err(stale(
                    COLUMN_SCOPE,
                    rename,
                    format!("column is not in declared table '{}'", table),
                ));
            }
            if !sources.insert(rename.from.clone()) {
                return Err(conflicting(COLUMN_SCOPE, &rename.from));
            }
            if !targets.insert(rename.to.clone()) {
                return Err(conflicting(COLUMN_SCOPE, &rename.to));
            }
            columns.insert(rename.to.clone(), rename.from.clone());
        }
        if let Some(current_table) = current_table {
            for rename in &renames {
                if sources.contains(&rename.to) {
                    return Err(conflicting(COLUMN_SCOPE, &rename.to));
                }
                if current_table.has_column(&rename.to) {
                    return Err(stale(
                        COLUMN_SCOPE,
                        rename,
                        "target name is still used by a current column",
                    ));
                }
            }
        }
        if !columns.is_empty() {
            map.columns.insert(table, columns);
        }
    }

    Ok(map)
}

/// Explicit column hints merged with implicit `renamed_from` hints
fn collect_column_hints(
    declared: &Schema,
    current: &Schema,
    hints: &RenameHints,
    map: &RenameMap,
) -> BTreeMap<String, Vec<Rename>> {
    let mut out: BTreeMap<String, Vec<Rename>> = hints
        .columns
        .iter()
        .filter(|(_, renames)| !renames.is_empty())
        .map(|(table, renames)| (table.clone(), renames.clone()))
        .collect();

    for table in &declared.tables {
        let current_table = map.current_table(current, &table.name);
        for column in &table.columns {
            let Some(from) = &column.renamed_from else {
                continue;
            };
            let already_applied = current_table.is_some_and(|t| {
                !t.has_column(from) && t.has_column(&column.name)
            });
            if already_applied {
                continue;
            }
            let rename = Rename::new(from.clone(), column.name.clone());
            let entry = out.entry(table.name.clone()).or_default();
            if !entry.contains(&rename) {
                entry.push(rename);
            }
        }
    }
    out
}
