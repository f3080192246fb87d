//! Schema diff computation engine.
//!
//! The core entry point is [`compute_diff`], which compares a declared
//! schema (already translated to physical identifiers) with the current
//! schema under a set of rename hints.

use crate::catalog::format_default;
use crate::diff::hints::{resolve_hints, RenameMap};
use crate::diff::model::{Difference, SchemaDiff};
use crate::errors::Result;
use crate::fingerprint::{canonical_text, constraint_name, index_name, primary_key_name};
use crate::model::{
    Check, Column, Constraint, ForeignKey, Index, Predicate, PrimaryKey, RenameHints, Schema,
    Table, Unique,
};

/// Compute the structured differences between current and declared schema.
///
/// Difference order is deterministic: declared tables in declaration order
/// (table rename, column renames, columns, primary key, uniques, checks,
/// foreign keys, indexes), then dropped tables in current order.
///
/// # Errors
///
/// - `StaleRenameHint` / `ConflictingRenameHint` when the hints disagree with
///   either schema
/// - `InvalidDefault` when a default cannot be formatted for comparison
pub fn compute_diff(declared: &Schema, current: &Schema, hints: &RenameHints) -> Result<SchemaDiff> {
    let map = resolve_hints(declared, current, hints)?;
    let mut out = Vec::new();

    for table in &declared.tables {
        match map.current_table(current, &table.name) {
            Some(existing) => diff_table(existing, table, &map, &mut out)?,
            None => created_table(table, &mut out),
        }
    }

    for table in &current.tables {
        let matched = map.is_renamed_away(&table.name)
            || (declared.has_table(&table.name) && map.previous_table(&table.name) == table.name);
        if !matched {
            out.push(Difference::TableDropped {
                table: table.clone(),
            });
        }
    }

    Ok(SchemaDiff { differences: out })
}

fn created_table(table: &Table, out: &mut Vec<Difference>) {
    let name = table.name.clone();
    out.push(Difference::TableCreated {
        table: table.clone(),
    });
    if let Some(pk) = &table.primary_key {
        out.push(Difference::PrimaryKeyAdded {
            table: name.clone(),
            primary_key: pk.clone(),
            existing_table: false,
        });
    }
    for unique in &table.uniques {
        out.push(Difference::UniqueAdded {
            table: name.clone(),
            unique: unique.clone(),
            existing_table: false,
        });
    }
    for check in &table.checks {
        out.push(Difference::CheckAdded {
            table: name.clone(),
            check: check.clone(),
            existing_table: false,
        });
    }
    for fk in &table.foreign_keys {
        out.push(Difference::ForeignKeyAdded {
            table: name.clone(),
            foreign_key: fk.clone(),
            existing_table: false,
        });
    }
    for index in &table.indexes {
        out.push(Difference::IndexAdded {
            table: name.clone(),
            index: index.clone(),
            existing_table: false,
        });
    }
}

fn diff_table(
    current: &Table,
    declared: &Table,
    map: &RenameMap,
    out: &mut Vec<Difference>,
) -> Result<()> {
    if current.name != declared.name {
        out.push(Difference::TableRenamed {
            from: current.name.clone(),
            to: declared.name.clone(),
        });
    }

    diff_columns(current, declared, map, out)?;

    let mapper = ContentMapper {
        map,
        table: &declared.name,
    };
    diff_primary_key(current, declared, &mapper, out);
    diff_uniques(current, declared, &mapper, out);
    diff_checks(current, declared, out);
    diff_foreign_keys(current, declared, &mapper, out);
    diff_indexes(current, declared, &mapper, out);
    Ok(())
}

fn diff_columns(
    current: &Table,
    declared: &Table,
    map: &RenameMap,
    out: &mut Vec<Difference>,
) -> Result<()> {
    let table = &declared.name;

    if let Some(renames) = map.column_renames(table) {
        for column in &declared.columns {
            if let Some(from) = renames.get(&column.name) {
                out.push(Difference::ColumnRenamed {
                    table: table.clone(),
                    from: from.clone(),
                    to: column.name.clone(),
                });
            }
        }
    }

    for column in &declared.columns {
        let previous = map.previous_column(table, &column.name);
        let existing = if previous == column.name && map.is_column_renamed_away(table, previous) {
            None
        } else {
            current.find_column(previous)
        };
        match existing {
            Some(existing) => diff_column(current, declared, existing, column, out)?,
            None => out.push(Difference::ColumnAdded {
                table: table.clone(),
                column: column.clone(),
            }),
        }
    }

    for column in &current.columns {
        let declared_name = map.declared_column(table, &column.name);
        let kept = declared.has_column(&declared_name)
            && (declared_name != column.name || !map.is_column_renamed_away(table, &column.name));
        if !kept {
            out.push(Difference::ColumnDropped {
                table: table.clone(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}

fn diff_column(
    current_table: &Table,
    declared_table: &Table,
    current: &Column,
    declared: &Column,
    out: &mut Vec<Difference>,
) -> Result<()> {
    let table = &declared_table.name;
    let column = &declared.name;

    if current.data_type.type_name() != declared.data_type.type_name() {
        out.push(Difference::ColumnRetyped {
            table: table.clone(),
            column: column.clone(),
            from: current.data_type.clone(),
            to: declared.data_type.clone(),
        });
    }

    let current_in_pk = current_table.in_primary_key(&current.name);
    let declared_in_pk = declared_table.in_primary_key(&declared.name);
    let current_not_null = current.effective_not_null(current_in_pk);
    let declared_not_null = declared.effective_not_null(declared_in_pk);

    // Identity requires a not-null column
    let sets_not_null =
        current.identity.is_none() && declared.identity.is_some() && !current_not_null;
    if current.identity != declared.identity {
        out.push(Difference::ColumnIdentityChanged {
            table: table.clone(),
            column: column.clone(),
            from: current.identity,
            to: declared.identity,
            sets_not_null,
        });
    }

    let from = format_default(&current_table.name, current)?;
    let to = format_default(table, declared)?;
    if from != to {
        out.push(Difference::ColumnDefaultChanged {
            table: table.clone(),
            column: column.clone(),
            from,
            to,
        });
    }

    if current_not_null != declared_not_null && !sets_not_null {
        out.push(Difference::ColumnNullabilityChanged {
            table: table.clone(),
            column: column.clone(),
            not_null: declared_not_null,
            implied_by_primary_key: !declared_not_null && current_in_pk && !declared_in_pk,
        });
    }
    Ok(())
}

/// Maps current object content into declared names through the renames
struct ContentMapper<'a> {
    map: &'a RenameMap,
    /// Declared name of the owning table
    table: &'a str,
}

impl ContentMapper<'_> {
    fn columns(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|c| self.map.declared_column(self.table, c))
            .collect()
    }

    fn primary_key(&self, pk: &PrimaryKey) -> PrimaryKey {
        PrimaryKey {
            columns: self.columns(&pk.columns),
        }
    }

    fn unique(&self, unique: &Unique) -> Unique {
        Unique {
            columns: self.columns(&unique.columns),
            ..unique.clone()
        }
    }

    fn foreign_key(&self, fk: &ForeignKey) -> ForeignKey {
        let target_table = self.map.declared_table(&fk.target_table).to_string();
        let target_columns = fk
            .target_columns
            .iter()
            .map(|c| self.map.declared_column(&target_table, c))
            .collect();
        ForeignKey {
            columns: self.columns(&fk.columns),
            target_table,
            target_columns,
            ..fk.clone()
        }
    }

    fn index(&self, index: &Index) -> Index {
        Index {
            columns: self.columns(&index.columns),
            predicates: index
                .predicates
                .iter()
                .map(|p| Predicate {
                    column: self.map.declared_column(self.table, &p.column),
                    ..p.clone()
                })
                .collect(),
            ..index.clone()
        }
    }
}

/// Pair declared objects with current ones of equal content.
///
/// Returns, per declared object, the index of its current counterpart, and
/// the indexes of unmatched current objects in current order.
fn pair_objects<T, F>(current: &[T], declared: &[T], same: F) -> (Vec<Option<usize>>, Vec<usize>)
where
    F: Fn(&T, &T) -> bool,
{
    let mut taken = vec![false; current.len()];
    let pairs = declared
        .iter()
        .map(|d| {
            let found = current
                .iter()
                .enumerate()
                .find(|(i, c)| !taken[*i] && same(*c, d))
                .map(|(i, _)| i);
            if let Some(i) = found {
                taken[i] = true;
            }
            found
        })
        .collect();
    let dropped = taken
        .iter()
        .enumerate()
        .filter(|(_, t)| !**t)
        .map(|(i, _)| i)
        .collect();
    (pairs, dropped)
}

fn diff_primary_key(
    current: &Table,
    declared: &Table,
    mapper: &ContentMapper<'_>,
    out: &mut Vec<Difference>,
) {
    let table = &declared.name;
    match (&current.primary_key, &declared.primary_key) {
        (Some(c), Some(d)) if mapper.primary_key(c) == *d => {
            if current.name != declared.name {
                out.push(Difference::PrimaryKeyRenamed {
                    table: table.clone(),
                    from_name: primary_key_name(&current.name),
                    to_name: primary_key_name(&declared.name),
                });
            }
        }
        (c, d) => {
            if let Some(c) = c {
                out.push(Difference::PrimaryKeyDropped {
                    table: table.clone(),
                    primary_key: c.clone(),
                });
            }
            if let Some(d) = d {
                out.push(Difference::PrimaryKeyAdded {
                    table: table.clone(),
                    primary_key: d.clone(),
                    existing_table: true,
                });
            }
        }
    }
}

fn diff_uniques(
    current: &Table,
    declared: &Table,
    mapper: &ContentMapper<'_>,
    out: &mut Vec<Difference>,
) {
    let table = &declared.name;
    let (pairs, dropped) = pair_objects(&current.uniques, &declared.uniques, |c, d| {
        mapper.unique(c) == *d
    });
    for i in dropped {
        let unique = &current.uniques[i];
        out.push(Difference::UniqueDropped {
            table: table.clone(),
            unique: unique.clone(),
            name: constraint_name(&current.name, &Constraint::Unique(unique.clone())),
        });
    }
    for (unique, pair) in declared.uniques.iter().zip(pairs) {
        match pair {
            Some(i) => {
                let from_name =
                    constraint_name(&current.name, &Constraint::Unique(current.uniques[i].clone()));
                let to_name = constraint_name(table, &Constraint::Unique(unique.clone()));
                if from_name != to_name {
                    out.push(Difference::UniqueRenamed {
                        table: table.clone(),
                        from_name,
                        to_name,
                    });
                }
            }
            None => out.push(Difference::UniqueAdded {
                table: table.clone(),
                unique: unique.clone(),
                existing_table: true,
            }),
        }
    }
}

fn check_content(check: &Check) -> Option<String> {
    canonical_text(&Constraint::Check(check.clone()))
}

fn diff_checks(current: &Table, declared: &Table, out: &mut Vec<Difference>) {
    let table = &declared.name;
    let (pairs, dropped) = pair_objects(&current.checks, &declared.checks, |c, d| {
        check_content(c) == check_content(d)
    });
    for i in dropped {
        let check = &current.checks[i];
        out.push(Difference::CheckDropped {
            table: table.clone(),
            check: check.clone(),
            name: constraint_name(&current.name, &Constraint::Check(check.clone())),
        });
    }
    for (check, pair) in declared.checks.iter().zip(pairs) {
        match pair {
            Some(i) => {
                let from_name =
                    constraint_name(&current.name, &Constraint::Check(current.checks[i].clone()));
                let to_name = constraint_name(table, &Constraint::Check(check.clone()));
                if from_name != to_name {
                    out.push(Difference::CheckRenamed {
                        table: table.clone(),
                        from_name,
                        to_name,
                    });
                }
            }
            None => out.push(Difference::CheckAdded {
                table: table.clone(),
                check: check.clone(),
                existing_table: true,
            }),
        }
    }
}

fn diff_foreign_keys(
    current: &Table,
    declared: &Table,
    mapper: &ContentMapper<'_>,
    out: &mut Vec<Difference>,
) {
    let table = &declared.name;
    // Rules are part of equality: a rule change is a drop and re-add
    let (pairs, dropped) = pair_objects(&current.foreign_keys, &declared.foreign_keys, |c, d| {
        mapper.foreign_key(c) == *d
    });
    for i in dropped {
        let fk = &current.foreign_keys[i];
        out.push(Difference::ForeignKeyDropped {
            table: table.clone(),
            foreign_key: fk.clone(),
            name: constraint_name(&current.name, &Constraint::ForeignKey(fk.clone())),
        });
    }
    for (fk, pair) in declared.foreign_keys.iter().zip(pairs) {
        match pair {
            Some(i) => {
                let from_name = constraint_name(
                    &current.name,
                    &Constraint::ForeignKey(current.foreign_keys[i].clone()),
                );
                let to_name = constraint_name(table, &Constraint::ForeignKey(fk.clone()));
                if from_name != to_name {
                    out.push(Difference::ForeignKeyRenamed {
                        table: table.clone(),
                        from_name,
                        to_name,
                    });
                }
            }
            None => out.push(Difference::ForeignKeyAdded {
                table: table.clone(),
                foreign_key: fk.clone(),
                existing_table: true,
            }),
        }
    }
}

fn diff_indexes(
    current: &Table,
    declared: &Table,
    mapper: &ContentMapper<'_>,
    out: &mut Vec<Difference>,
) {
    let table = &declared.name;
    let (pairs, dropped) = pair_objects(&current.indexes, &declared.indexes, |c, d| {
        mapper.index(c) == *d
    });
    for i in dropped {
        let index = &current.indexes[i];
        out.push(Difference::IndexDropped {
            table: table.clone(),
            index: index.clone(),
            name: index_name(&current.name, index),
        });
    }
    for (index, pair) in declared.indexes.iter().zip(pairs) {
        match pair {
            Some(i) => {
                let from_name = index_name(&current.name, &current.indexes[i]);
                let to_name = index_name(table, index);
                if from_name != to_name {
                    out.push(Difference::IndexRenamed {
                        table: table.clone(),
                        from_name,
                        to_name,
                    });
                }
            }
            None => out.push(Difference::IndexAdded {
                table: table.clone(),
                index: index.clone(),
                existing_table: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnType;

    fn labels(diff: &SchemaDiff) -> Vec<&'static str> {
        diff.differences.iter().map(|d| d.label()).collect()
    }

    fn books(name: &str) -> Table {
        Table::new(name)
            .column(Column::new("id", ColumnType::Integer))
            .column(Column::new("title", ColumnType::Text))
    }

    #[test]
    fn test_identical_schemas_have_no_differences() {
        let schema = Schema::new("public").table(books("books").primary_key(["id"]));
        let diff = compute_diff(&schema, &schema, &RenameHints::new()).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn test_created_and_dropped_tables() {
        let current = Schema::new("public").table(books("books"));
        let declared = Schema::new("public").table(books("authors").primary_key(["id"]));
        let diff = compute_diff(&declared, &current, &RenameHints::new()).unwrap();
        assert_eq!(
            labels(&diff),
            vec!["table_created", "primary_key_added", "table_dropped"]
        );
    }

    #[test]
    fn test_table_rename_without_dependents() {
        let current = Schema::new("public").table(books("books"));
        let declared = Schema::new("public").table(books("publications"));
        let hints = RenameHints::new().rename_table("books", "publications");
        let diff = compute_diff(&declared, &current, &hints).unwrap();
        assert_eq!(labels(&diff), vec!["table_renamed"]);
    }

    #[test]
    fn test_column_changes() {
        let current = Schema::new("public").table(books("books"));
        let declared = Schema::new("public").table(
            Table::new("books")
                .column(Column::new("id", ColumnType::Bigint).not_null())
                .column(Column::new("name", ColumnType::Text).renamed_from("title"))
                .column(Column::new("pages", ColumnType::Integer).with_default(0)),
        );
        let diff = compute_diff(&declared, &current, &RenameHints::new()).unwrap();
        assert_eq!(
            labels(&diff),
            vec![
                "column_renamed",
                "column_retyped",
                "column_nullability_changed",
                "column_added"
            ]
        );
    }

    #[test]
    fn test_foreign_key_rule_change_is_drop_and_add() {
        use crate::model::ForeignKeyRule;
        let authors = Table::new("authors").column(Column::new("id", ColumnType::Integer));
        let fk = ForeignKey::new(["author_id"], "authors", ["id"]);
        let table = |fk: ForeignKey| {
            Table::new("books")
                .column(Column::new("author_id", ColumnType::Integer))
                .foreign_key(fk)
        };
        let current = Schema::new("public")
            .table(authors.clone())
            .table(table(fk.clone()));
        let declared = Schema::new("public")
            .table(authors)
            .table(table(fk.on_delete(ForeignKeyRule::Cascade)));
        let diff = compute_diff(&declared, &current, &RenameHints::new()).unwrap();
        assert_eq!(
            labels(&diff),
            vec!["foreign_key_dropped", "foreign_key_added"]
        );
    }

    #[test]
    fn test_primary_key_drop_flags_implied_relaxation() {
        let current = Schema::new("public").table(books("books").primary_key(["id"]));
        let declared = Schema::new("public").table(books("books"));
        let diff = compute_diff(&declared, &current, &RenameHints::new()).unwrap();
        assert!(diff.differences.contains(&Difference::ColumnNullabilityChanged {
            table: "books".into(),
            column: "id".into(),
            not_null: false,
            implied_by_primary_key: true,
        }));
    }
}
