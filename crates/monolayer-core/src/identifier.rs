//! Identifier case translation
//!
//! Declared identifiers are mapped to physical ones before any comparison,
//! fingerprinting or difference detection happens. The current schema read
//! from the database is already physical and is never translated.

use heck::ToSnakeCase;
use std::collections::BTreeMap;

use crate::config::IdentifierCase;
use crate::errors::{PlanError, Result};
use crate::model::{Column, ForeignKey, Index, Predicate, Rename, RenameHints, Schema, Table};

/// Physical form of a declared identifier
pub fn to_physical(name: &str, case: IdentifierCase) -> String {
    match case {
        IdentifierCase::SnakeCase => name.to_snake_case(),
        IdentifierCase::Preserve => name.to_string(),
    }
}

fn physical_list(columns: &[String], case: IdentifierCase) -> Vec<String> {
    columns.iter().map(|c| to_physical(c, case)).collect()
}

/// Translate every identifier of a declared schema
///
/// Check expressions are opaque SQL and pass through unchanged.
pub fn translate_schema(schema: &Schema, case: IdentifierCase) -> Result<Schema> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut tables = Vec::with_capacity(schema.tables.len());

    for table in &schema.tables {
        let physical = to_physical(&table.name, case);
        if let Some(first) = seen.get(&physical) {
            return Err(if *first == table.name {
                PlanError::DuplicateTable {
                    schema: schema.name.clone(),
                    table: table.name.clone(),
                }
            } else {
                PlanError::IdentifierCollision {
                    table: None,
                    first: first.to_string(),
                    second: table.name.clone(),
                    physical,
                }
            });
        }
        seen.insert(physical, &table.name);
        tables.push(translate_table(table, case)?);
    }

    Ok(Schema {
        name: schema.name.clone(),
        tables,
    })
}

fn translate_table(table: &Table, case: IdentifierCase) -> Result<Table> {
    let name = to_physical(&table.name, case);

    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut columns = Vec::with_capacity(table.columns.len());
    for column in &table.columns {
        let physical = to_physical(&column.name, case);
        if let Some(first) = seen.get(&physical) {
            return Err(if *first == column.name {
                PlanError::DuplicateColumn {
                    table: table.name.clone(),
                    column: column.name.clone(),
                }
            } else {
                PlanError::IdentifierCollision {
                    table: Some(table.name.clone()),
                    first: first.to_string(),
                    second: column.name.clone(),
                    physical,
                }
            });
        }
        seen.insert(physical.clone(), &column.name);
        columns.push(Column {
            name: physical,
            renamed_from: column.renamed_from.as_deref().map(|p| to_physical(p, case)),
            ..column.clone()
        });
    }

    let mut out = Table::new(name);
    out.columns = columns;
    out.primary_key = table.primary_key.as_ref().map(|pk| {
        let mut pk = pk.clone();
        pk.columns = physical_list(&pk.columns, case);
        pk
    });
    out.uniques = table
        .uniques
        .iter()
        .map(|u| {
            let mut u = u.clone();
            u.columns = physical_list(&u.columns, case);
            u
        })
        .collect();
    out.checks = table.checks.clone();
    out.foreign_keys = table
        .foreign_keys
        .iter()
        .map(|fk| ForeignKey {
            columns: physical_list(&fk.columns, case),
            target_table: to_physical(&fk.target_table, case),
            target_columns: physical_list(&fk.target_columns, case),
            ..fk.clone()
        })
        .collect();
    out.indexes = table
        .indexes
        .iter()
        .map(|idx| Index {
            columns: physical_list(&idx.columns, case),
            predicates: idx
                .predicates
                .iter()
                .map(|p| Predicate {
                    column: to_physical(&p.column, case),
                    ..p.clone()
                })
                .collect(),
            ..idx.clone()
        })
        .collect();
    Ok(out)
}

/// Translate rename hints with the same mapping as the declared schema
pub fn translate_hints(hints: &RenameHints, case: IdentifierCase) -> RenameHints {
    let rename = |r: &Rename| Rename::new(to_physical(&r.from, case), to_physical(&r.to, case));
    let mut columns: BTreeMap<String, Vec<Rename>> = BTreeMap::new();
    for (table, renames) in &hints.columns {
        columns
            .entry(to_physical(table, case))
            .or_default()
            .extend(renames.iter().map(rename));
    }
    RenameHints {
        tables: hints.tables.iter().map(rename).collect(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnType;
    use crate::model::Unique;

    #[test]
    fn test_to_physical() {
        assert_eq!(to_physical("authorId", IdentifierCase::SnakeCase), "author_id");
        assert_eq!(to_physical("BookAuthors", IdentifierCase::SnakeCase), "book_authors");
        assert_eq!(to_physical("books", IdentifierCase::SnakeCase), "books");
        assert_eq!(to_physical("authorId", IdentifierCase::Preserve), "authorId");
    }

    #[test]
    fn test_translate_rewrites_constraint_columns() {
        let schema = Schema::new("public").table(
            Table::new("bookAuthors")
                .column(Column::new("authorId", ColumnType::Integer))
                .unique(Unique::new(["authorId"]))
                .foreign_key(ForeignKey::new(["authorId"], "Authors", ["authorId"]))
                .check("\"authorId\" > 0"),
        );
        let out = translate_schema(&schema, IdentifierCase::SnakeCase).unwrap();
        let t = &out.tables[0];
        assert_eq!(t.name, "book_authors");
        assert_eq!(t.columns[0].name, "author_id");
        assert_eq!(t.uniques[0].columns, vec!["author_id"]);
        assert_eq!(t.foreign_keys[0].target_table, "authors");
        assert_eq!(t.checks[0].expression, "\"authorId\" > 0");
    }

    #[test]
    fn test_column_collision_reported() {
        let schema = Schema::new("public").table(
            Table::new("books")
                .column(Column::new("authorId", ColumnType::Integer))
                .column(Column::new("author_id", ColumnType::Integer)),
        );
        let err = translate_schema(&schema, IdentifierCase::SnakeCase).unwrap_err();
        assert_eq!(
            err,
            PlanError::IdentifierCollision {
                table: Some("books".into()),
                first: "authorId".into(),
                second: "author_id".into(),
                physical: "author_id".into(),
            }
        );
    }

    #[test]
    fn test_preserve_does_not_collide() {
        let schema = Schema::new("public").table(
            Table::new("books")
                .column(Column::new("authorId", ColumnType::Integer))
                .column(Column::new("author_id", ColumnType::Integer)),
        );
        assert!(translate_schema(&schema, IdentifierCase::Preserve).is_ok());
    }

    #[test]
    fn test_duplicate_table() {
        let schema = Schema::new("public")
            .table(Table::new("books"))
            .table(Table::new("books"));
        let err = translate_schema(&schema, IdentifierCase::SnakeCase).unwrap_err();
        assert!(matches!(err, PlanError::DuplicateTable { .. }));
    }

    #[test]
    fn test_translate_hints() {
        let hints = RenameHints::new()
            .rename_table("Books", "Publications")
            .rename_column("Publications", "bookTitle", "pubTitle");
        let out = translate_hints(&hints, IdentifierCase::SnakeCase);
        assert_eq!(out.tables[0], Rename::new("books", "publications"));
        assert_eq!(
            out.column_renames("publications"),
            &[Rename::new("book_title", "pub_title")]
        );
    }
}
