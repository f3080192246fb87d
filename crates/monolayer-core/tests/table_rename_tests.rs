#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{authors, books, kinds_and_priorities, plan, schema};
use monolayer_core::catalog::ColumnType;
use monolayer_core::model::{Column, ForeignKey, Index, RenameHints, Table};
use monolayer_core::{Action, OpKind, Warning, WarningKind};
use pretty_assertions::assert_eq;

fn rename_books() -> RenameHints {
    RenameHints::new().rename_table("books", "publications")
}

fn with_author(table: Table, target: &str) -> Table {
    table
        .column(Column::new("author_id", ColumnType::Integer))
        .foreign_key(ForeignKey::new(["author_id"], target, ["id"]))
}

#[test]
fn test_bare_table_rename_is_a_single_operation() {
    let current = schema(vec![books("books")]);
    let declared = schema(vec![books("publications")]);

    let cs = plan(&declared, &current, &rename_books());

    assert_eq!(kinds_and_priorities(&cs), vec![(OpKind::RenameTable, 900)]);
    let op = &cs.operations[0];
    assert_eq!(op.table_name, "books");
    assert_eq!(op.current_table_name, "publications");
    assert_eq!(
        op.up,
        vec![Action::RenameTable {
            from: "books".into(),
            to: "publications".into()
        }]
    );
    assert_eq!(
        op.down,
        vec![Action::RenameTable {
            from: "publications".into(),
            to: "books".into()
        }]
    );
    assert_eq!(
        op.warnings,
        vec![Warning::TableRename {
            schema: "public".into(),
            from: "books".into(),
            to: "publications".into()
        }]
    );
    assert_eq!(op.warnings[0].kind(), WarningKind::BackwardIncompatible);
}

#[test]
fn test_unchanged_check_is_renamed_not_recreated() {
    let current = schema(vec![books("books").check("\"id\" > 5")]);
    let declared = schema(vec![books("publications").check("\"id\" > 5")]);

    let cs = plan(&declared, &current, &rename_books());

    assert_eq!(
        kinds_and_priorities(&cs),
        vec![(OpKind::RenameTable, 900), (OpKind::RenameCheck, 5004)]
    );
    assert_eq!(
        cs.operations[1].up,
        vec![Action::RenameConstraint {
            table: "publications".into(),
            from: "books_2f1f415e_monolayer_chk".into(),
            to: "publications_2f1f415e_monolayer_chk".into()
        }]
    );
}

#[test]
fn test_unchanged_index_is_renamed_after_table() {
    let current = schema(vec![books("books").index(Index::new(["title"]))]);
    let declared = schema(vec![books("publications").index(Index::new(["title"]))]);

    let cs = plan(&declared, &current, &rename_books());

    assert_eq!(
        kinds_and_priorities(&cs),
        vec![(OpKind::RenameTable, 900), (OpKind::RenameIndex, 5001)]
    );
    assert_eq!(
        cs.operations[1].up,
        vec![Action::RenameIndex {
            table: "publications".into(),
            from: "books_fe8fcc29_monolayer_idx".into(),
            to: "publications_fe8fcc29_monolayer_idx".into()
        }]
    );
}

#[test]
fn test_unchanged_foreign_key_is_renamed_after_table() {
    let current = schema(vec![authors("authors"), with_author(books("books"), "authors")]);
    let declared = schema(vec![
        authors("authors"),
        with_author(books("publications"), "authors"),
    ]);

    let cs = plan(&declared, &current, &rename_books());

    assert_eq!(
        kinds_and_priorities(&cs),
        vec![(OpKind::RenameTable, 900), (OpKind::RenameForeignKey, 5002)]
    );
    assert_eq!(
        cs.operations[1].up,
        vec![Action::RenameConstraint {
            table: "publications".into(),
            from: "books_1b6ca2a5_monolayer_fk".into(),
            to: "publications_1b6ca2a5_monolayer_fk".into()
        }]
    );
}

#[test]
fn test_renaming_foreign_key_target_changes_fingerprint() {
    let current = schema(vec![authors("authors"), with_author(books("books"), "authors")]);
    let declared = schema(vec![authors("writers"), with_author(books("books"), "writers")]);
    let hints = RenameHints::new().rename_table("authors", "writers");

    let cs = plan(&declared, &current, &hints);

    assert_eq!(
        kinds_and_priorities(&cs),
        vec![
            (OpKind::RenameTable, 900),
            (OpKind::RenamePrimaryKey, 5000),
            (OpKind::RenameForeignKey, 5002)
        ]
    );
    let fk_rename = &cs.operations[2];
    assert_eq!(fk_rename.current_table_name, "books");
    assert_eq!(
        fk_rename.up,
        vec![Action::RenameConstraint {
            table: "books".into(),
            from: "books_1b6ca2a5_monolayer_fk".into(),
            to: "books_56fe9df9_monolayer_fk".into()
        }]
    );
    assert!(cs
        .operations
        .iter()
        .all(|op| !matches!(op.kind, OpKind::DropForeignKey | OpKind::CreateForeignKey)));
}

#[test]
fn test_primary_key_follows_table_rename() {
    let current = schema(vec![authors("authors")]);
    let declared = schema(vec![authors("writers")]);
    let hints = RenameHints::new().rename_table("authors", "writers");

    let cs = plan(&declared, &current, &hints);

    assert_eq!(
        cs.operations[1].up,
        vec![Action::RenameConstraint {
            table: "writers".into(),
            from: "authors_monolayer_pk".into(),
            to: "writers_monolayer_pk".into()
        }]
    );
}

#[test]
fn test_column_rename_warns_and_keeps_content() {
    let current = schema(vec![books("books").index(Index::new(["title"]))]);
    let declared = schema(vec![Table::new("books")
        .column(Column::new("id", ColumnType::Integer))
        .column(Column::new("name", ColumnType::Text).renamed_from("title"))
        .index(Index::new(["name"]))]);

    let cs = plan(&declared, &current, &RenameHints::new());

    let kinds: Vec<OpKind> = cs.kinds();
    assert!(kinds.contains(&OpKind::RenameColumn));
    let rename = cs
        .operations
        .iter()
        .find(|op| op.kind == OpKind::RenameColumn)
        .unwrap();
    assert_eq!(
        rename.warnings,
        vec![Warning::ColumnRename {
            schema: "public".into(),
            table: "books".into(),
            from: "title".into(),
            to: "name".into()
        }]
    );
    // The index content changed with the column name, so it is renamed
    // rather than dropped
    assert!(!kinds.contains(&OpKind::DropIndex));
    assert!(kinds.contains(&OpKind::RenameIndex));
}
