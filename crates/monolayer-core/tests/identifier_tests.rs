#![allow(clippy::unwrap_used, clippy::expect_used)]

use monolayer_core::catalog::ColumnType;
use monolayer_core::config::IdentifierCase;
use monolayer_core::model::{Column, RenameHints, Schema, Table};
use monolayer_core::{plan_changeset, Action, PlanConfig, PlanError, Warning};
use pretty_assertions::assert_eq;

#[test]
fn test_snake_case_translation_applies_to_hints() {
    let current = Schema::new("public").table(
        Table::new("book_drafts").column(Column::new("book_id", ColumnType::Integer)),
    );
    let declared = Schema::new("public")
        .table(Table::new("PublishedBooks").column(Column::new("bookId", ColumnType::Integer)));
    let hints = RenameHints::new().rename_table("BookDrafts", "PublishedBooks");

    let cs = plan_changeset(&PlanConfig::default(), &declared, &current, &hints).unwrap();

    assert_eq!(cs.len(), 1);
    assert_eq!(
        cs.operations[0].up,
        vec![Action::RenameTable {
            from: "book_drafts".into(),
            to: "published_books".into()
        }]
    );
}

#[test]
fn test_table_collision_fails_the_run() {
    let declared = Schema::new("public")
        .table(Table::new("BookAuthors").column(Column::new("id", ColumnType::Integer)))
        .table(Table::new("book_authors").column(Column::new("id", ColumnType::Integer)));

    let err = plan_changeset(
        &PlanConfig::default(),
        &declared,
        &Schema::new("public"),
        &RenameHints::new(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        PlanError::IdentifierCollision {
            table: None,
            first: "BookAuthors".into(),
            second: "book_authors".into(),
            physical: "book_authors".into(),
        }
    );
}

#[test]
fn test_preserve_case_from_toml_config() {
    let config = PlanConfig::from_toml_str(
        r#"
        schema = "library"
        identifier_case = "preserve"
        "#,
    )
    .unwrap();
    assert_eq!(config.identifier_case, IdentifierCase::Preserve);

    let declared = Schema::new("library").table(
        Table::new("Books")
            .column(Column::new("bookId", ColumnType::Integer))
            .column(Column::new("Title", ColumnType::Text).not_null()),
    );
    let current = Schema::new("library")
        .table(Table::new("Books").column(Column::new("bookId", ColumnType::Integer)));

    let cs = plan_changeset(&config, &declared, &current, &RenameHints::new()).unwrap();

    assert_eq!(cs.schema, "library");
    assert_eq!(
        cs.warnings().collect::<Vec<_>>(),
        vec![&Warning::AddNonNullableColumn {
            schema: "library".into(),
            table: "Books".into(),
            column: "Title".into(),
        }]
    );
}

#[test]
fn test_snake_case_leaves_check_expressions_alone() {
    let declared = Schema::new("public").table(
        Table::new("books")
            .column(Column::new("pageCount", ColumnType::Integer))
            .check("\"page_count\" > 0"),
    );
    let cs = plan_changeset(
        &PlanConfig::default(),
        &declared,
        &Schema::new("public"),
        &RenameHints::new(),
    )
    .unwrap();

    let names: Vec<String> = cs
        .up_actions()
        .filter_map(|a| match a {
            Action::AddConstraint { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("books_") && names[0].ends_with("_monolayer_chk"));
}
