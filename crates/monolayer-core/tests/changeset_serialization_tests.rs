#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{books, plan, schema};
use monolayer_core::model::{Index, RenameHints};
use monolayer_core::Changeset;
use pretty_assertions::assert_eq;

fn sample() -> Changeset {
    let current = schema(vec![books("books").check("\"id\" > 5")]);
    let declared = schema(vec![books("publications")
        .check("\"id\" > 5")
        .index(Index::new(["title"]))]);
    let hints = RenameHints::new().rename_table("books", "publications");
    plan(&declared, &current, &hints)
}

#[test]
fn test_json_is_deterministic_and_round_trips() {
    let first = serde_json::to_string_pretty(&sample()).unwrap();
    let second = serde_json::to_string_pretty(&sample()).unwrap();
    assert_eq!(first, second);

    let parsed: Changeset = serde_json::from_str(&first).unwrap();
    assert_eq!(parsed, sample());
}

#[test]
fn test_json_shape() {
    let value = serde_json::to_value(sample()).unwrap();
    let rename = &value["operations"][0];

    assert_eq!(value["schema"], "public");
    assert_eq!(rename["kind"], "rename_table");
    assert_eq!(rename["priority"], 900);
    assert_eq!(rename["table_name"], "books");
    assert_eq!(rename["current_table_name"], "publications");
    assert_eq!(rename["up"][0]["action"], "rename_table");
    assert_eq!(rename["warnings"][0]["code"], "table_rename");
    assert_eq!(rename["warnings"][0]["to"], "publications");
}

#[test]
fn test_summary_lists_operations_and_warnings() {
    let summary = sample().render_summary();

    assert!(summary.starts_with("## Changeset\n"));
    assert!(summary.contains("**Operations**: 3"));
    assert!(summary.contains("| 1 | 900 | rename table | `books` → `publications` | 1 | 1 |"));
    assert!(summary.contains("| 2 | 4003 | create index | `publications` | 1 | 1 |"));
    assert!(summary.contains("| 3 | 5004 | rename check constraint | `publications` | 1 | 1 |"));
    assert!(summary.contains("- **backward incompatible** (1)"));
    assert!(summary.contains("  - `table_rename`: "));
}

#[test]
fn test_summary_of_empty_changeset() {
    let current = schema(vec![books("books")]);
    let summary = plan(&current, &current, &RenameHints::new()).render_summary();

    assert!(summary.contains("**Operations**: 0"));
    assert!(summary.contains("_No changes detected._"));
    assert!(!summary.contains("### Warnings"));
}
