//! Content-addressed names for constraints and indexes.
//!
//! A constraint or index has no name of its own. Its physical name is
//! derived from the owning table and a digest of its defining content:
//!
//! ```text
//! {table}_monolayer_pk
//! {table}_{fingerprint}_monolayer_{key|fk|chk|idx}
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same content → same fingerprint, on every run
//! - The owning table's name is never part of the digest input, so renaming
//!   the table changes only the name prefix
//! - A foreign key's *target* table is part of its content, so renaming the
//!   target changes the fingerprint
//! - Column order is significant
//!
//! ## Canonical Text
//!
//! | Kind | Canonical text |
//! |---|---|
//! | Check | expression, trimmed, whitespace runs collapsed |
//! | Unique | `"c1", "c2"` plus ` NULLS NOT DISTINCT` |
//! | Foreign key | `("c1") REFERENCES "target" ("t1")` |
//! | Index | `[UNIQUE ]("c1") USING method[ NULLS NOT DISTINCT][ WHERE p1 AND p2]` |

use sha2::{Digest, Sha256};

use crate::model::{Check, Constraint, ConstraintKind, ForeignKey, Index, Unique};

/// Length of the hex fingerprint segment
pub const FINGERPRINT_LEN: usize = 8;

/// Marker segment shared by every generated name
pub const NAME_MARKER: &str = "monolayer";

/// Suffix used for index names
pub const INDEX_SUFFIX: &str = "idx";

/// Compute the fingerprint of a canonical text.
///
/// ## Returns
///
/// First [`FINGERPRINT_LEN`] characters of the lowercase hex SHA256 digest.
///
/// ## Example
///
/// ```
/// use monolayer_core::fingerprint::fingerprint_text;
///
/// assert_eq!(fingerprint_text("\"id\" > 5"), "2f1f415e");
/// ```
pub fn fingerprint_text(canonical: &str) -> String {
    let mut digest = hash_string(canonical);
    digest.truncate(FINGERPRINT_LEN);
    digest
}

/// Canonical text of a constraint, `None` for primary keys.
///
/// Primary keys are named by their table alone since a table has at most one.
pub fn canonical_text(constraint: &Constraint) -> Option<String> {
    match constraint {
        Constraint::PrimaryKey(_) => None,
        Constraint::Unique(u) => Some(unique_text(u)),
        Constraint::Check(c) => Some(check_text(c)),
        Constraint::ForeignKey(fk) => Some(foreign_key_text(fk)),
    }
}

/// Canonical text of an index
pub fn index_canonical_text(index: &Index) -> String {
    let mut out = String::new();
    if index.unique {
        out.push_str("UNIQUE ");
    }
    out.push('(');
    out.push_str(&quoted_list(&index.columns));
    out.push_str(") USING ");
    out.push_str(&index.method.to_string());
    if !index.nulls_distinct {
        out.push_str(" NULLS NOT DISTINCT");
    }
    if !index.predicates.is_empty() {
        let clauses: Vec<String> = index.predicates.iter().map(|p| p.to_string()).collect();
        out.push_str(" WHERE ");
        out.push_str(&clauses.join(" AND "));
    }
    out
}

/// Fingerprint of a constraint, `None` for primary keys
pub fn constraint_fingerprint(constraint: &Constraint) -> Option<String> {
    canonical_text(constraint).map(|text| fingerprint_text(&text))
}

pub fn index_fingerprint(index: &Index) -> String {
    fingerprint_text(&index_canonical_text(index))
}

pub fn primary_key_name(table: &str) -> String {
    format!("{}_{}_{}", table, NAME_MARKER, ConstraintKind::PrimaryKey.suffix())
}

/// Physical name of a constraint owned by `table`
pub fn constraint_name(table: &str, constraint: &Constraint) -> String {
    match constraint_fingerprint(constraint) {
        None => primary_key_name(table),
        Some(fp) => format!(
            "{}_{}_{}_{}",
            table,
            fp,
            NAME_MARKER,
            constraint.kind().suffix()
        ),
    }
}

/// Physical name of an index owned by `table`
pub fn index_name(table: &str, index: &Index) -> String {
    format!(
        "{}_{}_{}_{}",
        table,
        index_fingerprint(index),
        NAME_MARKER,
        INDEX_SUFFIX
    )
}

fn check_text(check: &Check) -> String {
    check
        .expression
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn unique_text(unique: &Unique) -> String {
    let mut out = quoted_list(&unique.columns);
    if !unique.nulls_distinct {
        out.push_str(" NULLS NOT DISTINCT");
    }
    out
}

fn foreign_key_text(fk: &ForeignKey) -> String {
    format!(
        "({}) REFERENCES {} ({})",
        quoted_list(&fk.columns),
        quote_ident(&fk.target_table),
        quoted_list(&fk.target_columns)
    )
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn quoted_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Hash a string using SHA256.
fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IndexMethod, Predicate, PrimaryKey};

    #[test]
    fn test_hash_string_deterministic() {
        let hash1 = hash_string("test");
        let hash2 = hash_string("test");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_check_whitespace_is_normalized() {
        let a = Constraint::Check(Check::new("\"id\" > 5"));
        let b = Constraint::Check(Check::new("  \"id\"   >\n5 "));
        assert_eq!(constraint_fingerprint(&a), constraint_fingerprint(&b));
        assert_eq!(constraint_fingerprint(&a).as_deref(), Some("2f1f415e"));
    }

    #[test]
    fn test_primary_key_name_has_no_fingerprint() {
        let pk = Constraint::PrimaryKey(PrimaryKey::new(["id"]));
        assert_eq!(constraint_name("books", &pk), "books_monolayer_pk");
        assert_eq!(constraint_fingerprint(&pk), None);
    }

    #[test]
    fn test_canonical_texts() {
        let fk = ForeignKey::new(["author_id"], "authors", ["id"]);
        assert_eq!(
            foreign_key_text(&fk),
            "(\"author_id\") REFERENCES \"authors\" (\"id\")"
        );
        let unique = Unique::new(["a", "b"]).nulls_not_distinct();
        assert_eq!(unique_text(&unique), "\"a\", \"b\" NULLS NOT DISTINCT");
        let idx = Index::new(["email"])
            .unique()
            .using(IndexMethod::Hash)
            .where_clause(Predicate::is_null("deleted_at"));
        assert_eq!(
            index_canonical_text(&idx),
            "UNIQUE (\"email\") USING hash WHERE \"deleted_at\" IS NULL"
        );
    }

    #[test]
    fn test_index_name_shape() {
        let name = index_name("books", &Index::new(["title"]));
        assert!(name.starts_with("books_"));
        assert!(name.ends_with("_monolayer_idx"));
        assert_eq!(name.len(), "books_".len() + FINGERPRINT_LEN + "_monolayer_idx".len());
    }
}
