//! Constraint domain model
//!
//! Constraints carry no name of their own. Their physical name is derived
//! from the owning table and a fingerprint of their content, see
//! [`crate::fingerprint`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key over an ordered column list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_nulls_distinct() -> bool {
    true
}

/// Unique constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unique {
    pub columns: Vec<String>,
    #[serde(default = "default_nulls_distinct")]
    pub nulls_distinct: bool,
}

impl Unique {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            nulls_distinct: true,
        }
    }

    pub fn nulls_not_distinct(mut self) -> Self {
        self.nulls_distinct = false;
        self
    }
}

/// Check constraint over an opaque SQL boolean expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Check {
    pub expression: String,
}

impl Check {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

/// Referential action for `ON UPDATE` / `ON DELETE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl fmt::Display for ForeignKeyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ForeignKeyRule::NoAction => "NO ACTION",
            ForeignKeyRule::Restrict => "RESTRICT",
            ForeignKeyRule::Cascade => "CASCADE",
            ForeignKeyRule::SetNull => "SET NULL",
            ForeignKeyRule::SetDefault => "SET DEFAULT",
        };
        write!(f, "{}", s)
    }
}

/// Foreign key from local columns to a target table's columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub target_table: String,
    pub target_columns: Vec<String>,
    #[serde(default)]
    pub on_update: ForeignKeyRule,
    #[serde(default)]
    pub on_delete: ForeignKeyRule,
}

impl ForeignKey {
    pub fn new<I, S, J, T>(columns: I, target_table: impl Into<String>, target_columns: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            target_table: target_table.into(),
            target_columns: target_columns.into_iter().map(Into::into).collect(),
            on_update: ForeignKeyRule::NoAction,
            on_delete: ForeignKeyRule::NoAction,
        }
    }

    pub fn on_update(mut self, rule: ForeignKeyRule) -> Self {
        self.on_update = rule;
        self
    }

    pub fn on_delete(mut self, rule: ForeignKeyRule) -> Self {
        self.on_delete = rule;
        self
    }

    /// Same local columns, target and target columns
    pub fn same_shape(&self, other: &ForeignKey) -> bool {
        self.columns == other.columns
            && self.target_table == other.target_table
            && self.target_columns == other.target_columns
    }
}

/// Constraint kinds and their name suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    Check,
}

impl ConstraintKind {
    /// Suffix used in the physical constraint name
    pub fn suffix(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "pk",
            ConstraintKind::Unique => "key",
            ConstraintKind::ForeignKey => "fk",
            ConstraintKind::Check => "chk",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintKind::PrimaryKey => "primary key",
            ConstraintKind::Unique => "unique constraint",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Check => "check constraint",
        };
        write!(f, "{}", s)
    }
}

/// Any table constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "constraint", rename_all = "snake_case")]
pub enum Constraint {
    PrimaryKey(PrimaryKey),
    Unique(Unique),
    ForeignKey(ForeignKey),
    Check(Check),
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::PrimaryKey(_) => ConstraintKind::PrimaryKey,
            Constraint::Unique(_) => ConstraintKind::Unique,
            Constraint::ForeignKey(_) => ConstraintKind::ForeignKey,
            Constraint::Check(_) => ConstraintKind::Check,
        }
    }

    /// Local columns the constraint is defined over (empty for checks)
    pub fn columns(&self) -> &[String] {
        match self {
            Constraint::PrimaryKey(pk) => &pk.columns,
            Constraint::Unique(u) => &u.columns,
            Constraint::ForeignKey(fk) => &fk.columns,
            Constraint::Check(_) => &[],
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::PrimaryKey(pk) => write!(f, "PRIMARY KEY ({})", pk.columns.join(", ")),
            Constraint::Unique(u) => {
                write!(f, "UNIQUE ({})", u.columns.join(", "))?;
                if !u.nulls_distinct {
                    write!(f, " NULLS NOT DISTINCT")?;
                }
                Ok(())
            }
            Constraint::ForeignKey(fk) => write!(
                f,
                "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
                fk.columns.join(", "),
                fk.target_table,
                fk.target_columns.join(", "),
                fk.on_delete,
                fk.on_update
            ),
            Constraint::Check(c) => write!(f, "CHECK ({})", c.expression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(ConstraintKind::PrimaryKey.suffix(), "pk");
        assert_eq!(ConstraintKind::Unique.suffix(), "key");
        assert_eq!(ConstraintKind::ForeignKey.suffix(), "fk");
        assert_eq!(ConstraintKind::Check.suffix(), "chk");
    }

    #[test]
    fn test_foreign_key_same_shape_ignores_rules() {
        let a = ForeignKey::new(["author_id"], "authors", ["id"]);
        let b = a.clone().on_delete(ForeignKeyRule::Cascade);
        assert!(a.same_shape(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_unique_nulls_distinct_defaults_true_when_deserialized() {
        let u: Unique = serde_json::from_str(r#"{"columns":["email"]}"#).unwrap();
        assert!(u.nulls_distinct);
    }

    #[test]
    fn test_constraint_display() {
        let c = Constraint::Check(Check::new("\"id\" > 5"));
        assert_eq!(c.to_string(), "CHECK (\"id\" > 5)");
    }
}
