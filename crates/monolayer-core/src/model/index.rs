use serde::{Deserialize, Serialize};
use std::fmt;

/// Index access method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMethod {
    #[default]
    Btree,
    Hash,
    Gist,
    Gin,
    Brin,
    Spgist,
}

impl fmt::Display for IndexMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexMethod::Btree => "btree",
            IndexMethod::Hash => "hash",
            IndexMethod::Gist => "gist",
            IndexMethod::Gin => "gin",
            IndexMethod::Brin => "brin",
            IndexMethod::Spgist => "spgist",
        };
        write!(f, "{}", s)
    }
}

/// Comparison operator of a partial-index predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    IsNull,
    IsNotNull,
}

impl ComparisonOperator {
    /// Whether the operator takes a right-hand value
    pub fn is_binary(&self) -> bool {
        !matches!(self, ComparisonOperator::IsNull | ComparisonOperator::IsNotNull)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "<>",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::LtEq => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::GtEq => ">=",
            ComparisonOperator::IsNull => "IS NULL",
            ComparisonOperator::IsNotNull => "IS NOT NULL",
        };
        write!(f, "{}", s)
    }
}

/// One clause of a partial-index `WHERE` conjunction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub operator: ComparisonOperator,
    /// Right-hand SQL literal; ignored for `IS [NOT] NULL`
    #[serde(default)]
    pub value: Option<String>,
}

impl Predicate {
    pub fn new(
        column: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: Some(value.into()),
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: ComparisonOperator::IsNull,
            value: None,
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: ComparisonOperator::IsNotNull,
            value: None,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.operator.is_binary()) {
            (Some(value), true) => write!(f, "\"{}\" {} {}", self.column, self.operator, value),
            _ => write!(f, "\"{}\" {}", self.column, self.operator),
        }
    }
}

fn default_nulls_distinct() -> bool {
    true
}

/// Table index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Index {
    pub columns: Vec<String>,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default = "default_nulls_distinct")]
    pub nulls_distinct: bool,
    #[serde(default)]
    pub method: IndexMethod,
}

impl Index {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            predicates: Vec::new(),
            unique: false,
            nulls_distinct: true,
            method: IndexMethod::Btree,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn nulls_not_distinct(mut self) -> Self {
        self.nulls_distinct = false;
        self
    }

    pub fn using(mut self, method: IndexMethod) -> Self {
        self.method = method;
        self
    }

    pub fn where_clause(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Every column the index mentions, key columns first
    pub fn referenced_columns(&self) -> impl Iterator<Item = &String> {
        self.columns
            .iter()
            .chain(self.predicates.iter().map(|p| &p.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_display() {
        let p = Predicate::new("status", ComparisonOperator::Eq, "'active'");
        assert_eq!(p.to_string(), "\"status\" = 'active'");
        assert_eq!(
            Predicate::is_not_null("deleted_at").to_string(),
            "\"deleted_at\" IS NOT NULL"
        );
    }

    #[test]
    fn test_index_builder() {
        let idx = Index::new(["email"])
            .unique()
            .using(IndexMethod::Hash)
            .where_clause(Predicate::is_null("deleted_at"));
        assert!(idx.unique);
        assert_eq!(idx.method, IndexMethod::Hash);
        let cols: Vec<&String> = idx.referenced_columns().collect();
        assert_eq!(cols, vec!["email", "deleted_at"]);
    }
}
