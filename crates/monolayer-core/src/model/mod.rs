//! Declared and current schema model
//!
//! Both sides of a planning run use the same types: the declared schema an
//! application writes, and the current schema the catalog reader produces.

pub mod column;
pub mod constraint;
pub mod index;
pub mod schema;
pub mod table;
pub mod value;

pub use column::{Column, ColumnDefault, Identity};
pub use constraint::{
    Check, Constraint, ConstraintKind, ForeignKey, ForeignKeyRule, PrimaryKey, Unique,
};
pub use index::{ComparisonOperator, Index, IndexMethod, Predicate};
pub use schema::{Rename, RenameHints, Schema};
pub use table::Table;
pub use value::HostValue;
