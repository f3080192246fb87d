//! Changeset planning
//!
//! Turns a [`crate::diff::SchemaDiff`] into an ordered [`Changeset`] of
//! migration operations, each carrying up and down action lists and any
//! operator warnings.

pub mod action;
pub mod changeset;
pub mod op_kind;
pub mod planner;
pub mod summary;
pub mod warning;

pub use action::{Action, ColumnDefinition};
pub use changeset::{Changeset, MigrationOp};
pub use op_kind::{OpKind, RENAME_TABLE_PRIORITY};
pub use planner::plan;
pub use summary::render_summary;
pub use warning::{Warning, WarningKind};
