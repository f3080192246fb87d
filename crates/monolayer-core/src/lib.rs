//! monolayer core - Postgres schema-migration planning
//!
//! This crate compares a declared schema with the current one and produces
//! an ordered, reversible changeset:
//! - Column type catalog with default formatting and legality rules
//! - Validation compiler producing per-column value validators
//! - Identifier case translation from declared to physical names
//! - Content-fingerprinted constraint and index names
//! - Rename-aware schema differ
//! - Priority-banded changeset planner with warnings
//!
//! Planning is pure: no I/O, no shared mutable state. Catalog introspection
//! and SQL execution belong to the caller.

pub mod catalog;
pub mod config;
pub mod diff;
pub mod errors;
pub mod fingerprint;
pub mod identifier;
pub mod logging_facility;
pub mod model;
pub mod plan;
pub mod planning;
pub mod validation;

// Used by the logging macros
pub use monolayer_core_types as core_types;

// Re-export commonly used types
pub use catalog::ColumnType;
pub use config::{IdentifierCase, PlanConfig};
pub use diff::{compute_diff, Difference, SchemaDiff};
pub use errors::{ExError, ExErrorKind, PlanError, Result, ValueError};
pub use model::{Column, RenameHints, Schema, Table};
pub use plan::{Action, Changeset, MigrationOp, OpKind, Warning, WarningKind};
pub use planning::{plan_changeset, plan_with_run_id};
pub use validation::{compile_table_validators, compile_validator, ColumnValidator};
