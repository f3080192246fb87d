//! Schema differ.
//!
//! Compares the declared schema with the current schema under externally
//! supplied rename hints and produces a structured list of differences.
//!
//! ## Entry point
//!
//! ```ignore
//! use monolayer_core::diff::compute_diff;
//!
//! let diff = compute_diff(&declared, &current, &hints)?;
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical difference lists.
//! - **Rename over recreate**: an object whose content survives a table or
//!   column rename is reported as renamed, never as dropped and added.
//! - **Fail closed**: stale or conflicting hints abort the comparison.

pub mod engine;
pub mod hints;
pub mod model;

pub use engine::compute_diff;
pub use hints::{resolve_hints, RenameMap};
pub use model::{Difference, SchemaDiff};
