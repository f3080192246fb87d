//! Planning entry point
//!
//! [`plan_changeset`] runs the full pipeline for one target schema:
//!
//! 1. translate declared identifiers (schema and rename hints)
//! 2. check the declared schema against the catalog legality rules
//! 3. diff declared against current under the rename hints
//! 4. plan and order the migration operations
//!
//! ## Atomicity Contract
//!
//! A run either returns a complete [`Changeset`] or fails with the first
//! error encountered. No operation is emitted speculatively.
//!
//! ## Example
//!
//! ```
//! use monolayer_core::catalog::ColumnType;
//! use monolayer_core::model::{Column, RenameHints, Schema, Table};
//! use monolayer_core::{plan_changeset, PlanConfig};
//!
//! let current = Schema::new("public")
//!     .table(Table::new("books").column(Column::new("id", ColumnType::Integer)));
//! let declared = Schema::new("public")
//!     .table(Table::new("publications").column(Column::new("id", ColumnType::Integer)));
//! let hints = RenameHints::new().rename_table("books", "publications");
//!
//! let changeset = plan_changeset(&PlanConfig::default(), &declared, &current, &hints).unwrap();
//! assert_eq!(changeset.len(), 1);
//! assert_eq!(changeset.operations[0].priority, 900);
//! ```

use monolayer_core_types::RunId;

use crate::catalog::check_schema;
use crate::config::PlanConfig;
use crate::diff::compute_diff;
use crate::errors::{ExError, Result};
use crate::identifier::{translate_hints, translate_schema};
use crate::model::{RenameHints, Schema};
use crate::plan::{plan, Changeset};
use crate::{log_op_end, log_op_error, log_op_start};

/// Plan the migration from `current` to `declared` under a fresh run id.
///
/// # Errors
///
/// - Configuration errors: identifier collisions, illegal column
///   declarations, unformattable defaults
/// - Consistency errors: rename hints that disagree with either schema
pub fn plan_changeset(
    config: &PlanConfig,
    declared: &Schema,
    current: &Schema,
    hints: &RenameHints,
) -> Result<Changeset> {
    plan_with_run_id(&RunId::new(), config, declared, current, hints)
}

/// Plan with a caller-supplied run id for log correlation
pub fn plan_with_run_id(
    run_id: &RunId,
    config: &PlanConfig,
    declared: &Schema,
    current: &Schema,
    hints: &RenameHints,
) -> Result<Changeset> {
    let started = std::time::Instant::now();
    log_op_start!(
        "plan_changeset",
        run_id,
        schema = %config.schema,
        table_count = declared.tables.len()
    );

    let changeset = run(config, declared, current, hints).map_err(|e| {
        let ex_err = ExError::from(e.clone()).with_run_id(run_id.clone());
        log_op_error!("plan_changeset", run_id, started, ex_err);
        e
    })?;

    log_op_end!(
        "plan_changeset",
        run_id,
        started,
        op_count = changeset.len(),
        warning_count = changeset.warnings().count()
    );
    Ok(changeset)
}

fn run(
    config: &PlanConfig,
    declared: &Schema,
    current: &Schema,
    hints: &RenameHints,
) -> Result<Changeset> {
    let declared = translate_schema(declared, config.identifier_case)?;
    let hints = translate_hints(hints, config.identifier_case);
    if config.validate_declarations {
        check_schema(&declared)?;
    }

    let diff = compute_diff(&declared, current, &hints)?;
    tracing::debug!(diff_count = diff.len(), "schema diff computed");
    for difference in &diff.differences {
        tracing::debug!(
            table = difference.table(),
            difference = difference.label(),
            "difference"
        );
    }

    let changeset = plan(&diff, &config.schema)?;
    for op in &changeset.operations {
        tracing::debug!(
            table = %op.current_table_name,
            op = %op.kind,
            priority = op.priority,
            warnings = op.warnings.len(),
            "operation planned"
        );
    }
    Ok(changeset)
}
