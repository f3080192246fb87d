//! Run boundary macros
//!
//! A planning run logs one `start` event and then exactly one `end` or
//! `end_error` event. All three carry the run id, so interleaved runs can be
//! told apart in a shared log stream. Durations are measured from the
//! `Instant` the caller took when the run started.
//!
//! Field keys follow `monolayer_core_types::schema`.

/// Log the start of a run
///
/// # Example
///
/// ```
/// # use monolayer_core::log_op_start;
/// # use monolayer_core::core_types::RunId;
/// let run_id = RunId::new();
/// log_op_start!("plan_changeset", run_id);
/// log_op_start!("plan_changeset", run_id, schema = "public", table_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr, $run_id:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            run_id = %$run_id,
            $($($field)*)?
        );
    };
}

/// Log the successful end of a run
///
/// # Example
///
/// ```
/// # use monolayer_core::log_op_end;
/// # use monolayer_core::core_types::RunId;
/// let run_id = RunId::new();
/// let started = std::time::Instant::now();
/// log_op_end!("plan_changeset", run_id, started, op_count = 2, warning_count = 0);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, $run_id:expr, $started:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
            $($($field)*)?
        );
    };
}

/// Log a failed run with the error kind and its stable code
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError),
/// [`PlanError`](crate::errors::PlanError) included.
///
/// # Example
///
/// ```
/// # use monolayer_core::{log_op_error, errors::PlanError};
/// # use monolayer_core::core_types::RunId;
/// let run_id = RunId::new();
/// let started = std::time::Instant::now();
/// let err = PlanError::InvalidConfig { reason: "unknown key".to_string() };
/// log_op_error!("plan_changeset", run_id, started, err);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $run_id:expr, $started:expr, $err:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*,)?
            "{}",
            ex_err.message()
        );
    }};
}
