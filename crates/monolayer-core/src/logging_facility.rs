//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Run boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//!   carrying the run id and the canonical field names in
//!   `monolayer_core_types::schema`
//! - In-memory capture for test assertions
//!
//! # Usage
//!
//! ```rust
//! use monolayer_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! The planning entry point logs one start and one end (or end_error) event
//! per run, each carrying the run id. Per-difference and per-operation
//! detail is logged at debug level.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
