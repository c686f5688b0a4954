//! Structured logging facility for Revline
//!
//! - Single initialization point via `init(profile)`
//! - Boundary logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Only the entry points (`merge_history`, the store's file-level merge) own
//! start/end events. Stages log their recoverable and soft outcomes with
//! `tracing::debug!`/`info!`/`warn!`, always carrying `stage` and the
//! persistent identifier involved.
//!
//! # Usage
//!
//! ```rust
//! use revline_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
