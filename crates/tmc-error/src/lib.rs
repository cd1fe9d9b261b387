//! # tmc-error
//!
//! Unified error handling for tmc.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., Structural, IdCollision)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! Every `Error` is fatal: it aborts the current pipeline invocation.
//! Non-fatal findings are not errors at all; they accumulate as
//! diagnostics on the extraction side and ride along on the IR bundle.
//!
//! ## Usage
//!
//! ```rust
//! use tmc_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::Structural, "node is its own child")
//!         .with_operation("ast::attach")
//!         .with_context("node_id", "n42"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible pipeline functions return `Result<T, tmc_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the tmc Error
pub type Result<T> = std::result::Result<T, Error>;
