//! Diagnostics for shape provider construction.
//!
//! Every diagnostic carries:
//! - An error code for searchability (`S0001`)
//! - A severity
//! - A message (what went wrong)
//! - A location (which type or declaration it concerns)
//! - Optional notes and suggestions
//!
//! Diagnostics never abort a build. They are collected in a
//! [`DiagnosticBag`] and returned next to the best-effort result.

mod bag;
mod diagnostic;
mod error_code;
pub mod errors;

pub use bag::DiagnosticBag;
pub use diagnostic::{
    missing_facts, provider_not_extensible, unsupported_root, Diagnostic, Location, Severity,
};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
