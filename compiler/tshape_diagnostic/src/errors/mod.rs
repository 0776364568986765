//! Embedded error documentation.
//!
//! Each error code has a markdown file explaining the problem and how to fix
//! it. The files are embedded at compile time and looked up through
//! `ErrorDocs::get()`.
//!
//! # Adding New Documentation
//!
//! 1. Create a new file `SXXXX.md` in this directory
//! 2. Add an entry to the `DOCS` array below

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Get the documentation for an error code.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    /// Get all documented error codes.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }

    /// Check if an error code has documentation.
    pub fn has_docs(code: ErrorCode) -> bool {
        DOCS.iter().any(|(c, _)| *c == code)
    }
}

static DOCS: &[(ErrorCode, &str)] = &[
    // Validation (S0xxx)
    (ErrorCode::S0001, include_str!("S0001.md")),
    (ErrorCode::S0002, include_str!("S0002.md")),
    // Traversal (S1xxx)
    (ErrorCode::S1001, include_str!("S1001.md")),
];
