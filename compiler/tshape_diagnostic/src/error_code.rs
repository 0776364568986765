//! Error codes for shape diagnostics.

use std::fmt;

/// Error codes for all shape diagnostics.
///
/// Format: S#### where the first digit indicates the stage:
/// - S0xxx: Root and declaration validation
/// - S1xxx: Graph traversal
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    /// Root type cannot be shaped
    S0001,
    /// Provider declaration is not extensible
    S0002,
    /// No structural facts for a discovered type
    S1001,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[ErrorCode::S0001, ErrorCode::S0002, ErrorCode::S1001];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::S0001 => "S0001",
            ErrorCode::S0002 => "S0002",
            ErrorCode::S1001 => "S1001",
        }
    }

    /// One-line description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::S0001 => "root type cannot be shaped",
            ErrorCode::S0002 => "provider declaration is not extensible",
            ErrorCode::S1001 => "no structural facts for type",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"S0001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
