/// How strings compare.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StringComparison {
    /// Exact code point comparison.
    #[default]
    Ordinal,
    /// Code point comparison after uppercase folding.
    OrdinalIgnoreCase,
}

/// Configuration for [`StructuralEquality`](super::StructuralEquality).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EqualityConfig {
    /// Deepest nesting a comparison may reach before failing with
    /// [`EqualityError::DepthExceeded`](super::EqualityError::DepthExceeded).
    pub max_depth: usize,
    /// Levels of nesting that contribute to a hash. Deeper values are
    /// ignored, which keeps hashes of cyclic values finite.
    pub hash_depth: usize,
    pub strings: StringComparison,
}

impl Default for EqualityConfig {
    fn default() -> Self {
        EqualityConfig {
            max_depth: 1024,
            hash_depth: 8,
            strings: StringComparison::Ordinal,
        }
    }
}

impl EqualityConfig {
    /// Default limits with case-insensitive strings.
    pub fn ignore_case() -> Self {
        EqualityConfig {
            strings: StringComparison::OrdinalIgnoreCase,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
