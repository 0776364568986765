//! System configuration.

use tracing::warn;
use tshape_access::AccessorMode;
use tshape_algo::EqualityConfig;

/// Environment variable selecting the accessor mode (`aot` or `lazy`).
pub const ACCESSOR_MODE_VAR: &str = "TSHAPE_ACCESSORS";

/// Settings shared by every session of a [`ShapeSystem`](crate::ShapeSystem).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeSystemConfig {
    /// How member accessors are produced for each session.
    pub accessor_mode: AccessorMode,
    /// Settings for [`ShapeSession::equality`](crate::ShapeSession::equality).
    pub equality: EqualityConfig,
}

impl ShapeSystemConfig {
    /// Every accessor synthesized when a session is opened.
    pub fn ahead_of_time() -> Self {
        ShapeSystemConfig {
            accessor_mode: AccessorMode::AheadOfTime,
            ..Self::default()
        }
    }

    /// Defaults, overridden by `TSHAPE_ACCESSORS` when it is set.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// An unrecognized value is logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(ACCESSOR_MODE_VAR) {
            match raw.parse::<AccessorMode>() {
                Ok(mode) => config.accessor_mode = mode,
                Err(reason) => warn!(var = ACCESSOR_MODE_VAR, %reason, "ignoring accessor mode"),
            }
        }
        config
    }

    #[must_use]
    pub fn with_accessor_mode(mut self, mode: AccessorMode) -> Self {
        self.accessor_mode = mode;
        self
    }

    #[must_use]
    pub fn with_equality(mut self, equality: EqualityConfig) -> Self {
        self.equality = equality;
        self
    }
}
