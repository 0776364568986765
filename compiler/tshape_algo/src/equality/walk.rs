//! Per-call traversal state.

use rustc_hash::FxHashSet;

use super::{EqualityConfig, EqualityError};
use crate::stack::ensure_sufficient_stack;

/// State of one equality comparison.
pub(crate) struct EqWalk<'c> {
    config: &'c EqualityConfig,
    depth: usize,
    /// Reference pairs currently being compared, by address.
    active: FxHashSet<(usize, usize)>,
}

impl<'c> EqWalk<'c> {
    pub(crate) fn new(config: &'c EqualityConfig) -> Self {
        EqWalk {
            config,
            depth: 0,
            active: FxHashSet::default(),
        }
    }

    pub(crate) fn config(&self) -> &'c EqualityConfig {
        self.config
    }

    /// Run `f` one level deeper.
    pub(crate) fn descend<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, EqualityError>,
    ) -> Result<R, EqualityError> {
        if self.depth >= self.config.max_depth {
            return Err(EqualityError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Compare two referenced instances.
    ///
    /// A pair already under comparison is assumed equal: if it differs
    /// anywhere, that difference is found by the outer comparison.
    pub(crate) fn pair(
        &mut self,
        a: usize,
        b: usize,
        f: impl FnOnce(&mut Self) -> Result<bool, EqualityError>,
    ) -> Result<bool, EqualityError> {
        if a == b || !self.active.insert((a, b)) {
            return Ok(true);
        }
        let result = f(self);
        self.active.remove(&(a, b));
        result
    }
}

/// State of one hash computation.
pub(crate) struct HashWalk<'c> {
    config: &'c EqualityConfig,
    depth: usize,
}

/// Contribution of anything nested past the hash depth.
pub(crate) const TRUNCATED: u64 = 0x9e37_79b9_7f4a_7c15;

impl<'c> HashWalk<'c> {
    pub(crate) fn new(config: &'c EqualityConfig) -> Self {
        HashWalk { config, depth: 0 }
    }

    pub(crate) fn config(&self) -> &'c EqualityConfig {
        self.config
    }

    /// Run `f` one level deeper, or return [`TRUNCATED`] past the limit.
    pub(crate) fn descend(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<u64, EqualityError>,
    ) -> Result<u64, EqualityError> {
        if self.depth >= self.config.hash_depth {
            return Ok(TRUNCATED);
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }
}
