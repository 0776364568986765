//! Late-bound values.
//!
//! A [`DeferredBinding`] hands out read handles before its value exists.
//! Builders of recursive structures give a handle to whatever needs the
//! value, finish building, then bind. Reading through a handle before that
//! point is an error rather than a hang or a panic.

use std::fmt;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DeferredError {
    #[error("deferred value is already bound")]
    DoubleBinding,
    #[error("deferred value was read before it was bound")]
    Unbound,
}

/// The write side: bound exactly once.
pub struct DeferredBinding<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> DeferredBinding<T> {
    pub fn new() -> Self {
        DeferredBinding {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// A read handle, usable before the value is bound.
    pub fn handle(&self) -> DeferredHandle<T> {
        DeferredHandle {
            cell: Arc::clone(&self.cell),
        }
    }

    /// Publish the value to every handle.
    pub fn bind(&self, value: T) -> Result<(), DeferredError> {
        self.cell.set(value).map_err(|_| DeferredError::DoubleBinding)
    }

    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for DeferredBinding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DeferredBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredBinding")
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// The read side of a [`DeferredBinding`].
pub struct DeferredHandle<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> DeferredHandle<T> {
    pub fn get(&self) -> Result<&T, DeferredError> {
        self.cell.get().ok_or(DeferredError::Unbound)
    }

    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Clone for DeferredHandle<T> {
    fn clone(&self) -> Self {
        DeferredHandle {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for DeferredHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredHandle")
            .field("bound", &self.is_bound())
            .finish()
    }
}
