//! Accessors synthesized on first request.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tshape_ir::TypeIdentity;
use tshape_types::ShapeProvider;

use crate::synth::synthesize;
use crate::{AccessError, Accessor, AccessorKey, MemberAccessorProvider};

/// Synthesizes each operation the first time it is requested and memoizes
/// it per `(owner, operation)`.
///
/// Synthesis runs outside the lock. When two threads race on the same key,
/// the first to insert wins and both receive that instance.
pub struct LazyAccessors {
    provider: Arc<ShapeProvider>,
    memo: RwLock<FxHashMap<(TypeIdentity, AccessorKey), Accessor>>,
}

impl LazyAccessors {
    pub fn new(provider: Arc<ShapeProvider>) -> Self {
        LazyAccessors {
            provider,
            memo: RwLock::new(FxHashMap::default()),
        }
    }

    /// Number of operations synthesized so far.
    pub fn synthesized(&self) -> usize {
        self.memo.read().len()
    }
}

impl MemberAccessorProvider for LazyAccessors {
    fn accessor(&self, owner: &TypeIdentity, key: AccessorKey) -> Result<Accessor, AccessError> {
        let memo_key = (owner.clone(), key);
        if let Some(accessor) = self.memo.read().get(&memo_key) {
            return Ok(accessor.clone());
        }

        let accessor = synthesize(&self.provider, owner, key)?;

        let mut memo = self.memo.write();
        Ok(memo.entry(memo_key).or_insert(accessor).clone())
    }
}

#[cfg(test)]
mod tests;
