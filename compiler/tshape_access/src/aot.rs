//! Accessors synthesized ahead of time.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;
use tshape_ir::TypeIdentity;
use tshape_types::ShapeProvider;

use crate::synth::{available_keys, synthesize};
use crate::{AccessError, Accessor, AccessorKey, MemberAccessorProvider};

/// Synthesizes every available operation of every shape up front.
pub struct AheadOfTimeAccessors {
    provider: Arc<ShapeProvider>,
    table: FxHashMap<(TypeIdentity, AccessorKey), Accessor>,
}

impl AheadOfTimeAccessors {
    /// Emit the full accessor table for `provider`.
    #[tracing::instrument(level = "debug", skip_all, fields(shapes = provider.len()))]
    pub fn emit(provider: Arc<ShapeProvider>) -> Result<Self, AccessError> {
        let mut table = FxHashMap::default();
        for shape in provider.iter() {
            for key in available_keys(shape) {
                let accessor = synthesize(&provider, shape.id(), key)?;
                table.insert((shape.id().clone(), key), accessor);
            }
        }
        debug!(accessors = table.len(), "emitted accessor table");
        Ok(AheadOfTimeAccessors { provider, table })
    }

    /// Number of emitted operations.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl MemberAccessorProvider for AheadOfTimeAccessors {
    fn accessor(&self, owner: &TypeIdentity, key: AccessorKey) -> Result<Accessor, AccessError> {
        if let Some(accessor) = self.table.get(&(owner.clone(), key)) {
            return Ok(accessor.clone());
        }
        // Not emitted: report the same error on-demand synthesis would.
        match synthesize(&self.provider, owner, key) {
            Err(error) => Err(error),
            Ok(_) => Err(AccessError::unavailable(owner, key)),
        }
    }
}
