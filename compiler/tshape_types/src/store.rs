//! Shared cache of built providers.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;
use tshape_ir::{FactSource, TypeIdentity, TypeRef};

use crate::{build_provider, BuildOutput};

/// Maps a root set to the provider built for it.
///
/// Keys are the sorted, deduplicated identities of the roots, so the same
/// roots given in any order share one entry. Builds run outside the lock; if
/// two threads build the same key concurrently, the first to insert wins and
/// both observe that output.
#[derive(Default)]
pub struct ProviderStore {
    entries: RwLock<FxHashMap<Vec<TypeIdentity>, Arc<BuildOutput>>>,
}

impl ProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(roots: &[TypeRef]) -> Vec<TypeIdentity> {
        let mut key: Vec<_> = roots.iter().map(TypeRef::identity).collect();
        key.sort();
        key.dedup();
        key
    }

    /// The stored output for `roots`, if one was built.
    pub fn get(&self, roots: &[TypeRef]) -> Option<Arc<BuildOutput>> {
        self.entries.read().get(&Self::key(roots)).cloned()
    }

    /// The stored output for `roots`, building it on first request.
    pub fn get_or_build<F: FactSource + ?Sized>(
        &self,
        facts: &F,
        roots: &[TypeRef],
    ) -> Arc<BuildOutput> {
        let key = Self::key(roots);
        if let Some(output) = self.entries.read().get(&key) {
            return Arc::clone(output);
        }

        let built = Arc::new(build_provider(facts, roots.iter().cloned()));

        let mut entries = self.entries.write();
        let entry = entries.entry(key).or_insert_with(|| {
            debug!(shapes = built.provider.len(), "stored new provider");
            Arc::clone(&built)
        });
        Arc::clone(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
