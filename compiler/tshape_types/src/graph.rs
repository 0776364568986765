//! Type-graph traversal.
//!
//! Breadth-first walk over the types reachable from a root set. Each type is
//! classified once; its shape is claimed in the result map before any of its
//! dependents are visited, so cycles in the type graph terminate.

use std::collections::VecDeque;
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};
use tshape_diagnostic::{missing_facts, provider_not_extensible, unsupported_root, DiagnosticBag};
use tshape_ir::{FactSource, TypeIdentity, TypeRef};

use crate::{ShapeClassifier, ShapeKind, ShapeProvider};

/// A declaration enclosing the provider declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainingDeclaration {
    pub name: String,
    pub extensible: bool,
}

/// The host declaration that generated shapes will be attached to.
///
/// The provider and every declaration containing it must accept generated
/// members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDeclaration {
    pub name: String,
    pub extensible: bool,
    /// Enclosing declarations, innermost first.
    pub containing: Vec<ContainingDeclaration>,
}

impl ProviderDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        ProviderDeclaration {
            name: name.into(),
            extensible: true,
            containing: Vec::new(),
        }
    }

    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.extensible = false;
        self
    }

    #[must_use]
    pub fn nested_in(mut self, name: impl Into<String>, extensible: bool) -> Self {
        self.containing.push(ContainingDeclaration {
            name: name.into(),
            extensible,
        });
        self
    }

    /// The first declaration, starting from the provider itself, that does
    /// not accept generated members.
    pub fn first_sealed(&self) -> Option<&str> {
        if !self.extensible {
            return Some(&self.name);
        }
        self.containing
            .iter()
            .find(|c| !c.extensible)
            .map(|c| c.name.as_str())
    }
}

/// A built provider plus everything reported while building it.
#[derive(Debug)]
pub struct BuildOutput {
    pub provider: Arc<ShapeProvider>,
    pub diagnostics: DiagnosticBag,
}

impl BuildOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Collects roots and walks their transitive closure.
pub struct GraphBuilder<'f, F: ?Sized> {
    classifier: ShapeClassifier<'f, F>,
    pending: VecDeque<TypeRef>,
    /// Identities currently sitting in `pending`.
    queued: FxHashSet<TypeIdentity>,
    resolved: FxHashMap<TypeIdentity, ShapeKind>,
    diagnostics: DiagnosticBag,
}

impl<'f, F: FactSource + ?Sized> GraphBuilder<'f, F> {
    pub fn new(facts: &'f F) -> Self {
        GraphBuilder {
            classifier: ShapeClassifier::new(facts),
            pending: VecDeque::new(),
            queued: FxHashSet::default(),
            resolved: FxHashMap::default(),
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Check the declaration the provider will be attached to.
    ///
    /// A sealed declaration is reported but does not stop the build.
    pub fn declare(&mut self, declaration: &ProviderDeclaration) {
        if let Some(offending) = declaration.first_sealed() {
            debug!(provider = %declaration.name, offending, "provider declaration is sealed");
            self.diagnostics
                .push(provider_not_extensible(&declaration.name, offending));
        }
    }

    /// Queue a root type. Returns `false` if the root was rejected.
    pub fn add_root(&mut self, root: TypeRef) -> bool {
        if let Some(reason) = root.unsupported_reason() {
            let id = root.identity();
            debug!(root = %id, %reason, "rejected shape root");
            self.diagnostics.push(unsupported_root(id, reason));
            return false;
        }
        self.enqueue(root);
        true
    }

    pub fn add_roots(&mut self, roots: impl IntoIterator<Item = TypeRef>) {
        for root in roots {
            self.add_root(root);
        }
    }

    fn enqueue(&mut self, ty: TypeRef) {
        let id = ty.identity();
        if self.resolved.contains_key(&id) || !self.queued.insert(id) {
            return;
        }
        self.pending.push_back(ty);
    }

    /// Walk the closure of the queued roots and freeze the result.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = self.pending.len()))]
    pub fn build(mut self) -> BuildOutput {
        while let Some(ty) = self.pending.pop_front() {
            let id = ty.identity();
            self.queued.remove(&id);
            if self.resolved.contains_key(&id) {
                continue;
            }

            let classification = self.classifier.classify(&ty);
            trace!(
                ty = %id,
                category = %classification.kind.category(),
                dependents = classification.dependents.len(),
                "classified"
            );
            if classification.facts_missing {
                warn!(ty = %id, "no structural facts; shaping as an empty object");
                self.diagnostics.push(missing_facts(id.clone()));
            }

            // Claim before visiting dependents.
            self.resolved.insert(id, classification.kind);
            for dependent in classification.dependents {
                self.enqueue(dependent);
            }
        }

        debug!(
            shapes = self.resolved.len(),
            diagnostics = self.diagnostics.len(),
            "shape graph complete"
        );
        BuildOutput {
            provider: Arc::new(ShapeProvider::from_resolved(self.resolved)),
            diagnostics: self.diagnostics,
        }
    }
}

/// Build a provider for `roots` in one pass.
pub fn build_provider<F: FactSource + ?Sized>(
    facts: &F,
    roots: impl IntoIterator<Item = TypeRef>,
) -> BuildOutput {
    let mut builder = GraphBuilder::new(facts);
    builder.add_roots(roots);
    builder.build()
}

/// Build independent root shards in parallel and merge them into one
/// provider.
///
/// Shapes reachable from several shards are kept once. Diagnostics are
/// concatenated in shard order with exact duplicates removed.
#[tracing::instrument(level = "debug", skip_all, fields(shards = shards.len()))]
pub fn build_sharded<F: FactSource + Sync + ?Sized>(
    facts: &F,
    shards: &[Vec<TypeRef>],
) -> BuildOutput {
    let outputs: Vec<BuildOutput> = shards
        .par_iter()
        .map(|roots| build_provider(facts, roots.iter().cloned()))
        .collect();

    let provider = ShapeProvider::merge(outputs.iter().map(|o| &*o.provider));

    let mut diagnostics = DiagnosticBag::new();
    let mut seen = FxHashSet::default();
    for output in outputs {
        for diagnostic in output.diagnostics.into_vec() {
            if seen.insert(diagnostic.clone()) {
                diagnostics.push(diagnostic);
            }
        }
    }

    BuildOutput {
        provider: Arc::new(provider),
        diagnostics,
    }
}

#[cfg(test)]
mod tests;
