//! The assembled shape system.
//!
//! A [`ShapeSystem`] owns a fact source, a configuration, and a
//! [`ProviderStore`]. Opening a [`ShapeSession`] for a root set reuses the
//! stored provider for those roots when there is one, so repeated requests
//! share shapes while each session gets its own accessor provider.

use std::sync::Arc;

use tracing::debug;
use tshape_access::{AccessError, TypeShapeProvider};
use tshape_algo::{EqualityConfig, EqualityError, StructuralEquality};
use tshape_diagnostic::DiagnosticBag;
use tshape_ir::{FactSource, TypeRef};
use tshape_types::{build_sharded, BuildOutput, GraphBuilder, ProviderDeclaration, ProviderStore};

use crate::ShapeSystemConfig;

pub struct ShapeSystem<F> {
    facts: F,
    config: ShapeSystemConfig,
    store: ProviderStore,
}

impl<F: FactSource + Sync> ShapeSystem<F> {
    /// A system configured from the environment.
    pub fn new(facts: F) -> Self {
        Self::with_config(facts, ShapeSystemConfig::from_env())
    }

    pub fn with_config(facts: F, config: ShapeSystemConfig) -> Self {
        ShapeSystem {
            facts,
            config,
            store: ProviderStore::new(),
        }
    }

    pub fn facts(&self) -> &F {
        &self.facts
    }

    pub fn config(&self) -> &ShapeSystemConfig {
        &self.config
    }

    pub fn store(&self) -> &ProviderStore {
        &self.store
    }

    /// Open a session over the closure of `roots`, building it on first use.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(roots = roots.len(), mode = %self.config.accessor_mode)
    )]
    pub fn session(&self, roots: &[TypeRef]) -> Result<ShapeSession, AccessError> {
        let output = self.store.get_or_build(&self.facts, roots);
        self.open(output)
    }

    /// Open a session for a provider attached to `declaration`.
    ///
    /// The declaration check is part of the build, so these sessions are not
    /// stored.
    pub fn declared_session(
        &self,
        declaration: &ProviderDeclaration,
        roots: &[TypeRef],
    ) -> Result<ShapeSession, AccessError> {
        let mut builder = GraphBuilder::new(&self.facts);
        builder.declare(declaration);
        builder.add_roots(roots.iter().cloned());
        self.open(Arc::new(builder.build()))
    }

    /// Open a session over several root shards built in parallel.
    pub fn sharded_session(&self, shards: &[Vec<TypeRef>]) -> Result<ShapeSession, AccessError> {
        self.open(Arc::new(build_sharded(&self.facts, shards)))
    }

    fn open(&self, output: Arc<BuildOutput>) -> Result<ShapeSession, AccessError> {
        let provider =
            TypeShapeProvider::new(Arc::clone(&output.provider), self.config.accessor_mode)?;
        debug!(
            provider = %output.provider.id(),
            shapes = output.provider.len(),
            diagnostics = output.diagnostics.len(),
            "opened shape session"
        );
        Ok(ShapeSession {
            output,
            provider,
            equality: self.config.equality.clone(),
        })
    }
}

/// Shapes and accessors for one root set, plus what was reported building
/// them.
#[derive(Clone)]
pub struct ShapeSession {
    output: Arc<BuildOutput>,
    provider: TypeShapeProvider,
    equality: EqualityConfig,
}

impl ShapeSession {
    pub fn provider(&self) -> &TypeShapeProvider {
        &self.provider
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.output.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.output.has_errors()
    }

    /// Whether two sessions share one built provider.
    pub fn shares_shapes_with(&self, other: &ShapeSession) -> bool {
        Arc::ptr_eq(&self.output, &other.output)
    }

    /// Structural equality over every shape in this session.
    pub fn equality(&self) -> Result<StructuralEquality, EqualityError> {
        StructuralEquality::build(&self.provider, self.equality.clone())
    }
}
