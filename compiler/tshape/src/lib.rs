//! Type-shape reflection.
//!
//! Give tshape a set of root types and a [`FactSource`] that answers
//! structural questions about them. It discovers every type reachable from
//! the roots, assigns each one a [`TypeShape`], and exposes callable member
//! accessors so generic algorithms can read, build, and compare values of
//! any shaped type without type-specific code.
//!
//! ```text
//! roots + facts ──► GraphBuilder ──► ShapeProvider ──► TypeShapeProvider ──► algorithms
//!                   (classifier)     (immutable)       (accessors)           (DeferredBinding)
//! ```
//!
//! [`ShapeSystem`] wires the stages together and caches built providers per
//! root set.

mod config;
mod system;

use std::sync::Once;

pub use config::{ShapeSystemConfig, ACCESSOR_MODE_VAR};
pub use system::{ShapeSession, ShapeSystem};

pub use tshape_access::{
    default_value, primitive_default, AccessError, Accessor, AccessorKey, AccessorMode,
    AheadOfTimeAccessors, ArgumentState, Contents, LazyAccessors, ListRef, MapRef,
    MemberAccessorProvider, ObjectRef, TypeAccessors, TypeShapeProvider, Value,
};
pub use tshape_algo::{
    ensure_sufficient_stack, ByteOrdinal, CharOrdinal, CharOrdinalIgnoreCase, DeferredBinding,
    DeferredError, DeferredHandle, EqualityConfig, EqualityError, SpanEquality,
    StringComparison, StructuralEquality, TypeComparer,
};
pub use tshape_diagnostic::{Diagnostic, DiagnosticBag, ErrorCode, ErrorDocs, Location, Severity};
pub use tshape_ir::{
    ConstructorFacts, ContainerContract, FactRegistry, FactSource, MemberFacts, MemberFlags,
    ParameterFacts, Primitive, TypeFacts, TypeIdentity, TypeKind, TypeRef, UnsupportedKind,
};
pub use tshape_types::{
    build_provider, build_sharded, BuildOutput, ConstructionStrategy, ConstructorShape,
    DictionaryKind, DictionaryShape, EnumMember, EnumShape, EnumerableShape, Factories,
    GraphBuilder, NullableShape, ObjectShape, ParameterShape, PropertyShape, ProviderDeclaration, ProviderId,
    ProviderStore, ShapeCategory, ShapeError, ShapeKind, ShapeProvider, TypeShape, ADD_METHOD,
};

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=tshape_types=debug cargo test -p tshape
/// RUST_LOG=tshape_types::graph=trace cargo test -p tshape
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
