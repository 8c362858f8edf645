//! xan: capability and compatibility reasoning for xUnit test analyzers.
//!
//! This crate is the facade over the workspace. Hosts build (or adapt) a
//! [`TypeUniverse`], resolve a [`CapabilitySnapshot`] once per program, and
//! then ask the three questions analyzer rules need answered:
//!
//! ```ignore
//! let table = TypeTable::with_core_library();
//! framework::declare_reference(&table, LibraryReference::versioned("xunit.core", "2.4.2".parse()?));
//!
//! let snapshot = CapabilityResolver::new(&table).resolve();
//! snapshot.core().supports_parameter_arrays();        // capability
//! is_convertible(string, guid, &snapshot);            // conversion
//! SerializabilityClassifier::new(&snapshot).classify(ty); // serializability
//! ```

// Shared vocabulary: library references, versions, framework families, limits
pub use xan_common as common;
pub use xan_common::{
    Concern, Generation, LibraryFamily, LibraryReference, LibraryVersion, VersionParseError,
};

// Type universe query surface and the in-memory table
pub use xan_universe as universe;
pub use xan_universe::framework;
pub use xan_universe::{
    AttributeData, Conversion, NamedTypeBuilder, SpecialType, TypeId, TypeKind,
    TypeParamConstraints, TypeTable, TypeUniverse,
};

// Capability resolution, conversion compatibility and serializability
pub use xan_solver as solver;
pub use xan_solver::{
    AbstractionsCapabilities, AssertCapabilities, CapabilityContext, CapabilityResolver,
    CapabilitySnapshot, CoreCapabilities, EmptyContext, ExecutionCapabilities, FeatureFlags,
    RunnerUtilityCapabilities, SerializabilityClassifier, SerializabilityTier, SystemType,
    VersionOverrides, WellKnownType, is_convertible, should_ignore,
};

// Tracing configuration (`XAN_LOG`, `XAN_LOG_FORMAT`)
pub mod tracing_config;
