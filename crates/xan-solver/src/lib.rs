//! Capability & Compatibility Solver
//!
//! The three decision procedures the analyzer rules depend on, expressed as
//! pure functions over a [`TypeUniverse`](xan_universe::TypeUniverse):
//!
//! - **Capability resolution**: [`CapabilityResolver`] scans the referenced
//!   libraries and produces an immutable [`CapabilitySnapshot`] with version
//!   gated feature flags and cached handles to well-known types
//! - **Conversion compatibility**: [`is_convertible`] mirrors the coercions
//!   the test framework applies when binding data to theory parameters
//! - **Serializability**: [`SerializabilityClassifier`] grades a type
//!   `Always`, `Possibly` or `Never`, and [`should_ignore`] flags shapes
//!   where static reasoning is unreliable
//!
//! Absence is never an error: an unreferenced family yields the empty
//! context, an unresolved type yields `None`, and every flag of an absent
//! family reads `false`.
pub mod contexts;
mod conversion;
mod query_trace;
mod resolver;
mod serializability;
mod snapshot;
pub mod well_known;

pub use contexts::{
    AbstractionsCapabilities, AssertCapabilities, CapabilityContext, CoreCapabilities,
    EmptyContext, ExecutionCapabilities, RunnerUtilityCapabilities,
};
pub use conversion::is_convertible;
pub use resolver::{CapabilityResolver, VersionOverrides};
pub use serializability::{SerializabilityClassifier, SerializabilityTier, should_ignore};
pub use snapshot::{CapabilitySnapshot, FeatureFlags};
pub use well_known::{SystemType, WellKnownType};

#[cfg(test)]
#[path = "../tests/test_support.rs"]
mod test_support;
