//! Type Universe
//!
//! The analyzer engine never walks syntax or symbols itself. Everything it
//! knows about the program under analysis comes through the [`TypeUniverse`]
//! query surface defined here:
//!
//! - **Libraries**: which assemblies (and versions) the program references
//! - **Lookup**: resolve a type by its qualified metadata name
//! - **Relations**: assignability and conversion classification
//! - **Shape**: kind, special type, array element, generic arguments,
//!   type-parameter constraints
//!
//! [`TypeTable`] is a thread-safe, in-memory implementation used by the
//! command-line host and by tests. It can be seeded with the core library
//! ([`TypeTable::with_core_library`]) and with the public surface of the
//! xUnit assemblies ([`framework::declare_reference`]).
mod conversions;
mod corlib;
pub mod framework;
mod table;
pub mod types;
mod universe;

pub use table::{NamedTypeBuilder, TypeTable};
pub use types::{
    AttributeData, Conversion, SpecialType, TypeId, TypeKind, TypeParamConstraints,
};
pub use universe::TypeUniverse;
