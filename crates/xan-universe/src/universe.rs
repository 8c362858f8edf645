//! The query surface the analyzer engine consumes.

use crate::types::{AttributeData, Conversion, SpecialType, TypeArgs, TypeId, TypeKind, TypeParamConstraints};
use xan_common::LibraryReference;

/// Read-only view over one analyzed program's type system.
///
/// Implementations must answer every query for every handle they produced.
/// A handle the universe does not recognize is answered with absence
/// (`TypeKind::Unknown`, `SpecialType::None`, empty lists, `false`); no
/// query may panic.
///
/// The engine never mutates a universe, and snapshots built over one are
/// shared across threads, hence the `Send + Sync` bound.
pub trait TypeUniverse: Send + Sync {
    // =========================================================================
    // Libraries and lookup
    // =========================================================================

    /// Every library the program references, in host order.
    fn referenced_libraries(&self) -> Vec<LibraryReference>;

    /// First referenced library whose name satisfies `predicate`.
    fn find_referenced_library(&self, predicate: &dyn Fn(&str) -> bool) -> Option<LibraryReference> {
        self.referenced_libraries()
            .into_iter()
            .find(|reference| predicate(&reference.name))
    }

    /// Resolve a type by fully qualified metadata name
    /// (`System.Collections.Generic.List\`1`).
    fn resolve_type_by_qualified_name(&self, name: &str) -> Option<TypeId>;

    /// Assembly-level attributes applied by the program.
    fn assembly_attributes(&self) -> Vec<AttributeData>;

    // =========================================================================
    // Relations
    // =========================================================================

    /// Whether a value of `candidate` can be stored in a `target` slot by an
    /// identity, reference, or boxing conversion.
    fn is_assignable(&self, candidate: TypeId, target: TypeId) -> bool;

    /// Built-in conversion classification from `source` to `destination`.
    fn classify_conversion(&self, source: TypeId, destination: TypeId) -> Conversion;

    // =========================================================================
    // Shape
    // =========================================================================

    fn type_kind(&self, ty: TypeId) -> TypeKind;

    fn special_type(&self, ty: TypeId) -> SpecialType;

    /// Element type when `ty` is an array.
    fn array_element_type(&self, ty: TypeId) -> Option<TypeId>;

    /// Type arguments of a constructed generic (or the type parameters of a
    /// generic definition). Empty for non-generic types.
    fn type_arguments(&self, ty: TypeId) -> TypeArgs;

    /// Generic definition of a constructed type; `ty` itself otherwise.
    fn original_definition(&self, ty: TypeId) -> TypeId;

    /// Constraints when `ty` is a type parameter.
    fn type_parameter_constraints(&self, ty: TypeId) -> Option<TypeParamConstraints>;

    fn is_sealed(&self, ty: TypeId) -> bool;

    fn is_value_type(&self, ty: TypeId) -> bool;

    fn is_reference_type(&self, ty: TypeId) -> bool;

    /// Human-readable name for logs and reports.
    fn display_name(&self, ty: TypeId) -> String;
}
