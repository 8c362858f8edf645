//! Program builders shared by the solver's unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use xan_common::{LibraryReference, LibraryVersion};
use xan_universe::framework::declare_reference;
use xan_universe::types::TypeArgs;
use xan_universe::{
    AttributeData, Conversion, SpecialType, TypeId, TypeKind, TypeParamConstraints, TypeTable,
    TypeUniverse,
};

/// A table with the core library and the given `(name, version)` references.
pub(crate) fn program(references: &[(&str, &str)]) -> TypeTable {
    let table = TypeTable::with_core_library();
    for &(name, version) in references {
        let version: LibraryVersion = version.parse().expect("valid test version");
        declare_reference(&table, LibraryReference::versioned(name, version));
    }
    table
}

pub(crate) fn special(table: &TypeTable, special: SpecialType) -> TypeId {
    table.special(special).expect("core library declares special type")
}

pub(crate) fn named(table: &TypeTable, name: &str) -> TypeId {
    table.named(name).expect("type is declared")
}

pub(crate) fn version(text: &str) -> LibraryVersion {
    text.parse().expect("valid test version")
}

/// Wraps a table and counts qualified-name lookups. Optionally makes one
/// array type its own element, a shape no table can build.
pub(crate) struct CountingUniverse {
    pub(crate) table: TypeTable,
    lookups: AtomicUsize,
    self_nested_array: Option<TypeId>,
}

impl CountingUniverse {
    pub(crate) fn new(table: TypeTable) -> Self {
        Self {
            table,
            lookups: AtomicUsize::new(0),
            self_nested_array: None,
        }
    }

    pub(crate) fn with_self_nested_array(mut self, array: TypeId) -> Self {
        self.self_nested_array = Some(array);
        self
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TypeUniverse for CountingUniverse {
    fn referenced_libraries(&self) -> Vec<LibraryReference> {
        self.table.referenced_libraries()
    }

    fn resolve_type_by_qualified_name(&self, name: &str) -> Option<TypeId> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.table.resolve_type_by_qualified_name(name)
    }

    fn assembly_attributes(&self) -> Vec<AttributeData> {
        self.table.assembly_attributes()
    }

    fn is_assignable(&self, candidate: TypeId, target: TypeId) -> bool {
        self.table.is_assignable(candidate, target)
    }

    fn classify_conversion(&self, source: TypeId, destination: TypeId) -> Conversion {
        self.table.classify_conversion(source, destination)
    }

    fn type_kind(&self, ty: TypeId) -> TypeKind {
        self.table.type_kind(ty)
    }

    fn special_type(&self, ty: TypeId) -> SpecialType {
        self.table.special_type(ty)
    }

    fn array_element_type(&self, ty: TypeId) -> Option<TypeId> {
        if self.self_nested_array == Some(ty) {
            return Some(ty);
        }
        self.table.array_element_type(ty)
    }

    fn type_arguments(&self, ty: TypeId) -> TypeArgs {
        self.table.type_arguments(ty)
    }

    fn original_definition(&self, ty: TypeId) -> TypeId {
        self.table.original_definition(ty)
    }

    fn type_parameter_constraints(&self, ty: TypeId) -> Option<TypeParamConstraints> {
        self.table.type_parameter_constraints(ty)
    }

    fn is_sealed(&self, ty: TypeId) -> bool {
        self.table.is_sealed(ty)
    }

    fn is_value_type(&self, ty: TypeId) -> bool {
        self.table.is_value_type(ty)
    }

    fn is_reference_type(&self, ty: TypeId) -> bool {
        self.table.is_reference_type(ty)
    }

    fn display_name(&self, ty: TypeId) -> String {
        self.table.display_name(ty)
    }
}
