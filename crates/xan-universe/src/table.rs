//! In-memory type universe.
//!
//! `TypeTable` stores named definitions and interns every structural type
//! (arrays, constructed generics) so that structural equality is handle
//! equality: `Dictionary<string, List<string>>` built twice yields the same
//! `TypeId`.
//!
//! All construction goes through `&self`, so a table can be shared across
//! threads while hosts are still declaring types.

use crate::types::{
    AttributeData, Conversion, SpecialType, TypeArgs, TypeId, TypeKind, TypeParamConstraints,
};
use crate::universe::TypeUniverse;
use dashmap::DashMap;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;
use xan_common::LibraryReference;
use xan_common::limits::MAX_TYPE_SHAPE_DEPTH;

/// Global counter for assigning unique instance IDs to `TypeTable` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// Stored type data
// =============================================================================

/// A named class, struct, interface, enum or delegate.
#[derive(Clone, Debug)]
pub(crate) struct NamedType {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) special: SpecialType,
    pub(crate) sealed: bool,
    pub(crate) base: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) type_parameters: TypeArgs,
}

#[derive(Clone, Debug)]
pub(crate) enum TypeData {
    Named(NamedType),
    Array {
        element: TypeId,
    },
    Constructed {
        definition: TypeId,
        arguments: TypeArgs,
    },
    TypeParameter {
        name: String,
        constraints: TypeParamConstraints,
    },
    /// Host-specific kinds the engine only needs to recognize
    /// (errors, modules, submissions, pointers, `dynamic`).
    Opaque {
        name: String,
        kind: TypeKind,
    },
}

// =============================================================================
// NamedTypeBuilder
// =============================================================================

/// Declaration of a named type, consumed by [`TypeTable::declare`].
#[derive(Clone, Debug)]
pub struct NamedTypeBuilder {
    name: String,
    kind: TypeKind,
    special: SpecialType,
    sealed: bool,
    base: Option<TypeId>,
    interfaces: Vec<TypeId>,
    type_parameters: Vec<(String, TypeParamConstraints)>,
}

impl NamedTypeBuilder {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            special: SpecialType::None,
            // Structs and enums can never be derived from.
            sealed: matches!(kind, TypeKind::Struct | TypeKind::Enum),
            base: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Enum)
    }

    pub const fn special(mut self, special: SpecialType) -> Self {
        self.special = special;
        self
    }

    pub const fn sealed(mut self, sealed: bool) -> Self {
        self.sealed = sealed;
        self
    }

    pub const fn base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn interface_impl(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Declare an unconstrained type parameter. Parameters are numbered in
    /// declaration order and their handles are available through
    /// [`TypeUniverse::type_arguments`] on the definition.
    pub fn type_parameter(self, name: impl Into<String>) -> Self {
        self.constrained_type_parameter(name, TypeParamConstraints::default())
    }

    pub fn constrained_type_parameter(
        mut self,
        name: impl Into<String>,
        constraints: TypeParamConstraints,
    ) -> Self {
        self.type_parameters.push((name.into(), constraints));
        self
    }
}

// =============================================================================
// TypeTable
// =============================================================================

/// Thread-safe in-memory [`TypeUniverse`].
pub struct TypeTable {
    /// Unique instance ID for debugging.
    instance_id: u64,

    /// `TypeId` -> stored data
    types: DashMap<TypeId, Arc<TypeData>>,

    /// Qualified metadata name -> named definition
    names: DashMap<String, TypeId>,

    /// Special type -> definition
    specials: DashMap<SpecialType, TypeId>,

    /// Element -> array type
    arrays: DashMap<TypeId, TypeId>,

    /// (definition, arguments) -> constructed type
    constructed: DashMap<(TypeId, TypeArgs), TypeId>,

    /// (source, destination) -> implicit?
    user_conversions: DashMap<(TypeId, TypeId), bool>,

    // Append-only; a writer that panicked cannot leave a half-written entry,
    // so poisoned guards are recovered.
    references: RwLock<Vec<LibraryReference>>,
    attributes: RwLock<Vec<AttributeData>>,

    /// Next available `TypeId`
    next_id: AtomicU32,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    /// Create an empty table. Most hosts want
    /// [`TypeTable::with_core_library`] instead.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "TypeTable::new - creating new instance");
        Self {
            instance_id,
            types: DashMap::new(),
            names: DashMap::new(),
            specials: DashMap::new(),
            arrays: DashMap::new(),
            constructed: DashMap::new(),
            user_conversions: DashMap::new(),
            references: RwLock::new(Vec::new()),
            attributes: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(TypeId::FIRST_VALID),
        }
    }

    fn insert(&self, data: TypeData) -> TypeId {
        let id = TypeId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.types.insert(id, Arc::new(data));
        id
    }

    pub(crate) fn data(&self, ty: TypeId) -> Option<Arc<TypeData>> {
        self.types.get(&ty).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of distinct types stored.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Declare a named type. Redeclaring a name returns the existing handle.
    pub fn declare(&self, builder: NamedTypeBuilder) -> TypeId {
        if let Some(existing) = self.names.get(&builder.name) {
            return *existing;
        }

        let type_parameters: TypeArgs = builder
            .type_parameters
            .into_iter()
            .map(|(name, constraints)| self.type_parameter(name, constraints))
            .collect();
        let special = builder.special;
        let name = builder.name;
        let id = self.insert(TypeData::Named(NamedType {
            name: name.clone(),
            kind: builder.kind,
            special,
            sealed: builder.sealed,
            base: builder.base,
            interfaces: builder.interfaces,
            type_parameters,
        }));
        trace!(
            instance_id = self.instance_id,
            type_id = id.0,
            name = %name,
            "TypeTable::declare"
        );
        self.names.insert(name, id);
        if special != SpecialType::None {
            self.specials.insert(special, id);
        }
        id
    }

    pub fn declare_class(&self, name: &str) -> TypeId {
        let builder = NamedTypeBuilder::class(name);
        self.declare(self.with_default_base(builder, SpecialType::Object))
    }

    pub fn declare_sealed_class(&self, name: &str) -> TypeId {
        let builder = NamedTypeBuilder::class(name).sealed(true);
        self.declare(self.with_default_base(builder, SpecialType::Object))
    }

    pub fn declare_struct(&self, name: &str) -> TypeId {
        let builder = NamedTypeBuilder::structure(name);
        self.declare(self.with_default_base(builder, SpecialType::ValueType))
    }

    pub fn declare_interface(&self, name: &str) -> TypeId {
        self.declare(NamedTypeBuilder::interface(name))
    }

    pub fn declare_enum(&self, name: &str) -> TypeId {
        let builder = NamedTypeBuilder::enumeration(name);
        self.declare(self.with_default_base(builder, SpecialType::Enum))
    }

    fn with_default_base(&self, builder: NamedTypeBuilder, special: SpecialType) -> NamedTypeBuilder {
        match self.special(special) {
            Some(base) => builder.base(base),
            None => builder,
        }
    }

    /// Replace the base type of a named definition.
    pub fn set_base(&self, ty: TypeId, base: TypeId) {
        self.update_named(ty, |named| named.base = Some(base));
    }

    /// Add an implemented interface to a named definition.
    pub fn add_interface(&self, ty: TypeId, interface: TypeId) {
        self.update_named(ty, |named| {
            if !named.interfaces.contains(&interface) {
                named.interfaces.push(interface);
            }
        });
    }

    fn update_named(&self, ty: TypeId, update: impl FnOnce(&mut NamedType)) {
        if let Some(mut entry) = self.types.get_mut(&ty) {
            if let TypeData::Named(named) = Arc::make_mut(entry.value_mut()) {
                update(named);
            }
        }
    }

    /// Declare a free-standing type parameter (method-level generics).
    pub fn type_parameter(&self, name: impl Into<String>, constraints: TypeParamConstraints) -> TypeId {
        self.insert(TypeData::TypeParameter {
            name: name.into(),
            constraints,
        })
    }

    /// A type of a host-specific kind (`Error`, `Module`, `Submission`, ...).
    pub fn opaque_type(&self, name: impl Into<String>, kind: TypeKind) -> TypeId {
        self.insert(TypeData::Opaque {
            name: name.into(),
            kind,
        })
    }

    pub fn error_type(&self, name: impl Into<String>) -> TypeId {
        self.opaque_type(name, TypeKind::Error)
    }

    // =========================================================================
    // Structural types (interned)
    // =========================================================================

    /// Single-dimensional array of `element`.
    pub fn array_of(&self, element: TypeId) -> TypeId {
        if let Some(existing) = self.arrays.get(&element) {
            return *existing;
        }
        *self
            .arrays
            .entry(element)
            .or_insert_with(|| self.insert(TypeData::Array { element }))
    }

    /// Construct `definition<arguments>`.
    ///
    /// Returns `definition` itself when the arguments are exactly its own type
    /// parameters, so the open generic has a single handle.
    pub fn construct(&self, definition: TypeId, arguments: &[TypeId]) -> TypeId {
        let arguments: TypeArgs = SmallVec::from_slice(arguments);
        if let Some(TypeData::Named(named)) = self.data(definition).as_deref() {
            if named.type_parameters == arguments {
                return definition;
            }
        }
        let key = (definition, arguments);
        if let Some(existing) = self.constructed.get(&key) {
            return *existing;
        }
        let arguments = key.1.clone();
        *self.constructed.entry(key).or_insert_with(|| {
            self.insert(TypeData::Constructed {
                definition,
                arguments,
            })
        })
    }

    /// `Nullable<underlying>`, or `None` when the core library is not seeded.
    pub fn nullable_of(&self, underlying: TypeId) -> Option<TypeId> {
        let nullable = self.special(SpecialType::NullableT)?;
        Some(self.construct(nullable, &[underlying]))
    }

    /// Handle of a special type, when declared.
    pub fn special(&self, special: SpecialType) -> Option<TypeId> {
        self.specials.get(&special).map(|entry| *entry)
    }

    /// Handle of a named definition.
    pub fn named(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).map(|entry| *entry)
    }

    // =========================================================================
    // Program-level facts
    // =========================================================================

    pub fn add_reference(&self, reference: LibraryReference) {
        trace!(
            instance_id = self.instance_id,
            reference = %reference,
            "TypeTable::add_reference"
        );
        self.references
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reference);
    }

    pub fn add_assembly_attribute(&self, attribute: AttributeData) {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(attribute);
    }

    /// Register a user-defined conversion operator on `source` or `destination`.
    pub fn add_user_defined_conversion(&self, source: TypeId, destination: TypeId, implicit: bool) {
        self.user_conversions.insert((source, destination), implicit);
    }

    pub(crate) fn user_defined_conversion(&self, source: TypeId, destination: TypeId) -> Option<bool> {
        self.user_conversions
            .get(&(source, destination))
            .map(|entry| *entry)
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Underlying type when `ty` is `Nullable<T>`.
    pub(crate) fn nullable_underlying(&self, ty: TypeId) -> Option<TypeId> {
        match self.data(ty).as_deref() {
            Some(TypeData::Constructed {
                definition,
                arguments,
            }) if self.special_type(*definition) == SpecialType::NullableT => {
                arguments.first().copied()
            }
            _ => None,
        }
    }

    /// Direct supertypes: base type (explicit or implied by kind) followed by
    /// implemented interfaces, with type arguments substituted for
    /// constructed generics.
    fn direct_supertypes(&self, ty: TypeId) -> SmallVec<[TypeId; 4]> {
        let mut out = SmallVec::new();
        match self.data(ty).as_deref() {
            Some(TypeData::Named(named)) => {
                self.push_named_supertypes(named, ty, &[], &[], &mut out);
            }
            Some(TypeData::Constructed {
                definition,
                arguments,
            }) => {
                if let Some(TypeData::Named(named)) = self.data(*definition).as_deref() {
                    self.push_named_supertypes(named, ty, &named.type_parameters, arguments, &mut out);
                }
            }
            _ => {}
        }
        out
    }

    fn push_named_supertypes(
        &self,
        named: &NamedType,
        this: TypeId,
        parameters: &[TypeId],
        arguments: &[TypeId],
        out: &mut SmallVec<[TypeId; 4]>,
    ) {
        let implied_base = match named.kind {
            TypeKind::Struct => self.special(SpecialType::ValueType),
            TypeKind::Enum => self.special(SpecialType::Enum),
            TypeKind::Class | TypeKind::Delegate => self.special(SpecialType::Object),
            _ => None,
        };
        if let Some(base) = named.base.or(implied_base) {
            if base != this {
                out.push(self.substitute(base, parameters, arguments, 0));
            }
        }
        for &interface in &named.interfaces {
            out.push(self.substitute(interface, parameters, arguments, 0));
        }
    }

    /// Replace `parameters` with `arguments` inside `ty`.
    fn substitute(&self, ty: TypeId, parameters: &[TypeId], arguments: &[TypeId], depth: u32) -> TypeId {
        if parameters.is_empty() || depth > MAX_TYPE_SHAPE_DEPTH {
            return ty;
        }
        if let Some(index) = parameters.iter().position(|&p| p == ty) {
            return arguments.get(index).copied().unwrap_or(ty);
        }
        match self.data(ty).as_deref() {
            Some(TypeData::Array { element }) => {
                let element = self.substitute(*element, parameters, arguments, depth + 1);
                self.array_of(element)
            }
            Some(TypeData::Constructed {
                definition,
                arguments: inner,
            }) => {
                let substituted: TypeArgs = inner
                    .iter()
                    .map(|&arg| self.substitute(arg, parameters, arguments, depth + 1))
                    .collect();
                self.construct(*definition, &substituted)
            }
            _ => ty,
        }
    }

    fn is_assignable_at(&self, candidate: TypeId, target: TypeId, depth: u32) -> bool {
        if candidate == target {
            return self.data(candidate).is_some();
        }
        if depth > MAX_TYPE_SHAPE_DEPTH {
            return false;
        }
        let Some(candidate_data) = self.data(candidate) else {
            return false;
        };
        if self.data(target).is_none() {
            return false;
        }

        let candidate_kind = self.type_kind(candidate);
        if matches!(
            candidate_kind,
            TypeKind::Error | TypeKind::Unknown | TypeKind::Pointer
        ) || matches!(self.type_kind(target), TypeKind::Error | TypeKind::Unknown)
        {
            return false;
        }
        if self.special_type(target) == SpecialType::Object {
            return true;
        }

        match &*candidate_data {
            TypeData::Array { element } => self.is_array_assignable(*element, target, depth),
            TypeData::TypeParameter { constraints, .. } => {
                (constraints.value_type && self.special_type(target) == SpecialType::ValueType)
                    || constraints
                        .constraint_types
                        .iter()
                        .any(|&c| self.is_assignable_at(c, target, depth + 1))
            }
            TypeData::Named(_) | TypeData::Constructed { .. } => self
                .direct_supertypes(candidate)
                .into_iter()
                .any(|supertype| supertype == target || self.is_assignable_at(supertype, target, depth + 1)),
            TypeData::Opaque { .. } => false,
        }
    }

    fn is_array_assignable(&self, element: TypeId, target: TypeId, depth: u32) -> bool {
        let element_fits = |target_element: TypeId| {
            element == target_element
                || (self.is_reference_type(element)
                    && self.is_assignable_at(element, target_element, depth + 1))
        };

        match self.data(target).as_deref() {
            Some(TypeData::Array {
                element: target_element,
            }) => element_fits(*target_element),
            Some(TypeData::Named(named)) => {
                matches!(named.special, SpecialType::Array | SpecialType::IEnumerable)
            }
            Some(TypeData::Constructed {
                definition,
                arguments,
            }) => {
                matches!(
                    self.special_type(*definition),
                    SpecialType::IEnumerableT
                        | SpecialType::ICollectionT
                        | SpecialType::IListT
                        | SpecialType::IReadOnlyCollectionT
                        | SpecialType::IReadOnlyListT
                ) && arguments.first().is_some_and(|&arg| element_fits(arg))
            }
            _ => false,
        }
    }

    fn display_at(&self, ty: TypeId, depth: u32) -> String {
        if depth > MAX_TYPE_SHAPE_DEPTH {
            return "...".to_string();
        }
        match self.data(ty).as_deref() {
            None => format!("<unknown {ty}>"),
            Some(TypeData::Named(named)) => match named.special.keyword() {
                Some(keyword) => keyword.to_string(),
                None => {
                    let base = strip_arity(&named.name);
                    if named.type_parameters.is_empty() {
                        base.to_string()
                    } else {
                        let params: Vec<String> = named
                            .type_parameters
                            .iter()
                            .map(|&p| self.display_at(p, depth + 1))
                            .collect();
                        format!("{base}<{}>", params.join(", "))
                    }
                }
            },
            Some(TypeData::Array { element }) => format!("{}[]", self.display_at(*element, depth + 1)),
            Some(TypeData::Constructed {
                definition,
                arguments,
            }) => {
                if self.special_type(*definition) == SpecialType::NullableT {
                    if let Some(&underlying) = arguments.first() {
                        return format!("{}?", self.display_at(underlying, depth + 1));
                    }
                }
                let args: Vec<String> = arguments
                    .iter()
                    .map(|&arg| self.display_at(arg, depth + 1))
                    .collect();
                let definition_name = match self.data(*definition).as_deref() {
                    Some(TypeData::Named(named)) => strip_arity(&named.name).to_string(),
                    _ => format!("<unknown {definition}>"),
                };
                format!("{definition_name}<{}>", args.join(", "))
            }
            Some(TypeData::TypeParameter { name, .. }) => name.clone(),
            Some(TypeData::Opaque { name, .. }) => name.clone(),
        }
    }
}

/// `System.Collections.Generic.List\`1` -> `System.Collections.Generic.List`
fn strip_arity(name: &str) -> &str {
    name.split('`').next().unwrap_or(name)
}

// =============================================================================
// TypeUniverse
// =============================================================================

impl TypeUniverse for TypeTable {
    fn referenced_libraries(&self) -> Vec<LibraryReference> {
        self.references
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve_type_by_qualified_name(&self, name: &str) -> Option<TypeId> {
        self.named(name)
    }

    fn assembly_attributes(&self) -> Vec<AttributeData> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn is_assignable(&self, candidate: TypeId, target: TypeId) -> bool {
        self.is_assignable_at(candidate, target, 0)
    }

    fn classify_conversion(&self, source: TypeId, destination: TypeId) -> Conversion {
        crate::conversions::classify(self, source, destination)
    }

    fn type_kind(&self, ty: TypeId) -> TypeKind {
        match self.data(ty).as_deref() {
            None => TypeKind::Unknown,
            Some(TypeData::Named(named)) => named.kind,
            Some(TypeData::Array { .. }) => TypeKind::Array,
            Some(TypeData::Constructed { definition, .. }) => self.type_kind(*definition),
            Some(TypeData::TypeParameter { .. }) => TypeKind::TypeParameter,
            Some(TypeData::Opaque { kind, .. }) => *kind,
        }
    }

    fn special_type(&self, ty: TypeId) -> SpecialType {
        match self.data(ty).as_deref() {
            Some(TypeData::Named(named)) => named.special,
            _ => SpecialType::None,
        }
    }

    fn array_element_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.data(ty).as_deref() {
            Some(TypeData::Array { element }) => Some(*element),
            _ => None,
        }
    }

    fn type_arguments(&self, ty: TypeId) -> TypeArgs {
        match self.data(ty).as_deref() {
            Some(TypeData::Named(named)) => named.type_parameters.clone(),
            Some(TypeData::Constructed { arguments, .. }) => arguments.clone(),
            _ => TypeArgs::new(),
        }
    }

    fn original_definition(&self, ty: TypeId) -> TypeId {
        match self.data(ty).as_deref() {
            Some(TypeData::Constructed { definition, .. }) => *definition,
            _ => ty,
        }
    }

    fn type_parameter_constraints(&self, ty: TypeId) -> Option<TypeParamConstraints> {
        match self.data(ty).as_deref() {
            Some(TypeData::TypeParameter { constraints, .. }) => Some(constraints.clone()),
            _ => None,
        }
    }

    fn is_sealed(&self, ty: TypeId) -> bool {
        match self.data(ty).as_deref() {
            Some(TypeData::Named(named)) => named.sealed,
            Some(TypeData::Constructed { definition, .. }) => self.is_sealed(*definition),
            Some(TypeData::Array { .. }) => true,
            _ => false,
        }
    }

    fn is_value_type(&self, ty: TypeId) -> bool {
        match self.data(ty).as_deref() {
            Some(TypeData::TypeParameter { constraints, .. }) => constraints.value_type,
            Some(_) => matches!(self.type_kind(ty), TypeKind::Struct | TypeKind::Enum),
            None => false,
        }
    }

    fn is_reference_type(&self, ty: TypeId) -> bool {
        match self.data(ty).as_deref() {
            Some(TypeData::TypeParameter { constraints, .. }) => {
                constraints.reference_type
                    || constraints.constraint_types.iter().any(|&c| {
                        self.type_kind(c) == TypeKind::Class
                            && !matches!(
                                self.special_type(c),
                                SpecialType::Object | SpecialType::ValueType | SpecialType::Enum
                            )
                    })
            }
            Some(_) => matches!(
                self.type_kind(ty),
                TypeKind::Class
                    | TypeKind::Interface
                    | TypeKind::Array
                    | TypeKind::Delegate
                    | TypeKind::Dynamic
            ),
            None => false,
        }
    }

    fn display_name(&self, ty: TypeId) -> String {
        self.display_at(ty, 0)
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
