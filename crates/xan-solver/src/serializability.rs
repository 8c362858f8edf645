//! Serializability classification.
//!
//! Theory data crosses a serialization boundary when test cases are
//! enumerated ahead of execution. [`SerializabilityClassifier`] grades how
//! confident the analyzer can be that values of a type survive the round
//! trip; [`should_ignore`] marks shapes where it should not try.

use crate::query_trace::Query;
use crate::snapshot::CapabilitySnapshot;
use crate::well_known::{SystemType, WellKnownType};
use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, warn};
use xan_common::limits::MAX_TYPE_SHAPE_DEPTH;
use xan_universe::{SpecialType, TypeId, TypeKind, TypeUniverse};

/// Confidence that a type's values serialize, ordered
/// `Never < Possibly < Always`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializabilityTier {
    /// Reject.
    Never,
    /// Accept, but warn: the run-time type may differ from the static one.
    Possibly,
    /// Accept.
    Always,
}

impl SerializabilityTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Possibly => "possibly",
            Self::Always => "always",
        }
    }
}

impl fmt::Display for SerializabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Library types that always round-trip.
const ALWAYS_SERIALIZABLE_SYSTEM_TYPES: [SystemType; 5] = [
    SystemType::BigInteger,
    SystemType::DateTimeOffset,
    SystemType::TimeSpan,
    SystemType::DateOnly,
    SystemType::TimeOnly,
];

/// Classifier bound to one snapshot.
///
/// Construction gathers the marker interfaces and the serializer
/// registrations of the program once; [`classify`](Self::classify) is then a
/// pure walk over the type's shape.
pub struct SerializabilityClassifier<'s, 'u> {
    snapshot: &'s CapabilitySnapshot<'u>,
    /// Serialization marker interfaces of either generation.
    markers: SmallVec<[TypeId; 2]>,
    /// Types the program registered a custom serializer for.
    registered: FxHashSet<TypeId>,
}

impl<'s, 'u> SerializabilityClassifier<'s, 'u> {
    pub fn new(snapshot: &'s CapabilitySnapshot<'u>) -> Self {
        let markers: SmallVec<[TypeId; 2]> = [
            WellKnownType::XunitSerializable,
            WellKnownType::CustomXunitSerializable,
        ]
        .into_iter()
        .filter_map(|ty| snapshot.type_handle(ty))
        .collect();
        let registered = registered_serializer_types(snapshot);
        debug!(
            markers = markers.len(),
            registered = registered.len(),
            "built serializability classifier"
        );
        Self {
            snapshot,
            markers,
            registered,
        }
    }

    pub fn snapshot(&self) -> &'s CapabilitySnapshot<'u> {
        self.snapshot
    }

    /// Types with a registered custom serializer, unordered.
    pub fn registered_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.registered.iter().copied()
    }

    pub fn classify(&self, ty: TypeId) -> SerializabilityTier {
        let query = Query::unary("classify", self.snapshot.universe(), ty);
        let tier = self.classify_shape(ty);
        if let Some(query) = query {
            query.finish(tier.as_str());
        }
        tier
    }

    /// [`should_ignore`] against this classifier's universe.
    pub fn should_ignore(&self, ty: TypeId) -> bool {
        should_ignore(self.snapshot.universe(), ty)
    }

    /// Arrays are peeled in a loop, so nesting depth never changes the
    /// verdict. A universe whose array chain revisits a type answers
    /// `Possibly`.
    fn classify_shape(&self, ty: TypeId) -> SerializabilityTier {
        let universe = self.snapshot.universe();
        let mut ty = ty;
        let mut visited = FxHashSet::default();
        loop {
            ty = nullable_underlying(universe, ty).unwrap_or(ty);
            let kind = universe.type_kind(ty);
            if !kind.is_data_kind() {
                return SerializabilityTier::Never;
            }
            if kind != TypeKind::Array {
                return self.classify_element(ty, kind);
            }
            if !visited.insert(ty) {
                warn!(type_id = ty.0, "array element chain is cyclic; classifying as possibly serializable");
                return SerializabilityTier::Possibly;
            }
            match universe.array_element_type(ty) {
                Some(element) => ty = element,
                None => return SerializabilityTier::Never,
            }
        }
    }

    fn classify_element(&self, ty: TypeId, kind: TypeKind) -> SerializabilityTier {
        let universe = self.snapshot.universe();
        if self
            .markers
            .iter()
            .any(|&marker| universe.is_assignable(ty, marker))
            || self.is_trait_dictionary(ty)
        {
            return SerializabilityTier::Always;
        }

        if let Some(tier) = special_type_tier(universe.special_type(ty)) {
            return tier;
        }

        if ALWAYS_SERIALIZABLE_SYSTEM_TYPES
            .into_iter()
            .any(|system| self.snapshot.system_type(system) == Some(ty))
        {
            return SerializabilityTier::Always;
        }

        if self
            .registered
            .iter()
            .any(|&registered| universe.is_assignable(ty, registered))
        {
            return SerializabilityTier::Always;
        }

        let open_class = kind == TypeKind::Class && !universe.is_sealed(ty);
        if open_class || matches!(kind, TypeKind::Interface | TypeKind::Enum) {
            return SerializabilityTier::Possibly;
        }

        SerializabilityTier::Never
    }

    /// `Dictionary<string, List<string>>`, the shape of test traits.
    fn is_trait_dictionary(&self, ty: TypeId) -> bool {
        let universe = self.snapshot.universe();
        let (Some(dictionary), Some(list)) = (
            self.snapshot.system_type(SystemType::Dictionary),
            self.snapshot.system_type(SystemType::List),
        ) else {
            return false;
        };
        if universe.original_definition(ty) != dictionary {
            return false;
        }
        let arguments = universe.type_arguments(ty);
        let [key, value] = arguments.as_slice() else {
            return false;
        };
        if universe.special_type(*key) != SpecialType::String
            || universe.original_definition(*value) != list
        {
            return false;
        }
        let element = universe.type_arguments(*value);
        matches!(element.as_slice(), [item] if universe.special_type(*item) == SpecialType::String)
    }
}

/// Tier decided by the special-type tag alone, if any.
fn special_type_tier(special: SpecialType) -> Option<SerializabilityTier> {
    match special {
        SpecialType::None => None,
        SpecialType::Boolean
        | SpecialType::Char
        | SpecialType::SByte
        | SpecialType::Byte
        | SpecialType::Int16
        | SpecialType::UInt16
        | SpecialType::Int32
        | SpecialType::UInt32
        | SpecialType::Int64
        | SpecialType::UInt64
        | SpecialType::Single
        | SpecialType::Double
        | SpecialType::Decimal
        | SpecialType::String
        | SpecialType::DateTime => Some(SerializabilityTier::Always),
        SpecialType::Object
        | SpecialType::Array
        | SpecialType::Enum
        | SpecialType::ValueType
        | SpecialType::NullableT
        | SpecialType::IEnumerableT
        | SpecialType::IDisposable => Some(SerializabilityTier::Possibly),
        _ => Some(SerializabilityTier::Never),
    }
}

fn nullable_underlying(universe: &dyn TypeUniverse, ty: TypeId) -> Option<TypeId> {
    let definition = universe.original_definition(ty);
    if definition == ty || universe.special_type(definition) != SpecialType::NullableT {
        return None;
    }
    universe.type_arguments(ty).first().copied()
}

/// Supported types of every `RegisterXunitSerializer` assembly attribute.
/// The first type argument names the serializer and is skipped.
fn registered_serializer_types(snapshot: &CapabilitySnapshot<'_>) -> FxHashSet<TypeId> {
    let universe = snapshot.universe();
    let Some(registration) = snapshot.type_handle(WellKnownType::RegisterXunitSerializerAttribute)
    else {
        return FxHashSet::default();
    };
    universe
        .assembly_attributes()
        .into_iter()
        .filter(|attribute| universe.is_assignable(attribute.attribute_class, registration))
        .flat_map(|attribute| attribute.type_arguments.into_iter().skip(1))
        .collect()
}

/// Whether static serializability reasoning about `ty` is unreliable.
///
/// True for unknown, error, module, submission and unbound type-parameter
/// kinds, and for enums (whether an enum round-trips depends on where its
/// assembly is loaded from). Arrays defer to their element type; a
/// constructed generic is ignored when any of its type arguments is.
pub fn should_ignore(universe: &dyn TypeUniverse, ty: TypeId) -> bool {
    let query = Query::unary("should_ignore", universe, ty);
    let ignore = should_ignore_at(universe, ty, 0);
    if let Some(query) = query {
        query.finish(if ignore { "ignored" } else { "checked" });
    }
    ignore
}

/// `depth` counts generic-argument nesting only; array layers are peeled
/// in a loop and a cyclic array chain is ignored.
fn should_ignore_at(universe: &dyn TypeUniverse, ty: TypeId, depth: u32) -> bool {
    if depth > MAX_TYPE_SHAPE_DEPTH {
        warn!(
            type_id = ty.0,
            depth, "type shape exceeds depth limit; ignoring"
        );
        return true;
    }

    let mut ty = ty;
    let mut visited = FxHashSet::default();
    loop {
        let kind = universe.type_kind(ty);
        if matches!(
            kind,
            TypeKind::Unknown
                | TypeKind::Error
                | TypeKind::Module
                | TypeKind::TypeParameter
                | TypeKind::Submission
                | TypeKind::Enum
        ) || universe.special_type(ty) == SpecialType::Enum
        {
            return true;
        }
        if kind != TypeKind::Array {
            break;
        }
        if !visited.insert(ty) {
            warn!(type_id = ty.0, "array element chain is cyclic; ignoring");
            return true;
        }
        match universe.array_element_type(ty) {
            Some(element) => ty = element,
            None => return true,
        }
    }

    universe
        .type_arguments(ty)
        .iter()
        .any(|&argument| should_ignore_at(universe, argument, depth + 1))
}

#[cfg(test)]
#[path = "../tests/serializability_tests.rs"]
mod tests;
