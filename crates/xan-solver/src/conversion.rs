//! Conversion compatibility between theory data and parameter types.
//!
//! The framework coerces inline data to parameter types at run time. This
//! module approximates that coercion statically: a `true` verdict means the
//! framework will at least attempt the conversion, not that every value
//! parses.

use crate::contexts::CapabilityContext;
use crate::query_trace::Query;
use crate::snapshot::CapabilitySnapshot;
use crate::well_known::SystemType;
use xan_universe::{SpecialType, TypeId, TypeKind, TypeParamConstraints, TypeUniverse};

/// Whether a value of `source` can bind to a parameter of type `destination`.
///
/// Rules are tried in order and the first applicable one decides:
///
/// 1. A type-parameter destination (or an array of one) accepts `source`
///    when `source` satisfies the parameter's constraints.
/// 2. Numeric conversions succeed, except `double`/`float` to `char`, which
///    the framework rejects at run time.
/// 3. `DateTime` (and `DateTimeOffset`/`Guid` where string-to-temporal
///    conversion is supported) accept exactly `string`.
/// 4. Otherwise implicit, unboxing, explicit user-defined and explicit
///    nullable conversions succeed.
pub fn is_convertible(source: TypeId, destination: TypeId, snapshot: &CapabilitySnapshot<'_>) -> bool {
    let query = Query::relation("is_convertible", snapshot.universe(), source, destination).map(|query| {
        let core = snapshot.core();
        query.gated_by(core.family(), core.version())
    });

    let result = convertible(source, destination, snapshot);

    if let Some(query) = query {
        query.finish(if result { "convertible" } else { "not_convertible" });
    }
    result
}

fn convertible(source: TypeId, destination: TypeId, snapshot: &CapabilitySnapshot<'_>) -> bool {
    let universe = snapshot.universe();

    if let Some(parameter) = unbound_parameter(universe, destination) {
        let constraints = universe
            .type_parameter_constraints(parameter)
            .unwrap_or_default();
        return satisfies_constraints(universe, source, &constraints);
    }

    let conversion = universe.classify_conversion(source, destination);
    let destination_special = universe.special_type(destination);

    if conversion.is_numeric() {
        let from_floating = matches!(
            universe.special_type(source),
            SpecialType::Double | SpecialType::Single
        );
        return !(from_floating && destination_special == SpecialType::Char);
    }

    if destination_special == SpecialType::DateTime
        || (snapshot.core().supports_string_to_temporal_conversion()
            && is_string_convertible_temporal(snapshot, destination))
    {
        return universe.special_type(source) == SpecialType::String;
    }

    conversion.is_implicit()
        || conversion.is_unboxing()
        || (conversion.is_explicit() && conversion.is_user_defined())
        || (conversion.is_explicit() && conversion.is_nullable())
}

/// `T` for a destination of `T` or `T[]`.
fn unbound_parameter(universe: &dyn TypeUniverse, destination: TypeId) -> Option<TypeId> {
    match universe.type_kind(destination) {
        TypeKind::TypeParameter => Some(destination),
        TypeKind::Array => universe
            .array_element_type(destination)
            .filter(|&element| universe.type_kind(element) == TypeKind::TypeParameter),
        _ => None,
    }
}

fn satisfies_constraints(
    universe: &dyn TypeUniverse,
    source: TypeId,
    constraints: &TypeParamConstraints,
) -> bool {
    if constraints.value_type && !universe.is_value_type(source) {
        return false;
    }
    if constraints.reference_type && !universe.is_reference_type(source) {
        return false;
    }
    constraints
        .constraint_types
        .iter()
        .all(|&constraint| universe.is_assignable(source, constraint))
}

fn is_string_convertible_temporal(snapshot: &CapabilitySnapshot<'_>, destination: TypeId) -> bool {
    [SystemType::DateTimeOffset, SystemType::Guid]
        .into_iter()
        .any(|ty| snapshot.system_type(ty) == Some(destination))
}

#[cfg(test)]
#[path = "../tests/conversion_tests.rs"]
mod tests;
