//! Built-in conversion classification for [`TypeTable`].
//!
//! Mirrors the language's conversion rules closely enough for the engine's
//! purposes: implicit conversions are tried first (identity, numeric,
//! nullable, reference/boxing, user-defined), then explicit ones (numeric,
//! enumeration, nullable, unboxing, reference downcasts, user-defined).

use crate::TypeUniverse;
use crate::table::TypeTable;
use crate::types::{Conversion, SpecialType, TypeId, TypeKind};

pub(crate) fn classify(table: &TypeTable, source: TypeId, destination: TypeId) -> Conversion {
    if table.type_kind(source) == TypeKind::Unknown || table.type_kind(destination) == TypeKind::Unknown {
        return Conversion::NONE;
    }
    if source == destination {
        return Conversion::implicit(Conversion::IDENTITY);
    }
    implicit_conversion(table, source, destination)
        .or_else(|| explicit_conversion(table, source, destination))
        .unwrap_or(Conversion::NONE)
}

// =============================================================================
// Implicit
// =============================================================================

fn implicit_conversion(table: &TypeTable, source: TypeId, destination: TypeId) -> Option<Conversion> {
    let source_special = table.special_type(source);
    let destination_special = table.special_type(destination);

    if source_special.is_numeric()
        && destination_special.is_numeric()
        && is_implicit_numeric(source_special, destination_special)
    {
        return Some(Conversion::implicit(Conversion::NUMERIC));
    }

    // T -> T?, and S -> T? when S -> T is an implicit numeric conversion.
    if let Some(underlying) = table.nullable_underlying(destination) {
        let lifted_from = table.nullable_underlying(source).unwrap_or(source);
        if lifted_from == underlying
            || is_implicit_numeric(table.special_type(lifted_from), table.special_type(underlying))
        {
            return Some(Conversion::implicit(Conversion::NULLABLE));
        }
    }

    if table.is_assignable(source, destination) {
        let kind = if table.is_value_type(source) {
            Conversion::BOXING
        } else {
            Conversion::REFERENCE
        };
        return Some(Conversion::implicit(kind));
    }

    if table.user_defined_conversion(source, destination) == Some(true) {
        return Some(Conversion::implicit(Conversion::USER_DEFINED));
    }

    None
}

// =============================================================================
// Explicit
// =============================================================================

fn explicit_conversion(table: &TypeTable, source: TypeId, destination: TypeId) -> Option<Conversion> {
    let source_special = table.special_type(source);
    let destination_special = table.special_type(destination);

    if source_special.is_numeric() && destination_special.is_numeric() {
        return Some(Conversion::explicit(Conversion::NUMERIC));
    }

    let source_is_enum = table.type_kind(source) == TypeKind::Enum;
    let destination_is_enum = table.type_kind(destination) == TypeKind::Enum;
    if (source_is_enum && (destination_is_enum || destination_special.is_numeric()))
        || (destination_is_enum && source_special.is_numeric())
    {
        return Some(Conversion::explicit(Conversion::ENUMERATION));
    }

    // object -> int?, IComparable -> int? unbox straight into the wrapper.
    let unboxing_target = table.nullable_underlying(destination).unwrap_or(destination);
    if table.is_value_type(unboxing_target)
        && table.is_reference_type(source)
        && table.is_assignable(unboxing_target, source)
    {
        return Some(Conversion::explicit(Conversion::UNBOXING));
    }

    // T? -> T, S? -> T?, S -> T? and S? -> T over explicit numeric.
    let source_underlying = table.nullable_underlying(source);
    let destination_underlying = table.nullable_underlying(destination);
    if source_underlying.is_some() || destination_underlying.is_some() {
        let from = source_underlying.unwrap_or(source);
        let to = destination_underlying.unwrap_or(destination);
        let from_special = table.special_type(from);
        let to_special = table.special_type(to);
        if from == to || (from_special.is_numeric() && to_special.is_numeric()) {
            return Some(Conversion::explicit(Conversion::NULLABLE));
        }
    }

    if table.is_reference_type(source) && table.is_reference_type(destination) {
        let downcast = table.is_assignable(destination, source);
        let source_kind = table.type_kind(source);
        let destination_kind = table.type_kind(destination);
        let through_interface = (source_kind == TypeKind::Interface
            && (destination_kind == TypeKind::Interface || !table.is_sealed(destination)))
            || (destination_kind == TypeKind::Interface && !table.is_sealed(source));
        if downcast || through_interface {
            return Some(Conversion::explicit(Conversion::REFERENCE));
        }
    }

    if table.user_defined_conversion(source, destination).is_some() {
        return Some(Conversion::explicit(Conversion::USER_DEFINED));
    }

    None
}

/// Implicit numeric conversion table.
fn is_implicit_numeric(from: SpecialType, to: SpecialType) -> bool {
    use SpecialType::*;
    match from {
        SByte => matches!(to, Int16 | Int32 | Int64 | Single | Double | Decimal),
        Byte => matches!(
            to,
            Int16 | UInt16 | Int32 | UInt32 | Int64 | UInt64 | Single | Double | Decimal
        ),
        Int16 => matches!(to, Int32 | Int64 | Single | Double | Decimal),
        UInt16 => matches!(to, Int32 | UInt32 | Int64 | UInt64 | Single | Double | Decimal),
        Int32 => matches!(to, Int64 | Single | Double | Decimal),
        UInt32 => matches!(to, Int64 | UInt64 | Single | Double | Decimal),
        Int64 | UInt64 => matches!(to, Single | Double | Decimal),
        Char => matches!(
            to,
            UInt16 | Int32 | UInt32 | Int64 | UInt64 | Single | Double | Decimal
        ),
        Single => to == Double,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/conversion_tests.rs"]
mod tests;
