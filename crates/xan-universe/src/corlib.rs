//! Core library seeding.
//!
//! Declares the subset of `System.*` the engine reasons about: every
//! special type, the temporal and identifier structs, the arbitrary
//! precision integer, and the collection generics used by trait data.

use crate::TypeUniverse;
use crate::table::{NamedTypeBuilder, TypeTable};
use crate::types::{SpecialType, TypeId, TypeParamConstraints};

const PRIMITIVES: &[(&str, SpecialType)] = &[
    ("System.Boolean", SpecialType::Boolean),
    ("System.Char", SpecialType::Char),
    ("System.SByte", SpecialType::SByte),
    ("System.Byte", SpecialType::Byte),
    ("System.Int16", SpecialType::Int16),
    ("System.UInt16", SpecialType::UInt16),
    ("System.Int32", SpecialType::Int32),
    ("System.UInt32", SpecialType::UInt32),
    ("System.Int64", SpecialType::Int64),
    ("System.UInt64", SpecialType::UInt64),
    ("System.Decimal", SpecialType::Decimal),
    ("System.Single", SpecialType::Single),
    ("System.Double", SpecialType::Double),
    ("System.IntPtr", SpecialType::IntPtr),
    ("System.UIntPtr", SpecialType::UIntPtr),
    ("System.DateTime", SpecialType::DateTime),
];

/// Library structs without a special-type tag.
const PLAIN_STRUCTS: &[&str] = &[
    "System.DateTimeOffset",
    "System.TimeSpan",
    "System.Guid",
    "System.DateOnly",
    "System.TimeOnly",
    "System.Numerics.BigInteger",
];

impl TypeTable {
    /// A table pre-populated with the core library.
    pub fn with_core_library() -> Self {
        let table = Self::new();
        seed_core_library(&table);
        table
    }
}

fn seed_core_library(table: &TypeTable) {
    let object = table.declare(NamedTypeBuilder::class("System.Object").special(SpecialType::Object));
    let value_type = table.declare(
        NamedTypeBuilder::class("System.ValueType")
            .special(SpecialType::ValueType)
            .base(object),
    );
    table.declare(
        NamedTypeBuilder::class("System.Enum")
            .special(SpecialType::Enum)
            .base(value_type),
    );
    table.declare(NamedTypeBuilder::structure("System.Void").special(SpecialType::Void));

    let comparable = table.declare_interface("System.IComparable");
    let formattable = table.declare_interface("System.IFormattable");
    let disposable = table.declare(
        NamedTypeBuilder::interface("System.IDisposable").special(SpecialType::IDisposable),
    );

    for &(name, special) in PRIMITIVES {
        let mut builder = NamedTypeBuilder::structure(name)
            .special(special)
            .base(value_type)
            .interface_impl(comparable);
        if special.is_numeric() || special == SpecialType::DateTime {
            builder = builder.interface_impl(formattable);
        }
        table.declare(builder);
    }
    for &name in PLAIN_STRUCTS {
        table.declare(
            NamedTypeBuilder::structure(name)
                .base(value_type)
                .interface_impl(comparable)
                .interface_impl(formattable),
        );
    }

    // Collections
    let enumerable = table.declare(
        NamedTypeBuilder::interface("System.Collections.IEnumerable").special(SpecialType::IEnumerable),
    );
    table.declare(
        NamedTypeBuilder::interface("System.Collections.Generic.IEnumerator`1")
            .special(SpecialType::IEnumeratorT)
            .type_parameter("T")
            .interface_impl(disposable),
    );
    let enumerable_t = generic_interface(
        table,
        "System.Collections.Generic.IEnumerable`1",
        SpecialType::IEnumerableT,
        &[],
    );
    table.add_interface(enumerable_t, enumerable);
    let readonly_collection_t = generic_interface(
        table,
        "System.Collections.Generic.IReadOnlyCollection`1",
        SpecialType::IReadOnlyCollectionT,
        &[enumerable_t],
    );
    let readonly_list_t = generic_interface(
        table,
        "System.Collections.Generic.IReadOnlyList`1",
        SpecialType::IReadOnlyListT,
        &[readonly_collection_t],
    );
    let collection_t = generic_interface(
        table,
        "System.Collections.Generic.ICollection`1",
        SpecialType::ICollectionT,
        &[enumerable_t],
    );
    let list_t = generic_interface(
        table,
        "System.Collections.Generic.IList`1",
        SpecialType::IListT,
        &[collection_t],
    );

    // List<T> : IList<T>, IReadOnlyList<T>
    let list = table.declare(
        NamedTypeBuilder::class("System.Collections.Generic.List`1")
            .base(object)
            .type_parameter("T"),
    );
    let list_param = table.type_arguments(list);
    table.add_interface(list, table.construct(list_t, &list_param));
    table.add_interface(list, table.construct(readonly_list_t, &list_param));

    // Dictionary<TKey, TValue> : IEnumerable
    let dictionary = table.declare(
        NamedTypeBuilder::class("System.Collections.Generic.Dictionary`2")
            .base(object)
            .type_parameter("TKey")
            .type_parameter("TValue"),
    );
    table.add_interface(dictionary, enumerable);

    // Reference types
    let string = table.declare(
        NamedTypeBuilder::class("System.String")
            .special(SpecialType::String)
            .sealed(true)
            .base(object)
            .interface_impl(comparable),
    );
    if let Some(char_type) = table.special(SpecialType::Char) {
        table.add_interface(string, table.construct(enumerable_t, &[char_type]));
    }
    table.declare(
        NamedTypeBuilder::class("System.Array")
            .special(SpecialType::Array)
            .base(object)
            .interface_impl(enumerable),
    );
    let delegate = table.declare(
        NamedTypeBuilder::class("System.Delegate")
            .special(SpecialType::Delegate)
            .base(object),
    );
    table.declare(
        NamedTypeBuilder::class("System.MulticastDelegate")
            .special(SpecialType::MulticastDelegate)
            .base(delegate),
    );
    table.declare(
        NamedTypeBuilder::structure("System.Nullable`1")
            .special(SpecialType::NullableT)
            .base(value_type)
            .constrained_type_parameter("T", TypeParamConstraints::value_type()),
    );

    table.declare(NamedTypeBuilder::class("System.Attribute").base(object));
    table.declare(NamedTypeBuilder::class("System.Type").base(object));
    table.declare(NamedTypeBuilder::class("System.Exception").base(object));
    table.declare(NamedTypeBuilder::class("System.Uri").base(object));
    table.declare(
        NamedTypeBuilder::class("System.Version")
            .sealed(true)
            .base(object)
            .interface_impl(comparable),
    );
}

/// Declare `name<T>` extending `bases<T>`.
fn generic_interface(
    table: &TypeTable,
    name: &str,
    special: SpecialType,
    bases: &[TypeId],
) -> TypeId {
    let id = table.declare(
        NamedTypeBuilder::interface(name)
            .special(special)
            .type_parameter("T"),
    );
    let params = table.type_arguments(id);
    for &base in bases {
        table.add_interface(id, table.construct(base, &params));
    }
    id
}
