use super::*;
use crate::CapabilityResolver;
use crate::test_support::{CountingUniverse, named, program, special};
use xan_universe::framework::register_serializer;
use xan_universe::{NamedTypeBuilder, TypeParamConstraints, TypeTable};

fn tier(table: &TypeTable, ty: TypeId) -> SerializabilityTier {
    let snapshot = CapabilityResolver::new(table).resolve();
    SerializabilityClassifier::new(&snapshot).classify(ty)
}

#[test]
fn primitives_strings_and_datetime_are_always() {
    let table = program(&[]);
    for ty in [
        SpecialType::Boolean,
        SpecialType::Char,
        SpecialType::SByte,
        SpecialType::Byte,
        SpecialType::Int16,
        SpecialType::UInt16,
        SpecialType::Int32,
        SpecialType::UInt32,
        SpecialType::Int64,
        SpecialType::UInt64,
        SpecialType::Single,
        SpecialType::Double,
        SpecialType::Decimal,
        SpecialType::String,
        SpecialType::DateTime,
    ] {
        assert_eq!(
            tier(&table, special(&table, ty)),
            SerializabilityTier::Always,
            "{ty:?}"
        );
    }
}

#[test]
fn general_special_types_are_possibly() {
    let table = program(&[]);
    for ty in [
        SpecialType::Object,
        SpecialType::Array,
        SpecialType::Enum,
        SpecialType::ValueType,
        SpecialType::NullableT,
        SpecialType::IEnumerableT,
        SpecialType::IDisposable,
    ] {
        assert_eq!(
            tier(&table, special(&table, ty)),
            SerializabilityTier::Possibly,
            "{ty:?}"
        );
    }
}

#[test]
fn other_special_types_are_never() {
    let table = program(&[]);
    for ty in [
        SpecialType::IntPtr,
        SpecialType::UIntPtr,
        SpecialType::Delegate,
        SpecialType::IEnumerable,
        SpecialType::IListT,
    ] {
        assert_eq!(
            tier(&table, special(&table, ty)),
            SerializabilityTier::Never,
            "{ty:?}"
        );
    }
}

#[test]
fn nullable_wrapper_classifies_as_its_underlying_type() {
    let table = program(&[]);
    let int = special(&table, SpecialType::Int32);
    let nullable_int = table.nullable_of(int).expect("core library seeded");
    let point = table.declare_struct("Geometry.Point");
    let nullable_point = table.nullable_of(point).expect("core library seeded");

    assert_eq!(tier(&table, nullable_int), tier(&table, int));
    assert_eq!(tier(&table, nullable_int), SerializabilityTier::Always);
    assert_eq!(tier(&table, nullable_point), SerializabilityTier::Never);
}

#[test]
fn arrays_classify_as_their_element() {
    let table = program(&[]);
    let int = special(&table, SpecialType::Int32);
    let object = special(&table, SpecialType::Object);
    let sealed = table.declare_sealed_class("Geometry.Polygon");

    assert_eq!(tier(&table, table.array_of(int)), SerializabilityTier::Always);
    assert_eq!(
        tier(&table, table.array_of(table.array_of(int))),
        SerializabilityTier::Always
    );
    assert_eq!(tier(&table, table.array_of(object)), SerializabilityTier::Possibly);
    assert_eq!(tier(&table, table.array_of(sealed)), SerializabilityTier::Never);
}

#[test]
fn user_types_without_markers() {
    let table = program(&[]);
    let sealed = table.declare_sealed_class("Shop.Receipt");
    let open = table.declare_class("Shop.Order");
    let interface = table.declare_interface("Shop.IPayment");
    let color = table.declare_enum("Shop.Color");
    let point = table.declare_struct("Shop.Point");

    assert_eq!(tier(&table, sealed), SerializabilityTier::Never);
    assert_eq!(tier(&table, open), SerializabilityTier::Possibly);
    assert_eq!(tier(&table, interface), SerializabilityTier::Possibly);
    assert_eq!(tier(&table, color), SerializabilityTier::Possibly);
    assert_eq!(tier(&table, point), SerializabilityTier::Never);
}

#[test]
fn round_tripping_library_types_are_always() {
    let table = program(&[]);
    let snapshot = CapabilityResolver::new(&table).resolve();
    let classifier = SerializabilityClassifier::new(&snapshot);

    for system in ALWAYS_SERIALIZABLE_SYSTEM_TYPES {
        let ty = snapshot.system_type(system).expect("core library declares it");
        assert_eq!(classifier.classify(ty), SerializabilityTier::Always, "{system:?}");
    }
    let guid = named(&table, "System.Guid");
    assert_eq!(classifier.classify(guid), SerializabilityTier::Never);
}

#[test]
fn first_generation_marker_makes_types_always() {
    let table = program(&[("xunit.abstractions", "2.0.3")]);
    let marker = named(&table, "Xunit.Abstractions.IXunitSerializable");
    let custom = table.declare(
        NamedTypeBuilder::class("Tests.CustomData")
            .sealed(true)
            .interface_impl(marker),
    );
    let test_case = named(&table, "Xunit.Abstractions.ITestCase");

    assert_eq!(tier(&table, custom), SerializabilityTier::Always);
    assert_eq!(tier(&table, marker), SerializabilityTier::Always);
    assert_eq!(tier(&table, test_case), SerializabilityTier::Always);
}

#[test]
fn second_generation_marker_makes_types_always() {
    let table = program(&[("xunit.v3.common", "1.0.0")]);
    let marker = named(&table, "Xunit.Sdk.IXunitSerializable");
    let custom = table.declare(
        NamedTypeBuilder::structure("Tests.CustomValue").interface_impl(marker),
    );

    assert_eq!(tier(&table, custom), SerializabilityTier::Always);
}

#[test]
fn markers_of_both_generations_are_honored_together() {
    let table = program(&[("xunit.abstractions", "2.0.3"), ("xunit.v3.common", "1.0.0")]);
    let v2 = table.declare(
        NamedTypeBuilder::class("Tests.Legacy")
            .sealed(true)
            .interface_impl(named(&table, "Xunit.Abstractions.IXunitSerializable")),
    );
    let v3 = table.declare(
        NamedTypeBuilder::class("Tests.Modern")
            .sealed(true)
            .interface_impl(named(&table, "Xunit.Sdk.IXunitSerializable")),
    );

    assert_eq!(tier(&table, v2), SerializabilityTier::Always);
    assert_eq!(tier(&table, v3), SerializabilityTier::Always);
}

#[test]
fn trait_dictionary_shape_is_always() {
    let table = program(&[]);
    let string = special(&table, SpecialType::String);
    let int = special(&table, SpecialType::Int32);
    let dictionary = named(&table, "System.Collections.Generic.Dictionary`2");
    let list = named(&table, "System.Collections.Generic.List`1");

    let traits = table.construct(dictionary, &[string, table.construct(list, &[string])]);
    let counts = table.construct(dictionary, &[string, table.construct(list, &[int])]);
    let flipped = table.construct(dictionary, &[int, table.construct(list, &[string])]);

    assert_eq!(tier(&table, traits), SerializabilityTier::Always);
    // Any other dictionary is an open class.
    assert_eq!(tier(&table, counts), SerializabilityTier::Possibly);
    assert_eq!(tier(&table, flipped), SerializabilityTier::Possibly);
}

#[test]
fn registered_serializers_cover_supported_types() {
    let table = program(&[("xunit.v3.core", "1.0.0"), ("xunit.v3.common", "1.0.0")]);
    let serializer = table.declare_sealed_class("Tests.ShapeSerializer");
    let shape = table.declare_class("Tests.Shape");
    let circle = table.declare_sealed_class("Tests.Circle");
    table.set_base(circle, shape);
    let money = table.declare_struct("Tests.Money");
    let other = table.declare_struct("Tests.Unregistered");
    assert!(register_serializer(&table, serializer, &[shape, money]));

    let snapshot = CapabilityResolver::new(&table).resolve();
    let classifier = SerializabilityClassifier::new(&snapshot);

    let mut registered: Vec<_> = classifier.registered_types().collect();
    registered.sort();
    assert_eq!(registered, vec![shape, money]);

    assert_eq!(classifier.classify(circle), SerializabilityTier::Always);
    assert_eq!(classifier.classify(money), SerializabilityTier::Always);
    assert_eq!(classifier.classify(other), SerializabilityTier::Never);
    // The serializer itself is not registered.
    assert_eq!(classifier.classify(serializer), SerializabilityTier::Never);
}

#[test]
fn registrations_need_the_second_generation_core() {
    let table = program(&[("xunit.core", "2.4.2")]);
    let serializer = table.declare_sealed_class("Tests.MoneySerializer");
    let money = table.declare_struct("Tests.Money");

    assert!(!register_serializer(&table, serializer, &[money]));
    assert_eq!(tier(&table, money), SerializabilityTier::Never);
}

#[test]
fn non_data_kinds_are_never() {
    let table = program(&[]);
    let error = table.error_type("Missing");
    let parameter = table.type_parameter("T", TypeParamConstraints::default());
    let module = table.opaque_type("Script", TypeKind::Module);
    let pointer = table.opaque_type("int*", TypeKind::Pointer);

    for ty in [error, parameter, module, pointer, TypeId(u32::MAX)] {
        assert_eq!(tier(&table, ty), SerializabilityTier::Never, "{ty}");
    }
}

#[test]
fn array_nesting_depth_never_changes_the_verdict() {
    let table = program(&[]);
    let int = special(&table, SpecialType::Int32);
    let object = special(&table, SpecialType::Object);
    let color = table.declare_enum("Paint.Color");

    let deep_ints = (0..200).fold(int, |ty, _| table.array_of(ty));
    assert_eq!(tier(&table, deep_ints), tier(&table, table.array_of(int)));
    assert_eq!(tier(&table, deep_ints), SerializabilityTier::Always);
    assert!(!should_ignore(&table, deep_ints));

    let deep_objects = (0..200).fold(object, |ty, _| table.array_of(ty));
    assert_eq!(tier(&table, deep_objects), SerializabilityTier::Possibly);

    let deep_colors = (0..200).fold(color, |ty, _| table.array_of(ty));
    assert!(should_ignore(&table, deep_colors));
}

#[test]
fn deep_generic_nesting_is_ignored() {
    let table = program(&[]);
    let int = special(&table, SpecialType::Int32);
    let list = named(&table, "System.Collections.Generic.List`1");

    let shallow = (0..10).fold(int, |ty, _| table.construct(list, &[ty]));
    assert!(!should_ignore(&table, shallow));

    let deep = (0..70).fold(int, |ty, _| table.construct(list, &[ty]));
    assert!(should_ignore(&table, deep));
}

#[test]
fn cyclic_array_chains_terminate() {
    let table = program(&[]);
    let int = special(&table, SpecialType::Int32);
    let array = table.array_of(int);
    let universe = CountingUniverse::new(table).with_self_nested_array(array);
    let snapshot = CapabilityResolver::new(&universe).resolve();
    let classifier = SerializabilityClassifier::new(&snapshot);

    assert_eq!(classifier.classify(array), SerializabilityTier::Possibly);
    assert!(classifier.should_ignore(array));
}

#[test]
fn tiers_order_by_confidence() {
    assert!(SerializabilityTier::Never < SerializabilityTier::Possibly);
    assert!(SerializabilityTier::Possibly < SerializabilityTier::Always);
    assert_eq!(SerializabilityTier::Possibly.to_string(), "possibly");
    assert_eq!(
        serde_json::to_string(&SerializabilityTier::Always).expect("serialize tier"),
        r#""always""#
    );
}

// =============================================================================
// should_ignore
// =============================================================================

#[test]
fn ordinary_types_are_not_ignored() {
    let table = program(&[]);
    let int = special(&table, SpecialType::Int32);
    let string = special(&table, SpecialType::String);
    let list = named(&table, "System.Collections.Generic.List`1");

    assert!(!should_ignore(&table, int));
    assert!(!should_ignore(&table, string));
    assert!(!should_ignore(&table, table.array_of(int)));
    assert!(!should_ignore(&table, table.construct(list, &[int])));
}

#[test]
fn enums_are_ignored_wherever_they_appear() {
    let table = program(&[]);
    let string = special(&table, SpecialType::String);
    let color = table.declare_enum("Paint.Color");
    let dictionary = named(&table, "System.Collections.Generic.Dictionary`2");
    let list = named(&table, "System.Collections.Generic.List`1");

    assert!(should_ignore(&table, color));
    assert!(should_ignore(&table, special(&table, SpecialType::Enum)));
    assert!(should_ignore(&table, table.array_of(color)));
    assert!(should_ignore(&table, table.construct(dictionary, &[string, color])));
    assert!(should_ignore(
        &table,
        table.construct(list, &[table.array_of(color)])
    ));
}

#[test]
fn unreliable_kinds_are_ignored() {
    let table = program(&[]);
    let parameter = table.type_parameter("T", TypeParamConstraints::default());
    let list = named(&table, "System.Collections.Generic.List`1");

    assert!(should_ignore(&table, table.error_type("Missing")));
    assert!(should_ignore(&table, parameter));
    assert!(should_ignore(&table, table.array_of(parameter)));
    assert!(should_ignore(&table, table.opaque_type("Script", TypeKind::Module)));
    assert!(should_ignore(&table, table.opaque_type("Submission#0", TypeKind::Submission)));
    assert!(should_ignore(&table, TypeId(u32::MAX)));
    // The open definition's arguments are its own type parameters.
    assert!(should_ignore(&table, list));
}

#[test]
fn classifier_delegates_ignore_to_its_universe() {
    let table = program(&[]);
    let color = table.declare_enum("Paint.Color");
    let snapshot = CapabilityResolver::new(&table).resolve();
    let classifier = SerializabilityClassifier::new(&snapshot);

    assert!(classifier.should_ignore(color));
    assert!(!classifier.should_ignore(special(&table, SpecialType::Int32)));
}
