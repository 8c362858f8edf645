use super::*;
use rayon::prelude::*;

fn special(table: &TypeTable, special: SpecialType) -> TypeId {
    table.special(special).expect("core library declares special type")
}

fn named(table: &TypeTable, name: &str) -> TypeId {
    table.named(name).expect("core library declares named type")
}

#[test]
fn test_declare_is_idempotent_per_name() {
    let table = TypeTable::with_core_library();
    let first = table.declare_class("MyApp.Widget");
    let second = table.declare_class("MyApp.Widget");
    assert_eq!(first, second);
    assert_eq!(table.resolve_type_by_qualified_name("MyApp.Widget"), Some(first));
    assert_eq!(table.resolve_type_by_qualified_name("MyApp.Missing"), None);
}

#[test]
fn test_arrays_and_constructed_types_are_interned() {
    let table = TypeTable::with_core_library();
    let int = special(&table, SpecialType::Int32);
    let string = special(&table, SpecialType::String);
    let list = named(&table, "System.Collections.Generic.List`1");
    let dictionary = named(&table, "System.Collections.Generic.Dictionary`2");

    assert_eq!(table.array_of(int), table.array_of(int));
    let list_of_string = table.construct(list, &[string]);
    assert_eq!(list_of_string, table.construct(list, &[string]));

    let traits = table.construct(dictionary, &[string, list_of_string]);
    let again = table.construct(dictionary, &[string, table.construct(list, &[string])]);
    assert_eq!(traits, again);

    assert_eq!(table.original_definition(traits), dictionary);
    assert_eq!(table.type_arguments(traits).as_slice(), &[string, list_of_string]);
    assert_eq!(table.type_kind(traits), TypeKind::Class);
    assert_eq!(table.special_type(traits), SpecialType::None);
}

#[test]
fn test_constructing_with_own_parameters_yields_definition() {
    let table = TypeTable::with_core_library();
    let list = named(&table, "System.Collections.Generic.List`1");
    let params = table.type_arguments(list);
    assert_eq!(params.len(), 1);
    assert_eq!(table.construct(list, &params), list);
    assert_eq!(table.type_kind(params[0]), TypeKind::TypeParameter);
}

#[test]
fn test_nullable_wrapping() {
    let table = TypeTable::with_core_library();
    let int = special(&table, SpecialType::Int32);
    let nullable_int = table.nullable_of(int).expect("Nullable<T> declared");

    assert_eq!(table.nullable_underlying(nullable_int), Some(int));
    assert_eq!(table.nullable_underlying(int), None);
    assert_eq!(table.type_kind(nullable_int), TypeKind::Struct);
    assert!(table.is_value_type(nullable_int));
    assert_eq!(
        table.special_type(table.original_definition(nullable_int)),
        SpecialType::NullableT
    );
    assert_eq!(table.display_name(nullable_int), "int?");
}

#[test]
fn test_assignability_through_hierarchy() {
    let table = TypeTable::with_core_library();
    let object = special(&table, SpecialType::Object);
    let value_type = special(&table, SpecialType::ValueType);
    let system_enum = special(&table, SpecialType::Enum);
    let int = special(&table, SpecialType::Int32);
    let string = special(&table, SpecialType::String);
    let comparable = named(&table, "System.IComparable");

    let shape = table.declare_interface("MyApp.IShape");
    let circle = table.declare(
        NamedTypeBuilder::class("MyApp.Circle")
            .base(object)
            .interface_impl(shape),
    );
    let unit_circle = table.declare(NamedTypeBuilder::class("MyApp.UnitCircle").base(circle));
    let color = table.declare_enum("MyApp.Color");

    assert!(table.is_assignable(unit_circle, circle));
    assert!(table.is_assignable(unit_circle, shape));
    assert!(table.is_assignable(unit_circle, object));
    assert!(!table.is_assignable(circle, unit_circle));
    assert!(!table.is_assignable(shape, circle));

    assert!(table.is_assignable(int, value_type));
    assert!(table.is_assignable(int, comparable));
    assert!(!table.is_assignable(int, string));

    assert!(table.is_assignable(color, system_enum));
    assert!(table.is_assignable(color, value_type));
    assert!(table.is_assignable(color, object));
}

#[test]
fn test_constructed_generics_substitute_interfaces() {
    let table = TypeTable::with_core_library();
    let string = special(&table, SpecialType::String);
    let int = special(&table, SpecialType::Int32);
    let list = named(&table, "System.Collections.Generic.List`1");
    let enumerable_t = named(&table, "System.Collections.Generic.IEnumerable`1");
    let enumerable = named(&table, "System.Collections.IEnumerable");

    let list_of_string = table.construct(list, &[string]);
    assert!(table.is_assignable(list_of_string, table.construct(enumerable_t, &[string])));
    assert!(table.is_assignable(list_of_string, enumerable));
    assert!(!table.is_assignable(list_of_string, table.construct(enumerable_t, &[int])));
}

#[test]
fn test_array_assignability() {
    let table = TypeTable::with_core_library();
    let object = special(&table, SpecialType::Object);
    let array = special(&table, SpecialType::Array);
    let string = special(&table, SpecialType::String);
    let int = special(&table, SpecialType::Int32);
    let list_t = named(&table, "System.Collections.Generic.IList`1");
    let enumerable_t = named(&table, "System.Collections.Generic.IEnumerable`1");

    let strings = table.array_of(string);
    let ints = table.array_of(int);

    assert!(table.is_assignable(strings, array));
    assert!(table.is_assignable(strings, object));
    assert!(table.is_assignable(strings, table.array_of(object)));
    assert!(!table.is_assignable(ints, table.array_of(object)));
    assert!(table.is_assignable(ints, table.construct(list_t, &[int])));
    assert!(table.is_assignable(strings, table.construct(enumerable_t, &[object])));
    assert!(!table.is_assignable(ints, table.construct(enumerable_t, &[object])));
}

#[test]
fn test_type_parameters_are_assignable_to_constraints() {
    let table = TypeTable::with_core_library();
    let shape = table.declare_interface("MyApp.IShape");
    let value_type = special(&table, SpecialType::ValueType);
    let constrained = table.type_parameter(
        "T",
        TypeParamConstraints::default().with_constraint_type(shape),
    );
    let structural = table.type_parameter("U", TypeParamConstraints::value_type());

    assert!(table.is_assignable(constrained, shape));
    assert!(table.is_assignable(structural, value_type));
    assert!(table.is_value_type(structural));
    assert!(!table.is_reference_type(structural));
    assert_eq!(
        table.type_parameter_constraints(structural),
        Some(TypeParamConstraints::value_type())
    );
}

#[test]
fn test_unknown_handles_answer_with_absence() {
    let table = TypeTable::with_core_library();
    let bogus = TypeId(u32::MAX);
    let object = special(&table, SpecialType::Object);

    assert_eq!(table.type_kind(bogus), TypeKind::Unknown);
    assert_eq!(table.special_type(bogus), SpecialType::None);
    assert!(table.type_arguments(bogus).is_empty());
    assert_eq!(table.array_element_type(bogus), None);
    assert!(!table.is_assignable(bogus, object));
    assert!(!table.is_assignable(bogus, bogus));
    assert!(!table.classify_conversion(bogus, object).exists());
}

#[test]
fn test_error_types_are_not_assignable() {
    let table = TypeTable::with_core_library();
    let object = special(&table, SpecialType::Object);
    let broken = table.error_type("Missing");
    assert_eq!(table.type_kind(broken), TypeKind::Error);
    assert!(!table.is_assignable(broken, object));
}

#[test]
fn test_display_names() {
    let table = TypeTable::with_core_library();
    let string = special(&table, SpecialType::String);
    let list = named(&table, "System.Collections.Generic.List`1");
    let dictionary = named(&table, "System.Collections.Generic.Dictionary`2");
    let traits = table.construct(dictionary, &[string, table.construct(list, &[string])]);

    assert_eq!(
        table.display_name(traits),
        "System.Collections.Generic.Dictionary<string, System.Collections.Generic.List<string>>"
    );
    assert_eq!(table.display_name(table.array_of(string)), "string[]");
    assert_eq!(table.display_name(list), "System.Collections.Generic.List<T>");
}

#[test]
fn test_references_and_attributes() {
    let table = TypeTable::new();
    table.add_reference(LibraryReference::new("xunit.core", None));
    table.add_reference(LibraryReference::new("xunit.assert", None));
    let found = table.find_referenced_library(&|name: &str| name.starts_with("xunit.a"));
    assert_eq!(found.map(|r| r.name), Some("xunit.assert".to_string()));

    let attribute = table.declare_class("Some.Attribute");
    table.add_assembly_attribute(AttributeData {
        attribute_class: attribute,
        type_arguments: vec![],
    });
    assert_eq!(table.assembly_attributes().len(), 1);
}

#[test]
fn test_concurrent_interning_yields_one_handle() {
    let table = TypeTable::with_core_library();
    let int = special(&table, SpecialType::Int32);
    let list = named(&table, "System.Collections.Generic.List`1");

    let handles: Vec<(TypeId, TypeId)> = (0..64)
        .into_par_iter()
        .map(|_| (table.array_of(int), table.construct(list, &[int])))
        .collect();

    let first = handles[0];
    assert!(handles.iter().all(|&pair| pair == first));
}

#[test]
fn test_poisoned_locks_still_answer_queries() {
    let table = TypeTable::with_core_library();
    let object = special(&table, SpecialType::Object);
    table.add_reference(LibraryReference::new("xunit.core", None));

    std::thread::scope(|scope| {
        let poisoner = scope.spawn(|| {
            let _references = table.references.write().unwrap();
            let _attributes = table.attributes.write().unwrap();
            panic!("writer died holding the locks");
        });
        assert!(poisoner.join().is_err());
    });
    assert!(table.references.is_poisoned());
    assert!(table.attributes.is_poisoned());

    assert_eq!(table.referenced_libraries().len(), 1);
    assert!(table.assembly_attributes().is_empty());

    table.add_reference(LibraryReference::new("xunit.assert", None));
    table.add_assembly_attribute(AttributeData {
        attribute_class: object,
        type_arguments: vec![object],
    });
    assert_eq!(table.referenced_libraries().len(), 2);
    assert_eq!(table.assembly_attributes().len(), 1);
}
