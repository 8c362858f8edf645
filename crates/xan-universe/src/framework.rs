//! Public surface of the xUnit assemblies.
//!
//! Hosts that build a [`TypeTable`] by hand (the command-line host, tests)
//! call [`declare_reference`] for every library the program references. The
//! reference is recorded, and when the name belongs to a known
//! [`LibraryFamily`], the types that family exposes are declared so that
//! qualified-name lookups behave the way they would against the real
//! metadata.

use crate::TypeUniverse;
use crate::table::{NamedTypeBuilder, TypeTable};
use crate::types::{SpecialType, TypeId};
use tracing::debug;
use xan_common::{LibraryFamily, LibraryReference};

/// Record `reference` on the table and declare the surface of the family
/// it belongs to. Returns the identified family, if any.
pub fn declare_reference(table: &TypeTable, reference: LibraryReference) -> Option<LibraryFamily> {
    let family = LibraryFamily::identify(&reference);
    debug!(reference = %reference, ?family, "declaring referenced library");
    table.add_reference(reference);
    if let Some(family) = family {
        declare_surface(table, family);
    }
    family
}

/// Declare the public types of `family` without recording a reference.
pub fn declare_surface(table: &TypeTable, family: LibraryFamily) {
    match family {
        LibraryFamily::CoreV2 => declare_core(table, "Xunit.Sdk.DataAttribute", false),
        LibraryFamily::CoreV3 => declare_core(table, "Xunit.v3.DataAttribute", true),
        LibraryFamily::AssertV2 | LibraryFamily::AssertV3 => {
            table.declare(object_class(table, "Xunit.Assert").sealed(true));
        }
        LibraryFamily::AbstractionsV2 => {
            let serializable = table.declare_interface("Xunit.Abstractions.IXunitSerializable");
            table.declare_interface("Xunit.Abstractions.ITestOutputHelper");
            table.declare_interface("Xunit.Abstractions.IMessageSink");
            table.declare(
                NamedTypeBuilder::interface("Xunit.Abstractions.ITestCase").interface_impl(serializable),
            );
        }
        LibraryFamily::CommonV3 => {
            table.declare_interface("Xunit.Sdk.IXunitSerializable");
            table.declare_interface("Xunit.Sdk.IXunitSerializer");
            table.declare_interface("Xunit.Sdk.IMessageSink");
            table.declare_interface("Xunit.ITestOutputHelper");
        }
        LibraryFamily::ExecutionV2 => {
            table.declare_class("Xunit.LongLivedMarshalByRefObject");
            let mut test_case = object_class(table, "Xunit.Sdk.XunitTestCase");
            if let Some(interface) = table.named("Xunit.Abstractions.ITestCase") {
                test_case = test_case.interface_impl(interface);
            }
            table.declare(test_case);
        }
        LibraryFamily::RunnerUtilityV2 | LibraryFamily::RunnerUtilityV3 => {
            table.declare_class("Xunit.Sdk.LongLivedMarshalByRefObject");
        }
    }
}

fn declare_core(table: &TypeTable, data_attribute_name: &str, v3: bool) {
    let fact = table.declare(attribute_class(table, "Xunit.FactAttribute"));
    table.declare(attribute_class(table, "Xunit.TheoryAttribute").base(fact));

    let data = table.declare(attribute_class(table, data_attribute_name));
    for name in [
        "Xunit.InlineDataAttribute",
        "Xunit.MemberDataAttribute",
        "Xunit.ClassDataAttribute",
    ] {
        table.declare(attribute_class(table, name).base(data).sealed(true));
    }
    for name in [
        "Xunit.CollectionAttribute",
        "Xunit.CollectionDefinitionAttribute",
    ] {
        table.declare(attribute_class(table, name).sealed(true));
    }
    table.declare(NamedTypeBuilder::interface("Xunit.IClassFixture`1").type_parameter("TFixture"));
    table.declare(NamedTypeBuilder::interface("Xunit.ICollectionFixture`1").type_parameter("TFixture"));

    if v3 {
        table.declare(object_class(table, "Xunit.TheoryDataRow"));
        table.declare(attribute_class(table, "Xunit.Sdk.RegisterXunitSerializerAttribute").sealed(true));
    }
}

/// Class deriving from `System.Attribute` when the core library is seeded.
fn attribute_class(table: &TypeTable, name: &str) -> NamedTypeBuilder {
    let builder = NamedTypeBuilder::class(name);
    match table.resolve_type_by_qualified_name("System.Attribute") {
        Some(attribute) => builder.base(attribute),
        None => builder,
    }
}

fn object_class(table: &TypeTable, name: &str) -> NamedTypeBuilder {
    let builder = NamedTypeBuilder::class(name);
    match table.special(SpecialType::Object) {
        Some(object) => builder.base(object),
        None => builder,
    }
}

/// Register `serializer` for `supported` through the v3 assembly attribute.
/// Returns `false` when the v3 core surface has not been declared.
pub fn register_serializer(table: &TypeTable, serializer: TypeId, supported: &[TypeId]) -> bool {
    let Some(attribute) = table.named("Xunit.Sdk.RegisterXunitSerializerAttribute") else {
        return false;
    };
    let mut type_arguments = Vec::with_capacity(supported.len() + 1);
    type_arguments.push(serializer);
    type_arguments.extend_from_slice(supported);
    table.add_assembly_attribute(crate::AttributeData {
        attribute_class: attribute,
        type_arguments,
    });
    true
}

#[cfg(test)]
#[path = "../tests/framework_tests.rs"]
mod tests;
