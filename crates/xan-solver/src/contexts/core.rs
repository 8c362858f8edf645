//! Core framework contexts (attributes, fixtures, theory data).

use super::{CapabilityContext, EmptyContext};
use crate::well_known::WellKnownType;
use xan_common::{LibraryFamily, LibraryVersion};
use xan_universe::TypeId;

const DEFAULT_PARAMETER_VALUES: LibraryVersion = LibraryVersion::new(2, 2, 0);
const PARAMETER_ARRAYS: LibraryVersion = LibraryVersion::new(2, 2, 0);
const STRING_TO_TEMPORAL_CONVERSION: LibraryVersion = LibraryVersion::new(2, 4, 2);

pub trait CoreCapabilities: CapabilityContext {
    /// Theory parameters may declare default values.
    fn supports_default_parameter_values(&self) -> bool;

    /// Theory parameters may be `params` arrays.
    fn supports_parameter_arrays(&self) -> bool;

    /// Data strings convert to `DateTimeOffset` and `Guid` parameters.
    fn supports_string_to_temporal_conversion(&self) -> bool;

    fn supports_theory_data_row(&self) -> bool;

    fn fact_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::FactAttribute)
    }

    fn theory_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::TheoryAttribute)
    }

    fn data_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::DataAttribute)
    }

    fn inline_data_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::InlineDataAttribute)
    }

    fn member_data_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::MemberDataAttribute)
    }

    fn class_data_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::ClassDataAttribute)
    }

    fn collection_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::CollectionAttribute)
    }

    fn collection_definition_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::CollectionDefinitionAttribute)
    }

    fn class_fixture(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::ClassFixture)
    }

    fn collection_fixture(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::CollectionFixture)
    }

    fn theory_data_row(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::TheoryDataRow)
    }

    fn register_xunit_serializer_attribute(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::RegisterXunitSerializerAttribute)
    }
}

family_context!(
    /// `xunit.core`
    CoreV2Context => LibraryFamily::CoreV2
);

family_context!(
    /// `xunit.v3.core*`
    CoreV3Context => LibraryFamily::CoreV3
);

impl CoreCapabilities for CoreV2Context<'_> {
    fn supports_default_parameter_values(&self) -> bool {
        self.base.at_least(DEFAULT_PARAMETER_VALUES)
    }

    fn supports_parameter_arrays(&self) -> bool {
        self.base.at_least(PARAMETER_ARRAYS)
    }

    fn supports_string_to_temporal_conversion(&self) -> bool {
        self.base.at_least(STRING_TO_TEMPORAL_CONVERSION)
    }

    fn supports_theory_data_row(&self) -> bool {
        false
    }
}

impl CoreCapabilities for CoreV3Context<'_> {
    fn supports_default_parameter_values(&self) -> bool {
        true
    }

    fn supports_parameter_arrays(&self) -> bool {
        true
    }

    fn supports_string_to_temporal_conversion(&self) -> bool {
        true
    }

    fn supports_theory_data_row(&self) -> bool {
        true
    }
}

impl CoreCapabilities for EmptyContext {
    fn supports_default_parameter_values(&self) -> bool {
        false
    }

    fn supports_parameter_arrays(&self) -> bool {
        false
    }

    fn supports_string_to_temporal_conversion(&self) -> bool {
        false
    }

    fn supports_theory_data_row(&self) -> bool {
        false
    }
}
