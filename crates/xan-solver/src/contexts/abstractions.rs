use super::{CapabilityContext, EmptyContext};
use crate::well_known::WellKnownType;
use xan_common::LibraryFamily;
use xan_universe::TypeId;

/// Runner-facing interfaces: serialization markers, output helpers and
/// message sinks. No version-gated flags.
pub trait AbstractionsCapabilities: CapabilityContext {
    fn xunit_serializable(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::XunitSerializable)
    }

    fn custom_xunit_serializable(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::CustomXunitSerializable)
    }

    fn xunit_serializer(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::XunitSerializer)
    }

    fn test_output_helper(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::TestOutputHelper)
    }

    fn message_sink(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::MessageSink)
    }

    fn test_case(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::TestCase)
    }
}

family_context!(
    /// `xunit.abstractions`
    AbstractionsV2Context => LibraryFamily::AbstractionsV2
);

family_context!(
    /// `xunit.v3.common`
    CommonV3Context => LibraryFamily::CommonV3
);

impl AbstractionsCapabilities for AbstractionsV2Context<'_> {}

impl AbstractionsCapabilities for CommonV3Context<'_> {}

impl AbstractionsCapabilities for EmptyContext {}
