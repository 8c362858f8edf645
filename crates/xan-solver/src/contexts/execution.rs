use super::{CapabilityContext, EmptyContext};
use crate::well_known::WellKnownType;
use xan_common::LibraryFamily;
use xan_universe::TypeId;

/// In-process execution library. Only the first generation ships one.
pub trait ExecutionCapabilities: CapabilityContext {
    fn long_lived_marshal_by_ref_object(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::LongLivedMarshalByRefObject)
    }

    fn xunit_test_case(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::XunitTestCase)
    }
}

family_context!(
    /// `xunit.execution.*`
    ExecutionV2Context => LibraryFamily::ExecutionV2
);

impl ExecutionCapabilities for ExecutionV2Context<'_> {}

impl ExecutionCapabilities for EmptyContext {}
