use super::{CapabilityContext, EmptyContext};
use crate::well_known::WellKnownType;
use xan_common::LibraryFamily;
use xan_universe::TypeId;

pub trait RunnerUtilityCapabilities: CapabilityContext {
    fn runner_long_lived_marshal_by_ref_object(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::RunnerLongLivedMarshalByRefObject)
    }
}

family_context!(
    /// `xunit.runner.utility.*`
    RunnerUtilityV2Context => LibraryFamily::RunnerUtilityV2
);

family_context!(
    /// `xunit.v3.runner.utility.*`
    RunnerUtilityV3Context => LibraryFamily::RunnerUtilityV3
);

impl RunnerUtilityCapabilities for RunnerUtilityV2Context<'_> {}

impl RunnerUtilityCapabilities for RunnerUtilityV3Context<'_> {}

impl RunnerUtilityCapabilities for EmptyContext {}
