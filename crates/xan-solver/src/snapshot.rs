//! Capability snapshot: the immutable per-program view rules consult.

use crate::contexts::{
    AbstractionsCapabilities, AbstractionsV2Context, AssertCapabilities, AssertV2Context,
    AssertV3Context, CapabilityContext, CommonV3Context, CoreCapabilities, CoreV2Context,
    CoreV3Context, EMPTY, ExecutionCapabilities, ExecutionV2Context, RunnerUtilityCapabilities,
    RunnerUtilityV2Context, RunnerUtilityV3Context,
};
use crate::well_known::{HandleCache, SystemType, WellKnownType};
use serde::Serialize;
use std::fmt;
use tracing::trace;
use xan_common::{Concern, LibraryFamily, LibraryVersion};
use xan_universe::{TypeId, TypeUniverse};

/// Every feature flag of a snapshot, read through the composed contexts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureFlags {
    pub supports_default_parameter_values: bool,
    pub supports_parameter_arrays: bool,
    pub supports_string_to_temporal_conversion: bool,
    pub supports_theory_data_row: bool,
    pub supports_fail_assertion: bool,
    pub supports_null_assertion_with_pointers: bool,
    pub supports_inexact_type_assertions: bool,
}

impl FeatureFlags {
    /// `(name, value)` pairs in declaration order.
    pub fn entries(&self) -> [(&'static str, bool); 7] {
        [
            (
                "supports_default_parameter_values",
                self.supports_default_parameter_values,
            ),
            ("supports_parameter_arrays", self.supports_parameter_arrays),
            (
                "supports_string_to_temporal_conversion",
                self.supports_string_to_temporal_conversion,
            ),
            ("supports_theory_data_row", self.supports_theory_data_row),
            ("supports_fail_assertion", self.supports_fail_assertion),
            (
                "supports_null_assertion_with_pointers",
                self.supports_null_assertion_with_pointers,
            ),
            (
                "supports_inexact_type_assertions",
                self.supports_inexact_type_assertions,
            ),
        ]
    }
}

/// Which framework capabilities one analyzed program has.
///
/// Built once per program by [`CapabilityResolver`](crate::CapabilityResolver)
/// and immutable afterwards apart from its resolve-once handle caches. The
/// snapshot borrows the universe it was resolved against; its handles mean
/// nothing in any other universe.
///
/// Composed accessors ([`core`](Self::core), [`assert`](Self::assert), ...)
/// pick the second-generation context when present, else the first, else
/// [`EmptyContext`](crate::EmptyContext). Each concern is composed on its own.
pub struct CapabilitySnapshot<'u> {
    universe: &'u dyn TypeUniverse,
    core_v2: Option<CoreV2Context<'u>>,
    core_v3: Option<CoreV3Context<'u>>,
    assert_v2: Option<AssertV2Context<'u>>,
    assert_v3: Option<AssertV3Context<'u>>,
    abstractions_v2: Option<AbstractionsV2Context<'u>>,
    common_v3: Option<CommonV3Context<'u>>,
    execution_v2: Option<ExecutionV2Context<'u>>,
    runner_utility_v2: Option<RunnerUtilityV2Context<'u>>,
    runner_utility_v3: Option<RunnerUtilityV3Context<'u>>,
    system_types: HandleCache<{ SystemType::COUNT }>,
}

impl<'u> CapabilitySnapshot<'u> {
    /// The snapshot of a program referencing no framework library.
    pub fn empty(universe: &'u dyn TypeUniverse) -> Self {
        Self {
            universe,
            core_v2: None,
            core_v3: None,
            assert_v2: None,
            assert_v3: None,
            abstractions_v2: None,
            common_v3: None,
            execution_v2: None,
            runner_utility_v2: None,
            runner_utility_v3: None,
            system_types: HandleCache::new(),
        }
    }

    pub(crate) fn from_families(
        universe: &'u dyn TypeUniverse,
        families: &[(LibraryFamily, Option<LibraryVersion>)],
    ) -> Self {
        let mut snapshot = Self::empty(universe);
        for &(family, version) in families {
            match family {
                LibraryFamily::CoreV2 => snapshot.core_v2 = Some(CoreV2Context::new(universe, version)),
                LibraryFamily::CoreV3 => snapshot.core_v3 = Some(CoreV3Context::new(universe, version)),
                LibraryFamily::AssertV2 => {
                    snapshot.assert_v2 = Some(AssertV2Context::new(universe, version));
                }
                LibraryFamily::AssertV3 => {
                    snapshot.assert_v3 = Some(AssertV3Context::new(universe, version));
                }
                LibraryFamily::AbstractionsV2 => {
                    snapshot.abstractions_v2 = Some(AbstractionsV2Context::new(universe, version));
                }
                LibraryFamily::CommonV3 => {
                    snapshot.common_v3 = Some(CommonV3Context::new(universe, version));
                }
                LibraryFamily::ExecutionV2 => {
                    snapshot.execution_v2 = Some(ExecutionV2Context::new(universe, version));
                }
                LibraryFamily::RunnerUtilityV2 => {
                    snapshot.runner_utility_v2 = Some(RunnerUtilityV2Context::new(universe, version));
                }
                LibraryFamily::RunnerUtilityV3 => {
                    snapshot.runner_utility_v3 = Some(RunnerUtilityV3Context::new(universe, version));
                }
            }
        }
        snapshot
    }

    pub fn universe(&self) -> &'u dyn TypeUniverse {
        self.universe
    }

    // =========================================================================
    // Composed contexts
    // =========================================================================

    pub fn core(&self) -> &dyn CoreCapabilities {
        match (&self.core_v3, &self.core_v2) {
            (Some(v3), _) => v3,
            (None, Some(v2)) => v2,
            (None, None) => &EMPTY,
        }
    }

    pub fn assert(&self) -> &dyn AssertCapabilities {
        match (&self.assert_v3, &self.assert_v2) {
            (Some(v3), _) => v3,
            (None, Some(v2)) => v2,
            (None, None) => &EMPTY,
        }
    }

    pub fn abstractions(&self) -> &dyn AbstractionsCapabilities {
        match (&self.common_v3, &self.abstractions_v2) {
            (Some(v3), _) => v3,
            (None, Some(v2)) => v2,
            (None, None) => &EMPTY,
        }
    }

    pub fn execution(&self) -> &dyn ExecutionCapabilities {
        match &self.execution_v2 {
            Some(v2) => v2,
            None => &EMPTY,
        }
    }

    pub fn runner_utility(&self) -> &dyn RunnerUtilityCapabilities {
        match (&self.runner_utility_v3, &self.runner_utility_v2) {
            (Some(v3), _) => v3,
            (None, Some(v2)) => v2,
            (None, None) => &EMPTY,
        }
    }

    // =========================================================================
    // Per-generation contexts
    // =========================================================================

    pub fn v2_core(&self) -> Option<&CoreV2Context<'u>> {
        self.core_v2.as_ref()
    }

    pub fn v3_core(&self) -> Option<&CoreV3Context<'u>> {
        self.core_v3.as_ref()
    }

    pub fn v2_assert(&self) -> Option<&AssertV2Context<'u>> {
        self.assert_v2.as_ref()
    }

    pub fn v3_assert(&self) -> Option<&AssertV3Context<'u>> {
        self.assert_v3.as_ref()
    }

    pub fn v2_abstractions(&self) -> Option<&AbstractionsV2Context<'u>> {
        self.abstractions_v2.as_ref()
    }

    pub fn v3_common(&self) -> Option<&CommonV3Context<'u>> {
        self.common_v3.as_ref()
    }

    pub fn v2_execution(&self) -> Option<&ExecutionV2Context<'u>> {
        self.execution_v2.as_ref()
    }

    pub fn v2_runner_utility(&self) -> Option<&RunnerUtilityV2Context<'u>> {
        self.runner_utility_v2.as_ref()
    }

    pub fn v3_runner_utility(&self) -> Option<&RunnerUtilityV3Context<'u>> {
        self.runner_utility_v3.as_ref()
    }

    // =========================================================================
    // Derived predicates
    // =========================================================================

    /// Any first-generation library is referenced (or overridden).
    pub fn has_v2_references(&self) -> bool {
        self.core_v2.is_some()
            || self.assert_v2.is_some()
            || self.abstractions_v2.is_some()
            || self.execution_v2.is_some()
            || self.runner_utility_v2.is_some()
    }

    /// Any second-generation library is referenced (or overridden).
    pub fn has_v3_references(&self) -> bool {
        self.core_v3.is_some()
            || self.assert_v3.is_some()
            || self.common_v3.is_some()
            || self.runner_utility_v3.is_some()
    }

    pub fn feature_flags(&self) -> FeatureFlags {
        let core = self.core();
        let assert = self.assert();
        FeatureFlags {
            supports_default_parameter_values: core.supports_default_parameter_values(),
            supports_parameter_arrays: core.supports_parameter_arrays(),
            supports_string_to_temporal_conversion: core.supports_string_to_temporal_conversion(),
            supports_theory_data_row: core.supports_theory_data_row(),
            supports_fail_assertion: assert.supports_fail_assertion(),
            supports_null_assertion_with_pointers: assert.supports_null_assertion_with_pointers(),
            supports_inexact_type_assertions: assert.supports_inexact_type_assertions(),
        }
    }

    /// Active families with their resolved versions, in family order.
    pub fn families(&self) -> Vec<(LibraryFamily, Option<LibraryVersion>)> {
        self.contexts()
            .into_iter()
            .flatten()
            .filter_map(|context| context.family().map(|family| (family, context.version())))
            .collect()
    }

    fn contexts(&self) -> [Option<&dyn CapabilityContext>; 9] {
        [
            self.core_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            self.core_v3.as_ref().map(|c| c as &dyn CapabilityContext),
            self.assert_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            self.assert_v3.as_ref().map(|c| c as &dyn CapabilityContext),
            self.abstractions_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            self.common_v3.as_ref().map(|c| c as &dyn CapabilityContext),
            self.execution_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            self.runner_utility_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            self.runner_utility_v3.as_ref().map(|c| c as &dyn CapabilityContext),
        ]
    }

    // =========================================================================
    // Handles
    // =========================================================================

    /// Handle of a well-known type.
    ///
    /// Asks the contexts of the type's concern newest generation first and
    /// returns the first one that defines and resolves it, so an identifier
    /// only the older generation defines (the first-generation serialization
    /// marker) still resolves when both generations are referenced.
    pub fn type_handle(&self, ty: WellKnownType) -> Option<TypeId> {
        let candidates: [Option<&dyn CapabilityContext>; 2] = match ty.concern() {
            Concern::Core => [
                self.core_v3.as_ref().map(|c| c as &dyn CapabilityContext),
                self.core_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            ],
            Concern::Assert => [
                self.assert_v3.as_ref().map(|c| c as &dyn CapabilityContext),
                self.assert_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            ],
            Concern::Abstractions => [
                self.common_v3.as_ref().map(|c| c as &dyn CapabilityContext),
                self.abstractions_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            ],
            Concern::Execution => [
                None,
                self.execution_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            ],
            Concern::RunnerUtility => [
                self.runner_utility_v3.as_ref().map(|c| c as &dyn CapabilityContext),
                self.runner_utility_v2.as_ref().map(|c| c as &dyn CapabilityContext),
            ],
        };
        candidates
            .into_iter()
            .flatten()
            .find_map(|context| context.type_handle(ty))
    }

    /// Handle of a library type, independent of framework references.
    pub fn system_type(&self, ty: SystemType) -> Option<TypeId> {
        self.system_types.get_or_resolve(ty as usize, || {
            let resolved = self.universe.resolve_type_by_qualified_name(ty.qualified_name());
            trace!(system_type = ?ty, resolved = ?resolved, "resolved system type");
            resolved
        })
    }
}

impl fmt::Debug for CapabilitySnapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySnapshot")
            .field("families", &self.families())
            .field("flags", &self.feature_flags())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/snapshot_tests.rs"]
mod tests;
