//! Per-family capability contexts.
//!
//! Every referenced family gets one context. A context owns the family's
//! resolved version and its well-known type cache; the concern traits
//! ([`CoreCapabilities`], [`AssertCapabilities`], ...) expose the feature
//! flags for that concern as version comparisons.
//!
//! [`EmptyContext`] implements every concern trait with all flags `false`
//! and all handles absent, so composed accessors never return `Option`.

/// Declare a family context type wrapping [`ContextBase`].
macro_rules! family_context {
    ($(#[$meta:meta])* $name:ident => $family:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'u> {
            base: $crate::contexts::ContextBase<'u>,
        }

        impl<'u> $name<'u> {
            pub(crate) fn new(
                universe: &'u dyn xan_universe::TypeUniverse,
                version: Option<xan_common::LibraryVersion>,
            ) -> Self {
                Self {
                    base: $crate::contexts::ContextBase::new(universe, $family, version),
                }
            }
        }

        impl $crate::contexts::CapabilityContext for $name<'_> {
            fn family(&self) -> Option<xan_common::LibraryFamily> {
                Some($family)
            }

            fn version(&self) -> Option<xan_common::LibraryVersion> {
                self.base.version
            }

            fn type_handle(
                &self,
                ty: $crate::well_known::WellKnownType,
            ) -> Option<xan_universe::TypeId> {
                self.base.handle(ty)
            }
        }
    };
}

mod abstractions;
mod assert;
mod core;
mod execution;
mod runner_utility;

pub use abstractions::{AbstractionsCapabilities, AbstractionsV2Context, CommonV3Context};
pub use assert::{AssertCapabilities, AssertV2Context, AssertV3Context};
pub use self::core::{CoreCapabilities, CoreV2Context, CoreV3Context};
pub use execution::{ExecutionCapabilities, ExecutionV2Context};
pub use runner_utility::{RunnerUtilityCapabilities, RunnerUtilityV2Context, RunnerUtilityV3Context};

use crate::well_known::{HandleCache, WellKnownType};
use std::fmt;
use tracing::trace;
use xan_common::{LibraryFamily, LibraryVersion};
use xan_universe::{TypeId, TypeUniverse};

/// Shared surface of every context.
pub trait CapabilityContext: Send + Sync {
    /// Family the context was resolved from; `None` for the empty context.
    fn family(&self) -> Option<LibraryFamily>;

    /// Resolved (or overridden) version. `None` when the reference carried no
    /// version, and always for the empty context.
    fn version(&self) -> Option<LibraryVersion>;

    /// Cached handle of a well-known type this family defines.
    fn type_handle(&self, ty: WellKnownType) -> Option<TypeId>;
}

/// The canonical context of an unreferenced family.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EmptyContext;

pub(crate) static EMPTY: EmptyContext = EmptyContext;

impl CapabilityContext for EmptyContext {
    fn family(&self) -> Option<LibraryFamily> {
        None
    }

    fn version(&self) -> Option<LibraryVersion> {
        None
    }

    fn type_handle(&self, _ty: WellKnownType) -> Option<TypeId> {
        None
    }
}

/// State shared by all family contexts.
pub(crate) struct ContextBase<'u> {
    universe: &'u dyn TypeUniverse,
    family: LibraryFamily,
    version: Option<LibraryVersion>,
    handles: HandleCache<{ WellKnownType::COUNT }>,
}

impl<'u> ContextBase<'u> {
    pub(crate) fn new(
        universe: &'u dyn TypeUniverse,
        family: LibraryFamily,
        version: Option<LibraryVersion>,
    ) -> Self {
        Self {
            universe,
            family,
            version,
            handles: HandleCache::new(),
        }
    }

    /// Threshold comparison; false when the version is unknown.
    pub(crate) fn at_least(&self, threshold: LibraryVersion) -> bool {
        self.version.is_some_and(|version| version >= threshold)
    }

    pub(crate) fn handle(&self, ty: WellKnownType) -> Option<TypeId> {
        self.handles.get_or_resolve(ty as usize, || {
            let name = ty.qualified_name(self.family)?;
            let resolved = self.universe.resolve_type_by_qualified_name(name);
            trace!(
                family = %self.family,
                well_known = ?ty,
                name,
                resolved = ?resolved,
                "resolved well-known type"
            );
            resolved
        })
    }
}

impl fmt::Debug for ContextBase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBase")
            .field("family", &self.family)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
