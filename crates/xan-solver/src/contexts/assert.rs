//! Assertion library contexts.

use super::{CapabilityContext, EmptyContext};
use crate::well_known::WellKnownType;
use xan_common::{LibraryFamily, LibraryVersion};
use xan_universe::TypeId;

const FAIL_ASSERTION: LibraryVersion = LibraryVersion::new(2, 5, 0);
const NULL_ASSERTION_WITH_POINTERS: LibraryVersion = LibraryVersion::new(2, 5, 0);
const INEXACT_TYPE_ASSERTIONS: LibraryVersion = LibraryVersion::new(2, 9, 3);

pub trait AssertCapabilities: CapabilityContext {
    /// `Assert.Fail(message)` exists.
    fn supports_fail_assertion(&self) -> bool;

    /// `Assert.Null`/`NotNull` accept unmanaged pointers.
    fn supports_null_assertion_with_pointers(&self) -> bool;

    /// `Assert.IsType`/`IsNotType` take an `exactMatch` argument.
    fn supports_inexact_type_assertions(&self) -> bool;

    fn assert_type(&self) -> Option<TypeId> {
        self.type_handle(WellKnownType::Assert)
    }
}

family_context!(
    /// `xunit.assert`
    AssertV2Context => LibraryFamily::AssertV2
);

family_context!(
    /// `xunit.v3.assert`
    AssertV3Context => LibraryFamily::AssertV3
);

impl AssertCapabilities for AssertV2Context<'_> {
    fn supports_fail_assertion(&self) -> bool {
        self.base.at_least(FAIL_ASSERTION)
    }

    fn supports_null_assertion_with_pointers(&self) -> bool {
        self.base.at_least(NULL_ASSERTION_WITH_POINTERS)
    }

    fn supports_inexact_type_assertions(&self) -> bool {
        self.base.at_least(INEXACT_TYPE_ASSERTIONS)
    }
}

impl AssertCapabilities for AssertV3Context<'_> {
    fn supports_fail_assertion(&self) -> bool {
        true
    }

    fn supports_null_assertion_with_pointers(&self) -> bool {
        true
    }

    fn supports_inexact_type_assertions(&self) -> bool {
        true
    }
}

impl AssertCapabilities for EmptyContext {
    fn supports_fail_assertion(&self) -> bool {
        false
    }

    fn supports_null_assertion_with_pointers(&self) -> bool {
        false
    }

    fn supports_inexact_type_assertions(&self) -> bool {
        false
    }
}
