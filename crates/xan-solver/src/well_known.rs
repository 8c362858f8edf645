//! Well-known type identifiers.
//!
//! Rules ask for framework types by identifier, never by name. Each family
//! context maps the identifiers its generation defines to a qualified
//! metadata name and resolves it against the universe at most once.

use serde::Serialize;
use std::sync::OnceLock;
use xan_common::{Concern, LibraryFamily};
use xan_universe::TypeId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownType {
    // Core
    FactAttribute,
    TheoryAttribute,
    DataAttribute,
    InlineDataAttribute,
    MemberDataAttribute,
    ClassDataAttribute,
    CollectionAttribute,
    CollectionDefinitionAttribute,
    ClassFixture,
    CollectionFixture,
    TheoryDataRow,
    RegisterXunitSerializerAttribute,
    // Assert
    Assert,
    // Abstractions
    /// Serialization marker of the first generation.
    XunitSerializable,
    /// Serialization marker of the second generation.
    CustomXunitSerializable,
    XunitSerializer,
    TestOutputHelper,
    MessageSink,
    TestCase,
    // Execution
    LongLivedMarshalByRefObject,
    XunitTestCase,
    // Runner utility
    RunnerLongLivedMarshalByRefObject,
}

impl WellKnownType {
    pub const COUNT: usize = Self::ALL.len();

    pub const ALL: [Self; 22] = [
        Self::FactAttribute,
        Self::TheoryAttribute,
        Self::DataAttribute,
        Self::InlineDataAttribute,
        Self::MemberDataAttribute,
        Self::ClassDataAttribute,
        Self::CollectionAttribute,
        Self::CollectionDefinitionAttribute,
        Self::ClassFixture,
        Self::CollectionFixture,
        Self::TheoryDataRow,
        Self::RegisterXunitSerializerAttribute,
        Self::Assert,
        Self::XunitSerializable,
        Self::CustomXunitSerializable,
        Self::XunitSerializer,
        Self::TestOutputHelper,
        Self::MessageSink,
        Self::TestCase,
        Self::LongLivedMarshalByRefObject,
        Self::XunitTestCase,
        Self::RunnerLongLivedMarshalByRefObject,
    ];

    pub const fn concern(self) -> Concern {
        match self {
            Self::FactAttribute
            | Self::TheoryAttribute
            | Self::DataAttribute
            | Self::InlineDataAttribute
            | Self::MemberDataAttribute
            | Self::ClassDataAttribute
            | Self::CollectionAttribute
            | Self::CollectionDefinitionAttribute
            | Self::ClassFixture
            | Self::CollectionFixture
            | Self::TheoryDataRow
            | Self::RegisterXunitSerializerAttribute => Concern::Core,
            Self::Assert => Concern::Assert,
            Self::XunitSerializable
            | Self::CustomXunitSerializable
            | Self::XunitSerializer
            | Self::TestOutputHelper
            | Self::MessageSink
            | Self::TestCase => Concern::Abstractions,
            Self::LongLivedMarshalByRefObject | Self::XunitTestCase => Concern::Execution,
            Self::RunnerLongLivedMarshalByRefObject => Concern::RunnerUtility,
        }
    }

    /// Qualified metadata name of this type in `family`, or `None` when the
    /// family does not define it.
    pub fn qualified_name(self, family: LibraryFamily) -> Option<&'static str> {
        use LibraryFamily::*;
        let name = match (self, family) {
            (Self::FactAttribute, CoreV2 | CoreV3) => "Xunit.FactAttribute",
            (Self::TheoryAttribute, CoreV2 | CoreV3) => "Xunit.TheoryAttribute",
            (Self::DataAttribute, CoreV2) => "Xunit.Sdk.DataAttribute",
            (Self::DataAttribute, CoreV3) => "Xunit.v3.DataAttribute",
            (Self::InlineDataAttribute, CoreV2 | CoreV3) => "Xunit.InlineDataAttribute",
            (Self::MemberDataAttribute, CoreV2 | CoreV3) => "Xunit.MemberDataAttribute",
            (Self::ClassDataAttribute, CoreV2 | CoreV3) => "Xunit.ClassDataAttribute",
            (Self::CollectionAttribute, CoreV2 | CoreV3) => "Xunit.CollectionAttribute",
            (Self::CollectionDefinitionAttribute, CoreV2 | CoreV3) => {
                "Xunit.CollectionDefinitionAttribute"
            }
            (Self::ClassFixture, CoreV2 | CoreV3) => "Xunit.IClassFixture`1",
            (Self::CollectionFixture, CoreV2 | CoreV3) => "Xunit.ICollectionFixture`1",
            (Self::TheoryDataRow, CoreV3) => "Xunit.TheoryDataRow",
            (Self::RegisterXunitSerializerAttribute, CoreV3) => {
                "Xunit.Sdk.RegisterXunitSerializerAttribute"
            }

            (Self::Assert, AssertV2 | AssertV3) => "Xunit.Assert",

            (Self::XunitSerializable, AbstractionsV2) => "Xunit.Abstractions.IXunitSerializable",
            (Self::CustomXunitSerializable, CommonV3) => "Xunit.Sdk.IXunitSerializable",
            (Self::XunitSerializer, CommonV3) => "Xunit.Sdk.IXunitSerializer",
            (Self::TestOutputHelper, AbstractionsV2) => "Xunit.Abstractions.ITestOutputHelper",
            (Self::TestOutputHelper, CommonV3) => "Xunit.ITestOutputHelper",
            (Self::MessageSink, AbstractionsV2) => "Xunit.Abstractions.IMessageSink",
            (Self::MessageSink, CommonV3) => "Xunit.Sdk.IMessageSink",
            (Self::TestCase, AbstractionsV2) => "Xunit.Abstractions.ITestCase",

            (Self::LongLivedMarshalByRefObject, ExecutionV2) => "Xunit.LongLivedMarshalByRefObject",
            (Self::XunitTestCase, ExecutionV2) => "Xunit.Sdk.XunitTestCase",

            (Self::RunnerLongLivedMarshalByRefObject, RunnerUtilityV2 | RunnerUtilityV3) => {
                "Xunit.Sdk.LongLivedMarshalByRefObject"
            }
            _ => return None,
        };
        Some(name)
    }
}

/// Library types the checkers consult regardless of which framework
/// families are referenced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    DateTimeOffset,
    Guid,
    TimeSpan,
    DateOnly,
    TimeOnly,
    BigInteger,
    Dictionary,
    List,
}

impl SystemType {
    pub const COUNT: usize = Self::ALL.len();

    pub const ALL: [Self; 8] = [
        Self::DateTimeOffset,
        Self::Guid,
        Self::TimeSpan,
        Self::DateOnly,
        Self::TimeOnly,
        Self::BigInteger,
        Self::Dictionary,
        Self::List,
    ];

    pub const fn qualified_name(self) -> &'static str {
        match self {
            Self::DateTimeOffset => "System.DateTimeOffset",
            Self::Guid => "System.Guid",
            Self::TimeSpan => "System.TimeSpan",
            Self::DateOnly => "System.DateOnly",
            Self::TimeOnly => "System.TimeOnly",
            Self::BigInteger => "System.Numerics.BigInteger",
            Self::Dictionary => "System.Collections.Generic.Dictionary`2",
            Self::List => "System.Collections.Generic.List`1",
        }
    }
}

/// Resolve-once slots indexed by identifier discriminant.
///
/// A slot is written by the first reader and never again; concurrent first
/// readers block on the slot rather than racing on the write.
pub(crate) struct HandleCache<const N: usize> {
    slots: [OnceLock<Option<TypeId>>; N],
}

impl<const N: usize> HandleCache<N> {
    pub(crate) fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| OnceLock::new()),
        }
    }

    pub(crate) fn get_or_resolve(
        &self,
        index: usize,
        resolve: impl FnOnce() -> Option<TypeId>,
    ) -> Option<TypeId> {
        *self.slots[index].get_or_init(resolve)
    }
}

#[cfg(test)]
#[path = "../tests/well_known_tests.rs"]
mod tests;
