//! Test framework library families.
//!
//! The framework ships two incompatible API generations. Each generation is
//! split over several assemblies, and a program may reference any mix of
//! them. A [`LibraryFamily`] names one such assembly (or group of
//! platform-suffixed assemblies) and knows how to recognize it.

use crate::library::{LibraryReference, starts_with_ignore_ascii_case};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Major API generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    V2,
    V3,
}

/// The area of the framework a family provides. Capability composition is
/// resolved independently per concern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Concern {
    Core,
    Assert,
    Abstractions,
    Execution,
    RunnerUtility,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NamePattern {
    Exact(&'static str),
    /// Platform-suffixed assemblies (`xunit.execution.desktop`).
    Prefix(&'static str),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryFamily {
    CoreV2,
    CoreV3,
    AssertV2,
    AssertV3,
    AbstractionsV2,
    CommonV3,
    ExecutionV2,
    RunnerUtilityV2,
    RunnerUtilityV3,
}

impl LibraryFamily {
    pub const ALL: [Self; 9] = [
        Self::CoreV2,
        Self::CoreV3,
        Self::AssertV2,
        Self::AssertV3,
        Self::AbstractionsV2,
        Self::CommonV3,
        Self::ExecutionV2,
        Self::RunnerUtilityV2,
        Self::RunnerUtilityV3,
    ];

    pub const fn pattern(self) -> NamePattern {
        match self {
            Self::CoreV2 => NamePattern::Exact("xunit.core"),
            Self::CoreV3 => NamePattern::Prefix("xunit.v3.core"),
            Self::AssertV2 => NamePattern::Exact("xunit.assert"),
            Self::AssertV3 => NamePattern::Exact("xunit.v3.assert"),
            Self::AbstractionsV2 => NamePattern::Exact("xunit.abstractions"),
            Self::CommonV3 => NamePattern::Exact("xunit.v3.common"),
            Self::ExecutionV2 => NamePattern::Prefix("xunit.execution."),
            Self::RunnerUtilityV2 => NamePattern::Prefix("xunit.runner.utility."),
            Self::RunnerUtilityV3 => NamePattern::Prefix("xunit.v3.runner.utility."),
        }
    }

    pub const fn generation(self) -> Generation {
        match self {
            Self::CoreV2
            | Self::AssertV2
            | Self::AbstractionsV2
            | Self::ExecutionV2
            | Self::RunnerUtilityV2 => Generation::V2,
            Self::CoreV3
            | Self::AssertV3
            | Self::CommonV3
            | Self::RunnerUtilityV3 => Generation::V3,
        }
    }

    pub const fn concern(self) -> Concern {
        match self {
            Self::CoreV2 | Self::CoreV3 => Concern::Core,
            Self::AssertV2 | Self::AssertV3 => Concern::Assert,
            Self::AbstractionsV2 | Self::CommonV3 => Concern::Abstractions,
            Self::ExecutionV2 => Concern::Execution,
            Self::RunnerUtilityV2 | Self::RunnerUtilityV3 => Concern::RunnerUtility,
        }
    }

    /// ASCII case-insensitive match of a library name against this family.
    pub fn matches_name(self, name: &str) -> bool {
        match self.pattern() {
            NamePattern::Exact(expected) => name.eq_ignore_ascii_case(expected),
            NamePattern::Prefix(prefix) => starts_with_ignore_ascii_case(name, prefix),
        }
    }

    /// The family a reference belongs to. Family patterns are disjoint, so
    /// at most one matches.
    pub fn identify(reference: &LibraryReference) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.matches_name(&reference.name))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoreV2 => "core-v2",
            Self::CoreV3 => "core-v3",
            Self::AssertV2 => "assert-v2",
            Self::AssertV3 => "assert-v3",
            Self::AbstractionsV2 => "abstractions-v2",
            Self::CommonV3 => "common-v3",
            Self::ExecutionV2 => "execution-v2",
            Self::RunnerUtilityV2 => "runner-utility-v2",
            Self::RunnerUtilityV3 => "runner-utility-v3",
        }
    }
}

impl fmt::Display for LibraryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown library family `{input}` (expected one of: core-v2, core-v3, assert-v2, assert-v3, abstractions-v2, common-v3, execution-v2, runner-utility-v2, runner-utility-v3)")]
pub struct UnknownFamilyError {
    pub input: String,
}

impl FromStr for LibraryFamily {
    type Err = UnknownFamilyError;

    /// Accepts the kebab-case name (`core-v2`), case-insensitively, with `_`
    /// allowed in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| UnknownFamilyError {
                input: s.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "../tests/family_tests.rs"]
mod tests;
