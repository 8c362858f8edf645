//! Library references reported by the host.
//!
//! A program under analysis references a flat list of libraries (assemblies).
//! Each reference carries a name and, usually, a four-part version. The
//! capability resolver matches these names against the known test framework
//! families and compares the versions against fixed feature thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// LibraryVersion
// =============================================================================

/// Four-part assembly version (`major.minor.build.revision`).
///
/// Missing trailing parts are zero, so `2.2` and `2.2.0.0` compare equal.
/// Ordering is lexicographic over the four parts, which is exactly how the
/// framework's feature thresholds are meant to be compared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LibraryVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl LibraryVersion {
    /// Create a three-part version with a zero revision.
    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision: 0,
        }
    }

    /// Create a full four-part version.
    pub const fn with_revision(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}

/// Error produced when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,
    #[error("version `{input}` has more than four parts")]
    TooManyParts { input: String },
    #[error("version `{input}` has an invalid part `{part}`")]
    InvalidPart { input: String, part: String },
}

impl FromStr for LibraryVersion {
    type Err = VersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        // Pre-release and build metadata (`2.5.0-pre.20`, `1.0.0+abc`) do not
        // participate in assembly version comparison.
        let core = trimmed
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        if core.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut parts = [0u32; 4];
        for (index, part) in core.split('.').enumerate() {
            if index >= parts.len() {
                return Err(VersionParseError::TooManyParts {
                    input: input.to_string(),
                });
            }
            parts[index] = part
                .parse::<u32>()
                .map_err(|_| VersionParseError::InvalidPart {
                    input: input.to_string(),
                    part: part.to_string(),
                })?;
        }

        Ok(Self::with_revision(parts[0], parts[1], parts[2], parts[3]))
    }
}

impl TryFrom<String> for LibraryVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LibraryVersion> for String {
    fn from(value: LibraryVersion) -> Self {
        value.to_string()
    }
}

// =============================================================================
// LibraryReference
// =============================================================================

/// A library referenced by the program under analysis.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<LibraryVersion>,
}

impl LibraryReference {
    pub fn new(name: impl Into<String>, version: Option<LibraryVersion>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Reference with a known version.
    pub fn versioned(name: impl Into<String>, version: LibraryVersion) -> Self {
        Self::new(name, Some(version))
    }

    /// ASCII case-insensitive name equality.
    pub fn matches_exact(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// ASCII case-insensitive name prefix match, used for platform-suffixed
    /// libraries such as `xunit.execution.desktop`.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        starts_with_ignore_ascii_case(&self.name, prefix)
    }
}

pub(crate) fn starts_with_ignore_ascii_case(name: &str, prefix: &str) -> bool {
    name.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

impl fmt::Display for LibraryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) => write!(f, "{} {}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
#[path = "../tests/library_tests.rs"]
mod tests;
