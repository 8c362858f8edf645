//! Capability resolution.
//!
//! Scans the referenced libraries once, pairs every framework family found
//! with its version (or a caller override), and hands the result to
//! [`CapabilitySnapshot`].

use crate::snapshot::CapabilitySnapshot;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use tracing::debug;
use xan_common::{LibraryFamily, LibraryVersion};
use xan_universe::TypeUniverse;

/// Caller-supplied versions that replace what the references report.
///
/// An override for a family the program does not reference activates that
/// family, which lets tests pin capabilities without building references.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionOverrides {
    versions: BTreeMap<LibraryFamily, LibraryVersion>,
}

impl VersionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, family: LibraryFamily, version: LibraryVersion) -> Self {
        self.insert(family, version);
        self
    }

    /// Set the override for `family`, returning the previous one.
    pub fn insert(&mut self, family: LibraryFamily, version: LibraryVersion) -> Option<LibraryVersion> {
        self.versions.insert(family, version)
    }

    pub fn get(&self, family: LibraryFamily) -> Option<LibraryVersion> {
        self.versions.get(&family).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LibraryFamily, LibraryVersion)> + '_ {
        self.versions.iter().map(|(&family, &version)| (family, version))
    }
}

impl FromIterator<(LibraryFamily, LibraryVersion)> for VersionOverrides {
    fn from_iter<I: IntoIterator<Item = (LibraryFamily, LibraryVersion)>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().collect(),
        }
    }
}

/// Builds [`CapabilitySnapshot`]s for one program.
pub struct CapabilityResolver<'u> {
    universe: &'u dyn TypeUniverse,
    overrides: VersionOverrides,
}

impl<'u> CapabilityResolver<'u> {
    pub fn new(universe: &'u dyn TypeUniverse) -> Self {
        Self {
            universe,
            overrides: VersionOverrides::default(),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: VersionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn overrides(&self) -> &VersionOverrides {
        &self.overrides
    }

    /// Resolve every family and build the snapshot.
    ///
    /// The first reference matching a family wins. A family is active when it
    /// is referenced or overridden; its version is the override if present,
    /// otherwise the reference's version (which may be unknown).
    pub fn resolve(&self) -> CapabilitySnapshot<'u> {
        let mut families: SmallVec<[(LibraryFamily, Option<LibraryVersion>); 9]> = SmallVec::new();
        for family in LibraryFamily::ALL {
            let reference = self
                .universe
                .find_referenced_library(&|name: &str| family.matches_name(name));
            let version = match (self.overrides.get(family), reference) {
                (Some(version), _) => Some(version),
                (None, Some(reference)) => reference.version,
                (None, None) => continue,
            };
            families.push((family, version));
        }

        debug!(
            families = ?families,
            overrides = self.overrides.len(),
            "resolved capability snapshot"
        );
        CapabilitySnapshot::from_families(self.universe, &families)
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
