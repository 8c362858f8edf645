//! Common types and utilities for the xan analyzer engine.
//!
//! This crate provides foundational types used across all xan crates:
//! - Library references as reported by the host (`LibraryReference`)
//! - Four-part assembly versions (`LibraryVersion`, `VersionParseError`)
//! - Test framework library families (`LibraryFamily`)
//! - Engine limits and thresholds

// Library references and assembly versions
pub mod library;
pub use library::{LibraryReference, LibraryVersion, VersionParseError};

// Library families and their name patterns
pub mod family;
pub use family::{Concern, Generation, LibraryFamily, NamePattern, UnknownFamilyError};

// Centralized limits and thresholds
pub mod limits;
