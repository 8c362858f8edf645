//! Centralized limits for the xan analyzer engine.
//!
//! The engine only recurses over the structural shape of a type (array
//! element types and generic type arguments). Shapes coming from the host
//! are finite trees, but a misbehaving host can still hand us something
//! arbitrarily deep, so every structural walk is capped here.

/// Maximum depth for structural recursion over a type's shape.
///
/// Applies to serializability classification and the ignore predicate.
/// When exceeded, classification answers `Never` and the ignore predicate
/// answers `true`, so callers fall back to the conservative verdict.
///
/// ```text
/// int[][][][] ... 64 levels ... []
/// List<List<List< ... 64 levels ... >>>
/// ```
pub const MAX_TYPE_SHAPE_DEPTH: u32 = 64;
