//! Command-line host for the capability engine.
//!
//! A program is described by a JSON manifest (library references, user
//! types, serializer registrations and conversion operators) plus any
//! references and version overrides given as flags. The `xan` binary
//! resolves its capability snapshot and answers capability, conversion
//! and serializability queries against it.
pub mod args;
pub mod driver;
pub mod manifest;
pub mod report;
pub mod type_syntax;
