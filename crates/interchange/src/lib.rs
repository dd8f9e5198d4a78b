//! mml-interchange: Exchange-format entity templates and deserialization.
//!
//! Provides the serializable, ID-addressed value objects produced by the
//! encoder in `mml-core` (packages, classes, enums, attributes, references,
//! multiplicities, modifiers, and constraint patterns) and a pair of
//! `from_interchange()` entry points that turn a `serde_json::Value` into a
//! typed [`ModelDocument`] or [`PatternDocument`].
//!
//! The crate also carries [`Resolution`], the tolerant-path result type
//! shared by the encoder and the decoder, together with the placeholder
//! strings rendered for unresolved values.

pub mod deserialize;
pub mod resolution;
pub mod types;

pub use deserialize::{from_interchange, patterns_from_interchange, InterchangeError};
pub use resolution::{Resolution, Unresolved, ERROR_ID, UNKNOWN, UNKNOWN_BINDING};
pub use types::*;
