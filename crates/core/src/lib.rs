//! mml-core: encode side of the model graph codec.
//!
//! Takes an already-parsed [`SourceGraph`] and produces the ID-addressed
//! exchange documents defined in `mml-interchange`.
//!
//! # Public API
//!
//! - [`encode_model()`] / [`TypegraphEncoder`] -- modeling documents to a
//!   [`ModelDocument`](mml_interchange::ModelDocument)
//! - [`encode_patterns()`] / [`PatternEncoder`] -- constraint documents to
//!   a [`PatternDocument`](mml_interchange::PatternDocument)
//! - [`IdentityResolver`] -- stable, structural element IDs
//! - [`evaluate()`] and [`Context`] -- the default-value expression language
//! - [`EncodeError`] -- strict-path contract violations

pub mod ast;
pub mod collector;
pub mod encode_patterns;
pub mod encode_typegraph;
pub mod error;
pub mod expr;
pub mod identity;

pub use ast::{DocumentId, ElementId, Language, Parent, Ref, SourceGraph};
pub use collector::GclPatternCollector;
pub use encode_patterns::{encode_patterns, PatternEncoder};
pub use encode_typegraph::{encode_model, TypegraphEncoder};
pub use error::EncodeError;
pub use expr::{evaluate, Binding, Bound, Context, Value};
pub use identity::IdentityResolver;
