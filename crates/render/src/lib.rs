//! mml-render: decode side of the model graph codec.
//!
//! Turns typed exchange documents back into canonical modeling-language
//! text. Decoding is two explicit passes: [`NameIndex::build`] collects the
//! qualified name of every declared ID across all documents, then
//! [`Renderer`] walks each document and writes text, looking names up in
//! the index. Unknown IDs render as `$$UNKNOWN$$` instead of failing.

pub mod name_index;
pub mod render;

use std::fmt;

use mml_interchange::{InterchangeError, ModelDocument};

pub use name_index::NameIndex;
pub use render::{multiplicity, Renderer};

/// Layout settings for rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { indent: 4 }
    }
}

/// Error type for decoding raw exchange JSON.
#[derive(Debug, Clone)]
pub enum RenderError {
    /// The input is not a valid exchange document.
    InvalidDocument(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidDocument(msg) => write!(f, "invalid document: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<InterchangeError> for RenderError {
    fn from(e: InterchangeError) -> Self {
        RenderError::InvalidDocument(e.to_string())
    }
}

/// Render each document, resolving names across all of them.
pub fn decode(documents: &[ModelDocument], options: &RenderOptions) -> Vec<String> {
    let index = NameIndex::build(documents);
    let renderer = Renderer::new(&index, options);
    documents.iter().map(|d| renderer.document(d)).collect()
}

/// Like [`decode`], for documents still in JSON form.
pub fn decode_values(
    values: &[serde_json::Value],
    options: &RenderOptions,
) -> Result<Vec<String>, RenderError> {
    let documents = values
        .iter()
        .map(mml_interchange::from_interchange)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(decode(&documents, options))
}
