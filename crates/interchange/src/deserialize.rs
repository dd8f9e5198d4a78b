//! Deserialization from exchange JSON into typed documents.
//!
//! The entry points are [`from_interchange`] for modeling documents and
//! [`patterns_from_interchange`] for constraint documents. Both take a
//! `&serde_json::Value` so transport glue can hand over whatever it
//! received without re-encoding it.

use crate::types::*;
use serde::de::DeserializeOwned;
use std::fmt;

/// Errors during exchange JSON deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The document is missing a required top-level field.
    MissingField { field: String },
    /// A package or pattern does not match the exchange schema.
    ConstructError {
        kind: String,
        id: String,
        message: String,
    },
    /// The document structure is invalid.
    InvalidDocument(String),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "document missing required field: '{}'", field)
            }
            InterchangeError::ConstructError { kind, id, message } => {
                write!(f, "{} '{}': {}", kind, id, message)
            }
            InterchangeError::InvalidDocument(msg) => {
                write!(f, "invalid document: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize a modeling exchange document.
///
/// Each package is parsed on its own so that a schema mismatch names the
/// offending package instead of a byte offset.
pub fn from_interchange(doc: &serde_json::Value) -> Result<ModelDocument, InterchangeError> {
    if !doc.is_object() {
        return Err(InterchangeError::InvalidDocument(
            "expected a JSON object".to_string(),
        ));
    }

    let typegraph = doc
        .get("typegraph")
        .ok_or_else(|| InterchangeError::MissingField {
            field: "typegraph".to_string(),
        })?;

    let packages_arr = typegraph
        .get("packages")
        .and_then(|p| p.as_array())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "typegraph.packages".to_string(),
        })?;

    let mut packages = Vec::with_capacity(packages_arr.len());
    for obj in packages_arr {
        packages.push(parse_construct::<PackageEntity>("Package", obj)?);
    }

    let instancegraph = doc
        .get("instancegraph")
        .and_then(|v| if v.is_null() { None } else { Some(v.clone()) });

    Ok(ModelDocument {
        typegraph: TypeGraph { packages },
        instancegraph,
    })
}

/// Deserialize a constraint exchange document.
pub fn patterns_from_interchange(
    doc: &serde_json::Value,
) -> Result<PatternDocument, InterchangeError> {
    if !doc.is_object() {
        return Err(InterchangeError::InvalidDocument(
            "expected a JSON object".to_string(),
        ));
    }

    let patterns_arr = doc
        .get("patterns")
        .and_then(|p| p.as_array())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "patterns".to_string(),
        })?;

    let mut patterns = Vec::with_capacity(patterns_arr.len());
    for obj in patterns_arr {
        patterns.push(parse_construct::<PatternEntity>("Pattern", obj)?);
    }

    let internal_patterns = match doc.get("internalPatterns") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(arr)) => {
            let mut internal = Vec::with_capacity(arr.len());
            for obj in arr {
                internal.push(parse_construct::<InternalPatternEntity>(
                    "InternalPattern",
                    obj,
                )?);
            }
            internal
        }
        Some(_) => {
            return Err(InterchangeError::InvalidDocument(
                "'internalPatterns' must be an array".to_string(),
            ))
        }
    };

    Ok(PatternDocument {
        patterns,
        internal_patterns,
    })
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn parse_construct<T: DeserializeOwned>(
    kind: &str,
    obj: &serde_json::Value,
) -> Result<T, InterchangeError> {
    serde_json::from_value(obj.clone()).map_err(|e| InterchangeError::ConstructError {
        kind: kind.to_string(),
        id: construct_id(obj),
        message: e.to_string(),
    })
}

fn construct_id(obj: &serde_json::Value) -> String {
    obj.get("id")
        .or_else(|| obj.get("declarationId"))
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>")
        .to_string()
}
