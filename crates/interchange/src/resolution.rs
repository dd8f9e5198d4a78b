//! Tolerant-path results.
//!
//! Encoding and decoding work on documents that may be mid-edit. Instead
//! of failing, lookups that cannot be completed produce
//! [`Resolution::Unresolved`]; callers that need text render the matching
//! placeholder string so the gap stays visible in the output.

use std::fmt;

/// Placeholder ID written for a dangling cross reference during encoding.
pub const ERROR_ID: &str = "$$ERROR$$";

/// Placeholder for IDs unknown to the name index and unevaluable expressions.
pub const UNKNOWN: &str = "$$UNKNOWN$$";

/// Placeholder written for a pattern binding whose invoked node has no
/// owning pattern.
pub const UNKNOWN_BINDING: &str = "UNKNOWN";

/// Outcome of a lookup that is allowed to fail without aborting the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved(T),
    Unresolved(Unresolved),
}

/// Why a lookup did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// A cross reference whose target is not a live element.
    DanglingReference { text: String },
    /// An ID that no decoded document declares.
    UnknownId { id: String },
    /// A variable with no binding in the evaluation context.
    UnboundVariable { name: String },
    /// An expression whose operator is undefined for its operand types.
    Unevaluable { reason: String },
}

impl Unresolved {
    /// The placeholder text rendered in place of the missing value.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Unresolved::DanglingReference { .. } => ERROR_ID,
            Unresolved::UnknownId { .. }
            | Unresolved::UnboundVariable { .. }
            | Unresolved::Unevaluable { .. } => UNKNOWN,
        }
    }
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::DanglingReference { text } => {
                write!(f, "dangling reference '{}'", text)
            }
            Unresolved::UnknownId { id } => write!(f, "unknown id '{}'", id),
            Unresolved::UnboundVariable { name } => write!(f, "unbound variable '{}'", name),
            Unresolved::Unevaluable { reason } => write!(f, "unevaluable expression: {}", reason),
        }
    }
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Resolution::Resolved(v) => Some(v),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Resolved(v) => Resolution::Resolved(f(v)),
            Resolution::Unresolved(u) => Resolution::Unresolved(u),
        }
    }

    /// Returns the resolved value, or builds one from the placeholder text.
    pub fn unwrap_or_placeholder(self, from_placeholder: impl FnOnce(&'static str) -> T) -> T {
        match self {
            Resolution::Resolved(v) => v,
            Resolution::Unresolved(u) => from_placeholder(u.placeholder()),
        }
    }
}

impl Resolution<String> {
    /// The resolved string, or the placeholder for the failure.
    pub fn into_text(self) -> String {
        self.unwrap_or_placeholder(str::to_owned)
    }
}

impl<'a> Resolution<&'a str> {
    pub fn as_text(&self) -> &'a str {
        match self {
            Resolution::Resolved(s) => s,
            Resolution::Unresolved(u) => u.placeholder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_reference_renders_error_id() {
        let r: Resolution<String> = Resolution::Unresolved(Unresolved::DanglingReference {
            text: "A.Missing".to_string(),
        });
        assert_eq!(r.into_text(), "$$ERROR$$");
    }

    #[test]
    fn unknown_id_and_unevaluable_render_unknown() {
        let unknown = Unresolved::UnknownId {
            id: "x".to_string(),
        };
        let unevaluable = Unresolved::Unevaluable {
            reason: "bool + bool".to_string(),
        };
        assert_eq!(unknown.placeholder(), UNKNOWN);
        assert_eq!(unevaluable.placeholder(), UNKNOWN);
    }

    #[test]
    fn resolved_passes_value_through() {
        let r = Resolution::Resolved("A.B");
        assert_eq!(r.as_text(), "A.B");
        assert_eq!(Resolution::Resolved(3).map(|v| v * 2).ok(), Some(6));
    }
}
