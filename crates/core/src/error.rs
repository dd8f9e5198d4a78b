/// Contract violations raised while encoding.
///
/// These indicate a graph that upstream validation should have rejected.
/// Recoverable gaps (dangling references, unevaluable expressions) never
/// surface here; they become placeholders in the encoded document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A pattern node's declared type is not a class or interface.
    #[error("pattern node '{node}' has no class or interface type (declared as '{declared}')")]
    UnresolvedNodeType { node: String, declared: String },

    /// An edge names something that is not a reference.
    #[error("edge '{reference}' from node '{node}' does not resolve to a reference")]
    UnresolvedEdgeReference { node: String, reference: String },

    /// An edge points outside the nodes registered for its pattern.
    #[error("edge '{reference}' from node '{node}' targets '{target}', which is not a node of pattern '{pattern}'")]
    UnregisteredEdgeTarget {
        pattern: String,
        node: String,
        reference: String,
        target: String,
    },

    /// The walker reached an element of the wrong kind.
    #[error("expected {expected} element at '{path}', found {found}")]
    UnexpectedElement {
        expected: &'static str,
        found: &'static str,
        path: String,
    },

    /// The document handle does not belong to the graph.
    #[error("unknown document #{0}")]
    UnknownDocument(usize),
}
