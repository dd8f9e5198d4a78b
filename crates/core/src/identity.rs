//! Stable element identities.
//!
//! An ID is `"{document uri}::{type tag}::{structural path}"`. It depends
//! only on where the element sits in its document, so two runs over the same
//! source agree, and an ID from one document can be used verbatim by
//! another document that references it.
//!
//! One [`IdentityResolver`] lives for one encode call. The modeling graph
//! and the constraint graph each get their own instance.

use crate::ast::{ElementId, Ref, SourceGraph};
use mml_interchange::{Resolution, Unresolved};
use std::collections::HashMap;

pub struct IdentityResolver<'g> {
    graph: &'g SourceGraph,
    /// element index → ID
    ids: Vec<Option<String>>,
    /// ID → element
    elements: HashMap<String, ElementId>,
}

impl<'g> IdentityResolver<'g> {
    pub fn new(graph: &'g SourceGraph) -> Self {
        IdentityResolver {
            graph,
            ids: Vec::new(),
            elements: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &'g SourceGraph {
        self.graph
    }

    /// Computes the ID of `element` without touching the caches.
    pub fn reference_id(&self, element: ElementId) -> String {
        let el = &self.graph[element];
        let uri = self
            .graph
            .document(el.document)
            .map(|d| d.uri.as_str())
            .unwrap_or_default();
        format!(
            "{}::{}::{}",
            uri,
            self.graph.type_tag(element),
            self.graph.structural_path(element)
        )
    }

    /// The ID of a live element, computed at most once per resolver.
    pub fn resolve_node(&mut self, element: ElementId) -> String {
        if let Some(Some(id)) = self.ids.get(element.index()) {
            return id.clone();
        }
        let id = self.reference_id(element);
        log::trace!("assigned id {} to element #{}", id, element.index());
        if self.ids.len() <= element.index() {
            self.ids.resize(element.index() + 1, None);
        }
        self.ids[element.index()] = Some(id.clone());
        self.elements.insert(id.clone(), element);
        id
    }

    /// The ID of a reference's target. A reference whose target is not a
    /// live element is logged and reported as dangling.
    pub fn resolve(&mut self, reference: &Ref) -> Resolution<String> {
        match reference.target {
            Some(target) if self.graph.element(target).is_some() => {
                Resolution::Resolved(self.resolve_node(target))
            }
            _ => {
                log::warn!("unresolved reference '{}'", reference.text);
                Resolution::Unresolved(Unresolved::DanglingReference {
                    text: reference.text.clone(),
                })
            }
        }
    }

    /// The element an ID was issued for during this run.
    pub fn element(&self, id: &str) -> Option<ElementId> {
        self.elements.get(id).copied()
    }

    /// Number of IDs issued so far.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Language, Parent, Reference};

    fn graph() -> (SourceGraph, ElementId, ElementId, ElementId) {
        let mut g = SourceGraph::new();
        let doc = g.add_document("file:///m.mml", Language::Model);
        let a = g.add_package(Parent::Document(doc), "A");
        let b = g.add_class(a, "B");
        let c = g.add_class(a, "C");
        (g, a, b, c)
    }

    #[test]
    fn ids_combine_uri_tag_and_path() {
        let (g, a, b, _) = graph();
        let resolver = IdentityResolver::new(&g);
        assert_eq!(resolver.reference_id(a), "file:///m.mml::Package::/packages@0");
        assert_eq!(
            resolver.reference_id(b),
            "file:///m.mml::Class::/packages@0/classes@0"
        );
    }

    #[test]
    fn repeated_resolution_returns_same_id() {
        let (g, _, b, _) = graph();
        let mut resolver = IdentityResolver::new(&g);
        let first = resolver.resolve_node(b);
        let second = resolver.resolve_node(b);
        let via_ref = resolver.resolve(&Ref::to("A.B", b));
        assert_eq!(first, second);
        assert_eq!(via_ref, Resolution::Resolved(first.clone()));
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.element(&first), Some(b));
    }

    #[test]
    fn distinct_elements_get_distinct_ids() {
        let (g, a, b, c) = graph();
        let mut resolver = IdentityResolver::new(&g);
        let ids = [
            resolver.resolve_node(a),
            resolver.resolve_node(b),
            resolver.resolve_node(c),
        ];
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn same_path_in_other_document_differs() {
        let mut g = SourceGraph::new();
        let d1 = g.add_document("file:///one.mml", Language::Model);
        let d2 = g.add_document("file:///two.mml", Language::Model);
        let p1 = g.add_package(Parent::Document(d1), "A");
        let p2 = g.add_package(Parent::Document(d2), "A");
        let mut resolver = IdentityResolver::new(&g);
        assert_ne!(resolver.resolve_node(p1), resolver.resolve_node(p2));
    }

    #[test]
    fn dangling_reference_yields_error_placeholder() {
        let (mut g, _, b, _) = graph();
        g.add_reference(b, Reference::new("r", Ref::dangling("A.Missing")));
        let mut resolver = IdentityResolver::new(&g);
        let resolved = resolver.resolve(&Ref::dangling("A.Missing"));
        assert!(!resolved.is_resolved());
        assert_eq!(resolved.into_text(), "$$ERROR$$");
        assert!(resolver.is_empty());
    }
}
