//! Constraint-pattern encoding: live constraint graph -> [`PatternDocument`].
//!
//! Patterns are encoded independently of the typegraph and get their own
//! resolver. Node class names are written as qualified names since the
//! matching engine consumes them directly.

use crate::ast::*;
use crate::collector::GclPatternCollector;
use crate::error::EncodeError;
use crate::identity::IdentityResolver;
use mml_interchange::{
    EdgeEntity, InternalPatternEntity, NodeBindingEntity, PatternDocument, PatternEntity,
    PatternNodeEntity, SupportPatternInvocationEntity, UNKNOWN_BINDING,
};
use std::collections::{BTreeMap, HashMap};

/// Encode one constraint document with a fresh resolver.
pub fn encode_patterns(
    graph: &SourceGraph,
    document: DocumentId,
) -> Result<PatternDocument, EncodeError> {
    PatternEncoder::new(graph).encode_document(document)
}

pub struct PatternEncoder<'g> {
    graph: &'g SourceGraph,
    resolver: IdentityResolver<'g>,
}

impl<'g> PatternEncoder<'g> {
    pub fn new(graph: &'g SourceGraph) -> Self {
        PatternEncoder {
            graph,
            resolver: IdentityResolver::new(graph),
        }
    }

    pub fn resolver(&self) -> &IdentityResolver<'g> {
        &self.resolver
    }

    pub fn encode_document(
        &mut self,
        document: DocumentId,
    ) -> Result<PatternDocument, EncodeError> {
        let mut collector = GclPatternCollector::new();
        self.collect(document, &mut collector)?;
        Ok(collector.into_document())
    }

    /// Encode the patterns and macro invocations of `document` into an
    /// existing collector. Declared patterns are registered before any
    /// macro invocation is expanded.
    pub fn collect(
        &mut self,
        document: DocumentId,
        collector: &mut GclPatternCollector,
    ) -> Result<(), EncodeError> {
        if self.graph.document(document).is_none() {
            return Err(EncodeError::UnknownDocument(document.index()));
        }
        for root in self.graph.roots(document, "patterns") {
            let entity = self.pattern(root)?;
            collector.register_pattern(entity);
        }
        for root in self.graph.roots(document, "macros") {
            if let Some(internal) = self.macro_invocation(root, collector)? {
                collector.register_internal(internal);
            }
        }
        Ok(())
    }

    fn pattern(&mut self, id: ElementId) -> Result<PatternEntity, EncodeError> {
        let graph = self.graph;
        let pattern = graph
            .pattern(id)
            .ok_or_else(|| unexpected(graph, id, "Pattern"))?;
        let pattern_id = self.resolver.resolve_node(id);
        log::trace!("encoding pattern {}", pattern.name);

        // Every node gets its ID before any edge is built, so an edge may
        // point at a node declared later in the pattern.
        let registered: HashMap<ElementId, String> = pattern
            .objects
            .iter()
            .map(|o| (*o, self.resolver.resolve_node(*o)))
            .collect();

        let mut edges = Vec::new();
        let mut nodes = Vec::with_capacity(pattern.objects.len());
        {
            let mut register = |edge: EdgeEntity| edges.push(edge);
            for object in &pattern.objects {
                nodes.push(self.node(*object, &pattern.name, &registered, &mut register)?);
            }
        }

        let mut pac = Vec::new();
        let mut nac = Vec::new();
        for inv_id in &pattern.invocations {
            let invocation = match &graph[*inv_id].kind {
                ElementKind::PatternInvocation(inv) => inv,
                _ => return Err(unexpected(graph, *inv_id, "PatternInvocation")),
            };
            let entity = self.invocation(invocation);
            match invocation.kind {
                InvocationKind::Enforce => pac.push(entity),
                InvocationKind::Forbid => nac.push(entity),
            }
        }

        Ok(PatternEntity {
            id: pattern_id,
            name: pattern.name.clone(),
            nodes,
            edges,
            pac,
            nac,
        })
    }

    /// Builds one node and hands each of its outgoing edges to `register`.
    fn node(
        &mut self,
        id: ElementId,
        pattern_name: &str,
        registered: &HashMap<ElementId, String>,
        register: &mut dyn FnMut(EdgeEntity),
    ) -> Result<PatternNodeEntity, EncodeError> {
        let graph = self.graph;
        let object = match &graph[id].kind {
            ElementKind::PatternObject(o) => o,
            _ => return Err(unexpected(graph, id, "PatternObject")),
        };

        let class = object
            .class
            .target
            .filter(|c| graph.class(*c).is_some())
            .ok_or_else(|| EncodeError::UnresolvedNodeType {
                node: object.name.clone(),
                declared: object.class.text.clone(),
            })?;
        let node_id = self.resolver.resolve_node(id);

        for edge_id in &object.references {
            let edge = match &graph[*edge_id].kind {
                ElementKind::PatternObjectReference(r) => r,
                _ => return Err(unexpected(graph, *edge_id, "PatternObjectReference")),
            };
            let referenced = edge.reference.target.and_then(|r| graph.element(r));
            let reference_name = match referenced.map(|el| &el.kind) {
                Some(ElementKind::Reference(r)) => r.name.clone(),
                _ => {
                    return Err(EncodeError::UnresolvedEdgeReference {
                        node: object.name.clone(),
                        reference: edge.reference.text.clone(),
                    })
                }
            };
            let to_id = edge
                .target
                .target
                .and_then(|t| registered.get(&t))
                .ok_or_else(|| EncodeError::UnregisteredEdgeTarget {
                    pattern: pattern_name.to_string(),
                    node: object.name.clone(),
                    reference: edge.reference.text.clone(),
                    target: edge.target.text.clone(),
                })?;
            register(EdgeEntity {
                from_id: node_id.clone(),
                to_id: to_id.clone(),
                reference_name,
                alias: edge.alias.clone(),
            });
        }

        Ok(PatternNodeEntity {
            id: node_id,
            name: object.name.clone(),
            class_name: graph.qualified_name(class),
        })
    }

    fn invocation(&mut self, invocation: &PatternInvocation) -> SupportPatternInvocationEntity {
        let pattern_id = self.resolver.resolve(&invocation.pattern).into_text();
        let bindings = invocation
            .bindings
            .iter()
            .map(|b| NodeBindingEntity {
                node_id: self.resolver.resolve(&b.node).into_text(),
                invoked_node_id: self.invoked_node(&b.invoked),
            })
            .collect();
        SupportPatternInvocationEntity {
            pattern_id,
            bindings,
        }
    }

    /// The invoked node's ID, or `UNKNOWN` when it does not sit inside a
    /// pattern.
    fn invoked_node(&mut self, node: &Ref) -> String {
        let graph = self.graph;
        let in_pattern = node
            .target
            .and_then(|t| graph.element(t))
            .and_then(|el| el.container)
            .is_some_and(|c| graph.pattern(c).is_some());
        match node.target {
            Some(t) if in_pattern => self.resolver.resolve_node(t),
            _ => {
                log::debug!("binding to '{}' has no owning pattern", node.text);
                UNKNOWN_BINDING.to_string()
            }
        }
    }

    fn macro_invocation(
        &mut self,
        id: ElementId,
        collector: &GclPatternCollector,
    ) -> Result<Option<InternalPatternEntity>, EncodeError> {
        let graph = self.graph;
        let invocation = match &graph[id].kind {
            ElementKind::MacroInvocation(m) => m,
            _ => return Err(unexpected(graph, id, "MacroInvocation")),
        };
        let invoked = match invocation.pattern.target.filter(|p| graph.pattern(*p).is_some()) {
            Some(p) => p,
            None => {
                log::warn!(
                    "skipping macro invocation of unresolved pattern '{}'",
                    invocation.pattern.text
                );
                return Ok(None);
            }
        };

        let declaration_id = self.resolver.resolve_node(id);
        let invoked_id = self.resolver.resolve_node(invoked);
        let template = match collector.pattern(&invoked_id) {
            Some(p) => p.clone(),
            None => self.pattern(invoked)?,
        };
        let node_targets: BTreeMap<String, String> = invocation
            .targets
            .iter()
            .map(|t| (t.name.clone(), self.resolver.resolve(&t.node).into_text()))
            .collect();

        Ok(Some(InternalPatternEntity {
            pattern: PatternEntity {
                id: declaration_id.clone(),
                name: String::new(),
                ..template
            },
            declaration_id,
            node_targets,
        }))
    }
}

fn unexpected(graph: &SourceGraph, id: ElementId, expected: &'static str) -> EncodeError {
    EncodeError::UnexpectedElement {
        expected,
        found: graph.type_tag(id),
        path: graph.structural_path(id),
    }
}
