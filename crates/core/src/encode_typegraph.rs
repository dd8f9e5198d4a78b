//! Typegraph encoding: live modeling graph -> [`ModelDocument`].
//!
//! The walk is depth-first and keeps declaration order everywhere.
//! Cross references (extended classes, reference targets, opposites, enum
//! types and enum defaults) are replaced with stable IDs, which is what
//! breaks the cycles of the live graph.

use crate::ast::*;
use crate::error::EncodeError;
use crate::expr::{evaluate, Context};
use crate::identity::IdentityResolver;
use mml_interchange::{
    AbstractClassEntity, AttributeEntity, AttributeModifiersEntity, ClassElementModifiersEntity,
    DefaultValue, EnumEntity, EnumEntryEntity, ModelDocument, MultiplicityEntity, PackageEntity,
    ReferenceEntity, ReferenceModifiersEntity, TypeGraph,
};

/// Encode one modeling document with a fresh resolver.
pub fn encode_model(
    graph: &SourceGraph,
    document: DocumentId,
) -> Result<ModelDocument, EncodeError> {
    TypegraphEncoder::new(graph).encode_document(document)
}

pub struct TypegraphEncoder<'g> {
    graph: &'g SourceGraph,
    resolver: IdentityResolver<'g>,
    context: Context,
}

impl<'g> TypegraphEncoder<'g> {
    pub fn new(graph: &'g SourceGraph) -> Self {
        TypegraphEncoder {
            graph,
            resolver: IdentityResolver::new(graph),
            context: Context::new(),
        }
    }

    /// Bindings visible to default-value expressions.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn resolver(&self) -> &IdentityResolver<'g> {
        &self.resolver
    }

    pub fn encode_document(&mut self, document: DocumentId) -> Result<ModelDocument, EncodeError> {
        if self.graph.document(document).is_none() {
            return Err(EncodeError::UnknownDocument(document.index()));
        }
        let mut packages = Vec::new();
        for root in self.graph.roots(document, "packages") {
            packages.push(self.package(root)?);
        }
        Ok(ModelDocument {
            typegraph: TypeGraph { packages },
            instancegraph: None,
        })
    }

    /// Encode several documents sharing one resolver.
    pub fn encode_documents(
        &mut self,
        documents: &[DocumentId],
    ) -> Result<Vec<ModelDocument>, EncodeError> {
        documents
            .iter()
            .map(|doc| self.encode_document(*doc))
            .collect()
    }

    fn package(&mut self, id: ElementId) -> Result<PackageEntity, EncodeError> {
        let graph = self.graph;
        let package = graph.package(id).ok_or_else(|| unexpected(graph, id, "Package"))?;
        log::trace!("encoding package {}", package.name);

        let mut sub_packages = Vec::with_capacity(package.packages.len());
        for p in &package.packages {
            sub_packages.push(self.package(*p)?);
        }
        let mut enums = Vec::with_capacity(package.enums.len());
        for e in &package.enums {
            enums.push(self.enum_(*e)?);
        }
        let mut abstract_classes = Vec::with_capacity(package.classes.len());
        for c in &package.classes {
            abstract_classes.push(self.class(*c)?);
        }

        Ok(PackageEntity {
            id: self.resolver.resolve_node(id),
            name: package.name.clone(),
            sub_packages,
            enums,
            abstract_classes,
        })
    }

    fn class(&mut self, id: ElementId) -> Result<AbstractClassEntity, EncodeError> {
        let graph = self.graph;
        let class = graph.class(id).ok_or_else(|| unexpected(graph, id, "Class"))?;

        let mut attributes = Vec::with_capacity(class.attributes.len());
        for a in &class.attributes {
            attributes.push(self.attribute(*a)?);
        }
        let mut references = Vec::with_capacity(class.references.len());
        for r in &class.references {
            references.push(self.reference(*r)?);
        }
        let extends_ids = class
            .extends
            .iter()
            .map(|r| self.resolver.resolve(r).into_text())
            .collect();
        let implements_ids = class
            .implements
            .iter()
            .map(|r| self.resolver.resolve(r).into_text())
            .collect();

        Ok(AbstractClassEntity {
            id: self.resolver.resolve_node(id),
            name: class.name.clone(),
            is_abstract: class.is_abstract,
            is_interface: class.is_interface,
            attributes,
            references,
            extends_ids,
            implements_ids,
        })
    }

    fn attribute(&mut self, id: ElementId) -> Result<AttributeEntity, EncodeError> {
        let graph = self.graph;
        let attribute = match &graph[id].kind {
            ElementKind::Attribute(a) => a,
            _ => return Err(unexpected(graph, id, "Attribute")),
        };

        let (type_, is_enum_type) = match &attribute.type_ {
            AttributeType::Primitive(p) => (p.keyword().to_string(), false),
            AttributeType::Enum(r) => (self.resolver.resolve(r).into_text(), true),
        };

        let default_value = match &attribute.default {
            Some(Expr::EnumValue(entry)) if is_enum_type => {
                Some(DefaultValue::Str(self.resolver.resolve(entry).into_text()))
            }
            Some(expr) => Some(self.evaluate(expr)),
            None => None,
        };

        Ok(AttributeEntity {
            id: self.resolver.resolve_node(id),
            name: attribute.name.clone(),
            type_,
            is_enum_type,
            has_default_value: default_value.is_some(),
            default_value,
            modifiers: AttributeModifiersEntity {
                common: common_modifiers(&attribute.modifiers.common),
                id: attribute.modifiers.id,
            },
        })
    }

    fn reference(&mut self, id: ElementId) -> Result<ReferenceEntity, EncodeError> {
        let graph = self.graph;
        let reference = match &graph[id].kind {
            ElementKind::Reference(r) => r,
            _ => return Err(unexpected(graph, id, "Reference")),
        };

        let type_ = self.resolver.resolve(&reference.target).into_text();
        let opposite = reference
            .opposite
            .as_ref()
            .map(|o| self.resolver.resolve(o).into_text());

        Ok(ReferenceEntity {
            id: self.resolver.resolve_node(id),
            name: reference.name.clone(),
            type_,
            multiplicity: multiplicity(reference.multiplicity.as_ref()),
            modifiers: ReferenceModifiersEntity {
                common: common_modifiers(&reference.modifiers.common),
                resolve: reference.modifiers.resolve,
                containment: reference.modifiers.containment,
            },
            has_opposite: opposite.is_some(),
            opposite,
        })
    }

    fn enum_(&mut self, id: ElementId) -> Result<EnumEntity, EncodeError> {
        let graph = self.graph;
        let enum_ = match &graph[id].kind {
            ElementKind::Enum(e) => e,
            _ => return Err(unexpected(graph, id, "Enum")),
        };

        let mut entries = Vec::with_capacity(enum_.entries.len());
        for entry_id in &enum_.entries {
            let entry = match &graph[*entry_id].kind {
                ElementKind::EnumEntry(e) => e,
                _ => return Err(unexpected(graph, *entry_id, "EnumEntry")),
            };
            let default_value = entry.value.as_ref().map(|v| self.evaluate(v));
            entries.push(EnumEntryEntity {
                id: self.resolver.resolve_node(*entry_id),
                name: entry.name.clone(),
                has_default_value: default_value.is_some(),
                default_value,
            });
        }

        Ok(EnumEntity {
            id: self.resolver.resolve_node(id),
            name: enum_.name.clone(),
            entries,
        })
    }

    fn evaluate(&self, expr: &Expr) -> DefaultValue {
        evaluate(expr, self.graph, &self.context)
            .map(DefaultValue::from)
            .unwrap_or_placeholder(|p| DefaultValue::Str(p.to_string()))
    }
}

fn unexpected(graph: &SourceGraph, id: ElementId, expected: &'static str) -> EncodeError {
    EncodeError::UnexpectedElement {
        expected,
        found: graph.type_tag(id),
        path: graph.structural_path(id),
    }
}

fn common_modifiers(m: &ClassElementModifiers) -> ClassElementModifiersEntity {
    ClassElementModifiersEntity {
        readonly: m.readonly,
        volatile: m.volatile,
        transient: m.transient,
        unsettable: m.unsettable,
        derived: m.derived,
        unique: m.unique,
        ordered: m.ordered,
    }
}

/// Raw bounds and sentinel flags; recognizing the default is left to the
/// decoder.
fn multiplicity(m: Option<&Multiplicity>) -> MultiplicityEntity {
    let m = match m {
        Some(m) => m,
        None => return MultiplicityEntity::default(),
    };
    let (lower, lower_is_n, lower_is_n0) = bound(m.lower);
    let (upper, upper_is_n, upper_is_n0, has_upper_bound) = match m.upper {
        Some(u) => {
            let (v, n, n0) = bound(u);
            (v, n, n0, true)
        }
        None => (lower, false, false, false),
    };
    MultiplicityEntity {
        has_upper_bound,
        lower,
        lower_is_n,
        lower_is_n0,
        upper,
        upper_is_n,
        upper_is_n0,
    }
}

fn bound(b: MultiplicityBound) -> (i64, bool, bool) {
    match b {
        MultiplicityBound::Value(v) => (v, false, false),
        MultiplicityBound::Star => (0, true, false),
        MultiplicityBound::Plus => (0, false, true),
    }
}
