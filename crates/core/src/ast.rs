//! The live source graph handed to the encoders.
//!
//! Parsing happens upstream; this module only holds the parsed result as
//! an arena. Every element records its owning document, its container and
//! the containment feature it sits in, which is all the identity scheme
//! needs to derive a structural path. Cross references are [`Ref`]s that
//! keep the source text next to the resolved target so a dangling
//! reference is still describable.

use std::ops::Index;

// ──────────────────────────────────────────────
// Handles
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u32);

impl DocumentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A cross reference: the text written in the source plus the element it
/// resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ref {
    pub text: String,
    pub target: Option<ElementId>,
}

impl Ref {
    pub fn to(text: impl Into<String>, target: ElementId) -> Self {
        Ref {
            text: text.into(),
            target: Some(target),
        }
    }

    pub fn dangling(text: impl Into<String>) -> Self {
        Ref {
            text: text.into(),
            target: None,
        }
    }
}

// ──────────────────────────────────────────────
// Documents and elements
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Class-modeling language (packages, classes, enums).
    Model,
    /// Graph-constraint language (patterns).
    Constraint,
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub uri: String,
    pub language: Language,
    pub roots: Vec<ElementId>,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub document: DocumentId,
    pub container: Option<ElementId>,
    /// Containment feature of the container (or document) holding this element.
    pub feature: &'static str,
    /// Index within that feature's list.
    pub position: usize,
    pub kind: ElementKind,
}

/// Closed set of element kinds across both languages.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Package(Package),
    Class(Class),
    Enum(Enum),
    EnumEntry(EnumEntry),
    Attribute(Attribute),
    Reference(Reference),
    Variable(Variable),
    Pattern(Pattern),
    PatternObject(PatternObject),
    PatternObjectReference(PatternObjectReference),
    PatternInvocation(PatternInvocation),
    MacroInvocation(MacroInvocation),
}

impl ElementKind {
    /// Type tag used in stable IDs.
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Package(_) => "Package",
            ElementKind::Class(_) => "Class",
            ElementKind::Enum(_) => "Enum",
            ElementKind::EnumEntry(_) => "EnumEntry",
            ElementKind::Attribute(_) => "Attribute",
            ElementKind::Reference(_) => "Reference",
            ElementKind::Variable(_) => "Variable",
            ElementKind::Pattern(_) => "Pattern",
            ElementKind::PatternObject(_) => "PatternObject",
            ElementKind::PatternObjectReference(_) => "PatternObjectReference",
            ElementKind::PatternInvocation(_) => "PatternInvocation",
            ElementKind::MacroInvocation(_) => "MacroInvocation",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ElementKind::Package(p) => Some(&p.name),
            ElementKind::Class(c) => Some(&c.name),
            ElementKind::Enum(e) => Some(&e.name),
            ElementKind::EnumEntry(e) => Some(&e.name),
            ElementKind::Attribute(a) => Some(&a.name),
            ElementKind::Reference(r) => Some(&r.name),
            ElementKind::Variable(v) => Some(&v.name),
            ElementKind::Pattern(p) => Some(&p.name),
            ElementKind::PatternObject(o) => Some(&o.name),
            ElementKind::PatternObjectReference(_)
            | ElementKind::PatternInvocation(_)
            | ElementKind::MacroInvocation(_) => None,
        }
    }
}

// ──────────────────────────────────────────────
// Modeling-language elements
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Package {
    pub name: String,
    pub packages: Vec<ElementId>,
    pub enums: Vec<ElementId>,
    pub classes: Vec<ElementId>,
}

/// A class or interface declaration.
#[derive(Debug, Clone, Default)]
pub struct Class {
    pub name: String,
    pub is_abstract: bool,
    pub is_interface: bool,
    pub extends: Vec<Ref>,
    pub implements: Vec<Ref>,
    pub attributes: Vec<ElementId>,
    pub references: Vec<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct Enum {
    pub name: String,
    pub entries: Vec<ElementId>,
}

#[derive(Debug, Clone)]
pub struct EnumEntry {
    pub name: String,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Int,
    Long,
    Float,
    Double,
    String,
    Bool,
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::String => "string",
            PrimitiveType::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    Primitive(PrimitiveType),
    Enum(Ref),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassElementModifiers {
    pub readonly: bool,
    pub volatile: bool,
    pub transient: bool,
    pub unsettable: bool,
    pub derived: bool,
    pub unique: bool,
    pub ordered: bool,
}

impl Default for ClassElementModifiers {
    fn default() -> Self {
        ClassElementModifiers {
            readonly: false,
            volatile: false,
            transient: false,
            unsettable: false,
            derived: false,
            unique: true,
            ordered: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeModifiers {
    pub common: ClassElementModifiers,
    pub id: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceModifiers {
    pub common: ClassElementModifiers,
    pub resolve: bool,
    pub containment: bool,
}

impl Default for ReferenceModifiers {
    fn default() -> Self {
        ReferenceModifiers {
            common: ClassElementModifiers::default(),
            resolve: true,
            containment: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub type_: AttributeType,
    pub default: Option<Expr>,
    pub modifiers: AttributeModifiers,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_: AttributeType) -> Self {
        Attribute {
            name: name.into(),
            type_,
            default: None,
            modifiers: AttributeModifiers::default(),
        }
    }

    pub fn with_default(mut self, value: Expr) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_modifiers(mut self, modifiers: AttributeModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// One bound of a multiplicity as written: a number, `*` or `+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplicityBound {
    Value(i64),
    Star,
    Plus,
}

/// `[lower]` or `[lower..upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    pub lower: MultiplicityBound,
    pub upper: Option<MultiplicityBound>,
}

impl Multiplicity {
    pub fn single(bound: MultiplicityBound) -> Self {
        Multiplicity {
            lower: bound,
            upper: None,
        }
    }

    pub fn range(lower: MultiplicityBound, upper: MultiplicityBound) -> Self {
        Multiplicity {
            lower,
            upper: Some(upper),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub name: String,
    pub target: Ref,
    pub multiplicity: Option<Multiplicity>,
    pub modifiers: ReferenceModifiers,
    pub opposite: Option<Ref>,
}

impl Reference {
    pub fn new(name: impl Into<String>, target: Ref) -> Self {
        Reference {
            name: name.into(),
            target,
            multiplicity: None,
            modifiers: ReferenceModifiers::default(),
            opposite: None,
        }
    }

    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ReferenceModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_opposite(mut self, opposite: Ref) -> Self {
        self.opposite = Some(opposite);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    Number(f64),
    Str(String),
    /// Reference to a declared variable.
    Variable(Ref),
    /// Dotted access into a composite variable, e.g. `t.inner.x`.
    QualifiedVariable(String),
    /// Reference to an enum entry.
    EnumValue(Ref),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

// ──────────────────────────────────────────────
// Constraint-language elements
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pub name: String,
    pub objects: Vec<ElementId>,
    pub invocations: Vec<ElementId>,
}

/// A typed node slot of a pattern.
#[derive(Debug, Clone)]
pub struct PatternObject {
    pub name: String,
    pub class: Ref,
    pub references: Vec<ElementId>,
}

/// A directed edge from the containing pattern object.
#[derive(Debug, Clone)]
pub struct PatternObjectReference {
    pub reference: Ref,
    pub target: Ref,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// `@enforce`: positive application condition.
    Enforce,
    /// `@forbid`: negative application condition.
    Forbid,
}

#[derive(Debug, Clone)]
pub struct NodeBinding {
    /// Node of the invoking pattern.
    pub node: Ref,
    /// Node of the invoked pattern.
    pub invoked: Ref,
}

#[derive(Debug, Clone)]
pub struct PatternInvocation {
    pub kind: InvocationKind,
    pub pattern: Ref,
    pub bindings: Vec<NodeBinding>,
}

#[derive(Debug, Clone)]
pub struct MacroTarget {
    pub name: String,
    pub node: Ref,
}

/// Invocation of a declared pattern that introduces an anonymous copy.
#[derive(Debug, Clone)]
pub struct MacroInvocation {
    pub pattern: Ref,
    pub targets: Vec<MacroTarget>,
}

// ──────────────────────────────────────────────
// The arena
// ──────────────────────────────────────────────

/// Where a package is declared.
#[derive(Debug, Clone, Copy)]
pub enum Parent {
    Document(DocumentId),
    Package(ElementId),
}

#[derive(Debug, Clone, Default)]
pub struct SourceGraph {
    documents: Vec<SourceDocument>,
    elements: Vec<Element>,
}

impl Index<ElementId> for SourceGraph {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }
}

impl SourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, uri: impl Into<String>, language: Language) -> DocumentId {
        let id = DocumentId(self.documents.len() as u32);
        self.documents.push(SourceDocument {
            uri: uri.into(),
            language,
            roots: Vec::new(),
        });
        id
    }

    pub fn document(&self, id: DocumentId) -> Option<&SourceDocument> {
        self.documents.get(id.index())
    }

    pub fn documents(&self) -> impl Iterator<Item = (DocumentId, &SourceDocument)> {
        self.documents
            .iter()
            .enumerate()
            .map(|(i, d)| (DocumentId(i as u32), d))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Root elements of `document` stored under `feature`, in order.
    pub fn roots(&self, document: DocumentId, feature: &str) -> Vec<ElementId> {
        self.document(document)
            .map(|d| {
                d.roots
                    .iter()
                    .copied()
                    .filter(|r| self[*r].feature == feature)
                    .collect()
            })
            .unwrap_or_default()
    }

    // ── builders ────────────────────────────────

    fn push_root(
        &mut self,
        document: DocumentId,
        feature: &'static str,
        kind: ElementKind,
    ) -> ElementId {
        let position = self.roots(document, feature).len();
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            document,
            container: None,
            feature,
            position,
            kind,
        });
        self.documents[document.index()].roots.push(id);
        id
    }

    fn push_child(
        &mut self,
        container: ElementId,
        feature: &'static str,
        position: usize,
        kind: ElementKind,
    ) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        let document = self[container].document;
        self.elements.push(Element {
            document,
            container: Some(container),
            feature,
            position,
            kind,
        });
        id
    }

    pub fn add_package(&mut self, parent: Parent, name: impl Into<String>) -> ElementId {
        let kind = ElementKind::Package(Package {
            name: name.into(),
            ..Package::default()
        });
        match parent {
            Parent::Document(doc) => self.push_root(doc, "packages", kind),
            Parent::Package(pkg) => {
                let position = self.package(pkg).map_or(0, |p| p.packages.len());
                let id = self.push_child(pkg, "subPackages", position, kind);
                if let Some(p) = self.package_mut(pkg) {
                    p.packages.push(id);
                }
                id
            }
        }
    }

    pub fn add_class(&mut self, package: ElementId, name: impl Into<String>) -> ElementId {
        let position = self.package(package).map_or(0, |p| p.classes.len());
        let kind = ElementKind::Class(Class {
            name: name.into(),
            ..Class::default()
        });
        let id = self.push_child(package, "classes", position, kind);
        if let Some(p) = self.package_mut(package) {
            p.classes.push(id);
        }
        id
    }

    pub fn add_enum(&mut self, package: ElementId, name: impl Into<String>) -> ElementId {
        let position = self.package(package).map_or(0, |p| p.enums.len());
        let kind = ElementKind::Enum(Enum {
            name: name.into(),
            entries: Vec::new(),
        });
        let id = self.push_child(package, "enums", position, kind);
        if let Some(p) = self.package_mut(package) {
            p.enums.push(id);
        }
        id
    }

    pub fn add_enum_entry(
        &mut self,
        enum_: ElementId,
        name: impl Into<String>,
        value: Option<Expr>,
    ) -> ElementId {
        let position = match &self[enum_].kind {
            ElementKind::Enum(e) => e.entries.len(),
            _ => 0,
        };
        let kind = ElementKind::EnumEntry(EnumEntry {
            name: name.into(),
            value,
        });
        let id = self.push_child(enum_, "entries", position, kind);
        if let ElementKind::Enum(e) = &mut self.elements[enum_.index()].kind {
            e.entries.push(id);
        }
        id
    }

    pub fn add_attribute(&mut self, class: ElementId, attribute: Attribute) -> ElementId {
        let position = self.class(class).map_or(0, |c| c.attributes.len());
        let id = self.push_child(class, "attributes", position, ElementKind::Attribute(attribute));
        if let Some(c) = self.class_mut(class) {
            c.attributes.push(id);
        }
        id
    }

    pub fn add_reference(&mut self, class: ElementId, reference: Reference) -> ElementId {
        let position = self.class(class).map_or(0, |c| c.references.len());
        let id = self.push_child(class, "references", position, ElementKind::Reference(reference));
        if let Some(c) = self.class_mut(class) {
            c.references.push(id);
        }
        id
    }

    pub fn add_variable(&mut self, document: DocumentId, name: impl Into<String>) -> ElementId {
        self.push_root(
            document,
            "variables",
            ElementKind::Variable(Variable { name: name.into() }),
        )
    }

    pub fn add_pattern(&mut self, document: DocumentId, name: impl Into<String>) -> ElementId {
        let kind = ElementKind::Pattern(Pattern {
            name: name.into(),
            ..Pattern::default()
        });
        self.push_root(document, "patterns", kind)
    }

    pub fn add_pattern_object(
        &mut self,
        pattern: ElementId,
        name: impl Into<String>,
        class: Ref,
    ) -> ElementId {
        let position = self.pattern(pattern).map_or(0, |p| p.objects.len());
        let kind = ElementKind::PatternObject(PatternObject {
            name: name.into(),
            class,
            references: Vec::new(),
        });
        let id = self.push_child(pattern, "objects", position, kind);
        if let ElementKind::Pattern(p) = &mut self.elements[pattern.index()].kind {
            p.objects.push(id);
        }
        id
    }

    pub fn add_pattern_object_reference(
        &mut self,
        object: ElementId,
        reference: PatternObjectReference,
    ) -> ElementId {
        let position = match &self[object].kind {
            ElementKind::PatternObject(o) => o.references.len(),
            _ => 0,
        };
        let id = self.push_child(
            object,
            "references",
            position,
            ElementKind::PatternObjectReference(reference),
        );
        if let ElementKind::PatternObject(o) = &mut self.elements[object.index()].kind {
            o.references.push(id);
        }
        id
    }

    pub fn add_invocation(
        &mut self,
        pattern: ElementId,
        invocation: PatternInvocation,
    ) -> ElementId {
        let position = self.pattern(pattern).map_or(0, |p| p.invocations.len());
        let id = self.push_child(
            pattern,
            "annotations",
            position,
            ElementKind::PatternInvocation(invocation),
        );
        if let ElementKind::Pattern(p) = &mut self.elements[pattern.index()].kind {
            p.invocations.push(id);
        }
        id
    }

    pub fn add_macro_invocation(
        &mut self,
        document: DocumentId,
        invocation: MacroInvocation,
    ) -> ElementId {
        self.push_root(document, "macros", ElementKind::MacroInvocation(invocation))
    }

    // ── typed accessors ─────────────────────────

    pub fn package(&self, id: ElementId) -> Option<&Package> {
        match &self.element(id)?.kind {
            ElementKind::Package(p) => Some(p),
            _ => None,
        }
    }

    pub fn package_mut(&mut self, id: ElementId) -> Option<&mut Package> {
        match &mut self.elements.get_mut(id.index())?.kind {
            ElementKind::Package(p) => Some(p),
            _ => None,
        }
    }

    pub fn class(&self, id: ElementId) -> Option<&Class> {
        match &self.element(id)?.kind {
            ElementKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn class_mut(&mut self, id: ElementId) -> Option<&mut Class> {
        match &mut self.elements.get_mut(id.index())?.kind {
            ElementKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn attribute_mut(&mut self, id: ElementId) -> Option<&mut Attribute> {
        match &mut self.elements.get_mut(id.index())?.kind {
            ElementKind::Attribute(a) => Some(a),
            _ => None,
        }
    }

    pub fn reference_mut(&mut self, id: ElementId) -> Option<&mut Reference> {
        match &mut self.elements.get_mut(id.index())?.kind {
            ElementKind::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn pattern(&self, id: ElementId) -> Option<&Pattern> {
        match &self.element(id)?.kind {
            ElementKind::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn pattern_object_reference_mut(
        &mut self,
        id: ElementId,
    ) -> Option<&mut PatternObjectReference> {
        match &mut self.elements.get_mut(id.index())?.kind {
            ElementKind::PatternObjectReference(r) => Some(r),
            _ => None,
        }
    }

    // ── structural queries ──────────────────────

    /// Type tag of the element, as used in stable IDs.
    pub fn type_tag(&self, id: ElementId) -> &'static str {
        self[id].kind.tag()
    }

    /// Path of `id` from its document root, e.g.
    /// `/packages@0/classes@1/references@0`. Unique within a document.
    pub fn structural_path(&self, id: ElementId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(el_id) = current {
            let el = &self[el_id];
            segments.push(format!("{}@{}", el.feature, el.position));
            current = el.container;
        }
        segments.reverse();
        let mut path = String::new();
        for s in segments {
            path.push('/');
            path.push_str(&s);
        }
        path
    }

    /// Qualified name as written in source text: dots between namespaces,
    /// `::` between a type and its member.
    pub fn qualified_name(&self, id: ElementId) -> String {
        let el = &self[id];
        let name = el.kind.name().unwrap_or_default();
        let container = match el.container {
            Some(c) => c,
            None => return name.to_string(),
        };
        match el.kind {
            ElementKind::EnumEntry(_) | ElementKind::Attribute(_) | ElementKind::Reference(_) => {
                format!("{}::{}", self.qualified_name(container), name)
            }
            _ => format!("{}.{}", self.qualified_name(container), name),
        }
    }

    /// The innermost container of `id` that is a pattern.
    pub fn owning_pattern(&self, id: ElementId) -> Option<ElementId> {
        let mut current = self.element(id)?.container;
        while let Some(c) = current {
            if self.pattern(c).is_some() {
                return Some(c);
            }
            current = self[c].container;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_paths_follow_containment() {
        let mut g = SourceGraph::new();
        let doc = g.add_document("file:///m.mml", Language::Model);
        let a = g.add_package(Parent::Document(doc), "A");
        let sub = g.add_package(Parent::Package(a), "S");
        let b = g.add_class(a, "B");
        let c = g.add_class(sub, "C");
        let x = g.add_attribute(
            b,
            Attribute::new("x", AttributeType::Primitive(PrimitiveType::Int)),
        );

        assert_eq!(g.structural_path(a), "/packages@0");
        assert_eq!(g.structural_path(sub), "/packages@0/subPackages@0");
        assert_eq!(g.structural_path(b), "/packages@0/classes@0");
        assert_eq!(g.structural_path(c), "/packages@0/subPackages@0/classes@0");
        assert_eq!(g.structural_path(x), "/packages@0/classes@0/attributes@0");
    }

    #[test]
    fn qualified_names_use_dots_and_double_colons() {
        let mut g = SourceGraph::new();
        let doc = g.add_document("file:///m.mml", Language::Model);
        let a = g.add_package(Parent::Document(doc), "A");
        let sub = g.add_package(Parent::Package(a), "S");
        let c = g.add_class(sub, "C");
        let y = g.add_reference(c, Reference::new("y", Ref::to("A.S.C", c)));
        let e = g.add_enum(a, "E");
        let red = g.add_enum_entry(e, "RED", None);

        assert_eq!(g.qualified_name(c), "A.S.C");
        assert_eq!(g.qualified_name(y), "A.S.C::y");
        assert_eq!(g.qualified_name(red), "A.E::RED");
    }

    #[test]
    fn root_positions_count_per_feature() {
        let mut g = SourceGraph::new();
        let doc = g.add_document("file:///p.gcl", Language::Constraint);
        let p = g.add_pattern(doc, "p");
        let q = g.add_pattern(doc, "q");
        let v = g.add_variable(doc, "v");
        assert_eq!(g.structural_path(p), "/patterns@0");
        assert_eq!(g.structural_path(q), "/patterns@1");
        assert_eq!(g.structural_path(v), "/variables@0");
        assert_eq!(g.roots(doc, "patterns"), vec![p, q]);
    }

    #[test]
    fn owning_pattern_walks_containers() {
        let mut g = SourceGraph::new();
        let m = g.add_document("file:///m.mml", Language::Model);
        let a = g.add_package(Parent::Document(m), "A");
        let b = g.add_class(a, "B");
        let doc = g.add_document("file:///p.gcl", Language::Constraint);
        let p = g.add_pattern(doc, "p");
        let node = g.add_pattern_object(p, "n", Ref::to("A.B", b));
        assert_eq!(g.owning_pattern(node), Some(p));
        assert_eq!(g.owning_pattern(p), None);
        assert_eq!(g.owning_pattern(b), None);
    }
}
