//! Typed structs representing the mml exchange JSON.
//!
//! Two independent document shapes share these building blocks:
//! a [`ModelDocument`] (`{"typegraph": {"packages": [...]}}`) for the
//! modeling graph and a [`PatternDocument`] (`{"patterns": [...]}`) for the
//! constraint graph. Live pointers never appear here; every cross reference
//! is a stable ID string, which is what keeps the trees acyclic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ── Model documents ─────────────────────────────────────────────────

/// Exchange document produced for one modeling-language file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDocument {
    pub typegraph: TypeGraph,
    /// Instance data is carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instancegraph: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeGraph {
    pub packages: Vec<PackageEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageEntity {
    pub id: String,
    pub name: String,
    pub sub_packages: Vec<PackageEntity>,
    pub enums: Vec<EnumEntity>,
    pub abstract_classes: Vec<AbstractClassEntity>,
}

/// A class or an interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbstractClassEntity {
    pub id: String,
    pub name: String,
    pub is_abstract: bool,
    pub is_interface: bool,
    pub attributes: Vec<AttributeEntity>,
    pub references: Vec<ReferenceEntity>,
    /// IDs of extended classes.
    pub extends_ids: Vec<String>,
    /// IDs of implemented interfaces.
    pub implements_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeEntity {
    pub id: String,
    pub name: String,
    /// Primitive type tag, or the enum ID when `is_enum_type` is set.
    #[serde(rename = "type")]
    pub type_: String,
    pub is_enum_type: bool,
    pub has_default_value: bool,
    /// Literal default, or the enum entry ID for enum-typed attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    pub modifiers: AttributeModifiersEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntity {
    pub id: String,
    pub name: String,
    /// ID of the target class.
    #[serde(rename = "type")]
    pub type_: String,
    pub multiplicity: MultiplicityEntity,
    pub modifiers: ReferenceModifiersEntity,
    pub has_opposite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opposite: Option<String>,
}

/// Raw multiplicity bounds. `…IsN` marks a `*` bound and `…IsN0` a `+`
/// bound; the numeric field is meaningless when either flag is set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MultiplicityEntity {
    pub has_upper_bound: bool,
    pub lower: i64,
    pub lower_is_n: bool,
    pub lower_is_n0: bool,
    pub upper: i64,
    pub upper_is_n: bool,
    pub upper_is_n0: bool,
}

impl Default for MultiplicityEntity {
    /// The unqualified multiplicity, `0..1`.
    fn default() -> Self {
        MultiplicityEntity {
            has_upper_bound: true,
            lower: 0,
            lower_is_n: false,
            lower_is_n0: false,
            upper: 1,
            upper_is_n: false,
            upper_is_n0: false,
        }
    }
}

impl MultiplicityEntity {
    /// True for `0..1` with no sentinel flags, the only multiplicity that
    /// is omitted from decoded text.
    pub fn is_default(&self) -> bool {
        self.lower == 0
            && self.upper == 1
            && !self.lower_is_n
            && !self.lower_is_n0
            && !self.upper_is_n
            && !self.upper_is_n0
    }
}

/// Modifiers shared by attributes and references, stored raw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassElementModifiersEntity {
    pub readonly: bool,
    pub volatile: bool,
    pub transient: bool,
    pub unsettable: bool,
    pub derived: bool,
    pub unique: bool,
    pub ordered: bool,
}

impl Default for ClassElementModifiersEntity {
    fn default() -> Self {
        ClassElementModifiersEntity {
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

impl ClassElementModifiersEntity {
    /// `(keyword, value)` pairs in canonical order.
    pub fn flags(&self) -> [(&'static str, bool); 7] {
        [
            ("readonly", self.readonly),
            ("volatile", self.volatile),
            ("transient", self.transient),
            ("unsettable", self.unsettable),
            ("derived", self.derived),
            ("unique", self.unique),
            ("ordered", self.ordered),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeModifiersEntity {
    #[serde(flatten)]
    pub common: ClassElementModifiersEntity,
    pub id: bool,
}

impl AttributeModifiersEntity {
    pub fn flags(&self) -> Vec<(&'static str, bool)> {
        let mut flags = self.common.flags().to_vec();
        flags.push(("id", self.id));
        flags
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceModifiersEntity {
    #[serde(flatten)]
    pub common: ClassElementModifiersEntity,
    pub resolve: bool,
    pub containment: bool,
}

impl Default for ReferenceModifiersEntity {
    fn default() -> Self {
        ReferenceModifiersEntity {
            common: ClassElementModifiersEntity::default(),
            resolve: true,
            containment: false,
        }
    }
}

impl ReferenceModifiersEntity {
    pub fn flags(&self) -> Vec<(&'static str, bool)> {
        let mut flags = self.common.flags().to_vec();
        flags.push(("resolve", self.resolve));
        flags.push(("containment", self.containment));
        flags
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumEntity {
    pub id: String,
    pub name: String,
    pub entries: Vec<EnumEntryEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnumEntryEntity {
    pub id: String,
    pub name: String,
    pub has_default_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

/// A default value as it appears in JSON: a bare boolean, number or string.
///
/// JSON has no literal for non-finite numbers, so `Infinity`, `-Infinity`
/// and `NaN` are written as strings in the form the modeling language uses.
/// They read back as [`DefaultValue::Str`] and render identically.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Serialize for DefaultValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DefaultValue::Bool(b) => serializer.serialize_bool(*b),
            DefaultValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            DefaultValue::Number(n) => serializer.serialize_str(&format_number(*n)),
            DefaultValue::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(b) => write!(f, "{}", b),
            DefaultValue::Number(n) => f.write_str(&format_number(*n)),
            DefaultValue::Str(s) => f.write_str(s),
        }
    }
}

/// Formats a number the way the modeling language writes it: integral
/// values without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ── Pattern documents ───────────────────────────────────────────────

/// Exchange document produced for one constraint-language file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternDocument {
    pub patterns: Vec<PatternEntity>,
    /// Anonymous patterns synthesized by macro invocations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_patterns: Vec<InternalPatternEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternEntity {
    pub id: String,
    pub name: String,
    pub nodes: Vec<PatternNodeEntity>,
    /// Edges of every node, in the order the nodes registered them.
    pub edges: Vec<EdgeEntity>,
    /// Positive application conditions.
    pub pac: Vec<SupportPatternInvocationEntity>,
    /// Negative application conditions.
    pub nac: Vec<SupportPatternInvocationEntity>,
}

impl PatternEntity {
    pub fn node(&self, id: &str) -> Option<&PatternNodeEntity> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatternNodeEntity {
    pub id: String,
    pub name: String,
    /// Qualified name of the node's class or interface.
    pub class_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEntity {
    pub from_id: String,
    pub to_id: String,
    pub reference_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SupportPatternInvocationEntity {
    pub pattern_id: String,
    pub bindings: Vec<NodeBindingEntity>,
}

/// Binds a node of the invoking pattern to a node of the invoked one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeBindingEntity {
    pub node_id: String,
    pub invoked_node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InternalPatternEntity {
    /// ID of the declaration that introduced the pattern.
    pub declaration_id: String,
    pub pattern: PatternEntity,
    /// Local name → node ID of the invoked pattern.
    pub node_targets: BTreeMap<String, String>,
}
