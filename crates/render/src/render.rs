//! Canonical text reconstruction.
//!
//! Inverts every encoding decision of the typegraph encoder: modifiers at
//! their default are dropped, the `0..1` multiplicity disappears, sentinel
//! flags turn back into `*`/`+`, and IDs become qualified names.

use crate::name_index::NameIndex;
use crate::RenderOptions;
use mml_interchange::{
    format_number, AbstractClassEntity, AttributeEntity, AttributeModifiersEntity, DefaultValue,
    EnumEntity, ModelDocument, MultiplicityEntity, PackageEntity, ReferenceEntity,
    ReferenceModifiersEntity, UNKNOWN,
};

pub struct Renderer<'a> {
    index: &'a NameIndex,
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(index: &'a NameIndex, options: &'a RenderOptions) -> Self {
        Renderer { index, options }
    }

    /// Root packages separated by a blank line.
    pub fn document(&self, doc: &ModelDocument) -> String {
        doc.typegraph
            .packages
            .iter()
            .map(|p| self.package(p, 0))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn package(&self, package: &PackageEntity, depth: usize) -> String {
        let pad = self.pad(depth);
        let mut blocks = Vec::new();
        if !package.enums.is_empty() {
            blocks.push(concat(package.enums.iter().map(|e| self.enum_(e, depth + 1))));
        }
        if !package.abstract_classes.is_empty() {
            blocks.push(concat(
                package
                    .abstract_classes
                    .iter()
                    .map(|c| self.class(c, depth + 1)),
            ));
        }
        if !package.sub_packages.is_empty() {
            blocks.push(concat(
                package.sub_packages.iter().map(|p| self.package(p, depth + 1)),
            ));
        }

        let mut out = format!("{}package {} {{\n", pad, package.name);
        out.push_str(&blocks.join("\n"));
        out.push_str(&pad);
        out.push_str("}\n");
        out
    }

    fn enum_(&self, e: &EnumEntity, depth: usize) -> String {
        let pad = self.pad(depth);
        let inner = self.pad(depth + 1);
        let entries: Vec<String> = e
            .entries
            .iter()
            .map(|entry| match &entry.default_value {
                Some(v) if entry.has_default_value => {
                    format!("{}{} = {}", inner, entry.name, literal(v, true))
                }
                None if entry.has_default_value => format!("{}{} = {}", inner, entry.name, UNKNOWN),
                _ => format!("{}{}", inner, entry.name),
            })
            .collect();

        let mut out = format!("{}enum {} {{\n", pad, e.name);
        if !entries.is_empty() {
            out.push_str(&entries.join(",\n"));
            out.push('\n');
        }
        out.push_str(&pad);
        out.push_str("}\n");
        out
    }

    fn class(&self, class: &AbstractClassEntity, depth: usize) -> String {
        let pad = self.pad(depth);
        let mut header = String::new();
        if class.is_abstract {
            header.push_str("abstract ");
        }
        header.push_str(if class.is_interface { "interface " } else { "class " });
        header.push_str(&class.name);
        if !class.extends_ids.is_empty() {
            header.push_str(" extends ");
            header.push_str(&self.names(&class.extends_ids));
        }
        if !class.implements_ids.is_empty() {
            header.push_str(" implements ");
            header.push_str(&self.names(&class.implements_ids));
        }

        let mut out = format!("{}{} {{\n", pad, header);
        for a in &class.attributes {
            out.push_str(&self.attribute(a, depth + 1));
        }
        for r in &class.references {
            out.push_str(&self.reference(r, depth + 1));
        }
        out.push_str(&pad);
        out.push_str("}\n");
        out
    }

    fn attribute(&self, a: &AttributeEntity, depth: usize) -> String {
        let type_name = if a.is_enum_type {
            self.index.name(&a.type_)
        } else {
            a.type_.as_str()
        };
        let value = match &a.default_value {
            Some(DefaultValue::Str(id)) if a.has_default_value && a.is_enum_type => {
                format!(" = {}", self.index.name(id))
            }
            Some(v) if a.has_default_value => format!(" = {}", literal(v, a.type_ == "string")),
            // A declared default whose value was lost in transit.
            None if a.has_default_value => format!(" = {}", UNKNOWN),
            _ => String::new(),
        };
        format!(
            "{}attribute {} {}{}{};\n",
            self.pad(depth),
            type_name,
            a.name,
            value,
            attribute_modifiers(&a.modifiers)
        )
    }

    fn reference(&self, r: &ReferenceEntity, depth: usize) -> String {
        let pad = self.pad(depth);
        let mut out = String::new();
        if r.has_opposite {
            let opposite = r.opposite.as_deref().map_or(UNKNOWN, |id| self.index.name(id));
            out.push_str(&format!("{}@opposite {}\n", pad, opposite));
        }
        out.push_str(&format!(
            "{}reference {}{} {}{};\n",
            pad,
            self.index.name(&r.type_),
            multiplicity(&r.multiplicity),
            r.name,
            reference_modifiers(&r.modifiers)
        ));
        out
    }

    fn names(&self, ids: &[String]) -> String {
        ids.iter()
            .map(|id| self.index.name(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(depth * self.options.indent)
    }
}

fn concat(items: impl Iterator<Item = String>) -> String {
    items.collect()
}

/// `[n]` for a single bound, `[a..b]` for a range, nothing for `0..1`.
pub fn multiplicity(m: &MultiplicityEntity) -> String {
    if m.is_default() {
        return String::new();
    }
    let lower = bound(m.lower, m.lower_is_n, m.lower_is_n0);
    if !m.has_upper_bound {
        return format!("[{}]", lower);
    }
    format!("[{}..{}]", lower, bound(m.upper, m.upper_is_n, m.upper_is_n0))
}

fn bound(value: i64, is_n: bool, is_n0: bool) -> String {
    if is_n {
        "*".to_string()
    } else if is_n0 {
        "+".to_string()
    } else {
        value.to_string()
    }
}

fn attribute_modifiers(m: &AttributeModifiersEntity) -> String {
    modifier_block(&m.flags(), &AttributeModifiersEntity::default().flags())
}

fn reference_modifiers(m: &ReferenceModifiersEntity) -> String {
    modifier_block(&m.flags(), &ReferenceModifiersEntity::default().flags())
}

/// ` { a !b }` listing only the flags that differ from their default.
fn modifier_block(flags: &[(&str, bool)], defaults: &[(&str, bool)]) -> String {
    let changed: Vec<String> = flags
        .iter()
        .zip(defaults)
        .filter(|((_, value), (_, default))| value != default)
        .map(|((name, value), _)| {
            if *value {
                name.to_string()
            } else {
                format!("!{}", name)
            }
        })
        .collect();
    if changed.is_empty() {
        String::new()
    } else {
        format!(" {{ {} }}", changed.join(" "))
    }
}

fn literal(v: &DefaultValue, quote_strings: bool) -> String {
    match v {
        DefaultValue::Bool(b) => b.to_string(),
        DefaultValue::Number(n) => format_number(*n),
        DefaultValue::Str(s) if quote_strings => quote(s),
        DefaultValue::Str(s) => s.clone(),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mult(lower: i64, upper: i64, has_upper_bound: bool) -> MultiplicityEntity {
        MultiplicityEntity {
            has_upper_bound,
            lower,
            upper,
            ..MultiplicityEntity::default()
        }
    }

    #[test]
    fn multiplicity_shorthands() {
        assert_eq!(multiplicity(&MultiplicityEntity::default()), "");
        assert_eq!(multiplicity(&mult(0, 1, false)), "");
        assert_eq!(multiplicity(&mult(1, 1, false)), "[1]");
        assert_eq!(multiplicity(&mult(2, 5, true)), "[2..5]");

        let star = MultiplicityEntity {
            lower_is_n: true,
            ..mult(0, 0, false)
        };
        assert_eq!(multiplicity(&star), "[*]");
        let one_plus = MultiplicityEntity {
            upper_is_n0: true,
            ..mult(1, 0, true)
        };
        assert_eq!(multiplicity(&one_plus), "[1..+]");
        let zero_star = MultiplicityEntity {
            upper_is_n: true,
            ..mult(0, 1, true)
        };
        assert_eq!(multiplicity(&zero_star), "[0..*]");
    }

    #[test]
    fn default_modifiers_render_nothing() {
        assert_eq!(attribute_modifiers(&AttributeModifiersEntity::default()), "");
        assert_eq!(reference_modifiers(&ReferenceModifiersEntity::default()), "");
    }

    #[test]
    fn changed_modifiers_render_in_canonical_order() {
        let mut m = ReferenceModifiersEntity::default();
        m.containment = true;
        m.common.ordered = false;
        m.common.readonly = true;
        m.resolve = false;
        assert_eq!(
            reference_modifiers(&m),
            " { readonly !ordered !resolve containment }"
        );

        let mut a = AttributeModifiersEntity::default();
        a.id = true;
        a.common.unique = false;
        assert_eq!(attribute_modifiers(&a), " { !unique id }");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(quote(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);
        assert_eq!(
            literal(&DefaultValue::Str("x".into()), false),
            "x".to_string()
        );
        assert_eq!(literal(&DefaultValue::Number(2.0), true), "2");
        assert_eq!(literal(&DefaultValue::Bool(false), true), "false");
    }
}
