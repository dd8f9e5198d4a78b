//! `mml check`: surfaces the placeholders the tolerant path leaves behind.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process;

use mml_interchange::{
    DefaultValue, ModelDocument, PackageEntity, PatternDocument, PatternEntity, ERROR_ID, UNKNOWN,
    UNKNOWN_BINDING,
};
use mml_render::NameIndex;
use serde::Serialize;

use super::read_json;
use crate::{report_error, OutputFormat};

/// One unresolved value found in a document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub(crate) struct Finding {
    pub file: String,
    /// ID of the entity carrying the problem, when it has one.
    pub entity_id: Option<String>,
    pub message: String,
}

enum Loaded {
    Model(ModelDocument),
    Patterns(PatternDocument),
}

pub(crate) fn cmd_check(files: &[PathBuf], output: OutputFormat, quiet: bool) {
    let mut loaded = Vec::with_capacity(files.len());
    for path in files {
        match load(path) {
            Ok(doc) => loaded.push((path.display().to_string(), doc)),
            Err(msg) => {
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        }
    }

    let models: Vec<ModelDocument> = loaded
        .iter()
        .filter_map(|(_, doc)| match doc {
            Loaded::Model(m) => Some(m.clone()),
            Loaded::Patterns(_) => None,
        })
        .collect();
    let index = NameIndex::build(&models);
    let pattern_ids: HashSet<&str> = loaded
        .iter()
        .filter_map(|(_, doc)| match doc {
            Loaded::Patterns(p) => Some(p),
            Loaded::Model(_) => None,
        })
        .flat_map(|p| p.patterns.iter().map(|pattern| pattern.id.as_str()))
        .collect();

    let mut findings = Vec::new();
    for (file, doc) in &loaded {
        match doc {
            Loaded::Model(m) => check_model(file, m, &index, &mut findings),
            Loaded::Patterns(p) => check_patterns(file, p, &pattern_ids, &mut findings),
        }
    }

    match output {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "files": files.len(),
                "findings": findings,
            });
            let pretty = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for f in &findings {
                println!("{}: {}", f.file, f.message);
            }
            if !quiet {
                if findings.is_empty() {
                    println!("{} file(s) checked, no findings", files.len());
                } else {
                    println!(
                        "{} file(s) checked, {} finding(s)",
                        files.len(),
                        findings.len()
                    );
                }
            }
        }
    }

    if !findings.is_empty() {
        process::exit(1);
    }
}

/// Model or pattern document, decided by the top-level member.
fn load(path: &std::path::Path) -> Result<Loaded, String> {
    let value = read_json(path)?;
    let located = |e: mml_interchange::InterchangeError| format!("{}: {}", path.display(), e);
    if value.get("typegraph").is_some() {
        mml_interchange::from_interchange(&value)
            .map(Loaded::Model)
            .map_err(located)
    } else if value.get("patterns").is_some() {
        mml_interchange::patterns_from_interchange(&value)
            .map(Loaded::Patterns)
            .map_err(located)
    } else {
        Err(format!(
            "{}: neither a model document (typegraph) nor a pattern document (patterns)",
            path.display()
        ))
    }
}

// ──────────────────────────────────────────────
// Model documents
// ──────────────────────────────────────────────

struct ModelCheck<'a> {
    file: &'a str,
    index: &'a NameIndex,
    findings: &'a mut Vec<Finding>,
}

impl ModelCheck<'_> {
    fn push(&mut self, entity_id: &str, message: String) {
        self.findings.push(Finding {
            file: self.file.to_string(),
            entity_id: Some(entity_id.to_string()),
            message,
        });
    }

    /// A cross-reference ID must be neither the dangling marker nor unknown.
    fn id(&mut self, owner: &str, role: &str, id: &str) {
        if id == ERROR_ID {
            let msg = format!("{}: {} is a dangling reference", self.index.name(owner), role);
            self.push(owner, msg);
        } else if !self.index.contains(id) {
            let msg = format!("{}: {} has unknown id '{}'", self.index.name(owner), role, id);
            self.push(owner, msg);
        }
    }

    fn value(&mut self, owner: &str, label: &str, value: Option<&DefaultValue>) {
        if let Some(DefaultValue::Str(s)) = value {
            if s == UNKNOWN {
                let msg = format!("{}: value could not be evaluated", label);
                self.push(owner, msg);
            }
        }
    }

    fn package(&mut self, package: &PackageEntity) {
        for e in &package.enums {
            for entry in &e.entries {
                let label = format!("{}::{}", self.index.name(&e.id), entry.name);
                self.value(&entry.id, &label, entry.default_value.as_ref());
            }
        }
        for class in &package.abstract_classes {
            for id in &class.extends_ids {
                self.id(&class.id, "extended type", id);
            }
            for id in &class.implements_ids {
                self.id(&class.id, "implemented type", id);
            }
            for a in &class.attributes {
                let label = format!("{}::{}", self.index.name(&class.id), a.name);
                if a.is_enum_type {
                    self.id(&class.id, &format!("type of attribute '{}'", a.name), &a.type_);
                    if let Some(DefaultValue::Str(entry)) = &a.default_value {
                        self.id(&class.id, &format!("default of attribute '{}'", a.name), entry);
                    }
                } else {
                    self.value(&a.id, &label, a.default_value.as_ref());
                }
            }
            for r in &class.references {
                self.id(&r.id, "reference type", &r.type_);
                if let Some(opposite) = &r.opposite {
                    self.id(&r.id, "opposite", opposite);
                }
            }
        }
        for sub in &package.sub_packages {
            self.package(sub);
        }
    }
}

pub(crate) fn check_model(
    file: &str,
    doc: &ModelDocument,
    index: &NameIndex,
    findings: &mut Vec<Finding>,
) {
    let mut check = ModelCheck {
        file,
        index,
        findings,
    };
    for package in &doc.typegraph.packages {
        check.package(package);
    }
}

// ──────────────────────────────────────────────
// Pattern documents
// ──────────────────────────────────────────────

pub(crate) fn check_patterns(
    file: &str,
    doc: &PatternDocument,
    known_patterns: &HashSet<&str>,
    findings: &mut Vec<Finding>,
) {
    let mut push = |id: &str, message: String| {
        findings.push(Finding {
            file: file.to_string(),
            entity_id: Some(id.to_string()),
            message,
        })
    };

    for pattern in &doc.patterns {
        let label = format!("pattern '{}'", pattern.name);
        for problem in pattern_problems(&label, pattern, known_patterns) {
            push(&pattern.id, problem);
        }
    }
    for internal in &doc.internal_patterns {
        let label = format!("macro invocation '{}'", internal.declaration_id);
        for problem in pattern_problems(&label, &internal.pattern, known_patterns) {
            push(&internal.declaration_id, problem);
        }
        for (name, target) in &internal.node_targets {
            if target == ERROR_ID {
                push(
                    &internal.declaration_id,
                    format!("{}: target '{}' is a dangling reference", label, name),
                );
            }
        }
    }
}

/// Structural problems of one pattern; every message starts with `label`.
fn pattern_problems(
    label: &str,
    pattern: &PatternEntity,
    known_patterns: &HashSet<&str>,
) -> Vec<String> {
    let mut problems = Vec::new();

    for edge in &pattern.edges {
        for endpoint in [&edge.from_id, &edge.to_id] {
            if pattern.node(endpoint).is_none() {
                problems.push(format!(
                    "{}: edge '{}' endpoint '{}' is not a node of the pattern",
                    label, edge.reference_name, endpoint
                ));
            }
        }
    }

    let conditions = pattern
        .pac
        .iter()
        .map(|i| ("enforce", i))
        .chain(pattern.nac.iter().map(|i| ("forbid", i)));
    for (kind, invocation) in conditions {
        if invocation.pattern_id == ERROR_ID {
            problems.push(format!(
                "{}: {} invokes a dangling pattern reference",
                label, kind
            ));
        } else if !known_patterns.contains(invocation.pattern_id.as_str()) {
            problems.push(format!(
                "{}: {} invokes unknown pattern '{}'",
                label, kind, invocation.pattern_id
            ));
        }
        for binding in &invocation.bindings {
            if pattern.node(&binding.node_id).is_none() {
                problems.push(format!(
                    "{}: {} binds '{}', which is not a node of the pattern",
                    label, kind, binding.node_id
                ));
            }
            if binding.invoked_node_id == UNKNOWN_BINDING {
                problems.push(format!(
                    "{}: {} binding for '{}' has no invoked node",
                    label, kind, binding.node_id
                ));
            }
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use mml_interchange::{
        EdgeEntity, InternalPatternEntity, NodeBindingEntity, PatternNodeEntity,
        SupportPatternInvocationEntity,
    };
    use std::collections::BTreeMap;

    fn node(id: &str) -> PatternNodeEntity {
        PatternNodeEntity {
            id: id.to_string(),
            name: id.to_string(),
            class_name: "A.B".to_string(),
        }
    }

    fn pattern() -> PatternEntity {
        PatternEntity {
            id: "p".to_string(),
            name: "p".to_string(),
            nodes: vec![node("n1"), node("n2")],
            edges: vec![EdgeEntity {
                from_id: "n1".to_string(),
                to_id: "n2".to_string(),
                reference_name: "x".to_string(),
                alias: None,
            }],
            pac: Vec::new(),
            nac: Vec::new(),
        }
    }

    #[test]
    fn clean_pattern_has_no_problems() {
        let known: HashSet<&str> = ["p"].into_iter().collect();
        assert!(pattern_problems("pattern 'p'", &pattern(), &known).is_empty());
    }

    #[test]
    fn foreign_edge_endpoint_is_reported() {
        let mut p = pattern();
        p.edges[0].to_id = "elsewhere".to_string();
        let problems = pattern_problems("pattern 'p'", &p, &HashSet::new());
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("elsewhere"));
    }

    #[test]
    fn unknown_bindings_are_reported() {
        let mut p = pattern();
        p.nac.push(SupportPatternInvocationEntity {
            pattern_id: ERROR_ID.to_string(),
            bindings: vec![NodeBindingEntity {
                node_id: "n1".to_string(),
                invoked_node_id: UNKNOWN_BINDING.to_string(),
            }],
        });
        let problems = pattern_problems("pattern 'p'", &p, &HashSet::new());
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("forbid invokes a dangling pattern reference"));
        assert!(problems[1].contains("has no invoked node"));
    }

    #[test]
    fn internal_patterns_are_checked_like_patterns() {
        let mut copied = pattern();
        copied.id = "m".to_string();
        copied.name = String::new();
        copied.edges[0].from_id = "elsewhere".to_string();
        copied.pac.push(SupportPatternInvocationEntity {
            pattern_id: "p".to_string(),
            bindings: vec![NodeBindingEntity {
                node_id: "n2".to_string(),
                invoked_node_id: UNKNOWN_BINDING.to_string(),
            }],
        });
        let mut node_targets = BTreeMap::new();
        node_targets.insert("first".to_string(), "n1".to_string());
        node_targets.insert("second".to_string(), ERROR_ID.to_string());
        let doc = PatternDocument {
            patterns: vec![pattern()],
            internal_patterns: vec![InternalPatternEntity {
                declaration_id: "m".to_string(),
                pattern: copied,
                node_targets,
            }],
        };

        let known: HashSet<&str> = ["p"].into_iter().collect();
        let mut findings = Vec::new();
        check_patterns("g.json", &doc, &known, &mut findings);

        let messages: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages.len(), 3, "{:?}", messages);
        assert!(findings.iter().all(|f| f.entity_id.as_deref() == Some("m")));
        assert!(messages[0].starts_with("macro invocation 'm': edge 'x' endpoint 'elsewhere'"));
        assert!(messages[1].contains("has no invoked node"));
        assert_eq!(
            messages[2],
            "macro invocation 'm': target 'second' is a dangling reference"
        );
    }
}
