//! ID -> qualified-name table built before any text is emitted.
//!
//! Declarations may name elements that appear later in the same document
//! or in another document, so every document is scanned once up front.

use indexmap::map::Entry;
use indexmap::IndexMap;
use mml_interchange::{ModelDocument, PackageEntity, Resolution, Unresolved};

#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: IndexMap<String, String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every package of every document, in order.
    pub fn build(documents: &[ModelDocument]) -> Self {
        let mut index = NameIndex::new();
        for doc in documents {
            for package in &doc.typegraph.packages {
                index.add_package(package, "");
            }
        }
        log::debug!("name index holds {} entries", index.len());
        index
    }

    fn add_package(&mut self, package: &PackageEntity, prefix: &str) {
        let qualified = format!("{}{}", prefix, package.name);
        self.register(&package.id, qualified.clone());

        for e in &package.enums {
            let enum_name = format!("{}.{}", qualified, e.name);
            for entry in &e.entries {
                self.register(&entry.id, format!("{}::{}", enum_name, entry.name));
            }
            self.register(&e.id, enum_name);
        }
        for class in &package.abstract_classes {
            let class_name = format!("{}.{}", qualified, class.name);
            for r in &class.references {
                self.register(&r.id, format!("{}::{}", class_name, r.name));
            }
            self.register(&class.id, class_name);
        }

        let nested = format!("{}.", qualified);
        for sub in &package.sub_packages {
            self.add_package(sub, &nested);
        }
    }

    /// Adds `id -> name` unless `id` is already known. Returns whether the
    /// entry was added.
    pub fn register(&mut self, id: &str, name: String) -> bool {
        match self.names.entry(id.to_string()) {
            Entry::Occupied(existing) => {
                log::debug!(
                    "ignoring name '{}' for {}; already registered as '{}'",
                    name,
                    id,
                    existing.get()
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(name);
                true
            }
        }
    }

    pub fn resolve(&self, id: &str) -> Resolution<&str> {
        match self.names.get(id) {
            Some(name) => Resolution::Resolved(name.as_str()),
            None => Resolution::Unresolved(Unresolved::UnknownId { id: id.to_string() }),
        }
    }

    /// The qualified name for `id`, or `$$UNKNOWN$$`.
    pub fn name(&self, id: &str) -> &str {
        self.resolve(id).as_text()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    /// `(id, name)` pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> ModelDocument {
        let value = json!({
            "typegraph": { "packages": [{
                "id": "p", "name": "A",
                "subPackages": [{
                    "id": "s", "name": "Sub",
                    "subPackages": [], "enums": [],
                    "abstractClasses": [{
                        "id": "s.c", "name": "Deep", "isAbstract": false, "isInterface": false,
                        "attributes": [], "references": [], "extendsIds": [], "implementsIds": []
                    }]
                }],
                "enums": [{
                    "id": "e", "name": "E",
                    "entries": [{ "id": "e.x", "name": "x", "hasDefaultValue": false }]
                }],
                "abstractClasses": [{
                    "id": "c", "name": "C", "isAbstract": false, "isInterface": false,
                    "attributes": [],
                    "references": [{
                        "id": "c.y", "name": "y", "type": "c",
                        "multiplicity": {
                            "hasUpperBound": true, "lower": 0, "lowerIsN": false, "lowerIsN0": false,
                            "upper": 1, "upperIsN": false, "upperIsN0": false
                        },
                        "modifiers": {
                            "readonly": false, "volatile": false, "transient": false,
                            "unsettable": false, "derived": false, "unique": true, "ordered": true,
                            "resolve": true, "containment": false
                        },
                        "hasOpposite": false
                    }],
                    "extendsIds": [], "implementsIds": []
                }]
            }]}
        });
        mml_interchange::from_interchange(&value).unwrap()
    }

    #[test]
    fn qualified_names_for_every_declaration() {
        let index = NameIndex::build(&[document()]);
        assert_eq!(index.name("p"), "A");
        assert_eq!(index.name("s"), "A.Sub");
        assert_eq!(index.name("s.c"), "A.Sub.Deep");
        assert_eq!(index.name("e"), "A.E");
        assert_eq!(index.name("e.x"), "A.E::x");
        assert_eq!(index.name("c"), "A.C");
        assert_eq!(index.name("c.y"), "A.C::y");
    }

    #[test]
    fn unknown_id_resolves_to_placeholder() {
        let index = NameIndex::build(&[document()]);
        assert!(!index.resolve("nope").is_resolved());
        assert_eq!(index.name("nope"), "$$UNKNOWN$$");
    }

    #[test]
    fn first_write_wins() {
        let mut index = NameIndex::new();
        assert!(index.register("id", "First".to_string()));
        assert!(!index.register("id", "Second".to_string()));
        assert_eq!(index.name("id"), "First");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn duplicate_documents_keep_first_names() {
        let first = document();
        let mut second = document();
        second.typegraph.packages[0].name = "Renamed".to_string();
        let index = NameIndex::build(&[first, second]);
        assert_eq!(index.name("c"), "A.C");
        assert_eq!(index.entries().count(), 7);
    }
}
