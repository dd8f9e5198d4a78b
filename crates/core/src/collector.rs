use indexmap::map::Entry;
use indexmap::IndexMap;
use mml_interchange::{InternalPatternEntity, PatternDocument, PatternEntity};

/// Registry of encoded patterns.
///
/// Declared patterns are keyed by their own ID. Internal patterns, the
/// anonymous ones synthesized by macro invocations, are keyed by the ID of
/// the invocation that introduced them. Both tiers keep registration order
/// and keep the first entry when an ID is registered twice.
#[derive(Debug, Clone, Default)]
pub struct GclPatternCollector {
    patterns: IndexMap<String, PatternEntity>,
    internal: IndexMap<String, InternalPatternEntity>,
}

impl GclPatternCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if a pattern with the same ID was already registered.
    pub fn register_pattern(&mut self, pattern: PatternEntity) -> bool {
        match self.patterns.entry(pattern.id.clone()) {
            Entry::Occupied(_) => {
                log::debug!("pattern {} already registered", pattern.id);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(pattern);
                true
            }
        }
    }

    /// Returns false if the declaration already introduced an internal pattern.
    pub fn register_internal(&mut self, internal: InternalPatternEntity) -> bool {
        match self.internal.entry(internal.declaration_id.clone()) {
            Entry::Occupied(_) => {
                log::debug!(
                    "internal pattern for {} already registered",
                    internal.declaration_id
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(internal);
                true
            }
        }
    }

    pub fn pattern(&self, id: &str) -> Option<&PatternEntity> {
        self.patterns.get(id)
    }

    pub fn internal(&self, declaration_id: &str) -> Option<&InternalPatternEntity> {
        self.internal.get(declaration_id)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &PatternEntity> {
        self.patterns.values()
    }

    pub fn len(&self) -> usize {
        self.patterns.len() + self.internal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.internal.is_empty()
    }

    pub fn into_document(self) -> PatternDocument {
        PatternDocument {
            patterns: self.patterns.into_values().collect(),
            internal_patterns: self.internal.into_values().collect(),
        }
    }
}
