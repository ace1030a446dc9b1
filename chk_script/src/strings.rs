//! Content-addressed string interning with deferred id assignment.
//!
//! Quoted text is looked up by its decoded bytes. Content the scenario already stores reuses the
//! existing id (lowest id first). New content becomes a [`PendingString`]; the action fields that
//! need its id are recorded as [`StringSlot`]s and patched once the commit assigns a real id.

use std::collections::{BTreeMap, TryReserveError};

use chk_data::Scope;

/// Which action field receives a string id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringField {
    Text,
    Sound,
}

/// An output field waiting for the id of a pending string. `trigger` indexes the compiled batch,
/// not the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringSlot {
    pub trigger: usize,
    pub action: usize,
    pub field: StringField,
}

/// A string the compiled triggers need that the scenario does not store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingString {
    pub scope: Scope,
    pub content: Vec<u8>,
    pub assignees: Vec<StringSlot>,
}

/// Outcome of interning one string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
    Existing(u32),
    /// Index into [`StringInterner::pending`]; the id is assigned at commit.
    Pending(usize),
}

#[derive(Debug, Clone)]
struct StringNode {
    id: Option<u32>,
    unused: bool,
    pending: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct StringInterner {
    scope: Scope,
    nodes: BTreeMap<Vec<u8>, Vec<StringNode>>,
    pending: Vec<PendingString>,
}

impl StringInterner {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            nodes: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Register a string the scenario already stores. Seeding the same id again can only clear
    /// its unused mark.
    pub fn seed(&mut self, id: u32, content: &[u8], unused: bool) {
        let nodes = self.nodes.entry(content.to_vec()).or_default();
        match nodes.iter_mut().find(|node| node.id == Some(id)) {
            Some(node) => node.unused &= unused,
            None => nodes.push(StringNode {
                id: Some(id),
                unused,
                pending: None,
            }),
        }
    }

    /// Make room for `additional` more pending strings.
    ///
    /// # Errors
    /// Returns the allocator's error when the room cannot be had.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.pending.try_reserve(additional)
    }

    /// Intern `content` for `slot`. Interning the same content twice yields the same result.
    pub fn intern(&mut self, content: &[u8], slot: StringSlot) -> Interned {
        let nodes = self.nodes.entry(content.to_vec()).or_default();
        if let Some(node) = nodes
            .iter_mut()
            .filter(|node| node.id.is_some())
            .min_by_key(|node| node.id)
            && let Some(id) = node.id
        {
            node.unused = false;
            return Interned::Existing(id);
        }
        if let Some(index) = nodes.iter().find_map(|node| node.pending) {
            self.pending[index].assignees.push(slot);
            return Interned::Pending(index);
        }
        let index = self.pending.len();
        self.pending.push(PendingString {
            scope: self.scope,
            content: content.to_vec(),
            assignees: vec![slot],
        });
        nodes.push(StringNode {
            id: None,
            unused: false,
            pending: Some(index),
        });
        Interned::Pending(index)
    }

    /// Id of stored content, without marking it used.
    pub fn existing_id(&self, content: &[u8]) -> Option<u32> {
        self.nodes.get(content)?.iter().filter_map(|node| node.id).min()
    }

    pub fn is_unused(&self, id: u32) -> bool {
        self.nodes
            .values()
            .flatten()
            .any(|node| node.id == Some(id) && node.unused)
    }

    pub fn pending(&self) -> &[PendingString] {
        &self.pending
    }

    pub fn into_pending(self) -> Vec<PendingString> {
        self.pending
    }

    /// Number of distinct stored ids and pending strings.
    pub fn len(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn unused_count(&self) -> usize {
        self.nodes.values().flatten().filter(|node| node.unused).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(action: usize) -> StringSlot {
        StringSlot {
            trigger: 0,
            action,
            field: StringField::Text,
        }
    }

    #[test]
    fn existing_content_reuses_lowest_id() {
        let mut interner = StringInterner::new(Scope::Game);
        interner.seed(7, b"hello", false);
        interner.seed(3, b"hello", false);
        assert_eq!(interner.intern(b"hello", slot(0)), Interned::Existing(3));
        assert!(interner.pending().is_empty());
    }

    #[test]
    fn reusing_unused_content_clears_the_mark() {
        let mut interner = StringInterner::new(Scope::Game);
        interner.seed(2, b"old", true);
        assert!(interner.is_unused(2));
        assert_eq!(interner.intern(b"old", slot(0)), Interned::Existing(2));
        assert!(!interner.is_unused(2));
    }

    #[test]
    fn used_seed_wins_over_unused_seed() {
        let mut interner = StringInterner::new(Scope::Game);
        interner.seed(4, b"shared", false);
        interner.seed(4, b"shared", true);
        assert!(!interner.is_unused(4));
        assert_eq!(interner.unused_count(), 0);
    }

    #[test]
    fn new_content_is_pending_once() {
        let mut interner = StringInterner::new(Scope::Game);
        let first = interner.intern(b"fresh", slot(0));
        let second = interner.intern(b"fresh", slot(3));
        assert_eq!(first, Interned::Pending(0));
        assert_eq!(second, first);
        let pending = interner.into_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].content, b"fresh".to_vec());
        assert_eq!(pending[0].assignees, vec![slot(0), slot(3)]);
    }

    #[test]
    fn content_comparison_is_exact() {
        let mut interner = StringInterner::new(Scope::Game);
        interner.seed(1, b"Hello", false);
        assert_eq!(interner.intern(b"hello", slot(0)), Interned::Pending(0));
        assert_eq!(interner.existing_id(b"Hello"), Some(1));
        assert_eq!(interner.existing_id(b"hello"), None);
    }

    #[test]
    fn reserve_reports_impossible_requests() {
        let mut interner = StringInterner::new(Scope::Game);
        interner.reserve(8).expect("small reservation");
        assert!(interner.pending.capacity() >= 8);
        assert!(interner.reserve(usize::MAX).is_err());
        assert_eq!(interner.intern(b"still works", slot(0)), Interned::Pending(0));
    }
}
