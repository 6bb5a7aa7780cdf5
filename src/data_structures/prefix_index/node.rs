//! Node implementation for the prefix index.
//!
//! Nodes own their children outright; the tree never shares a node between
//! two parents.

use std::collections::BTreeMap;

/// A node in the prefix index.
///
/// Each node stands for the prefix spelled by the path from the root. A
/// terminal node marks that this prefix is also a complete stored word.
#[derive(Debug, Default)]
pub struct TrieNode {
    /// Child nodes keyed by the next character, iterated in code-point order
    pub children: BTreeMap<char, TrieNode>,

    /// Whether the path to this node spells a stored word
    pub is_terminal: bool,
}

impl TrieNode {
    /// Creates a new empty trie node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the child for `c`, if any.
    pub fn child(&self, c: char) -> Option<&TrieNode> {
        self.children.get(&c)
    }

    /// Returns the child for `c`, creating it if needed. The flag tells
    /// whether a new node was allocated.
    pub fn child_or_insert(&mut self, c: char) -> (&mut TrieNode, bool) {
        use std::collections::btree_map::Entry;

        match self.children.entry(c) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(TrieNode::new()), true),
        }
    }
}

impl Drop for TrieNode {
    // The derived drop recurses once per character and overflows the stack
    // on deep paths. Detach children onto a heap stack instead, so every node
    // is dropped with an empty map.
    fn drop(&mut self) {
        let mut pending: Vec<TrieNode> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}
