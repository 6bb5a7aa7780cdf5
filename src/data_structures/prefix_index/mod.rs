//! Prefix Index Implementation
//!
//! This module provides the in-memory trie that answers autocomplete
//! queries. Children are kept in ordered maps, so every traversal yields
//! words in ascending code-point order and repeated searches over an
//! unchanged index return identical sequences.
//!
//! The index itself is not synchronized. Callers share it behind a
//! [`SharedIndex`] lock: searches take the read side, inserts the write side.

mod node;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::word::Word;
use node::TrieNode;

/// A prefix index shared between the synchronizer and the query gateway.
pub type SharedIndex = Arc<RwLock<PrefixIndex>>;

/// Trie over normalized words with deterministic prefix search.
///
/// Key features:
/// * Idempotent insertion
/// * Lexicographically ordered results
/// * Stack-based collection and teardown, safe for arbitrarily long words
/// * Early exit when a caller only needs the first `n` matches
#[derive(Debug, Default)]
pub struct PrefixIndex {
    /// The root node, representing the empty prefix
    root: TrieNode,

    /// Number of terminal nodes
    words: usize,

    /// Number of nodes below the root
    nodes: usize,
}

impl PrefixIndex {
    /// Creates a new empty `PrefixIndex`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the index for sharing across tasks.
    pub fn into_shared(self) -> SharedIndex {
        Arc::new(RwLock::new(self))
    }

    /// Inserts a word into the index.
    ///
    /// # Returns
    ///
    /// `true` if the word was new, `false` if it was already present. A repeated
    /// insert leaves the structure untouched.
    pub fn insert(&mut self, word: &Word) -> bool {
        let mut node = &mut self.root;
        let mut created = 0;

        for c in word.chars() {
            let (next, is_new) = node.child_or_insert(c);
            if is_new {
                created += 1;
            }
            node = next;
        }

        self.nodes += created;

        if node.is_terminal {
            return false;
        }

        node.is_terminal = true;
        self.words += 1;
        true
    }

    /// Returns every stored word starting with `prefix`, in lexicographic order.
    ///
    /// The prefix is expected to be normalized already. An empty prefix matches
    /// the whole vocabulary; a prefix with no path in the trie yields an empty
    /// vector.
    pub fn search(&self, prefix: &str) -> Vec<String> {
        self.collect(prefix, usize::MAX)
    }

    /// Like [`search`](Self::search), but stops after `limit` matches.
    ///
    /// The result is always identical to `search(prefix)` truncated to `limit`.
    pub fn search_limited(&self, prefix: &str, limit: usize) -> Vec<String> {
        self.collect(prefix, limit)
    }

    /// Checks whether `word` is stored (as a full word, not just a prefix).
    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.is_terminal)
    }

    /// Returns the number of stored words.
    pub fn len(&self) -> usize {
        self.words
    }

    /// Checks if the index holds no words.
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Returns the number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Walks the path spelled by `prefix`.
    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.child(c))
    }

    /// Depth-first, pre-order collection below the node reached by `prefix`.
    ///
    /// Children are pushed in reverse so they are popped in ascending order;
    /// emitting a node before its descendants keeps the output sorted because
    /// a word always sorts before its extensions.
    fn collect(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut results = Vec::new();
        if limit == 0 {
            return results;
        }

        let start = match self.find(prefix) {
            Some(node) => node,
            None => return results,
        };

        let mut path: Vec<char> = prefix.chars().collect();
        // (path length before this edge, edge label, node)
        let mut stack: Vec<(usize, Option<char>, &TrieNode)> = vec![(path.len(), None, start)];

        while let Some((depth, edge, node)) = stack.pop() {
            path.truncate(depth);
            if let Some(c) = edge {
                path.push(c);
            }

            if node.is_terminal {
                results.push(path.iter().collect());
                if results.len() >= limit {
                    break;
                }
            }

            let depth = path.len();
            for (&c, child) in node.children.iter().rev() {
                stack.push((depth, Some(c), child));
            }
        }

        results
    }
}

impl Extend<Word> for PrefixIndex {
    fn extend<I: IntoIterator<Item = Word>>(&mut self, iter: I) {
        for word in iter {
            self.insert(&word);
        }
    }
}

impl FromIterator<Word> for PrefixIndex {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}
