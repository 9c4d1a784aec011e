//! Arena-allocated category trie.
//!
//! Nodes live in a flat vector and refer to their children by index, so every node has exactly
//! one parent and traversal state is a plain `(trie, index)` pair.

use crate::TypeId;

/// Index of a node in a [`CategoryTrie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

/// The root is always the first node.
const ROOT: NodeId = NodeId(0);

/// A single trie node.
#[derive(Debug, Default)]
struct Node {
    /// Outgoing edges sorted by label.
    edges: Vec<(char, NodeId)>,
    /// Type ids of keys ending here, without duplicates.
    values: Vec<TypeId>,
}

/// A prefix tree from character sequences to category type ids.
#[derive(Debug)]
pub struct CategoryTrie {
    /// Node arena; index 0 is the root.
    nodes: Vec<Node>,
    /// Number of distinct (key, type id) pairs stored.
    entries: usize,
}

impl Default for CategoryTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTrie {
    /// Creates a trie containing only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            entries: 0,
        }
    }

    /// Associates `key` with `type_id`. Re-inserting an existing pair is a no-op.
    pub fn insert(&mut self, key: &str, type_id: TypeId) {
        let mut node = ROOT;
        for c in key.chars() {
            node = self.child_or_insert(node, c);
        }

        let values = &mut self.nodes[node.0].values;
        if !values.contains(&type_id) {
            values.push(type_id);
            self.entries += 1;
        }
    }

    /// Type ids stored under exactly `key`.
    pub fn get(&self, key: &str) -> &[TypeId] {
        key.chars()
            .try_fold(self.root(), |iter, c| iter.child(c))
            .map(TrieIter::values)
            .unwrap_or_default()
    }

    /// Iterator positioned at the root.
    pub fn root(&self) -> TrieIter<'_> {
        TrieIter {
            trie: self,
            node: ROOT,
        }
    }

    /// Number of (key, type id) pairs stored.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the child of `node` along `c`, creating it if needed.
    fn child_or_insert(&mut self, node: NodeId, c: char) -> NodeId {
        match self.nodes[node.0].edges.binary_search_by_key(&c, |&(label, _)| label) {
            Ok(pos) => self.nodes[node.0].edges[pos].1,
            Err(pos) => {
                let child = NodeId(self.nodes.len());
                self.nodes.push(Node::default());
                self.nodes[node.0].edges.insert(pos, (c, child));
                child
            }
        }
    }
}

/// A position in a [`CategoryTrie`].
#[derive(Debug, Clone, Copy)]
pub struct TrieIter<'a> {
    /// The trie being walked.
    trie: &'a CategoryTrie,
    /// Current node.
    node: NodeId,
}

impl<'a> TrieIter<'a> {
    /// Type ids of keys ending at this node.
    pub fn values(self) -> &'a [TypeId] {
        &self.trie.nodes[self.node.0].values
    }

    /// Moves along the edge labelled `c`, if there is one.
    pub fn child(self, c: char) -> Option<Self> {
        let edges = &self.trie.nodes[self.node.0].edges;
        edges
            .binary_search_by_key(&c, |&(label, _)| label)
            .ok()
            .map(|pos| Self {
                trie: self.trie,
                node: edges[pos].1,
            })
    }

    /// Outgoing edges in label order.
    pub fn children(self) -> impl Iterator<Item = (char, Self)> + 'a {
        let trie = self.trie;
        trie.nodes[self.node.0]
            .edges
            .iter()
            .map(move |&(c, node)| (c, Self { trie, node }))
    }
}
