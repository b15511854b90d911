//! Graphviz topology export.
//!
//! Debug aid that renders a tree's node graph as two DOT documents: one
//! drawn the way B+Trees are usually pictured (parent-to-child edges) and
//! one tracing every node's parent back-reference up to the root. Feeding
//! either document to `dot -Tpng` gives a picture of the structure after a
//! sequence of insertions.

use core::fmt::{Display, Write as _};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::bptree_map::BPTreeMap;
use crate::error::Result;
use crate::raw::{Handle, Node};

const INTERNAL_FILL: &str = "IndianRed";
const LEAF_FILL: &str = "PaleGreen";

/// The two Graphviz documents describing a tree's topology.
///
/// Both cover the same node set, cluster nodes into one `rank=same` group
/// per breadth-first level, and color internal nodes and leaves
/// differently; they differ only in edge direction.
pub struct DotDump {
    /// Parent-to-child edges: the tree as usually drawn.
    pub structure: String,
    /// Child-to-parent edges: each node's back-reference toward the root.
    pub backtraces: String,
}

impl<K: Display, V> BPTreeMap<K, V> {
    /// Renders the tree's topology as two Graphviz documents.
    ///
    /// Nodes are labeled with their space-joined ordered key list, leaf
    /// keys suffixed with `*`; an empty node is labeled `NIL`. Repeated
    /// edges and attribute lines are emitted once. An empty tree yields a
    /// pair of bare `digraph G` documents.
    #[must_use]
    pub fn to_dot(&self) -> DotDump {
        let mut structure = String::from("digraph G {\n");
        let mut backtraces = String::from("digraph G {\n");

        if let Some(root) = self.raw.root() {
            let mut down_edges: HashSet<(String, String)> = HashSet::new();
            let mut up_edges: HashSet<(String, String)> = HashSet::new();
            let mut seen_attrs: HashSet<String> = HashSet::new();
            let mut attrs = String::new();
            let mut ranks = String::new();

            // Breadth-first over parent-to-child edges; sibling links are
            // not followed, so every node lands in exactly one level.
            let mut level: Vec<Handle> = vec![root];
            while !level.is_empty() {
                let mut next: Vec<Handle> = Vec::new();
                ranks.push_str("\t{ rank=same");

                for &handle in &level {
                    let node = self.raw.node(handle);
                    let name = label(node);
                    write!(ranks, " {name}").unwrap();

                    let fill = if node.is_leaf() { LEAF_FILL } else { INTERNAL_FILL };
                    let attr = format!("\t{name}[ style=filled, fillcolor={fill} ];\n");
                    if seen_attrs.insert(attr.clone()) {
                        attrs.push_str(&attr);
                    }

                    if let Some(parent) = node.parent() {
                        let parent_name = label(self.raw.node(parent));
                        if up_edges.insert((name.clone(), parent_name.clone())) {
                            writeln!(backtraces, "\t{name} -> {parent_name};").unwrap();
                        }
                    }

                    if let Node::Internal(internal) = node {
                        for child in internal.children().iter().copied().flatten() {
                            let child_name = label(self.raw.node(child));
                            if down_edges.insert((name.clone(), child_name.clone())) {
                                writeln!(structure, "\t{name} -> {child_name};").unwrap();
                            }
                            next.push(child);
                        }
                    }
                }

                ranks.push_str(" };\n");
                level = next;
            }

            structure.push_str(&ranks);
            structure.push_str(&attrs);
            backtraces.push_str(&ranks);
            backtraces.push_str(&attrs);
        }

        structure.push('}');
        backtraces.push('}');
        DotDump { structure, backtraces }
    }

    /// Writes both topology documents to the given paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) when either file cannot be
    /// written; the in-memory tree is unaffected either way.
    pub fn dump_to_dot(&self, structure_path: impl AsRef<Path>, backtraces_path: impl AsRef<Path>) -> Result<()> {
        let dump = self.to_dot();
        fs::write(structure_path, &dump.structure)?;
        fs::write(backtraces_path, &dump.backtraces)?;
        Ok(())
    }
}

/// A node's display label: its quoted, space-joined key list.
fn label<K: Display, V>(node: &Node<K, V>) -> String {
    let mut name = String::from("\"");
    let mut keys = 0;

    match node {
        Node::Internal(internal) => {
            for key in internal.keys() {
                if keys > 0 {
                    name.push(' ');
                }
                write!(name, "{key}").unwrap();
                keys += 1;
            }
        }
        Node::Leaf(leaf) => {
            for (key, _) in leaf.entries() {
                if keys > 0 {
                    name.push(' ');
                }
                write!(name, "{key}*").unwrap();
                keys += 1;
            }
        }
    }

    if keys == 0 {
        name.push_str("NIL");
    }
    name.push('"');
    name
}
