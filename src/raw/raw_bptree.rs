use core::borrow::Borrow;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{ChildVec, InternalNode, LeafNode, Node};

/// The core B+Tree implementation backing `BPTreeMap`.
///
/// Nodes live in an arena and reference each other by stable handles; each
/// non-root node also keeps a non-owning back-reference to its parent,
/// which every structural change re-establishes before returning.
pub(crate) struct RawBPTree<K, V> {
    /// Arena owning all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// The branching factor: maximum number of children per internal node;
    /// every node holds at most `order - 1` keys.
    order: usize,
    /// Total number of entries in the tree.
    len: usize,
}

/// Result of an insertion attempt.
pub(crate) enum RawInsert {
    /// The entry went in; the handle names the node the insertion
    /// ultimately updated (the leaf, or the topmost node a split rewrote).
    Inserted(Handle),
    /// The duplicate probe matched; the handle names the leaf that already
    /// holds the colliding entry. The tree was not modified.
    Duplicate(Handle),
}

impl<K, V> RawBPTree<K, V> {
    /// Creates a new, empty tree. The caller has already validated `order`.
    pub(crate) const fn new(order: usize) -> Self {
        debug_assert!(order >= 3, "branching factor below minimum");
        Self {
            nodes: Arena::new(),
            root: None,
            order,
            len: 0,
        }
    }

    /// Returns the branching factor.
    pub(crate) const fn order(&self) -> usize {
        self.order
    }

    /// Returns the number of entries in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the root handle, if the tree is non-empty.
    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Returns the number of levels from the root down to the leaves.
    pub(crate) fn height(&self) -> usize {
        let Some(mut current) = self.root else {
            return 0;
        };
        let mut height = 1;
        while let Node::Internal(internal) = self.nodes.get(current) {
            current = internal.child(0).expect("internal node has a first child");
            height += 1;
        }
        height
    }
}

impl<K: Ord + Clone, V> RawBPTree<K, V> {
    /// Locates the unique leaf that should contain `key`.
    ///
    /// At each internal node the keys are lower-bound searched; past-the-end
    /// descends into the last non-vacant child, an exact match descends
    /// right of the separator (duplicates route right), and anything else
    /// descends left of it. Returns `None` only for an empty tree.
    pub(crate) fn find_leaf<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        loop {
            match self.nodes.get(current) {
                Node::Leaf(_) => return Some(current),
                Node::Internal(internal) => {
                    let at = internal.lower_bound(key);
                    current = if at == internal.key_count() {
                        internal.last_child().expect("internal node has at least one child")
                    } else if internal.key_at(at).borrow() == key {
                        internal.child(at + 1).expect("child right of separator is vacant")
                    } else {
                        internal.child(at).expect("child left of separator is vacant")
                    };
                }
            }
        }
    }

    /// Searches for a key and returns the leaf handle and entry index.
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf_handle = self.find_leaf(key)?;
        let leaf = self.nodes.get(leaf_handle).as_leaf();
        let at = leaf.lower_bound(key);
        if at < leaf.len() && leaf.key_at(at).borrow() == key {
            return Some((leaf_handle, at));
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (leaf_handle, at) = self.lookup(key)?;
        Some(self.nodes.get(leaf_handle).as_leaf().value_at(at))
    }

    /// Inserts a key-value pair, splitting nodes as needed.
    pub(crate) fn insert(&mut self, key: K, value: V) -> RawInsert
    where
        V: PartialEq,
    {
        if self.root.is_none() {
            let mut leaf = LeafNode::new();
            leaf.insert(key, value);
            let handle = self.nodes.alloc(Node::Leaf(leaf));
            self.root = Some(handle);
            self.len = 1;
            return RawInsert::Inserted(handle);
        }

        let leaf_handle = self.find_leaf(&key).expect("non-empty tree yields a leaf");
        let leaf = self.nodes.get(leaf_handle).as_leaf();

        // The duplicate probe compares only the value at the lower-bound
        // position, never the key there: an unrelated entry parked at the
        // insertion point still rejects the insert when its value matches.
        let at = leaf.lower_bound(&key);
        if at < leaf.len() && *leaf.value_at(at) == value {
            return RawInsert::Duplicate(leaf_handle);
        }

        if leaf.len() < self.order - 1 {
            self.nodes.get_mut(leaf_handle).as_leaf_mut().insert(key, value);
            self.len += 1;
            return RawInsert::Inserted(leaf_handle);
        }

        // Leaf is full: split it and hand the separator to the parent.
        let order = self.order;
        let (separator, sibling) = self
            .nodes
            .get_mut(leaf_handle)
            .as_leaf_mut()
            .split_with(key, value, order);
        let sibling_handle = self.nodes.alloc(Node::Leaf(sibling));
        self.nodes
            .get_mut(leaf_handle)
            .as_leaf_mut()
            .set_sibling(Some(sibling_handle));
        self.len += 1;
        RawInsert::Inserted(self.insert_in_parent(leaf_handle, separator, sibling_handle))
    }

    /// Inserts a separator and the freshly split-off `right` node into
    /// `left`'s parent, recursing upward while parents overflow.
    ///
    /// Returns the topmost node the propagation rewrote.
    fn insert_in_parent(&mut self, left: Handle, separator: K, right: Handle) -> Handle {
        let Some(parent) = self.nodes.get(left).parent() else {
            // `left` was the root: grow a new root holding the two halves.
            let root = InternalNode::new_root(separator, left, right);
            let root_handle = self.nodes.alloc(Node::Internal(root));
            self.set_parent_for_children(root_handle);
            self.root = Some(root_handle);
            return root_handle;
        };

        let node = self.nodes.get(parent).as_internal();
        let at = node.position_of(left).expect("parent back-reference is stale");

        if node.child_count() < self.order {
            let node = self.nodes.get_mut(parent).as_internal_mut();
            if at == node.child_count() - 1 {
                node.push_separator(separator, right);
            } else {
                node.insert_separator(at, separator, right);
            }
            self.set_parent_for_children(parent);
            return parent;
        }

        // Parent is full: split it and recurse with the promoted key.
        let order = self.order;
        let (promoted, sibling) = self
            .nodes
            .get_mut(parent)
            .as_internal_mut()
            .split_with(at, separator, right, order);
        // When `right` lands in the rebuilt left half its back-reference
        // must be pinned here: the wholesale refresh below only covers the
        // new sibling's half, and the recursive call may read it.
        if at + 1 < (order + 2) / 2 {
            self.nodes.get_mut(right).set_parent(Some(parent));
        }
        let sibling_handle = self.nodes.alloc(Node::Internal(sibling));
        self.set_parent_for_children(sibling_handle);
        self.insert_in_parent(parent, promoted, sibling_handle)
    }

    /// Re-establishes the parent back-reference of every current child of
    /// the given internal node.
    fn set_parent_for_children(&mut self, node: Handle) {
        let children: ChildVec = self.nodes.get(node).as_internal().children().iter().copied().collect();
        for child in children.into_iter().flatten() {
            self.nodes.get_mut(child).set_parent(Some(node));
        }
    }
}
