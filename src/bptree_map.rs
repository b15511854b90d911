//! An order-preserving index based on a [B+Tree].
//!
//! [B+Tree]: https://en.wikipedia.org/wiki/B%2B_tree

use core::borrow::Borrow;

use crate::error::{Error, Result};
use crate::raw::{Handle, RawBPTree, RawInsert};

/// An in-memory, order-preserving B+Tree index.
///
/// Given a key type with a [total order], the tree stores its entries in
/// key order across a chain of equal-depth leaves, routed by internal nodes
/// that hold only separator keys. The branching factor is chosen at
/// construction: an internal node holds at most `order` children, and any
/// node holds at most `order - 1` keys. Inserting into a full node splits
/// it and promotes a separator into the parent, growing a new root when the
/// split reaches the top.
///
/// Unlike `std::collections::BTreeMap`, inserting never overwrites: an
/// insert that trips the duplicate probe (see [`insert`](Self::insert))
/// leaves the tree untouched and reports the leaf already holding the
/// colliding entry. Deletion and range scans are out of scope.
///
/// # Examples
///
/// ```
/// use bptree::BPTreeMap;
///
/// let mut ranks = BPTreeMap::with_order(4).unwrap();
///
/// ranks.insert("Alice", 1);
/// ranks.insert("Bob", 2);
/// ranks.insert("Carol", 3);
///
/// assert_eq!(ranks.get("Bob"), Some(&2));
/// assert!(!ranks.contains_key("Mallory"));
/// assert_eq!(ranks.len(), 3);
/// ```
///
/// [total order]: https://en.wikipedia.org/wiki/Total_order
pub struct BPTreeMap<K, V> {
    pub(crate) raw: RawBPTree<K, V>,
}

/// An opaque token naming a tree node.
///
/// Returned by [`BPTreeMap::insert`] to identify the node an insertion
/// landed in. It carries no accessors; it exists so callers can observe
/// which node two outcomes have in common.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeId(pub(crate) Handle);

/// The outcome of [`BPTreeMap::insert`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InsertOutcome {
    /// The entry went in. The id names the node the insertion ultimately
    /// updated: the leaf itself for a plain insert, or the topmost node
    /// rewritten by split propagation (the new root, when one was grown).
    Inserted(NodeId),
    /// The duplicate probe matched and the tree was left untouched. The id
    /// names the leaf holding the entry that caused the rejection.
    Duplicate(NodeId),
}

impl InsertOutcome {
    /// Returns true for the [`Duplicate`](Self::Duplicate) outcome.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertOutcome::Duplicate(_))
    }

    /// Returns the node id carried by either outcome.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match *self {
            InsertOutcome::Inserted(id) | InsertOutcome::Duplicate(id) => id,
        }
    }
}

impl<K, V> BPTreeMap<K, V> {
    /// Creates an empty tree with the given branching factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] when `order < 3`: an index node must
    /// be able to hold at least one key even at minimum fanout.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPTreeMap;
    ///
    /// assert!(BPTreeMap::<i32, i32>::with_order(2).is_err());
    /// assert!(BPTreeMap::<i32, i32>::with_order(3).is_ok());
    /// ```
    pub fn with_order(order: usize) -> Result<Self> {
        if order < 3 {
            return Err(Error::InvalidOrder(order));
        }
        Ok(Self {
            raw: RawBPTree::new(order),
        })
    }

    /// Returns the branching factor the tree was constructed with.
    #[must_use]
    pub fn order(&self) -> usize {
        self.raw.order()
    }

    /// Returns the number of entries in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the tree contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of levels from the root down to the leaves.
    ///
    /// An empty tree has height 0 and a single root leaf has height 1; the
    /// first root split raises it to 2.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }
}

impl<K: Ord + Clone, V> BPTreeMap<K, V> {
    /// Inserts a key-value pair.
    ///
    /// The pair lands in the unique leaf its key descends to. If that leaf
    /// is full the insertion splits it, promoting the new right sibling's
    /// first key into the parent and recursing while parents overflow;
    /// every affected child's parent back-reference is re-established
    /// before the call returns.
    ///
    /// # Duplicate probe
    ///
    /// Before inserting, the entry at the key's lower-bound position in the
    /// target leaf is compared **by value only**. On a match the tree is
    /// left untouched and [`InsertOutcome::Duplicate`] names the leaf
    /// holding that entry, even when its key differs from `key`. The
    /// upshot: re-inserting an existing pair is a no-op, while a brand-new
    /// key is rejected if the entry already sitting at its insertion point
    /// happens to carry an equal value. Callers who need exact
    /// `(key, value)` duplicate detection should choose values that are
    /// unique per key.
    ///
    /// A re-insert of an existing key with a *different* value passes the
    /// probe and inserts a second entry for that key; lookups then return
    /// the most recently accepted value.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPTreeMap;
    ///
    /// let mut index = BPTreeMap::with_order(3).unwrap();
    /// assert!(!index.insert(5, 100).is_duplicate());
    /// assert!(index.insert(5, 100).is_duplicate());
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome
    where
        V: PartialEq,
    {
        match self.raw.insert(key, value) {
            RawInsert::Inserted(handle) => InsertOutcome::Inserted(NodeId(handle)),
            RawInsert::Duplicate(handle) => InsertOutcome::Duplicate(NodeId(handle)),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPTreeMap;
    ///
    /// let mut index = BPTreeMap::with_order(3).unwrap();
    /// index.insert(1, "a");
    /// assert_eq!(index.get(&1), Some(&"a"));
    /// assert_eq!(index.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns true if the tree contains an entry for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.lookup(key).is_some()
    }
}
