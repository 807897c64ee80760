//! Price Index - AVL tree keyed by price for exact-match lookup.
//!
//! Nodes are stored in an [`Arena`] and linked by index. Insertion is the
//! classic recursive AVL insert: descend, attach a leaf, then walk back up
//! recomputing heights and rotating wherever a subtree leans by more than
//! one level. Each recursive step returns the (possibly rotated) subtree
//! root, which the caller writes into its child slot.
//!
//! Keys are unique. Inserting a price that is already present is a silent
//! no-op, so the first name stored for a price wins.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert    | O(log n)   |
//! | Search    | O(log n)   |
//! | Iterate   | O(n)       |

use std::cmp::Ordering;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

use crate::arena::{Arena, ArenaIndex, IndexNode, NULL_INDEX};

/// A broken tree property, reported by [`PriceIndex::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexViolation {
    #[error("key {price} is out of order within its subtree")]
    OutOfOrder { price: Decimal },

    #[error("node {price} has balance factor {balance}")]
    Unbalanced { price: Decimal, balance: i64 },

    #[error("node {price} stores height {stored}, actual {actual}")]
    StaleHeight { price: Decimal, stored: u32, actual: u32 },
}

/// Balanced price → name index.
#[derive(Debug)]
pub struct PriceIndex {
    arena: Arena,
    root: ArenaIndex,
}

impl PriceIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: NULL_INDEX,
        }
    }

    /// Create an empty index with node storage pre-allocated
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: NULL_INDEX,
        }
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert `name` under `price`.
    ///
    /// # Returns
    /// `true` if a node was added, `false` if the price was already indexed
    /// (the stored name is left untouched).
    pub fn insert(&mut self, price: Decimal, name: &str) -> bool {
        let before = self.arena.len();
        self.root = self.insert_at(self.root, price, name);
        self.arena.len() > before
    }

    /// Recursive insert into the subtree at `node`, returning its new root.
    fn insert_at(&mut self, node: ArenaIndex, price: Decimal, name: &str) -> ArenaIndex {
        if node == NULL_INDEX {
            return self.arena.alloc(IndexNode::leaf(price, name));
        }

        let key = self.arena.get(node).price;
        match price.cmp(&key) {
            Ordering::Less => {
                let left = self.arena.get(node).left;
                let new_left = self.insert_at(left, price, name);
                self.arena.get_mut(node).left = new_left;
            }
            Ordering::Greater => {
                let right = self.arena.get(node).right;
                let new_right = self.insert_at(right, price, name);
                self.arena.get_mut(node).right = new_right;
            }
            Ordering::Equal => return node,
        }

        self.update_height(node);
        let balance = self.balance(node);

        if balance > 1 {
            let left = self.arena.get(node).left;
            if price < self.arena.get(left).price {
                // Left-Left
                return self.rotate_right(node);
            }
            // Left-Right
            let new_left = self.rotate_left(left);
            self.arena.get_mut(node).left = new_left;
            return self.rotate_right(node);
        }

        if balance < -1 {
            let right = self.arena.get(node).right;
            if price > self.arena.get(right).price {
                // Right-Right
                return self.rotate_left(node);
            }
            // Right-Left
            let new_right = self.rotate_right(right);
            self.arena.get_mut(node).right = new_right;
            return self.rotate_left(node);
        }

        node
    }

    // ========================================================================
    // Rotations
    // ========================================================================

    /// Lift the left child of `y` into its place.
    ///
    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   C   =>   A   y
    ///    / \              / \
    ///   A   B            B   C
    /// ```
    fn rotate_right(&mut self, y: ArenaIndex) -> ArenaIndex {
        let x = self.arena.get(y).left;
        let middle = self.arena.get(x).right;

        self.arena.get_mut(x).right = y;
        self.arena.get_mut(y).left = middle;

        self.update_height(y);
        self.update_height(x);
        trace!(pivot = %self.arena.get(x).price, "rotate right");
        x
    }

    /// Mirror image of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, x: ArenaIndex) -> ArenaIndex {
        let y = self.arena.get(x).right;
        let middle = self.arena.get(y).left;

        self.arena.get_mut(y).left = x;
        self.arena.get_mut(x).right = middle;

        self.update_height(x);
        self.update_height(y);
        trace!(pivot = %self.arena.get(y).price, "rotate left");
        y
    }

    #[inline]
    fn update_height(&mut self, node: ArenaIndex) {
        let n = self.arena.get(node);
        let height = 1 + self.arena.height(n.left).max(self.arena.height(n.right));
        self.arena.get_mut(node).height = height;
    }

    #[inline]
    fn balance(&self, node: ArenaIndex) -> i64 {
        let n = self.arena.get(node);
        i64::from(self.arena.height(n.left)) - i64::from(self.arena.height(n.right))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Exact-match lookup. `None` means no node carries this price.
    pub fn search(&self, price: Decimal) -> Option<&str> {
        let mut cursor = self.root;
        while cursor != NULL_INDEX {
            let node = self.arena.get(cursor);
            cursor = match price.cmp(&node.price) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(&node.name),
            };
        }
        None
    }

    /// Number of distinct prices indexed
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root == NULL_INDEX
    }

    /// Height of the whole tree (0 when empty)
    #[inline]
    pub fn height(&self) -> u32 {
        self.arena.height(self.root)
    }

    /// In-order (ascending price) traversal
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            arena: &self.arena,
            stack: Vec::with_capacity(self.height() as usize),
        };
        iter.push_left_spine(self.root);
        iter
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Verify key ordering, AVL balance and stored heights for every node.
    ///
    /// Returns the first violation found in a pre-order walk.
    pub fn check_invariants(&self) -> Result<(), IndexViolation> {
        self.check_subtree(self.root, None, None).map(|_| ())
    }

    /// Returns the actual height of the subtree at `node`.
    fn check_subtree(
        &self,
        node: ArenaIndex,
        lower: Option<Decimal>,
        upper: Option<Decimal>,
    ) -> Result<u32, IndexViolation> {
        if node == NULL_INDEX {
            return Ok(0);
        }

        let n = self.arena.get(node);
        let in_bounds =
            lower.map_or(true, |lo| n.price > lo) && upper.map_or(true, |hi| n.price < hi);
        if !in_bounds {
            return Err(IndexViolation::OutOfOrder { price: n.price });
        }

        let left = self.check_subtree(n.left, lower, Some(n.price))?;
        let right = self.check_subtree(n.right, Some(n.price), upper)?;

        let balance = i64::from(left) - i64::from(right);
        if balance.abs() > 1 {
            return Err(IndexViolation::Unbalanced { price: n.price, balance });
        }

        let actual = 1 + left.max(right);
        if n.height != actual {
            return Err(IndexViolation::StaleHeight {
                price: n.price,
                stored: n.height,
                actual,
            });
        }

        Ok(actual)
    }
}

impl Default for PriceIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Ascending-price iterator over `(price, name)` pairs.
pub struct Iter<'a> {
    arena: &'a Arena,
    stack: Vec<ArenaIndex>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut node: ArenaIndex) {
        while node != NULL_INDEX {
            self.stack.push(node);
            node = self.arena.get(node).left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Decimal, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let arena = self.arena;
        let node = arena.get(index);
        self.push_left_spine(node.right);
        Some((node.price, node.name.as_str()))
    }
}
