//! Arena - grow-only node storage for the price index.
//!
//! Tree nodes live in one contiguous `Vec` and refer to each other by
//! `u32` index instead of boxed pointers. The index never deletes nodes,
//! so the arena has no free list: slots are handed out in order and stay
//! valid for the lifetime of the tree.

use std::fmt;

use rust_decimal::Decimal;

/// Sentinel value representing an empty child slot (like nullptr)
pub const NULL_INDEX: u32 = u32::MAX;

/// Type alias for arena indices - our "compressed pointers"
pub type ArenaIndex = u32;

/// A single node of the AVL price index.
///
/// Children are arena indices; there is no parent link. Rotations rewire
/// the child slots and the caller stores whichever index comes back as the
/// new subtree root.
#[derive(Clone)]
pub struct IndexNode {
    /// Search key
    pub price: Decimal,

    /// Name of the first menu entry inserted at this price
    pub name: String,

    /// Left child (all keys strictly smaller)
    pub left: ArenaIndex,

    /// Right child (all keys strictly greater)
    pub right: ArenaIndex,

    /// Height of the subtree rooted here; a leaf has height 1
    pub height: u32,
}

impl IndexNode {
    /// Create a detached leaf
    #[inline]
    pub fn leaf(price: Decimal, name: impl Into<String>) -> Self {
        Self {
            price,
            name: name.into(),
            left: NULL_INDEX,
            right: NULL_INDEX,
            height: 1,
        }
    }
}

impl fmt::Debug for IndexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexNode")
            .field("price", &self.price)
            .field("name", &self.name)
            .field("height", &self.height)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

/// Contiguous node pool addressed by [`ArenaIndex`].
pub struct Arena {
    nodes: Vec<IndexNode>,
}

impl Arena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create an arena with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Store a node and return its index.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` nodes (the sentinel
    /// value is reserved for empty slots).
    #[inline]
    pub fn alloc(&mut self, node: IndexNode) -> ArenaIndex {
        let index = self.nodes.len();
        assert!(index < NULL_INDEX as usize, "price index arena exhausted");
        self.nodes.push(node);
        index as ArenaIndex
    }

    /// Get an immutable reference to a node.
    #[inline]
    pub fn get(&self, index: ArenaIndex) -> &IndexNode {
        debug_assert!(index != NULL_INDEX, "Dereferenced NULL_INDEX");
        &self.nodes[index as usize]
    }

    /// Get a mutable reference to a node.
    #[inline]
    pub fn get_mut(&mut self, index: ArenaIndex) -> &mut IndexNode {
        debug_assert!(index != NULL_INDEX, "Dereferenced NULL_INDEX");
        &mut self.nodes[index as usize]
    }

    /// Height of the subtree at `index`; an empty slot has height 0.
    #[inline]
    pub fn height(&self, index: ArenaIndex) -> u32 {
        if index == NULL_INDEX {
            0
        } else {
            self.nodes[index as usize].height
        }
    }

    /// Returns the number of allocated nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node was ever allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("len", &self.nodes.len())
            .field("capacity", &self.nodes.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_creation() {
        let arena = Arena::with_capacity(100);
        assert_eq!(arena.len(), 0);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_alloc_hands_out_sequential_indices() {
        let mut arena = Arena::new();

        let idx0 = arena.alloc(IndexNode::leaf(Decimal::new(10000, 2), "Burger"));
        let idx1 = arena.alloc(IndexNode::leaf(Decimal::new(50000, 2), "Pizza"));

        assert_eq!(idx0, 0);
        assert_eq!(idx1, 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(idx1).name, "Pizza");
    }

    #[test]
    fn test_arena_get_mut() {
        let mut arena = Arena::new();
        let idx = arena.alloc(IndexNode::leaf(Decimal::new(35000, 2), "Pasta"));

        let node = arena.get_mut(idx);
        node.height = 3;
        node.left = 7;

        let node = arena.get(idx);
        assert_eq!(node.height, 3);
        assert_eq!(node.left, 7);
    }

    #[test]
    fn test_height_of_null_is_zero() {
        let mut arena = Arena::new();
        assert_eq!(arena.height(NULL_INDEX), 0);

        let idx = arena.alloc(IndexNode::leaf(Decimal::ONE, "Tea"));
        assert_eq!(arena.height(idx), 1);
    }

    #[test]
    fn test_leaf_node() {
        let node = IndexNode::leaf(Decimal::new(999, 1), "Soup");
        assert_eq!(node.left, NULL_INDEX);
        assert_eq!(node.right, NULL_INDEX);
        assert_eq!(node.height, 1);
    }
}
