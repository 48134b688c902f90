//! Node store: arena slots plus a free stack of recycled handles.
//!
//! Slot 0 is the sentinel head. It carries no entry, spans every level, and
//! is never released. Every other slot is either linked into the skip list
//! (entry present) or parked on the free stack (entry cleared, no links).
//!
//! ```text
//! slots: [HEAD][ n1 ][ n2 ][ -- ][ n4 ][ -- ]
//! free:  [5, 3]                         (LIFO: slot 3 is reused next)
//! ```
//!
//! Released nodes keep their forward-link allocation, so steady-state
//! insert/delete churn does not touch the allocator.

use tracing::trace;

use crate::handle::Handle;

/// Slot index of the sentinel head.
pub(crate) const HEAD: usize = 0;

/// One arena slot.
#[derive(Debug)]
pub(crate) struct Node<K, V, H> {
    /// `None` for the sentinel and for pooled slots.
    entry: Option<(K, V)>,
    /// Highest level this node is linked at.
    height: u8,
    /// `forward[i]` is the successor at level `i`, for `i in 0..=height`.
    forward: Vec<H>,
}

impl<K, V, H: Handle> Node<K, V, H> {
    fn sentinel(max_level: usize) -> Self {
        Self {
            entry: None,
            height: max_level as u8,
            forward: vec![H::NONE; max_level + 1],
        }
    }

    /// Returns the highest level this node is linked at.
    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns the key, or `None` for the sentinel and pooled slots.
    #[inline]
    pub(crate) fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(k, _)| k)
    }

    /// Returns the key and value, or `None` for the sentinel and pooled slots.
    #[inline]
    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        self.entry.as_ref().map(|(k, v)| (k, v))
    }

    /// Returns the successor at `level`.
    #[inline]
    pub(crate) fn next(&self, level: usize) -> H {
        self.forward[level]
    }
}

/// Owns every node of one skip list.
#[derive(Debug)]
pub(crate) struct NodeArena<K, V, H> {
    slots: Vec<Node<K, V, H>>,
    free: Vec<H>,
}

impl<K, V, H: Handle> NodeArena<K, V, H> {
    /// Creates an arena holding only the sentinel, linked at `0..=max_level`.
    pub(crate) fn new(max_level: usize) -> Self {
        Self {
            slots: vec![Node::sentinel(max_level)],
            free: Vec::new(),
        }
    }

    /// Handle of the sentinel head.
    #[inline]
    pub(crate) fn head(&self) -> H {
        H::from_index(HEAD)
    }

    #[inline]
    pub(crate) fn node(&self, handle: H) -> &Node<K, V, H> {
        &self.slots[handle.index()]
    }

    /// Successor of `handle` at `level`.
    #[inline]
    pub(crate) fn next(&self, handle: H, level: usize) -> H {
        self.slots[handle.index()].forward[level]
    }

    /// Points `handle`'s link at `level` to `next`.
    #[inline]
    pub(crate) fn set_next(&mut self, handle: H, level: usize, next: H) {
        self.slots[handle.index()].forward[level] = next;
    }

    /// Key stored at `handle`.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is the sentinel or a pooled slot. Only linked nodes
    /// are ever reachable through forward links.
    #[inline]
    pub(crate) fn key(&self, handle: H) -> &K {
        self.slots[handle.index()]
            .key()
            .expect("forward link to an empty slot")
    }

    /// Mutable value stored at `handle`.
    ///
    /// # Panics
    ///
    /// Same contract as [`key`](Self::key).
    #[inline]
    pub(crate) fn value_mut(&mut self, handle: H) -> &mut V {
        self.slots[handle.index()]
            .entry
            .as_mut()
            .map(|(_, v)| v)
            .expect("forward link to an empty slot")
    }

    /// Takes a node for a new entry, reusing a pooled slot when one exists.
    ///
    /// The returned node has `height + 1` links, all `NONE`.
    ///
    /// # Panics
    ///
    /// Panics if the arena outgrows the handle type.
    pub(crate) fn acquire(&mut self, height: usize, key: K, value: V) -> H {
        debug_assert!(height <= u8::MAX as usize);

        if let Some(handle) = self.free.pop() {
            let node = &mut self.slots[handle.index()];
            debug_assert!(node.entry.is_none() && node.forward.is_empty());
            node.entry = Some((key, value));
            node.height = height as u8;
            node.forward.resize(height + 1, H::NONE);
            trace!(slot = handle.index(), height, "reused pooled node");
            return handle;
        }

        let index = self.slots.len();
        assert!(
            index < H::capacity(),
            "node arena exceeds handle capacity ({})",
            H::capacity()
        );
        self.slots.push(Node {
            entry: Some((key, value)),
            height: height as u8,
            forward: vec![H::NONE; height + 1],
        });
        trace!(slot = index, height, "allocated node");
        H::from_index(index)
    }

    /// Resets a node and parks it on the free stack, returning its entry.
    ///
    /// Links are cleared and the height zeroed so nothing from this entry can
    /// be observed by whichever key reuses the slot.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is the sentinel or already pooled.
    pub(crate) fn release(&mut self, handle: H) -> (K, V) {
        assert_ne!(handle.index(), HEAD, "sentinel cannot be released");
        let node = &mut self.slots[handle.index()];
        let entry = node.entry.take().expect("released a pooled node");
        node.forward.clear();
        node.height = 0;
        self.free.push(handle);
        entry
    }

    /// Releases every node and unlinks the sentinel.
    ///
    /// Entries are dropped in slot order; all slots end up pooled.
    pub(crate) fn clear(&mut self) {
        self.free.clear();
        for (index, node) in self.slots.iter_mut().enumerate().skip(1) {
            node.entry = None;
            node.forward.clear();
            node.height = 0;
            self.free.push(H::from_index(index));
        }
        // Lowest slots end up on top of the stack.
        self.free.reverse();
        self.slots[HEAD].forward.fill(H::NONE);
    }

    /// Number of pooled slots waiting for reuse.
    #[inline]
    pub(crate) fn pooled(&self) -> usize {
        self.free.len()
    }

    /// Number of slots ever allocated, excluding the sentinel.
    #[inline]
    pub(crate) fn allocated(&self) -> usize {
        self.slots.len() - 1
    }
}
