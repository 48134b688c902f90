//! Unsynchronized skip list over a [`NodeArena`].
//!
//! ```text
//! Level 2:  HEAD ─────────────────────► 15 ──────────────► NIL
//!             │                          │
//! Level 1:  HEAD ──► 1 ────────────────► 15 ──► 25 ──────► NIL
//!             │      │                   │       │
//! Level 0:  HEAD ──► 1 ──► 3 ──► 5 ────► 15 ──► 25 ──────► NIL
//! ```
//!
//! Every operation descends from the sentinel at the current level. Mutations
//! record the last node visited per level (the predecessor trail) and splice
//! or unlink through it. [`SkipMap`](crate::SkipMap) wraps this type in a
//! reader/writer lock; nothing here is thread-aware.

use core::fmt;
use core::mem;

use rand_core::RngCore;
use tracing::{debug, trace};

use crate::arena::NodeArena;
use crate::config::{Config, MAX_SUPPORTED_LEVEL};
use crate::error::IntegrityError;
use crate::handle::Handle;
use crate::level::LevelSelector;

/// Predecessor per level, filled top-down by [`RawSkipList::search`].
type Trail<H> = [H; MAX_SUPPORTED_LEVEL + 1];

pub(crate) struct RawSkipList<K, V, R, H> {
    arena: NodeArena<K, V, H>,
    selector: LevelSelector<R>,
    config: Config,
    /// Highest level with at least one node, 0 when empty.
    level: usize,
    len: usize,
}

impl<K, V, R, H> RawSkipList<K, V, R, H>
where
    K: Ord,
    R: RngCore,
    H: Handle,
{
    /// Creates an empty list. `config` must already be validated.
    pub(crate) fn new(config: Config, rng: R) -> Self {
        debug!(
            max_level = config.max_level,
            promotion_probability = config.promotion_probability,
            "creating skip list"
        );
        Self {
            arena: NodeArena::new(config.max_level),
            selector: LevelSelector::from_valid(rng, &config),
            config,
            level: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.level
    }

    #[inline]
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub(crate) fn pooled(&self) -> usize {
        self.arena.pooled()
    }

    #[inline]
    pub(crate) fn allocated(&self) -> usize {
        self.arena.allocated()
    }

    /// Returns the value stored under `key`.
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let found = self.find(key)?;
        self.arena.node(found).entry().map(|(_, v)| v)
    }

    /// Smallest entry.
    pub(crate) fn first(&self) -> Option<(&K, &V)> {
        let first = self.arena.next(self.arena.head(), 0);
        if first.is_none() {
            return None;
        }
        self.arena.node(first).entry()
    }

    /// Largest entry, found by riding each level to its end.
    pub(crate) fn last(&self) -> Option<(&K, &V)> {
        let mut x = self.arena.head();
        for i in (0..=self.level).rev() {
            loop {
                let next = self.arena.next(x, i);
                if next.is_none() {
                    break;
                }
                x = next;
            }
        }
        self.arena.node(x).entry()
    }

    /// Inserts or overwrites. Returns the previous value on overwrite.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut trail = [H::NONE; MAX_SUPPORTED_LEVEL + 1];

        if let Some(found) = self.search(&key, &mut trail) {
            trace!(len = self.len, "overwrote existing key");
            return Some(mem::replace(self.arena.value_mut(found), value));
        }

        let height = self.selector.next_height();
        if height > self.level {
            let head = self.arena.head();
            trail[self.level + 1..=height].fill(head);
            debug!(from = self.level, to = height, "raised current level");
            self.level = height;
        }

        let node = self.arena.acquire(height, key, value);
        for (i, &pred) in trail.iter().enumerate().take(height + 1) {
            let succ = self.arena.next(pred, i);
            self.arena.set_next(node, i, succ);
            self.arena.set_next(pred, i, node);
        }

        self.len += 1;
        trace!(height, len = self.len, "inserted key");
        None
    }

    /// Unlinks `key` and recycles its node. Returns the removed value.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let mut trail = [H::NONE; MAX_SUPPORTED_LEVEL + 1];

        let Some(target) = self.search(key, &mut trail) else {
            trace!(len = self.len, "remove missed");
            return None;
        };

        // Links are contiguous from level 0 up to the node's height, so the
        // first level where the predecessor skips past it ends the unlink.
        for (i, &pred) in trail.iter().enumerate().take(self.level + 1) {
            if self.arena.next(pred, i) != target {
                break;
            }
            let succ = self.arena.next(target, i);
            self.arena.set_next(pred, i, succ);
        }

        self.shrink_level();
        self.len -= 1;

        let (_, value) = self.arena.release(target);
        trace!(len = self.len, "removed key");
        Some(value)
    }

    /// Recycles every node and resets to the empty state.
    pub(crate) fn clear(&mut self) {
        debug!(len = self.len, level = self.level, "clearing skip list");
        self.arena.clear();
        self.level = 0;
        self.len = 0;
    }

    /// Keys of each level from 0 up to the current level, in list order.
    pub(crate) fn levels(&self) -> Vec<Vec<K>>
    where
        K: Clone,
    {
        (0..=self.level)
            .map(|i| self.level_keys(i).cloned().collect())
            .collect()
    }

    /// Walks one level from the sentinel.
    pub(crate) fn level_keys(&self, level: usize) -> LevelKeys<'_, K, V, H> {
        LevelKeys {
            arena: &self.arena,
            current: self.arena.next(self.arena.head(), level),
            level,
        }
    }

    /// Checks every structural invariant.
    ///
    /// O(n · levels); meant for tests and diagnostics.
    pub(crate) fn verify(&self) -> Result<(), IntegrityError> {
        let max_level = self.config.max_level;
        // Number of nodes whose height is at least i.
        let mut spanning = vec![0usize; max_level + 2];

        for i in 0..=max_level {
            let mut count = 0;
            let mut prev: Option<&K> = None;
            let mut x = self.arena.next(self.arena.head(), i);

            while x.is_some() {
                let node = self.arena.node(x);
                let key = node.key().ok_or(IntegrityError::LevelGap { level: i })?;
                let height = node.height();

                if height > max_level {
                    return Err(IntegrityError::HeightOverflow { height, max_level });
                }
                if height < i {
                    return Err(IntegrityError::LevelGap { level: i });
                }
                if prev.is_some_and(|p| p >= key) {
                    return Err(IntegrityError::OutOfOrder { level: i });
                }
                if i == 0 {
                    spanning[..=height].iter_mut().for_each(|c| *c += 1);
                }

                prev = Some(key);
                count += 1;
                x = node.next(i);
            }

            if i == 0 && count != self.len {
                return Err(IntegrityError::LenMismatch {
                    expected: self.len,
                    actual: count,
                });
            }
            if count != spanning[i] {
                return Err(IntegrityError::LevelGap { level: i });
            }
        }

        let highest = (0..=max_level)
            .rev()
            .find(|&i| self.arena.next(self.arena.head(), i).is_some())
            .unwrap_or(0);
        if highest != self.level {
            return Err(IntegrityError::StaleLevel { level: self.level });
        }
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Rides `level` forward from `x` while the next key is below `key`.
    #[inline]
    fn advance(&self, mut x: H, level: usize, key: &K) -> H {
        loop {
            let next = self.arena.next(x, level);
            if next.is_none() || self.arena.key(next) >= key {
                return x;
            }
            x = next;
        }
    }

    /// Level-0 successor of `x` if it holds `key`.
    #[inline]
    fn matching(&self, x: H, key: &K) -> Option<H> {
        let candidate = self.arena.next(x, 0);
        (candidate.is_some() && self.arena.key(candidate) == key).then_some(candidate)
    }

    /// Read-only search, no trail.
    fn find(&self, key: &K) -> Option<H> {
        let mut x = self.arena.head();
        for i in (0..=self.level).rev() {
            x = self.advance(x, i, key);
        }
        self.matching(x, key)
    }

    /// Search that records the predecessor at each level `0..=self.level`.
    fn search(&self, key: &K, trail: &mut Trail<H>) -> Option<H> {
        let mut x = self.arena.head();
        for i in (0..=self.level).rev() {
            x = self.advance(x, i, key);
            trail[i] = x;
        }
        self.matching(x, key)
    }

    /// Drops the current level while its sentinel link is empty.
    fn shrink_level(&mut self) {
        let head = self.arena.head();
        let before = self.level;
        while self.level > 0 && self.arena.next(head, self.level).is_none() {
            self.level -= 1;
        }
        if self.level != before {
            debug!(from = before, to = self.level, "lowered current level");
        }
    }
}

/// Keys along one level, in increasing order.
pub(crate) struct LevelKeys<'a, K, V, H> {
    arena: &'a NodeArena<K, V, H>,
    current: H,
    level: usize,
}

impl<'a, K, V, H: Handle> Iterator for LevelKeys<'a, K, V, H> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let node = self.arena.node(self.current);
        self.current = node.next(self.level);
        node.key()
    }
}

/// One line per level, top level first: `level 1: 1 15`.
impl<K, V, R, H> fmt::Display for RawSkipList<K, V, R, H>
where
    K: Ord + fmt::Display,
    R: RngCore,
    H: Handle,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..=self.level).rev() {
            write!(f, "level {i}:")?;
            for key in self.level_keys(i) {
                write!(f, " {key}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
