//! Thread-safe ordered map: a [`RawSkipList`] behind one reader/writer lock.
//!
//! Lookups and size queries share the lock; inserts, removals, and `clear`
//! hold it exclusively. There is no finer-grained locking: a write excludes
//! every reader for the duration of one splice or unlink, which keeps each
//! operation a plain sequential skip list algorithm.
//!
//! Values are returned by clone (or through [`SkipMap::get_with`]) since no
//! reference may outlive the read guard.

use core::fmt;

use parking_lot::RwLock;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_core::RngCore;

use crate::config::Config;
use crate::error::{ConfigError, IntegrityError};
use crate::handle::Handle;
use crate::raw::RawSkipList;

/// A concurrent ordered map backed by a skip list.
///
/// # Type Parameters
///
/// - `K`: key type, totally ordered
/// - `V`: value type
/// - `R`: random source for tower heights, defaults to [`SmallRng`]
/// - `H`: arena handle type, defaults to `u32` (about 4 billion nodes)
///
/// # Example
///
/// ```
/// use nexus_skipmap::SkipMap;
///
/// let map: SkipMap<u64, &str> = SkipMap::new();
/// map.insert(15, "fifteen");
/// map.insert(3, "three");
///
/// assert_eq!(map.get(&15), Some("fifteen"));
/// assert_eq!(map.get(&100), None);
/// assert!(map.delete(&3));
/// assert!(!map.delete(&3));
/// assert_eq!(map.len(), 1);
/// ```
///
/// Sharing across threads needs no wrapper beyond a reference or an `Arc`:
///
/// ```
/// use nexus_skipmap::SkipMap;
///
/// let map: SkipMap<u32, u32> = SkipMap::new();
/// std::thread::scope(|s| {
///     for t in 0..4 {
///         let map = &map;
///         s.spawn(move || {
///             for i in 0..100 {
///                 map.insert(t * 100 + i, i);
///             }
///         });
///     }
/// });
/// assert_eq!(map.len(), 400);
/// ```
pub struct SkipMap<K, V, R = SmallRng, H = u32> {
    inner: RwLock<RawSkipList<K, V, R, H>>,
}

impl<K: Ord, V> SkipMap<K, V> {
    /// Creates an empty map with the default [`Config`], seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Creates a map from `config`, seeded from the OS.
    ///
    /// Fails if the configuration is out of range.
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        Self::with_config_and_rng(config, SmallRng::from_os_rng())
    }
}

impl<K: Ord, V> Default for SkipMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R, H> SkipMap<K, V, R, H>
where
    K: Ord,
    R: RngCore,
    H: Handle,
{
    /// Creates an empty map with the default [`Config`] and the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            inner: RwLock::new(RawSkipList::new(Config::default(), rng)),
        }
    }

    /// Creates a map from `config` and a random source.
    ///
    /// Fails if the configuration is out of range. No map is built in that case.
    pub fn with_config_and_rng(config: Config, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: RwLock::new(RawSkipList::new(config, rng)),
        })
    }

    /// Returns the configuration this map was built with.
    pub fn config(&self) -> Config {
        *self.inner.read().config()
    }

    // ========================================================================
    // Reads (shared lock)
    // ========================================================================

    /// Returns a clone of the value for `key`, or `None` if absent.
    #[inline]
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Applies `f` to the value for `key` while holding the read lock.
    ///
    /// Useful when `V` is expensive to clone or not `Clone` at all.
    ///
    /// ```
    /// use nexus_skipmap::SkipMap;
    ///
    /// let map: SkipMap<u32, Vec<u8>> = SkipMap::new();
    /// map.insert(1, vec![1, 2, 3]);
    /// assert_eq!(map.get_with(&1, |v| v.len()), Some(3));
    /// assert_eq!(map.get_with(&2, |v| v.len()), None);
    /// ```
    #[inline]
    pub fn get_with<T, F>(&self, key: &K, f: F) -> Option<T>
    where
        F: FnOnce(&V) -> T,
    {
        self.inner.read().get(key).map(f)
    }

    /// Returns `true` if the map contains `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().get(key).is_some()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current level: the highest level holding any node.
    #[inline]
    pub fn level(&self) -> usize {
        self.inner.read().level()
    }

    /// Returns clones of the smallest key and its value.
    pub fn first(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .first()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Returns clones of the largest key and its value.
    pub fn last(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .last()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    // ========================================================================
    // Writes (exclusive lock)
    // ========================================================================

    /// Inserts `value` under `key`.
    ///
    /// If the key already exists its value is replaced in place and the old
    /// value is returned; the length does not change.
    #[inline]
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Removes `key`, returning its value, or `None` if absent.
    #[inline]
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    /// Removes `key`. Returns `false` if it was not present.
    ///
    /// The removed value is dropped after the lock is released.
    #[inline]
    pub fn delete(&self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Removes every entry. Nodes are kept in the pool for reuse.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Snapshot of the keys at each level, from level 0 up to the current level.
    ///
    /// ```
    /// use nexus_skipmap::SkipMap;
    ///
    /// let map: SkipMap<u32, ()> = SkipMap::new();
    /// for k in [5, 1, 3] {
    ///     map.insert(k, ());
    /// }
    /// let levels = map.levels();
    /// assert_eq!(levels[0], vec![1, 3, 5]);
    /// assert_eq!(levels.len(), map.level() + 1);
    /// ```
    pub fn levels(&self) -> Vec<Vec<K>>
    where
        K: Clone,
    {
        self.inner.read().levels()
    }

    /// Checks every structural invariant under the read lock.
    ///
    /// Walks all levels, so this is O(n · levels). Meant for tests and
    /// debugging, not for hot paths.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        self.inner.read().verify()
    }

    /// Number of recycled nodes waiting for reuse.
    pub fn pooled(&self) -> usize {
        self.inner.read().pooled()
    }

    /// Number of nodes ever allocated (live plus pooled).
    pub fn allocated(&self) -> usize {
        self.inner.read().allocated()
    }
}

impl<K, V, R, H> fmt::Debug for SkipMap<K, V, R, H>
where
    K: Ord,
    R: RngCore,
    H: Handle,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("SkipMap")
            .field("len", &inner.len())
            .field("level", &inner.level())
            .field("config", inner.config())
            .finish()
    }
}

/// Prints each level from the top down, e.g. `level 0: 1 5 15`.
impl<K, V, R, H> fmt::Display for SkipMap<K, V, R, H>
where
    K: Ord + fmt::Display,
    R: RngCore,
    H: Handle,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.read(), f)
    }
}
