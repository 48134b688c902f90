//! Concurrent ordered map built on an arena-backed skip list.
//!
//! [`SkipMap`] keeps keys in sorted order with O(log n) expected lookup,
//! insert, and removal, and can be shared between threads by reference.
//!
//! # Design
//!
//! Nodes do not point at each other. They live in an arena and link through
//! [`Handle`]s (plain integer slot numbers), with slot 0 reserved for the
//! sentinel head:
//!
//! ```text
//! Arena (Vec of slots)   - owns keys, values, and forward links
//! Free stack             - recycled slots, reused LIFO on insert
//! RwLock                 - one lock around the whole structure
//! ```
//!
//! Benefits:
//! - **No aliasing**: forward links are indices, so splicing is safe Rust
//! - **No allocation churn**: removed nodes go back to the free stack with
//!   their link storage intact
//! - **Readers don't block readers**: lookups take the shared lock
//!
//! Writers take the lock exclusively. There is no per-node locking; for
//! read-mostly workloads this is simple and fast, but writes never run in
//! parallel.
//!
//! # Quick Start
//!
//! ```
//! use nexus_skipmap::SkipMap;
//!
//! let map: SkipMap<u64, String> = SkipMap::new();
//!
//! map.insert(1, "one".into());
//! map.insert(25, "twenty-five".into());
//! map.insert(15, "fifteen".into());
//!
//! assert_eq!(map.get(&15), Some("fifteen".to_string()));
//! assert!(map.delete(&25));
//! assert_eq!(map.len(), 2);
//! ```
//!
//! # Tuning
//!
//! Tower heights are geometric with promotion probability `p` (default 0.25)
//! and capped at `max_level` (default 32). Both are per-map [`Config`] fields:
//!
//! ```
//! use nexus_skipmap::{Config, SkipMap};
//!
//! let config = Config::default().with_promotion_probability(0.5).with_max_level(16);
//! let map: SkipMap<u32, u32> = SkipMap::with_config(config).unwrap();
//! assert_eq!(map.config().max_level, 16);
//!
//! // Out-of-range tunables are rejected, never clamped.
//! let bad = Config::default().with_promotion_probability(1.0);
//! assert!(SkipMap::<u32, u32>::with_config(bad).is_err());
//! ```
//!
//! # Deterministic Heights
//!
//! The random source is a type parameter. Seed one for reproducible layouts:
//!
//! ```
//! use nexus_skipmap::SkipMap;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let a: SkipMap<u32, ()> = SkipMap::with_rng(SmallRng::seed_from_u64(42));
//! let b: SkipMap<u32, ()> = SkipMap::with_rng(SmallRng::seed_from_u64(42));
//! for k in 0..100 {
//!     a.insert(k, ());
//!     b.insert(k, ());
//! }
//! assert_eq!(a.levels(), b.levels());
//! ```
//!
//! # Logging
//!
//! Events are emitted through `tracing`: level changes and `clear` at
//! `debug`, per-operation detail at `trace`. The crate never installs a
//! subscriber.
//!
//! # Feature Flags
//!
//! - `demo` - builds the `skipmap_demo` binary

#![warn(missing_docs)]

mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod level;
pub mod map;
mod raw;

pub use config::{Config, DEFAULT_MAX_LEVEL, DEFAULT_PROMOTION_PROBABILITY, MAX_SUPPORTED_LEVEL};
pub use error::{ConfigError, IntegrityError};
pub use handle::Handle;
pub use level::LevelSelector;
pub use map::SkipMap;
