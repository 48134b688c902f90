//! Error types for configuration and integrity checks.
//!
//! Lookups and removals never fail: absence is reported as `None` or `false`.
//! The only fallible paths are building a map from a [`Config`](crate::Config)
//! and the structural self-check [`SkipMap::verify`](crate::SkipMap::verify).

use thiserror::Error;

/// Rejected map configuration.
///
/// Returned by the fallible constructors before any structure is built.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Promotion probability is not strictly between 0 and 1.
    #[error("promotion probability must be in (0, 1), got {0}")]
    InvalidPromotionProbability(f64),
    /// Maximum level is zero or above the supported limit.
    #[error("max level must be in 1..={limit}, got {max_level}")]
    InvalidMaxLevel {
        /// The requested maximum level.
        max_level: usize,
        /// Largest supported maximum level.
        limit: usize,
    },
}

/// A broken structural invariant found by [`SkipMap::verify`](crate::SkipMap::verify).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// Keys along a level are not strictly increasing.
    #[error("keys out of order at level {level}")]
    OutOfOrder {
        /// Offending level.
        level: usize,
    },
    /// A node is linked above its height, or missing from a level it spans.
    #[error("level participation gap at level {level}")]
    LevelGap {
        /// Offending level.
        level: usize,
    },
    /// Level 0 node count disagrees with the maintained length.
    #[error("length mismatch: recorded {expected}, found {actual} nodes")]
    LenMismatch {
        /// Maintained length.
        expected: usize,
        /// Nodes reachable at level 0.
        actual: usize,
    },
    /// The current level is not the highest populated level.
    #[error("current level {level} does not match the highest populated level")]
    StaleLevel {
        /// Recorded current level.
        level: usize,
    },
    /// A node height exceeds the configured maximum.
    #[error("node height {height} exceeds max level {max_level}")]
    HeightOverflow {
        /// Offending height.
        height: usize,
        /// Configured maximum level.
        max_level: usize,
    },
}
