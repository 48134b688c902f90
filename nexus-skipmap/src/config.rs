//! Construction-time tuning for a skip map.

use crate::error::ConfigError;

/// Largest `max_level` a map accepts.
///
/// Node heights are stored in a `u8` and search trails live on the stack,
/// sized by this bound.
pub const MAX_SUPPORTED_LEVEL: usize = 64;

/// Default maximum level (the sentinel spans levels `0..=32`).
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// Default promotion probability. Each level holds about a quarter of the
/// nodes of the level below it.
pub const DEFAULT_PROMOTION_PROBABILITY: f64 = 0.25;

/// Skip map tuning.
///
/// - `max_level` bounds node height and the sentinel's fan-out. Larger values
///   only matter for very large maps; memory per node depends on the node's own
///   height, not on this bound.
/// - `promotion_probability` is the chance a node reaches the next level up.
///   Lower values mean shorter towers and fewer links, higher values mean a
///   denser express lane and more links per node.
///
/// # Example
///
/// ```
/// use nexus_skipmap::Config;
///
/// let config = Config::default()
///     .with_max_level(16)
///     .with_promotion_probability(0.5);
/// assert!(config.validate().is_ok());
///
/// let bad = Config::default().with_promotion_probability(1.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Highest level index a node may reach.
    pub max_level: usize,
    /// Success probability of the geometric height distribution, in `(0, 1)`.
    pub promotion_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            promotion_probability: DEFAULT_PROMOTION_PROBABILITY,
        }
    }
}

impl Config {
    /// Sets the maximum level.
    #[inline]
    pub const fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Sets the promotion probability.
    #[inline]
    pub const fn with_promotion_probability(mut self, p: f64) -> Self {
        self.promotion_probability = p;
        self
    }

    /// Checks both tunables.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.promotion_probability;
        // NaN fails both comparisons.
        if !(p > 0.0 && p < 1.0) {
            return Err(ConfigError::InvalidPromotionProbability(p));
        }
        if self.max_level == 0 || self.max_level > MAX_SUPPORTED_LEVEL {
            return Err(ConfigError::InvalidMaxLevel {
                max_level: self.max_level,
                limit: MAX_SUPPORTED_LEVEL,
            });
        }
        Ok(())
    }
}
