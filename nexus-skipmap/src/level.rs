//! Random tower heights for new nodes.
//!
//! Heights follow a geometric distribution. Rather than flipping a coin per
//! level, one uniform sample is inverted directly:
//!
//! ```text
//! height = min(max_level, ceil(ln(1 - u) / ln(p)))      u ∈ [0, 1)
//! ```
//!
//! `P(height > k) = p^k`, so each level holds roughly a `p` fraction of the
//! nodes of the level below, and expected search cost is O(log n).

use rand_core::RngCore;

use crate::config::Config;
use crate::error::ConfigError;

/// 2^-53, the spacing of the 53-bit uniform grid in `[0, 1)`.
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// Draws node heights from an injected random source.
///
/// The source is any [`RngCore`], so tests can feed scripted samples to force
/// particular heights.
///
/// # Example
///
/// ```
/// use nexus_skipmap::{Config, LevelSelector};
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let rng = SmallRng::seed_from_u64(7);
/// let mut selector = LevelSelector::new(rng, &Config::default()).unwrap();
/// assert!(selector.next_height() <= 32);
///
/// let rng = SmallRng::seed_from_u64(7);
/// let bad = Config::default().with_promotion_probability(0.0);
/// assert!(LevelSelector::new(rng, &bad).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct LevelSelector<R> {
    rng: R,
    /// `ln(p)`, negative for every valid `p`.
    ln_p: f64,
    max_level: usize,
}

impl<R: RngCore> LevelSelector<R> {
    /// Creates a selector, rejecting configurations outside the valid range.
    pub fn new(rng: R, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(rng, config))
    }

    /// Builds a selector from a configuration that already passed validation.
    pub(crate) fn from_valid(rng: R, config: &Config) -> Self {
        debug_assert!(config.validate().is_ok());
        Self {
            rng,
            ln_p: config.promotion_probability.ln(),
            max_level: config.max_level,
        }
    }

    /// Returns the highest height this selector produces.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Draws the height for a new node, in `0..=max_level`.
    #[inline]
    pub fn next_height(&mut self) -> usize {
        let u = unit_sample(self.rng.next_u64());
        // u in [0, 1) keeps the ratio finite and non-negative; u == 0 gives -0.0.
        let height = ((1.0 - u).ln() / self.ln_p).ceil();
        (height as usize).min(self.max_level)
    }
}

/// Maps 64 random bits to a uniform float in `[0, 1)` using the top 53 bits.
#[inline]
fn unit_sample(bits: u64) -> f64 {
    (bits >> 11) as f64 * UNIT_SCALE
}


#[cfg(test)]
mod tests {
    use super::scripted::{ScriptedRng, bits_for_height};
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn selector(p: f64, max_level: usize, rng: ScriptedRng) -> LevelSelector<ScriptedRng> {
        let config = Config::default()
            .with_promotion_probability(p)
            .with_max_level(max_level);
        LevelSelector::new(rng, &config).unwrap()
    }

    #[test]
    fn rejects_invalid_probability() {
        for p in [0.0, 1.0, -1.0, 2.0, f64::NAN] {
            let config = Config::default().with_promotion_probability(p);
            let rng = SmallRng::seed_from_u64(1);
            assert!(LevelSelector::new(rng, &config).is_err());
        }
    }

    #[test]
    fn zero_sample_gives_height_zero() {
        let mut sel = selector(0.25, 32, ScriptedRng::new(vec![0]));
        assert_eq!(sel.next_height(), 0);
    }

    #[test]
    fn scripted_heights_are_exact() {
        let heights = [1, 2, 3, 5, 8, 0, 13];
        let mut sel = selector(0.25, 32, ScriptedRng::heights(0.25, &heights));
        for &expected in &heights {
            assert_eq!(sel.next_height(), expected);
        }

        let mut sel = selector(0.5, 32, ScriptedRng::heights(0.5, &heights));
        for &expected in &heights {
            assert_eq!(sel.next_height(), expected);
        }
    }

    #[test]
    fn clamps_to_max_level() {
        let mut sel = selector(0.5, 4, ScriptedRng::heights(0.5, &[20]));
        assert_eq!(sel.next_height(), 4);

        // Largest possible sample still yields a finite, clamped height.
        let mut sel = selector(0.9, 8, ScriptedRng::new(vec![u64::MAX]));
        assert_eq!(sel.next_height(), 8);
    }

    #[test]
    fn bits_for_height_zero_is_zero() {
        assert_eq!(bits_for_height(0.25, 0), 0);
    }

    #[test]
    fn distribution_is_geometric() {
        const SAMPLES: usize = 200_000;
        let p = 0.25;
        let config = Config::default().with_promotion_probability(p);
        let mut sel = LevelSelector::new(SmallRng::seed_from_u64(0xDEAD_BEEF), &config).unwrap();

        let mut counts = [0usize; 33];
        for _ in 0..SAMPLES {
            counts[sel.next_height()] += 1;
        }

        // P(height > k) = p^k.
        for k in 1..=3 {
            let above: usize = counts[k + 1..].iter().sum();
            let observed = above as f64 / SAMPLES as f64;
            let expected = p.powi(k as i32);
            assert!(
                (observed - expected).abs() < 0.01,
                "P(h > {k}) = {observed}, expected {expected}"
            );
        }
        assert!(counts[1] > counts[2] && counts[2] > counts[3]);
    }
}
