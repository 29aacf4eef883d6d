use crate::{
    error::{Result, SkiplistError},
    levels::{DEFAULT_LEVEL_PROBABILITY, DEFAULT_MAX_LEVEL, LEVEL_CAP},
};


/// Construction-time settings of a [`Skiplist`].
///
/// [`Skiplist`]: crate::Skiplist
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkiplistConfig {
    /// The probability that a new node which reached some level also reaches the next one.
    /// Must be strictly between `0` and `1`. Can be changed later with
    /// [`Skiplist::set_level_probability`].
    ///
    /// [`Skiplist::set_level_probability`]: crate::Skiplist::set_level_probability
    pub level_probability: f32,
    /// The highest level any node may reach. Must be less than [`LEVEL_CAP`].
    pub max_level:         usize,
    /// Seed for the skiplist's PRNG. If `None`, a seed is requested from the OS.
    pub seed:              Option<u64>,
}

impl SkiplistConfig {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level_probability: DEFAULT_LEVEL_PROBABILITY,
            max_level:         DEFAULT_MAX_LEVEL,
            seed:              None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_level_probability(mut self, level_probability: f32) -> Self {
        self.level_probability = level_probability;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the level probability is in `(0, 1)` and that the max level is less than
    /// [`LEVEL_CAP`].
    pub fn validate(&self) -> Result<()> {
        validate_probability(self.level_probability)?;

        if self.max_level >= LEVEL_CAP {
            return Err(SkiplistError::InvalidMaxLevel {
                max_level: self.max_level,
                cap:       LEVEL_CAP,
            });
        }

        Ok(())
    }
}

impl Default for SkiplistConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// `0` would keep every node at level 0, and `1` or more would send every node to the max level.
/// NaN is rejected as well.
pub(crate) fn validate_probability(probability: f32) -> Result<()> {
    if 0.0 < probability && probability < 1.0 {
        Ok(())
    } else {
        Err(SkiplistError::InvalidProbability(probability))
    }
}
