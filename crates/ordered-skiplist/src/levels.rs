use oorandom::Rand32;
use tracing::Level as LogLevel;


/// The number of slots in the head of every skiplist, and in the search path built by each
/// insertion or erasure. A skiplist's max level must be less than this.
pub const LEVEL_CAP: usize = 32;

/// The max level used when none is configured. Nodes have at most `DEFAULT_MAX_LEVEL + 1` links.
///
/// This is small, and is sized for around `2^4` entries at the default probability; skiplists
/// expected to hold many more entries should raise it to about `log_{1/p}(n)`.
pub const DEFAULT_MAX_LEVEL: usize = 4;

/// The probability, used when none is configured, that a node which reached some level also
/// reaches the next one.
pub const DEFAULT_LEVEL_PROBABILITY: f32 = 0.5;

/// Used only if the OS cannot provide a random seed.
const FALLBACK_SEED: u64 = 0x2545_f491_4f6c_dd1d;


/// A simple PRNG trait, used for generating random levels for nodes in a skiplist.
pub(crate) trait Prng {
    /// Produces a random `f32` in the range `[0, 1)`.
    ///
    /// (See [`oorandom::Rand32::rand_float`]; this function is the same interface.)
    #[must_use]
    fn rand_float(&mut self) -> f32;
}

impl Prng for Rand32 {
    #[inline]
    fn rand_float(&mut self) -> f32 {
        // Inherent impls take priority over traits, so this is the inherent method
        // of `Rand32` a.k.a. `Self`
        Self::rand_float(self)
    }
}

/// Return a random level in `0..=max_level`, in a geometric distribution: level `k` is reached
/// with probability `probability^k`.
///
/// Technically, `max_level` is more likely than it would be in an exact and unbounded
/// geometric distribution, since what would be higher levels are capped to `max_level`.
#[must_use]
pub(crate) fn random_level<P: Prng>(prng: &mut P, probability: f32, max_level: usize) -> usize {
    let mut level = 0;
    while level < max_level && prng.rand_float() < probability {
        level += 1;
    }
    level
}

/// Get a seed for a skiplist's PRNG from the OS.
#[must_use]
pub(crate) fn entropy_seed() -> u64 {
    match getrandom::u64() {
        Ok(seed) => seed,
        Err(err) => {
            tracing::event!(
                LogLevel::WARN,
                "could not get a random skiplist seed from the OS, using a fixed seed: {err}",
            );
            FALLBACK_SEED
        }
    }
}
