//! Deterministic random number generation for moves and hooks.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Snapshot-based**: The generator lives in `Context` as a
//!   [`GameRngState`]; each move or hook receives a live [`GameRng`] rebuilt
//!   from the snapshot and the advanced state is written back afterwards.
//! - **O(1) capture**: ChaCha8 word position instead of replaying history
//!
//! ## Usage
//!
//! ```
//! use turn_engine::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.d6();
//! assert!((1..=6).contains(&roll));
//!
//! // Replaying from a snapshot yields the same values
//! let snapshot = rng.state();
//! let a = rng.die(20);
//! let b = GameRng::from_state(&snapshot).die(20);
//! assert_eq!(a, b);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG handed to moves and hooks.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a die with `sides` faces, returning a value in `1..=sides`.
    ///
    /// A zero-sided die always rolls 0.
    pub fn die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.inner.gen_range(1..=sides)
    }

    /// Roll a six-sided die.
    pub fn d6(&mut self) -> u32 {
        self.die(6)
    }

    /// Uniform number in `[0, 1)`.
    pub fn number(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Return a shuffled copy of `items`.
    #[must_use]
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        self.shuffle(&mut out);
        out
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Get the current state for storage in `Context`.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state stored in `Context::random`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl GameRngState {
    /// Fresh state for a seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        GameRng::new(seed).state()
    }
}
