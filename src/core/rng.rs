//! Seeded randomness.
//!
//! A game owns exactly one [`GameRng`]; shuffles and random input fallbacks
//! all draw from it in a fixed call order, so the seed plus the recorded
//! input answers describe a run completely (see [`crate::input`]).
//!
//! ```
//! use duelcore::core::GameRng;
//!
//! let mut deck: Vec<u8> = (0..16).collect();
//! GameRng::new(7).shuffle(&mut deck);
//!
//! let mut again: Vec<u8> = (0..16).collect();
//! GameRng::new(7).shuffle(&mut again);
//! assert_eq!(deck, again);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The game's random stream.
///
/// ChaCha8 keeps the stream platform-independent, and its block counter
/// makes a snapshot two integers rather than an opaque blob.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Seed a fresh stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The construction seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.stream);
    }

    /// Snapshot the stream position. Restoring through
    /// [`GameRng::from_state`] continues the sequence exactly where it
    /// stopped.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.stream.get_word_pos(),
        }
    }

    /// Rebuild a stream from a snapshot.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut stream = ChaCha8Rng::seed_from_u64(state.seed);
        stream.set_word_pos(state.word_pos);
        Self {
            stream,
            seed: state.seed,
        }
    }
}

/// A resumable position in the random stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}
