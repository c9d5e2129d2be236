//! Player identification and per-player counters.
//!
//! ## PlayerId
//!
//! Seat index of a player, `0..num_players`. The engine never checks
//! credentials; any in-range id submitted by the transport is trusted.
//!
//! ## PlayerMap
//!
//! Dense per-player storage backed by `Vec`, indexed by `PlayerId`.
//! Used for per-turn and per-phase move statistics.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Largest supported player count.
pub const MAX_PLAYERS: usize = 255;

/// Seat of a player at the table.
///
/// Player indices are 0-based: the first seat is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check whether this seat exists in a game with `num_players` players.
    #[must_use]
    pub const fn is_seated(self, num_players: usize) -> bool {
        self.index() < num_players
    }

    /// Iterate over all seats for a game with `num_players` players.
    ///
    /// ```
    /// use turn_engine::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(num_players: usize) -> impl Iterator<Item = PlayerId> {
        (0..num_players.min(MAX_PLAYERS) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data with O(1) access.
///
/// ```
/// use turn_engine::core::{PlayerId, PlayerMap};
///
/// let mut moves: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// moves[PlayerId::new(1)] += 1;
/// assert_eq!(moves[PlayerId::new(1)], 1);
/// assert_eq!(moves.get(PlayerId::new(7)), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with one value per seat from a factory function.
    pub fn new(num_players: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::all(num_players).map(factory).collect(),
        }
    }

    /// Create a map with every seat set to the same value.
    pub fn with_value(num_players: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(num_players, |_| value.clone())
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Value for a seat, `None` when the seat does not exist.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Mutable value for a seat, `None` when the seat does not exist.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over `(PlayerId, &T)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
