//! Players: identity, the roster map, and per-player engine state.
//!
//! A [`Player`] holds exactly what the engine itself needs to know about a
//! seat: life, granted skill tags, free-form counter tags, and handles to
//! the zones the seat owns. What a skill *does* lives in content handlers;
//! here a skill is only a tag that is present or not.
//!
//! [`PlayerMap`] is the roster container: one slot per seat, indexed by
//! [`PlayerId`], with iteration in seat order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::handlers::SkillId;
use crate::zones::ZoneId;

/// A seat at the table. Seats are numbered from zero in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Wrap a raw seat number.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// The seat number as an index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Handles to the zones a player owns.
///
/// Created by the game at construction; the card contents live in the
/// [`crate::zones::ZoneManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerZones {
    /// Private hand.
    pub hand: ZoneId,
    /// Cards shown face-up but still held.
    pub shown: ZoneId,
    /// Worn equipment.
    pub equips: ZoneId,
    /// Delayed-effect cards pending a fatetell.
    pub fatetell: ZoneId,
}

impl PlayerZones {
    /// All four handles in a fixed order.
    #[must_use]
    pub fn all(&self) -> [ZoneId; 4] {
        [self.hand, self.shown, self.equips, self.fatetell]
    }
}

/// Engine-level player state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    /// Current life. May go below zero; the game mode decides what that
    /// means.
    pub life: i32,
    /// Upper bound enforced by healing.
    pub max_life: i32,
    skills: Vec<SkillId>,
    /// Free-form counters for rule bookkeeping. The engine maintains
    /// `turn_count` (bumped when the player's turn applies) so content can
    /// express once-per-turn guards as `tag(x) < tag("turn_count")`.
    pub tags: FxHashMap<String, i64>,
    zones: PlayerZones,
}

impl Player {
    pub(crate) fn new(id: PlayerId, max_life: i32, zones: PlayerZones) -> Self {
        Self {
            id,
            life: max_life,
            max_life,
            skills: Vec::new(),
            tags: FxHashMap::default(),
            zones,
        }
    }

    /// This player's ID.
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Zone handles owned by this player.
    #[must_use]
    pub fn zones(&self) -> PlayerZones {
        self.zones
    }

    /// Players at zero or less life are out of the game for turn-taking
    /// purposes; the game mode decides the final result.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Whether the player currently has `skill`.
    #[must_use]
    pub fn has_skill(&self, skill: SkillId) -> bool {
        self.skills.contains(&skill)
    }

    /// Grant `skill`. Granting an already-held skill is a no-op.
    pub fn grant_skill(&mut self, skill: SkillId) {
        if !self.skills.contains(&skill) {
            self.skills.push(skill);
        }
    }

    /// Revoke `skill`. Revoking an absent skill is a no-op.
    pub fn revoke_skill(&mut self, skill: SkillId) {
        self.skills.retain(|&s| s != skill);
    }

    /// Granted skills in grant order.
    #[must_use]
    pub fn skills(&self) -> &[SkillId] {
        &self.skills
    }

    /// Read a tag, defaulting to 0.
    #[must_use]
    pub fn tag(&self, name: &str) -> i64 {
        self.tags.get(name).copied().unwrap_or(0)
    }

    /// Set a tag.
    pub fn set_tag(&mut self, name: &str, value: i64) {
        self.tags.insert(name.to_owned(), value);
    }

    /// Add `delta` to a tag, treating a missing tag as 0.
    pub fn add_tag(&mut self, name: &str, delta: i64) {
        *self.tags.entry(name.to_owned()).or_insert(0) += delta;
    }
}

/// One slot of data per seat, indexed by [`PlayerId`].
///
/// ```
/// use duelcore::core::{PlayerId, PlayerMap};
///
/// let mut struck: PlayerMap<bool> = PlayerMap::new(3, |_| false);
/// struck[PlayerId::new(2)] = true;
///
/// assert!(!struck[PlayerId::new(0)]);
/// assert!(struck[PlayerId::new(2)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build a map by calling `seat` once per player, in seat order.
    pub fn new(player_count: usize, seat: impl Fn(PlayerId) -> T) -> Self {
        assert!(
            (1..=255).contains(&player_count),
            "a game seats 1 to 255 players, not {player_count}"
        );
        Self {
            seats: (0..player_count)
                .map(|i| seat(PlayerId::new(i as u8)))
                .collect(),
        }
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// Borrow one seat's slot.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }

    /// Mutably borrow one seat's slot.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }

    /// Iterate `(PlayerId, &T)` in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, slot)| (PlayerId::new(i as u8), slot))
    }

    /// Iterate the seat IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.seats.len() as u8).map(PlayerId::new)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
