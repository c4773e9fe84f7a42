//! Player data structure and status.

use crate::models::queue_key::QueueKey;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in games, pairs, and lookups).
pub type PlayerId = Uuid;

/// Where a player currently is in the rotation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// In the fairness queue, selectable for the next game.
    #[default]
    Available,
    /// On court, or committed to a game waiting for a court.
    Playing,
    /// Present but sitting out; not selectable.
    Unavailable,
    /// Soft-deleted. Kept so game back-references stay resolvable.
    Retired,
}

/// A club member in the rotation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub status: PlayerStatus,
    /// Fairness ordering token; smaller sorts earlier (waited longer).
    pub queue_key: QueueKey,
    /// Standing partner, if this player belongs to a pair. Always symmetric.
    pub partner_id: Option<PlayerId>,
}

impl Player {
    /// Create a new available player with the given name and queue key.
    pub fn new(name: impl Into<String>, queue_key: QueueKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: PlayerStatus::Available,
            queue_key,
            partner_id: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == PlayerStatus::Available
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlayerStatus::Playing
    }
}
