//! Voluntary partnerships: two players who are always selected together.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pair.
pub type PairId = Uuid;

/// A standing agreement between exactly two players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerPair {
    pub id: PairId,
    pub player_ids: [PlayerId; 2],
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl PlayerPair {
    pub fn new(a: PlayerId, b: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_ids: [a, b],
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the given player is one of the two members.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.player_ids.contains(&id)
    }
}
