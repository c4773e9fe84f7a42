//! Game and Party: one match between two sides of the selected players.

use crate::models::court::CourtId;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a game.
pub type GameId = Uuid;

/// One side of a game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub player_ids: Vec<PlayerId>,
    pub score: u32,
}

impl Party {
    pub fn new(player_ids: Vec<PlayerId>) -> Self {
        Self {
            player_ids,
            score: 0,
        }
    }
}

/// An active game. `court_id` is `None` while the game sits in the waiting queue
/// and is bound when a court frees up.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub court_id: Option<CourtId>,
    pub first_party: Party,
    pub second_party: Party,
    /// Club-wide monotonically increasing game counter.
    pub sequence_index: u32,
    pub started_at: DateTime<Utc>,
}

impl Game {
    pub fn new(
        court_id: Option<CourtId>,
        first_party: Vec<PlayerId>,
        second_party: Vec<PlayerId>,
        sequence_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            court_id,
            first_party: Party::new(first_party),
            second_party: Party::new(second_party),
            sequence_index,
            started_at: Utc::now(),
        }
    }

    /// All participating player ids, first party then second.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.first_party
            .player_ids
            .iter()
            .chain(self.second_party.player_ids.iter())
            .copied()
            .collect()
    }
}
