//! Court data structure and its small state machine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a court.
pub type CourtId = Uuid;

/// Allocation state of a court.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtStatus {
    /// Free and allocatable (unless locked).
    #[default]
    Available,
    /// Hosting an active game.
    Playing,
    /// Out of rotation (locked, or otherwise withheld).
    Unavailable,
}

/// One court of the fixed pool. Courts are provisioned once at setup and only
/// toggle status/lock afterwards; they are never created or destroyed mid-session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    /// Allocation preference: lowest index is handed out first.
    pub display_index: u32,
    pub status: CourtStatus,
    pub locked: bool,
}

impl Court {
    pub fn new(name: impl Into<String>, display_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            display_index,
            status: CourtStatus::Available,
            locked: false,
        }
    }

    /// A court can receive a game only when free and not locked.
    pub fn is_allocatable(&self) -> bool {
        self.status == CourtStatus::Available && !self.locked
    }
}
