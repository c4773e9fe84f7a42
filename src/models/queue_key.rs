//! Fairness queue key: sortable token encoding (round, time, position in round).

use crate::models::club::ClubError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sortable fairness token. The string is `RRR` (round, 3 digits) + 13-digit Unix
/// epoch milliseconds + `PPP` (position in round, 3 digits), all zero-padded, so
/// lexicographic order equals fairness order: earlier round, then earlier time,
/// then earlier position sorts first.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct QueueKey(String);

impl QueueKey {
    /// Highest representable round index; exceeding it is an error, never truncation.
    pub const MAX_ROUND: u32 = 999;
    /// Highest representable position within a round.
    pub const MAX_POSITION: u32 = 999;

    /// Build a key for a player entering `round` at `position`, timestamped `issued_at`.
    pub fn new(round: u32, issued_at: DateTime<Utc>, position: u32) -> Result<Self, ClubError> {
        if round > Self::MAX_ROUND {
            return Err(ClubError::RoundLimitExceeded(round));
        }
        if position > Self::MAX_POSITION {
            return Err(ClubError::PositionLimitExceeded(position));
        }
        let millis = issued_at.timestamp_millis().max(0);
        Ok(QueueKey(format!("{round:03}{millis:013}{position:03}")))
    }

    /// Round index encoded in this key.
    pub fn round(&self) -> u32 {
        self.0[..3].parse().unwrap_or(0)
    }

    /// The whole token as a pure ordinal (19 decimal digits fits comfortably in u128).
    pub fn ordinal(&self) -> u128 {
        self.0.parse().unwrap_or(0)
    }

    /// Token text (for display/debugging; callers should treat it as opaque).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
