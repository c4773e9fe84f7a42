//! Game format policy: how many players per game and whether pairs apply.

use crate::models::club::ClubError;
use serde::{Deserialize, Serialize};

/// Match format for the club session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameFormat {
    /// 1v1, pairs not applicable.
    Single,
    /// 2v2, pairs optional (a pair plays alongside singles or not at all).
    #[default]
    Double,
    /// 2v2, pairs only: every selected player must bring their partner.
    PairedDouble,
}

/// Format policy: player count, suggestion window, pairing allowance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub format: GameFormat,
    /// Total players per game (both parties together).
    pub player_number: u32,
    /// How many of the `player_number` slots the suggester fills randomly.
    pub suggestion_size: u32,
    pub allow_pairs: bool,
}

impl GameSettings {
    /// Validated constructor: suggestion window must leave at least one locked-in slot.
    pub fn new(
        format: GameFormat,
        player_number: u32,
        suggestion_size: u32,
        allow_pairs: bool,
    ) -> Result<Self, ClubError> {
        if player_number == 0 || suggestion_size >= player_number {
            return Err(ClubError::InvalidSettings {
                player_number,
                suggestion_size,
            });
        }
        Ok(Self {
            format,
            player_number,
            suggestion_size,
            allow_pairs,
        })
    }

    /// Preset policy per format.
    pub fn for_format(format: GameFormat) -> Self {
        match format {
            GameFormat::Single => Self {
                format,
                player_number: 2,
                suggestion_size: 1,
                allow_pairs: false,
            },
            GameFormat::Double | GameFormat::PairedDouble => Self {
                format,
                player_number: 4,
                suggestion_size: 3,
                allow_pairs: true,
            },
        }
    }

    /// Leading slots filled strictly in fairness order (never randomized away).
    pub fn auto_selection_size(&self) -> usize {
        (self.player_number - self.suggestion_size) as usize
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::for_format(GameFormat::Double)
    }
}
