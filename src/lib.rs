//! Court rotation web app: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    auto_suggest, configure_format, end_game, locked_in_head, start_game,
    toggle_player_selection, MAX_SUGGESTION_ATTEMPTS,
};
pub use models::{
    Club, ClubError, ClubId, Court, CourtId, CourtStatus, Game, GameFormat, GameId, GameSettings,
    PairId, Party, Player, PlayerId, PlayerPair, PlayerStatus, QueueKey, WaitingGame,
    DEFAULT_WAITING_QUEUE_CAPACITY,
};
