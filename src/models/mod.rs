//! Data structures for the rotation: players, pairs, courts, games, club state.

mod club;
mod court;
mod game;
mod pair;
mod player;
mod queue_key;
mod settings;

pub use club::{Club, ClubError, ClubId, WaitingGame, DEFAULT_WAITING_QUEUE_CAPACITY};
pub use court::{Court, CourtId, CourtStatus};
pub use game::{Game, GameId, Party};
pub use pair::{PairId, PlayerPair};
pub use player::{Player, PlayerId, PlayerStatus};
pub use queue_key::QueueKey;
pub use settings::{GameFormat, GameSettings};
