//! Rotation business logic: selection engine and game sessions.

mod selection;
mod session;

pub use selection::{
    auto_suggest, locked_in_head, toggle_player_selection, MAX_SUGGESTION_ATTEMPTS,
};
pub use session::{configure_format, end_game, start_game};
