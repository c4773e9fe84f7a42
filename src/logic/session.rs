//! Game sessions: committing a selection to a court (or the waiting queue) and
//! releasing a court when the game ends.

use crate::models::{
    Club, ClubError, CourtId, CourtStatus, Game, GameFormat, GameId, GameSettings, PlayerStatus,
    QueueKey, WaitingGame,
};
use chrono::Utc;

/// Put a game onto a specific court. The court must be free and unlocked; this
/// is checked again here so no caller can bypass the state machine.
fn place_on_court(club: &mut Club, court_id: CourtId, mut game: Game) -> Result<(), ClubError> {
    let court = club
        .court_mut(court_id)
        .ok_or(ClubError::CourtNotFound(court_id))?;
    if !court.is_allocatable() {
        return Err(ClubError::CourtNotAllocatable(court_id));
    }
    court.status = CourtStatus::Playing;
    game.court_id = Some(court_id);
    club.games.push(game);
    Ok(())
}

/// Commit the current selection as a game.
///
/// The first half of the selection becomes the first party, the rest the second.
/// The game lands on the lowest free unlocked court, or in the waiting queue when
/// every court is busy. All checks pass before anything is mutated; the selection
/// is cleared only on success.
pub fn start_game(club: &mut Club) -> Result<GameId, ClubError> {
    let needed = club.settings.player_number as usize;
    let selected = club.selected_players.clone();
    if selected.len() != needed {
        return Err(ClubError::NotEnoughPlayers {
            needed,
            available: selected.len(),
        });
    }
    for &id in &selected {
        let p = club.player(id).ok_or(ClubError::PlayerNotFound(id))?;
        if !p.is_available() {
            return Err(ClubError::PlayerNotAvailable(id));
        }
    }
    let court_id = club.next_available_court().map(|c| c.id);
    if court_id.is_none() {
        if club.waiting_queue_capacity == 0 {
            return Err(ClubError::NoCourtAvailable);
        }
        if club.waiting_queue.len() >= club.waiting_queue_capacity {
            return Err(ClubError::WaitingQueueFull {
                capacity: club.waiting_queue_capacity,
            });
        }
    }

    let split = needed / 2;
    let sequence = club.next_sequence_index();
    let game = Game::new(
        court_id,
        selected[..split].to_vec(),
        selected[split..].to_vec(),
        sequence,
    );
    let game_id = game.id;

    match court_id {
        Some(cid) => place_on_court(club, cid, game)?,
        None => club.waiting_queue.push_back(WaitingGame {
            game,
            player_ids: selected.clone(),
        }),
    }
    for &id in &selected {
        if let Some(p) = club.players.get_mut(&id) {
            p.status = PlayerStatus::Playing;
        }
    }
    club.selected_players.clear();
    Ok(game_id)
}

/// End the game on a court: requeue its players into the next round, resolve the
/// court (available, or unavailable if it was locked during play), then promote
/// the waiting-queue head onto the court if it ended up free.
pub fn end_game(club: &mut Club, court_id: CourtId) -> Result<(), ClubError> {
    if club.court(court_id).is_none() {
        return Err(ClubError::CourtNotFound(court_id));
    }
    let game_idx = club
        .games
        .iter()
        .position(|g| g.court_id == Some(court_id))
        .ok_or(ClubError::NoActiveGame(court_id))?;
    let released = club.games[game_idx].player_ids();

    // Compute every new key up front so a limit error leaves all state intact.
    let target_round = club.current_round() + 1;
    let base_position = club.count_in_round(target_round);
    let now = Utc::now();
    let mut requeued = Vec::with_capacity(released.len());
    for (i, &id) in released.iter().enumerate() {
        let key = QueueKey::new(target_round, now, base_position + i as u32)?;
        requeued.push((id, key));
    }

    club.games.remove(game_idx);
    for (id, key) in requeued {
        if let Some(p) = club.players.get_mut(&id) {
            p.status = PlayerStatus::Available;
            p.queue_key = key;
        }
    }

    let court = club
        .court_mut(court_id)
        .ok_or(ClubError::CourtNotFound(court_id))?;
    court.status = if court.locked {
        CourtStatus::Unavailable
    } else {
        CourtStatus::Available
    };
    let freed = court.status == CourtStatus::Available;

    // Court binding happens here, at promotion time, never at enqueue time.
    if freed {
        if let Some(entry) = club.waiting_queue.pop_front() {
            place_on_court(club, court_id, entry.game)?;
        }
    }
    Ok(())
}

/// Switch the club to a format preset. The pending selection is cleared since the
/// player count may have changed; games already running are unaffected.
pub fn configure_format(club: &mut Club, format: GameFormat) {
    club.settings = GameSettings::for_format(format);
    club.selected_players.clear();
}
