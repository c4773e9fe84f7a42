//! Selection engine: builds the next game's player set under fairness and
//! pairing constraints.
//!
//! The fairness-ordered head of the queue is locked in; the remaining slots are
//! filled by bounded rejection sampling over the rest of the available pool.

use crate::models::{Club, ClubError, GameFormat, PlayerId};
use rand::seq::SliceRandom;

/// Bound for the randomized completion loop. Exceeding it reports
/// `SelectionExhausted` and leaves the previous selection untouched.
pub const MAX_SUGGESTION_ATTEMPTS: u32 = 10;

/// The partner a selection must drag along: the player's partner, but only while
/// that partner is actually available. An absent partner never blocks selection.
fn available_partner(club: &Club, id: PlayerId) -> Option<PlayerId> {
    if !club.settings.allow_pairs {
        return None;
    }
    let partner = club.lookup_partner(id)?;
    partner.is_available().then_some(partner.id)
}

/// The locked-in head: the first `auto_selection_size` players in fairness order.
/// Each head player drags an available partner in with them, so a paired head
/// may exceed the nominal count by one.
pub fn locked_in_head(club: &Club) -> Vec<PlayerId> {
    let target = club.settings.auto_selection_size();
    let mut head: Vec<PlayerId> = Vec::new();
    for p in club.list_available() {
        if head.len() >= target {
            break;
        }
        if head.contains(&p.id) {
            continue;
        }
        head.push(p.id);
        if let Some(partner) = available_partner(club, p.id) {
            if !head.contains(&partner) {
                head.push(partner);
            }
        }
    }
    head
}

/// Valid counts of paired players (both members selected) in a full selection.
/// A double normally seats at most one pair; once the locked-in head is itself a
/// pair, one or two pairs are valid instead. Paired doubles seat pairs only.
fn valid_paired_counts(format: GameFormat, head_has_pair: bool) -> &'static [usize] {
    match (format, head_has_pair) {
        (GameFormat::Single, false) => &[0],
        (GameFormat::Single, true) => &[2],
        (GameFormat::Double, false) => &[0, 2],
        (GameFormat::Double, true) => &[2, 4],
        (GameFormat::PairedDouble, _) => &[4],
    }
}

/// Full-selection validity: correct size, no available partner excluded, and a
/// paired/single shape the format allows. With pairs disabled only size matters.
fn selection_is_valid(club: &Club, candidate: &[PlayerId], head_has_pair: bool) -> bool {
    if candidate.len() != club.settings.player_number as usize {
        return false;
    }
    if !club.settings.allow_pairs {
        return true;
    }
    let mut paired = 0usize;
    for &id in candidate {
        if let Some(partner) = available_partner(club, id) {
            if !candidate.contains(&partner) {
                return false;
            }
            paired += 1;
        }
    }
    valid_paired_counts(club.settings.format, head_has_pair).contains(&paired)
}

/// Build a full suggested selection: locked-in head plus random completion.
///
/// Draws the open slots from the non-locked available pool and commits the first
/// of up to `MAX_SUGGESTION_ATTEMPTS` candidates whose shape is valid. On
/// exhaustion the previous selection is left unchanged.
pub fn auto_suggest(club: &mut Club) -> Result<(), ClubError> {
    let needed = club.settings.player_number as usize;
    let head = locked_in_head(club);
    let (pool, available_count) = {
        let available = club.list_available();
        let pool: Vec<PlayerId> = available
            .iter()
            .map(|p| p.id)
            .filter(|id| !head.contains(id))
            .collect();
        (pool, available.len())
    };
    if available_count < needed {
        return Err(ClubError::NotEnoughPlayers {
            needed,
            available: available_count,
        });
    }
    let head_has_pair = head
        .iter()
        .any(|&id| available_partner(club, id).is_some_and(|p| head.contains(&p)));

    let mut rng = rand::thread_rng();
    for _ in 0..MAX_SUGGESTION_ATTEMPTS {
        let mut candidate = head.clone();
        // A dragged-in partner can overfill the head; the oversized candidate
        // then fails validation below rather than drawing a negative count.
        let open_slots = needed.saturating_sub(head.len());
        candidate.extend(pool.choose_multiple(&mut rng, open_slots).copied());
        if selection_is_valid(club, &candidate, head_has_pair) {
            club.selected_players = candidate;
            return Ok(());
        }
    }
    Err(ClubError::SelectionExhausted {
        attempts: MAX_SUGGESTION_ATTEMPTS,
    })
}

/// Manually toggle one player in or out of the selection. Pairs move as a unit;
/// the locked-in head is immutable this way. The next state is computed in full
/// before committing, so a failed toggle changes nothing.
pub fn toggle_player_selection(club: &mut Club, id: PlayerId) -> Result<(), ClubError> {
    let player = club.player(id).ok_or(ClubError::PlayerNotFound(id))?;
    if !player.is_available() {
        return Err(ClubError::PlayerNotAvailable(id));
    }
    let head = locked_in_head(club);
    if head.contains(&id) {
        return Err(ClubError::SelectionLocked(id));
    }

    // Working copy: locked head first, then surviving previous picks.
    let capacity = club.settings.player_number as usize;
    let mut selection = head;
    for &prev in &club.selected_players {
        if selection.len() >= capacity {
            break;
        }
        if selection.contains(&prev) {
            continue;
        }
        if club.player(prev).is_some_and(|p| p.is_available()) {
            selection.push(prev);
        }
    }

    let mut unit = vec![id];
    if let Some(partner) = available_partner(club, id) {
        unit.push(partner);
    }

    if selection.contains(&id) {
        selection.retain(|pid| !unit.contains(pid));
    } else {
        let adding = unit.iter().filter(|&pid| !selection.contains(pid)).count();
        if selection.len() + adding > capacity {
            return Err(ClubError::SelectionFull {
                capacity: club.settings.player_number,
            });
        }
        for pid in unit {
            if !selection.contains(&pid) {
                selection.push(pid);
            }
        }
    }

    club.selected_players = selection;
    Ok(())
}
