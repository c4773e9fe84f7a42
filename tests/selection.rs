//! Integration tests for the selection engine: locked-in head, pairing shapes,
//! manual toggles, and the bounded suggestion loop.

use court_rotation_web::{
    auto_suggest, locked_in_head, toggle_player_selection, Club, ClubError, GameFormat,
    GameSettings, PlayerId, MAX_SUGGESTION_ATTEMPTS,
};

fn club_with_players(n: usize, format: GameFormat) -> (Club, Vec<PlayerId>) {
    let settings = GameSettings::for_format(format);
    let mut club = Club::with_courts(settings, 6, vec!["Court 1"]);
    let ids = (0..n)
        .map(|i| club.register_player(format!("P{i}")).unwrap())
        .collect();
    (club, ids)
}

#[test]
fn settings_require_a_locked_in_slot() {
    assert!(matches!(
        GameSettings::new(GameFormat::Double, 4, 4, true),
        Err(ClubError::InvalidSettings { .. })
    ));
    let s = GameSettings::new(GameFormat::Double, 4, 2, true).unwrap();
    assert_eq!(s.auto_selection_size(), 2);
}

#[test]
fn locked_head_takes_longest_waiting_players() {
    let (club, ids) = club_with_players(4, GameFormat::Double);
    // Double preset: auto_selection_size = 4 - 3 = 1.
    assert_eq!(locked_in_head(&club), vec![ids[0]]);
}

#[test]
fn paired_head_forces_partner_into_the_lock_in() {
    // A and B paired, A at the head of the queue, one lock-in slot:
    // the locked-in slice is both of them, size 2 not 1.
    let (mut club, ids) = club_with_players(4, GameFormat::Double);
    club.propose_pair(ids[0], ids[1], "A&B").unwrap();

    let head = locked_in_head(&club);
    assert_eq!(head, vec![ids[0], ids[1]]);

    auto_suggest(&mut club).unwrap();
    assert_eq!(club.selected_players.len(), 4);
    assert!(club.selected_players.contains(&ids[0]));
    assert!(club.selected_players.contains(&ids[1]));
}

#[test]
fn suggestion_never_excludes_a_selected_players_partner() {
    let (mut club, ids) = club_with_players(8, GameFormat::Double);
    club.propose_pair(ids[2], ids[3], "pair A").unwrap();
    club.propose_pair(ids[4], ids[5], "pair B").unwrap();

    for _ in 0..20 {
        if auto_suggest(&mut club).is_err() {
            continue;
        }
        let selected = club.selected_players.clone();
        assert_eq!(selected.len(), 4);
        for &id in &selected {
            if let Some(partner) = club.lookup_partner(id) {
                assert!(
                    selected.contains(&partner.id),
                    "partner excluded while player included"
                );
            }
        }
    }
}

#[test]
fn suggestion_fails_after_bounded_attempts_and_keeps_previous_selection() {
    // Head P0 is single; the completion pool is two pairs. Any 3-of-4 draw splits
    // a pair, so no candidate is ever valid and the bound must trip.
    let (mut club, ids) = club_with_players(5, GameFormat::Double);
    club.propose_pair(ids[1], ids[2], "pair A").unwrap();
    club.propose_pair(ids[3], ids[4], "pair B").unwrap();

    club.selected_players = vec![ids[0]];
    assert!(matches!(
        auto_suggest(&mut club),
        Err(ClubError::SelectionExhausted {
            attempts: MAX_SUGGESTION_ATTEMPTS
        })
    ));
    assert_eq!(club.selected_players, vec![ids[0]]);
}

#[test]
fn suggestion_requires_enough_available_players() {
    let (mut club, _) = club_with_players(3, GameFormat::Double);
    assert!(matches!(
        auto_suggest(&mut club),
        Err(ClubError::NotEnoughPlayers {
            needed: 4,
            available: 3
        })
    ));
}

#[test]
fn paired_double_requires_everyone_paired() {
    let (mut club, ids) = club_with_players(4, GameFormat::PairedDouble);
    // No pairs yet: the all-singles shape is invalid for paired doubles.
    assert!(matches!(
        auto_suggest(&mut club),
        Err(ClubError::SelectionExhausted { .. })
    ));

    club.propose_pair(ids[0], ids[1], "pair A").unwrap();
    club.propose_pair(ids[2], ids[3], "pair B").unwrap();
    auto_suggest(&mut club).unwrap();
    assert_eq!(club.selected_players.len(), 4);
}

#[test]
fn toggle_rejects_locked_in_head() {
    let (mut club, ids) = club_with_players(4, GameFormat::Double);
    assert!(matches!(
        toggle_player_selection(&mut club, ids[0]),
        Err(ClubError::SelectionLocked(_))
    ));
}

#[test]
fn toggle_moves_a_pair_as_a_unit() {
    let (mut club, ids) = club_with_players(6, GameFormat::Double);
    club.propose_pair(ids[2], ids[3], "pair A").unwrap();

    toggle_player_selection(&mut club, ids[2]).unwrap();
    // Head (ids[0]) is seeded automatically; the pair joins as a unit.
    assert!(club.selected_players.contains(&ids[0]));
    assert!(club.selected_players.contains(&ids[2]));
    assert!(club.selected_players.contains(&ids[3]));
    assert_eq!(club.selected_players.len(), 3);

    toggle_player_selection(&mut club, ids[3]).unwrap();
    assert_eq!(club.selected_players, vec![ids[0]]);
}

#[test]
fn toggle_respects_selection_capacity() {
    let (mut club, ids) = club_with_players(6, GameFormat::Double);
    toggle_player_selection(&mut club, ids[1]).unwrap();
    toggle_player_selection(&mut club, ids[2]).unwrap();
    toggle_player_selection(&mut club, ids[3]).unwrap();
    assert_eq!(club.selected_players.len(), 4);

    assert!(matches!(
        toggle_player_selection(&mut club, ids[4]),
        Err(ClubError::SelectionFull { capacity: 4 })
    ));
    assert_eq!(club.selected_players.len(), 4);
}

#[test]
fn toggle_rejects_a_pair_that_does_not_fit() {
    let (mut club, ids) = club_with_players(6, GameFormat::Double);
    club.propose_pair(ids[4], ids[5], "pair A").unwrap();
    toggle_player_selection(&mut club, ids[1]).unwrap();
    toggle_player_selection(&mut club, ids[2]).unwrap();
    // 3 of 4 slots taken; the pair needs 2.
    assert!(matches!(
        toggle_player_selection(&mut club, ids[4]),
        Err(ClubError::SelectionFull { .. })
    ));
}

#[test]
fn toggle_rejects_unavailable_players() {
    let (mut club, ids) = club_with_players(5, GameFormat::Double);
    club.set_player_status(ids[4], court_rotation_web::PlayerStatus::Unavailable)
        .unwrap();
    assert!(matches!(
        toggle_player_selection(&mut club, ids[4]),
        Err(ClubError::PlayerNotAvailable(_))
    ));
}

#[test]
fn toggle_prunes_players_that_left_the_pool() {
    let (mut club, ids) = club_with_players(6, GameFormat::Double);
    toggle_player_selection(&mut club, ids[1]).unwrap();
    toggle_player_selection(&mut club, ids[2]).unwrap();
    club.set_player_status(ids[1], court_rotation_web::PlayerStatus::Unavailable)
        .unwrap();

    // ids[1] was dropped at status change; the next toggle rebuilds around the head.
    toggle_player_selection(&mut club, ids[3]).unwrap();
    assert!(!club.selected_players.contains(&ids[1]));
    assert!(club.selected_players.contains(&ids[0]));
    assert!(club.selected_players.contains(&ids[2]));
    assert!(club.selected_players.contains(&ids[3]));
}
