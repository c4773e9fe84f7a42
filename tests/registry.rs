//! Integration tests for the player registry, queue keys, and pairs.

use chrono::{TimeZone, Utc};
use court_rotation_web::{
    Club, ClubError, GameFormat, GameSettings, PlayerStatus, QueueKey,
};

fn club_with_players(n: usize) -> (Club, Vec<court_rotation_web::PlayerId>) {
    let settings = GameSettings::for_format(GameFormat::Double);
    let mut club = Club::with_courts(settings, 6, vec!["Court 1"]);
    let ids = (0..n)
        .map(|i| club.register_player(format!("P{i}")).unwrap())
        .collect();
    (club, ids)
}

#[test]
fn queue_key_orders_by_round_then_time_then_position() {
    let early = Utc.timestamp_millis_opt(1_000_000).unwrap();
    let late = Utc.timestamp_millis_opt(2_000_000).unwrap();

    let round0_late = QueueKey::new(0, late, 0).unwrap();
    let round1_early = QueueKey::new(1, early, 0).unwrap();
    assert!(round0_late.ordinal() < round1_early.ordinal());

    let pos0 = QueueKey::new(2, early, 0).unwrap();
    let pos1 = QueueKey::new(2, early, 1).unwrap();
    assert!(pos0 < pos1);
    assert!(pos0.ordinal() < pos1.ordinal());

    assert_eq!(round1_early.round(), 1);
    // Fixed width: 3 round digits + 13 millis digits + 3 position digits.
    assert_eq!(pos0.as_str().len(), 19);
}

#[test]
fn queue_key_rejects_overflowing_round_and_position() {
    let now = Utc::now();
    assert!(matches!(
        QueueKey::new(1000, now, 0),
        Err(ClubError::RoundLimitExceeded(1000))
    ));
    assert!(matches!(
        QueueKey::new(0, now, 1000),
        Err(ClubError::PositionLimitExceeded(1000))
    ));
}

#[test]
fn register_orders_players_by_registration() {
    let (club, ids) = club_with_players(5);
    let available: Vec<_> = club.list_available().iter().map(|p| p.id).collect();
    assert_eq!(available, ids);

    // Same round, strictly increasing ordinals in registration order.
    let ordinals: Vec<u128> = club
        .list_available()
        .iter()
        .map(|p| p.queue_key.ordinal())
        .collect();
    for w in ordinals.windows(2) {
        assert!(w[0] < w[1]);
    }
    for p in club.list_available() {
        assert_eq!(p.queue_key.round(), 0);
    }
}

#[test]
fn register_rejects_duplicate_and_empty_names() {
    let (mut club, _) = club_with_players(1);
    assert!(matches!(
        club.register_player("p0"),
        Err(ClubError::DuplicatePlayerName)
    ));
    assert!(matches!(
        club.register_player("   "),
        Err(ClubError::EmptyPlayerName)
    ));
}

#[test]
fn retire_and_reinstate_rejoin_at_back_of_round() {
    let (mut club, ids) = club_with_players(3);
    club.retire_player(ids[0]).unwrap();
    assert_eq!(club.player(ids[0]).unwrap().status, PlayerStatus::Retired);
    assert_eq!(club.list_available().len(), 2);

    // Retired names stay taken (the record is kept, not deleted).
    assert!(matches!(
        club.register_player("P0"),
        Err(ClubError::DuplicatePlayerName)
    ));

    club.reinstate_player(ids[0]).unwrap();
    let available: Vec<_> = club.list_available().iter().map(|p| p.id).collect();
    assert_eq!(available, vec![ids[1], ids[2], ids[0]]);
}

#[test]
fn reinstate_requires_retired_status() {
    let (mut club, ids) = club_with_players(1);
    assert!(matches!(
        club.reinstate_player(ids[0]),
        Err(ClubError::PlayerNotRetired(_))
    ));
}

#[test]
fn playing_player_cannot_retire_or_change_status() {
    let (mut club, ids) = club_with_players(2);
    club.players.get_mut(&ids[0]).unwrap().status = PlayerStatus::Playing;
    assert!(matches!(
        club.retire_player(ids[0]),
        Err(ClubError::PlayerPlaying(_))
    ));
    assert!(matches!(
        club.set_player_status(ids[0], PlayerStatus::Unavailable),
        Err(ClubError::PlayerPlaying(_))
    ));
}

#[test]
fn set_status_only_toggles_available_and_unavailable() {
    let (mut club, ids) = club_with_players(1);
    assert!(matches!(
        club.set_player_status(ids[0], PlayerStatus::Playing),
        Err(ClubError::InvalidStatusTarget)
    ));
    club.set_player_status(ids[0], PlayerStatus::Unavailable).unwrap();
    assert!(club.list_available().is_empty());
    club.set_player_status(ids[0], PlayerStatus::Available).unwrap();
    assert_eq!(club.list_available().len(), 1);
}

#[test]
fn pair_symmetry_holds_after_propose_and_unpair() {
    let (mut club, ids) = club_with_players(2);
    let pair_id = club.propose_pair(ids[0], ids[1], "A&B").unwrap();

    assert_eq!(club.player(ids[0]).unwrap().partner_id, Some(ids[1]));
    assert_eq!(club.player(ids[1]).unwrap().partner_id, Some(ids[0]));
    assert_eq!(club.lookup_partner(ids[0]).unwrap().id, ids[1]);

    club.unpair(pair_id).unwrap();
    assert_eq!(club.player(ids[0]).unwrap().partner_id, None);
    assert_eq!(club.player(ids[1]).unwrap().partner_id, None);
    assert!(club.pairs.is_empty());
}

#[test]
fn propose_pair_validates_members() {
    let (mut club, ids) = club_with_players(3);
    assert!(matches!(
        club.propose_pair(ids[0], ids[0], "solo"),
        Err(ClubError::CannotPairWithSelf)
    ));

    club.propose_pair(ids[0], ids[1], "A&B").unwrap();
    assert!(matches!(
        club.propose_pair(ids[1], ids[2], "B&C"),
        Err(ClubError::PlayerAlreadyPaired(_))
    ));

    let (mut club2, ids2) = club_with_players(2);
    club2
        .set_player_status(ids2[1], PlayerStatus::Unavailable)
        .unwrap();
    assert!(matches!(
        club2.propose_pair(ids2[0], ids2[1], "A&B"),
        Err(ClubError::PlayerNotAvailable(_))
    ));
}

#[test]
fn unpair_rejected_while_a_member_is_playing() {
    // Dissolving a pair mid-game must fail and leave the pair intact.
    let (mut club, ids) = club_with_players(2);
    let pair_id = club.propose_pair(ids[0], ids[1], "A&B").unwrap();
    club.players.get_mut(&ids[0]).unwrap().status = PlayerStatus::Playing;

    assert!(matches!(
        club.unpair(pair_id),
        Err(ClubError::PairMemberPlaying(_))
    ));
    assert!(club.pairs.contains_key(&pair_id));
    assert_eq!(club.player(ids[1]).unwrap().partner_id, Some(ids[0]));
}

#[test]
fn retire_dissolves_pair_membership() {
    let (mut club, ids) = club_with_players(2);
    club.propose_pair(ids[0], ids[1], "A&B").unwrap();
    club.retire_player(ids[0]).unwrap();

    assert!(club.pairs.is_empty());
    assert_eq!(club.player(ids[1]).unwrap().partner_id, None);
}

#[test]
fn recompute_queue_key_rekeys_a_player() {
    let (mut club, ids) = club_with_players(2);
    club.recompute_queue_key(ids[0], 5, 0).unwrap();
    assert_eq!(club.player(ids[0]).unwrap().queue_key.round(), 5);
    // The rekeyed player now sorts behind the untouched round-0 player.
    let available: Vec<_> = club.list_available().iter().map(|p| p.id).collect();
    assert_eq!(available, vec![ids[1], ids[0]]);

    let round0: Vec<_> = club.list_available_in_round(0).iter().map(|p| p.id).collect();
    assert_eq!(round0, vec![ids[1]]);
    let round5: Vec<_> = club.list_available_in_round(5).iter().map(|p| p.id).collect();
    assert_eq!(round5, vec![ids[0]]);
}
