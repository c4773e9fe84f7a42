//! Club: the single state owner for players, pairs, courts, games, and the queue.

use crate::models::court::{Court, CourtId, CourtStatus};
use crate::models::game::Game;
use crate::models::pair::{PairId, PlayerPair};
use crate::models::player::{Player, PlayerId, PlayerStatus};
use crate::models::queue_key::QueueKey;
use crate::models::settings::GameSettings;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// Errors that can occur during club operations.
///
/// Grouping: validation (EmptyPlayerName, DuplicatePlayerName, InvalidSettings),
/// pairing (CannotPairWithSelf, PlayerNotAvailable, PlayerAlreadyPaired), state
/// conflicts (PlayerPlaying, PairMemberPlaying, PlayerNotRetired, InvalidStatusTarget,
/// SelectionLocked, NoActiveGame, CourtNotAllocatable), capacity (SelectionFull,
/// WaitingQueueFull), the suggestion bound (SelectionExhausted), configuration limits
/// (RoundLimitExceeded, PositionLimitExceeded), and game start failures
/// (NotEnoughPlayers, NoCourtAvailable).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClubError {
    /// Player name is empty after trimming.
    EmptyPlayerName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// suggestion_size must be smaller than player_number, and player_number non-zero.
    InvalidSettings { player_number: u32, suggestion_size: u32 },
    /// Player id not found in the registry.
    PlayerNotFound(PlayerId),
    /// Pair id not found.
    PairNotFound(PairId),
    /// Court id not found in the pool.
    CourtNotFound(CourtId),
    /// A pair needs two distinct players.
    CannotPairWithSelf,
    /// Player must be available for this action (pair, select).
    PlayerNotAvailable(PlayerId),
    /// Player already belongs to a pair.
    PlayerAlreadyPaired(PlayerId),
    /// Pair member is on court; the pair cannot be dissolved mid-game.
    PairMemberPlaying(PlayerId),
    /// Player is on court; status cannot change until the game ends.
    PlayerPlaying(PlayerId),
    /// Only retired players can be reinstated.
    PlayerNotRetired(PlayerId),
    /// Status can only be set to available or unavailable directly.
    InvalidStatusTarget,
    /// Player sits in the locked-in head of the fairness queue and cannot be toggled.
    SelectionLocked(PlayerId),
    /// Selection already holds `player_number` players.
    SelectionFull { capacity: u32 },
    /// The suggester exhausted its attempt bound without a valid combination.
    SelectionExhausted { attempts: u32 },
    /// Not enough players for this action.
    NotEnoughPlayers { needed: usize, available: usize },
    /// No court free and the waiting queue is disabled.
    NoCourtAvailable,
    /// No court free and the waiting queue is at capacity.
    WaitingQueueFull { capacity: usize },
    /// Court has no active game to end.
    NoActiveGame(CourtId),
    /// Court is not free and unlocked, so it cannot receive a game.
    CourtNotAllocatable(CourtId),
    /// Round counter would exceed the queue-key width.
    RoundLimitExceeded(u32),
    /// Position counter would exceed the queue-key width.
    PositionLimitExceeded(u32),
}

impl std::fmt::Display for ClubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClubError::EmptyPlayerName => write!(f, "Player name cannot be empty"),
            ClubError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            ClubError::InvalidSettings { player_number, suggestion_size } => write!(
                f,
                "Invalid settings: suggestion size {} must be below player number {}",
                suggestion_size, player_number
            ),
            ClubError::PlayerNotFound(_) => write!(f, "Player not found"),
            ClubError::PairNotFound(_) => write!(f, "Pair not found"),
            ClubError::CourtNotFound(_) => write!(f, "Court not found"),
            ClubError::CannotPairWithSelf => write!(f, "A pair needs two distinct players"),
            ClubError::PlayerNotAvailable(_) => write!(f, "Player is not available"),
            ClubError::PlayerAlreadyPaired(_) => write!(f, "Player already belongs to a pair"),
            ClubError::PairMemberPlaying(_) => {
                write!(f, "Cannot dissolve a pair while a member is playing")
            }
            ClubError::PlayerPlaying(_) => write!(f, "Player is currently playing"),
            ClubError::PlayerNotRetired(_) => write!(f, "Only retired players can be reinstated"),
            ClubError::InvalidStatusTarget => {
                write!(f, "Status can only be set to available or unavailable")
            }
            ClubError::SelectionLocked(_) => {
                write!(f, "Player is locked in by fairness order and cannot be toggled")
            }
            ClubError::SelectionFull { capacity } => {
                write!(f, "Selection is full ({} players)", capacity)
            }
            ClubError::SelectionExhausted { attempts } => write!(
                f,
                "No valid player combination found within {} attempts",
                attempts
            ),
            ClubError::NotEnoughPlayers { needed, available } => {
                write!(f, "Need {} players, have {}", needed, available)
            }
            ClubError::NoCourtAvailable => write!(f, "No court available"),
            ClubError::WaitingQueueFull { capacity } => {
                write!(f, "Waiting queue is full ({} games)", capacity)
            }
            ClubError::NoActiveGame(_) => write!(f, "Court has no active game"),
            ClubError::CourtNotAllocatable(_) => write!(f, "Court cannot receive a game"),
            ClubError::RoundLimitExceeded(r) => {
                write!(f, "Round {} exceeds the supported maximum of {}", r, QueueKey::MAX_ROUND)
            }
            ClubError::PositionLimitExceeded(p) => write!(
                f,
                "Position {} exceeds the supported maximum of {}",
                p,
                QueueKey::MAX_POSITION
            ),
        }
    }
}

/// Unique identifier for a club session.
pub type ClubId = Uuid;

/// A pre-built game parked until a court frees up. `game.court_id` stays `None`
/// until promotion binds the entry to the just-freed court.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WaitingGame {
    pub game: Game,
    /// Snapshot of the participants (kept playing while the entry waits).
    pub player_ids: Vec<PlayerId>,
}

/// Default bound for parked games when none is given at construction.
pub const DEFAULT_WAITING_QUEUE_CAPACITY: usize = 6;

/// Full club-session state: registry, pairs, court pool, active games, selection,
/// and the waiting queue. Every mutation goes through `&mut Club`, so embedding
/// hosts serialize operations by owning the value (see the web binary).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub settings: GameSettings,
    /// All registered players, retired included, keyed by stable id.
    pub players: HashMap<PlayerId, Player>,
    pub pairs: HashMap<PairId, PlayerPair>,
    /// Fixed pool, provisioned once at setup.
    pub courts: Vec<Court>,
    /// Games currently on a court.
    pub games: Vec<Game>,
    /// Candidate set for the next game, built by the selection engine.
    pub selected_players: Vec<PlayerId>,
    /// Pre-built games waiting for a court, FIFO.
    pub waiting_queue: VecDeque<WaitingGame>,
    pub waiting_queue_capacity: usize,
    /// Next game's sequence index.
    pub game_sequence: u32,
}

impl Club {
    /// Create a club with the given format policy and an empty court pool.
    pub fn new(settings: GameSettings, waiting_queue_capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings,
            players: HashMap::new(),
            pairs: HashMap::new(),
            courts: Vec::new(),
            games: Vec::new(),
            selected_players: Vec::new(),
            waiting_queue: VecDeque::new(),
            waiting_queue_capacity,
            game_sequence: 0,
        }
    }

    /// Create a club and provision its fixed court pool (display order = given order).
    pub fn with_courts<S: Into<String>>(
        settings: GameSettings,
        waiting_queue_capacity: usize,
        court_names: Vec<S>,
    ) -> Self {
        let mut club = Self::new(settings, waiting_queue_capacity);
        club.courts = court_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Court::new(name, i as u32))
            .collect();
        club
    }

    // ---- registry -------------------------------------------------------

    /// Register a new player at the back of the current round.
    pub fn register_player(&mut self, name: impl Into<String>) -> Result<PlayerId, ClubError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ClubError::EmptyPlayerName);
        }
        let is_duplicate = self
            .players
            .values()
            .any(|p| p.name.eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(ClubError::DuplicatePlayerName);
        }
        let round = self.current_round();
        let position = self.count_in_round(round);
        let key = QueueKey::new(round, Utc::now(), position)?;
        let player = Player::new(name, key);
        let id = player.id;
        self.players.insert(id, player);
        Ok(id)
    }

    /// Soft delete: the player keeps their record (game back-references stay
    /// resolvable) but leaves the rotation. Dissolves any pair membership and
    /// clears the player from the current selection.
    pub fn retire_player(&mut self, id: PlayerId) -> Result<(), ClubError> {
        let player = self.players.get(&id).ok_or(ClubError::PlayerNotFound(id))?;
        if player.is_playing() {
            return Err(ClubError::PlayerPlaying(id));
        }
        if let Some(pair_id) = self.pair_of(id) {
            self.dissolve_pair(pair_id);
        }
        self.selected_players.retain(|&pid| pid != id);
        if let Some(p) = self.players.get_mut(&id) {
            p.status = PlayerStatus::Retired;
        }
        Ok(())
    }

    /// Bring a retired player back, at the back of the current round.
    pub fn reinstate_player(&mut self, id: PlayerId) -> Result<(), ClubError> {
        let player = self.players.get(&id).ok_or(ClubError::PlayerNotFound(id))?;
        if player.status != PlayerStatus::Retired {
            return Err(ClubError::PlayerNotRetired(id));
        }
        let round = self.current_round();
        let position = self.count_in_round(round);
        let key = QueueKey::new(round, Utc::now(), position)?;
        let p = self
            .players
            .get_mut(&id)
            .ok_or(ClubError::PlayerNotFound(id))?;
        p.status = PlayerStatus::Available;
        p.queue_key = key;
        Ok(())
    }

    /// Toggle a player between available and unavailable. Playing and retired
    /// players are managed by end_game / retire respectively, never here.
    pub fn set_player_status(
        &mut self,
        id: PlayerId,
        status: PlayerStatus,
    ) -> Result<(), ClubError> {
        if !matches!(status, PlayerStatus::Available | PlayerStatus::Unavailable) {
            return Err(ClubError::InvalidStatusTarget);
        }
        let player = self.players.get(&id).ok_or(ClubError::PlayerNotFound(id))?;
        if player.is_playing() {
            return Err(ClubError::PlayerPlaying(id));
        }
        if player.status == PlayerStatus::Retired {
            return Err(ClubError::PlayerNotRetired(id));
        }
        if status == PlayerStatus::Unavailable {
            self.selected_players.retain(|&pid| pid != id);
        }
        if let Some(p) = self.players.get_mut(&id) {
            p.status = status;
        }
        Ok(())
    }

    /// Re-key a player directly (used by end-of-game requeue and setup tooling).
    pub fn recompute_queue_key(
        &mut self,
        id: PlayerId,
        round: u32,
        position: u32,
    ) -> Result<(), ClubError> {
        let key = QueueKey::new(round, Utc::now(), position)?;
        let p = self
            .players
            .get_mut(&id)
            .ok_or(ClubError::PlayerNotFound(id))?;
        p.queue_key = key;
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Available players in fairness order (ascending queue key).
    pub fn list_available(&self) -> Vec<&Player> {
        let mut available: Vec<&Player> =
            self.players.values().filter(|p| p.is_available()).collect();
        available.sort_by(|a, b| a.queue_key.cmp(&b.queue_key));
        available
    }

    /// Available players whose key belongs to the given round, in fairness order.
    pub fn list_available_in_round(&self, round: u32) -> Vec<&Player> {
        self.list_available()
            .into_iter()
            .filter(|p| p.queue_key.round() == round)
            .collect()
    }

    /// The round the rotation is currently serving: the smallest key round among
    /// available and playing players (0 for an empty club). Players released by
    /// end_game are queued into this plus one.
    pub fn current_round(&self) -> u32 {
        self.players
            .values()
            .filter(|p| p.is_available() || p.is_playing())
            .map(|p| p.queue_key.round())
            .min()
            .unwrap_or(0)
    }

    /// How many players are already keyed to the given round. Retired players
    /// count too: their old slot stays occupied, so positions within a round are
    /// never reissued.
    pub fn count_in_round(&self, round: u32) -> u32 {
        self.players
            .values()
            .filter(|p| p.queue_key.round() == round)
            .count() as u32
    }

    // ---- pairs ----------------------------------------------------------

    /// Create a standing pair. Both players must be available and unpaired.
    pub fn propose_pair(
        &mut self,
        a: PlayerId,
        b: PlayerId,
        name: impl Into<String>,
    ) -> Result<PairId, ClubError> {
        if a == b {
            return Err(ClubError::CannotPairWithSelf);
        }
        for &id in &[a, b] {
            let p = self.players.get(&id).ok_or(ClubError::PlayerNotFound(id))?;
            if !p.is_available() {
                return Err(ClubError::PlayerNotAvailable(id));
            }
            if p.partner_id.is_some() {
                return Err(ClubError::PlayerAlreadyPaired(id));
            }
        }
        let pair = PlayerPair::new(a, b, name);
        let pair_id = pair.id;
        self.pairs.insert(pair_id, pair);
        if let Some(p) = self.players.get_mut(&a) {
            p.partner_id = Some(b);
        }
        if let Some(p) = self.players.get_mut(&b) {
            p.partner_id = Some(a);
        }
        Ok(pair_id)
    }

    /// Dissolve a pair. Rejected while either member is on court, so a queued or
    /// running game never carries a stale pairing.
    pub fn unpair(&mut self, pair_id: PairId) -> Result<(), ClubError> {
        let pair = self
            .pairs
            .get(&pair_id)
            .ok_or(ClubError::PairNotFound(pair_id))?;
        for &id in &pair.player_ids {
            if self.players.get(&id).is_some_and(|p| p.is_playing()) {
                return Err(ClubError::PairMemberPlaying(id));
            }
        }
        self.dissolve_pair(pair_id);
        Ok(())
    }

    /// The player's partner, if they belong to a pair.
    pub fn lookup_partner(&self, id: PlayerId) -> Option<&Player> {
        let partner_id = self.players.get(&id)?.partner_id?;
        self.players.get(&partner_id)
    }

    /// The pair the player belongs to, if any.
    pub fn pair_of(&self, id: PlayerId) -> Option<PairId> {
        self.pairs.values().find(|pair| pair.contains(id)).map(|pair| pair.id)
    }

    /// Remove a pair and clear both partner references. Internal: callers have
    /// already validated the dissolution.
    fn dissolve_pair(&mut self, pair_id: PairId) {
        if let Some(pair) = self.pairs.remove(&pair_id) {
            for id in pair.player_ids {
                if let Some(p) = self.players.get_mut(&id) {
                    p.partner_id = None;
                }
            }
        }
    }

    // ---- courts ---------------------------------------------------------

    pub fn court(&self, id: CourtId) -> Option<&Court> {
        self.courts.iter().find(|c| c.id == id)
    }

    pub fn court_mut(&mut self, id: CourtId) -> Option<&mut Court> {
        self.courts.iter_mut().find(|c| c.id == id)
    }

    /// Lowest display-index court that is free and unlocked, if any.
    pub fn next_available_court(&self) -> Option<&Court> {
        self.courts
            .iter()
            .filter(|c| c.is_allocatable())
            .min_by_key(|c| c.display_index)
    }

    /// Flip a court's lock. Locking withdraws an idle court immediately; a playing
    /// court keeps playing and resolves to unavailable when its game ends.
    /// Unlocking restores an idle court to available.
    pub fn toggle_court_lock(&mut self, court_id: CourtId) -> Result<(), ClubError> {
        let court = self
            .court_mut(court_id)
            .ok_or(ClubError::CourtNotFound(court_id))?;
        court.locked = !court.locked;
        if court.locked {
            if court.status == CourtStatus::Available {
                court.status = CourtStatus::Unavailable;
            }
        } else if court.status == CourtStatus::Unavailable {
            court.status = CourtStatus::Available;
        }
        Ok(())
    }

    /// The active game on a court, if any.
    pub fn active_game(&self, court_id: CourtId) -> Option<&Game> {
        self.games.iter().find(|g| g.court_id == Some(court_id))
    }

    /// Next value of the club-wide game sequence counter.
    pub fn next_sequence_index(&mut self) -> u32 {
        let seq = self.game_sequence;
        self.game_sequence += 1;
        seq
    }
}
