//! Single binary web server: JSON REST API over the in-memory rotation core.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_rotation_web::{
    auto_suggest, configure_format, end_game, start_game, toggle_player_selection, Club, ClubId,
    GameFormat, GameSettings, PlayerStatus, DEFAULT_WAITING_QUEUE_CAPACITY,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-club entry: rotation state + last activity time (for auto-cleanup).
struct ClubEntry {
    club: Club,
    last_activity: Instant,
}

/// In-memory state: many clubs by ID (sessioned). Entries are removed after
/// 12h inactivity. The write lock is held for every full read-compute-commit,
/// so core mutations never interleave.
type AppState = Data<RwLock<HashMap<ClubId, ClubEntry>>>;

/// Inactivity threshold: clubs not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateClubBody {
    /// Fixed court pool, in display order.
    court_names: Vec<String>,
    #[serde(default)]
    format: GameFormat,
    #[serde(default = "default_queue_capacity")]
    queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    DEFAULT_WAITING_QUEUE_CAPACITY
}

#[derive(Deserialize)]
struct RegisterPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct PlayerStatusBody {
    status: PlayerStatus,
}

#[derive(Deserialize)]
struct ProposePairBody {
    player_a: Uuid,
    player_b: Uuid,
    name: String,
}

#[derive(Deserialize)]
struct ToggleSelectionBody {
    player_id: Uuid,
}

#[derive(Deserialize)]
struct FormatBody {
    format: GameFormat,
}

/// Path segment: club id (e.g. /api/clubs/{id})
#[derive(Deserialize)]
struct ClubPath {
    id: ClubId,
}

/// Path segments: club id and player id (e.g. /api/clubs/{id}/players/{player_id}/retire)
#[derive(Deserialize)]
struct ClubPlayerPath {
    id: ClubId,
    player_id: Uuid,
}

/// Path segments: club id and pair id.
#[derive(Deserialize)]
struct ClubPairPath {
    id: ClubId,
    pair_id: Uuid,
}

/// Path segments: club id and court id.
#[derive(Deserialize)]
struct ClubCourtPath {
    id: ClubId,
    court_id: Uuid,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-rotation-web",
    })
}

/// Create a new club with its court pool (returns it with id; client stores the
/// id for subsequent requests).
#[post("/api/clubs")]
async fn api_create_club(state: AppState, body: Json<CreateClubBody>) -> HttpResponse {
    let body = body.into_inner();
    let settings = GameSettings::for_format(body.format);
    let club = Club::with_courts(settings, body.queue_capacity, body.court_names);
    let id = club.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        ClubEntry {
            club,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(&g.get(&id).unwrap().club)
}

/// Get a club by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/clubs/{id}")]
async fn api_get_club(state: AppState, path: Path<ClubPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.club)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    }
}

/// Register a player into the fairness queue.
#[post("/api/clubs/{id}/players")]
async fn api_register_player(
    state: AppState,
    path: Path<ClubPath>,
    body: Json<RegisterPlayerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match club.register_player(body.name.trim()) {
        Ok(_) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Retire a player (soft delete; games keep their back-references).
#[post("/api/clubs/{id}/players/{player_id}/retire")]
async fn api_retire_player(state: AppState, path: Path<ClubPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match club.retire_player(path.player_id) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Reinstate a retired player at the back of the current round.
#[post("/api/clubs/{id}/players/{player_id}/reinstate")]
async fn api_reinstate_player(state: AppState, path: Path<ClubPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match club.reinstate_player(path.player_id) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Toggle a player between available and unavailable.
#[put("/api/clubs/{id}/players/{player_id}/status")]
async fn api_set_player_status(
    state: AppState,
    path: Path<ClubPlayerPath>,
    body: Json<PlayerStatusBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match club.set_player_status(path.player_id, body.status) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Create a standing pair (both players must be available and unpaired).
#[post("/api/clubs/{id}/pairs")]
async fn api_propose_pair(
    state: AppState,
    path: Path<ClubPath>,
    body: Json<ProposePairBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match club.propose_pair(body.player_a, body.player_b, body.name.trim()) {
        Ok(_) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Dissolve a pair (rejected while a member is playing).
#[delete("/api/clubs/{id}/pairs/{pair_id}")]
async fn api_unpair(state: AppState, path: Path<ClubPairPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match club.unpair(path.pair_id) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Toggle one player in/out of the next-game selection (pairs move as a unit).
#[post("/api/clubs/{id}/selection/toggle")]
async fn api_toggle_selection(
    state: AppState,
    path: Path<ClubPath>,
    body: Json<ToggleSelectionBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match toggle_player_selection(club, body.player_id) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Build a full suggested selection (fairness head + random completion).
#[post("/api/clubs/{id}/selection/suggest")]
async fn api_auto_suggest(state: AppState, path: Path<ClubPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match auto_suggest(club) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Commit the current selection to a court (or the waiting queue).
#[post("/api/clubs/{id}/games/start")]
async fn api_start_game(state: AppState, path: Path<ClubPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match start_game(club) {
        Ok(_) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// End the game on a court; released players rejoin the queue for the next round.
#[post("/api/clubs/{id}/courts/{court_id}/end")]
async fn api_end_game(state: AppState, path: Path<ClubCourtPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match end_game(club, path.court_id) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Flip a court's lock (locked courts are withheld from allocation).
#[post("/api/clubs/{id}/courts/{court_id}/lock")]
async fn api_toggle_court_lock(state: AppState, path: Path<ClubCourtPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    match club.toggle_court_lock(path.court_id) {
        Ok(()) => HttpResponse::Ok().json(club),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Switch the club's game format (clears the pending selection).
#[put("/api/clubs/{id}/format")]
async fn api_configure_format(
    state: AppState,
    path: Path<ClubPath>,
    body: Json<FormatBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No club" })),
    };
    entry.last_activity = Instant::now();
    let club = &mut entry.club;
    configure_format(club, body.format);
    HttpResponse::Ok().json(club)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<ClubId, ClubEntry>::new()));

    // Background task: every 30 minutes, remove clubs inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive club(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_club)
            .service(api_get_club)
            .service(api_register_player)
            .service(api_retire_player)
            .service(api_reinstate_player)
            .service(api_set_player_status)
            .service(api_propose_pair)
            .service(api_unpair)
            .service(api_toggle_selection)
            .service(api_auto_suggest)
            .service(api_start_game)
            .service(api_end_game)
            .service(api_toggle_court_lock)
            .service(api_configure_format)
    })
    .bind(bind)?
    .run()
    .await
}
