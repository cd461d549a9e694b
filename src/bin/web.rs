//! Single binary web server: JSON API over the in-memory tournament collection.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, INACTIVITY_HOURS, DEMO_TOURNAMENT.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;
use volleyball_league_web::{
    ask_assistant, calculate_standings, finish_current_set, generate_schedule, import_roster_csv,
    player_rankings, standings_csv, start_match, update_match_score, ChatTurn, Position,
    RuleBookAssistant, RulesAssistant, Side, Tournament, TournamentError, TournamentId,
    TournamentStore,
};

/// All tournaments plus the last time each was touched (for auto-cleanup).
#[derive(Default)]
struct ServerState {
    store: TournamentStore,
    last_activity: HashMap<TournamentId, Instant>,
}

type AppState = Data<RwLock<ServerState>>;

type Assistant = Data<Box<dyn RulesAssistant + Send + Sync>>;

/// Settings read from the environment at startup.
struct ServerConfig {
    host: String,
    port: u16,
    inactivity_timeout: Duration,
    demo_tournament: bool,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let hours: u64 = std::env::var("INACTIVITY_HOURS")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(12);
        let demo_tournament = std::env::var("DEMO_TOURNAMENT")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            host,
            port,
            inactivity_timeout: inactivity_timeout(hours),
            demo_tournament,
        }
    }
}

fn inactivity_timeout(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    position: Position,
}

#[derive(Deserialize)]
struct DeltaBody {
    delta: i32,
}

#[derive(Deserialize)]
struct ScoreBody {
    side: Side,
    delta: i32,
}

#[derive(Deserialize)]
struct AssistantBody {
    #[serde(default)]
    history: Vec<ChatTurn>,
    message: String,
}

#[derive(serde::Serialize)]
struct AssistantResponse {
    reply: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TeamPath {
    id: TournamentId,
    team_id: Uuid,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: TournamentId,
    team_id: Uuid,
    player_id: Uuid,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: Uuid,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Run `f` on one tournament under the write lock and respond with the tournament.
/// Touching a tournament refreshes its last activity.
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let ServerState {
        store,
        last_activity,
    } = &mut *g;
    let t = match store.get_mut(id) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    last_activity.insert(id, Instant::now());
    match f(t) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(&e),
    }
}

/// Build a read-only view of one tournament.
fn view_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> HttpResponse,
{
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.get(id) {
        Ok(t) => f(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "volleyball-league-web",
    })
}

/// List tournaments with their progress.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(g.store.summaries()),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NameBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let id = match g.store.create(&body.name, &mut rand::thread_rng()) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };
    g.last_activity.insert(id, Instant::now());
    log::info!("Created tournament {} ({})", body.name.trim(), id);
    match g.store.get(id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |_| Ok(()))
}

/// Rename; a blank name keeps the current one.
#[put("/api/tournaments/{id}/name")]
async fn api_rename_tournament(state: AppState, path: Path<TournamentPath>, body: Json<NameBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.rename(&body.name);
        Ok(())
    })
}

/// Delete a tournament with all its teams and matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.last_activity.remove(&path.id);
    match g.store.delete(path.id) {
        Ok(t) => {
            log::info!("Deleted tournament {} ({})", t.name, t.id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(&e),
    }
}

#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<TournamentPath>, body: Json<NameBody>) -> HttpResponse {
    let mut rng = rand::thread_rng();
    with_tournament(&state, path.id, |t| t.add_team(&body.name, &mut rng).map(|_| ()))
}

#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.remove_team(path.team_id))
}

/// Import teams and players from a `team,player,position` CSV body.
#[post("/api/tournaments/{id}/teams/import")]
async fn api_import_roster(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let mut rng = rand::thread_rng();
    with_tournament(&state, path.id, |t| {
        import_roster_csv(t, &body, &mut rng).map(|_| ())
    })
}

#[post("/api/tournaments/{id}/teams/{team_id}/players")]
async fn api_add_player(state: AppState, path: Path<TeamPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut rng = rand::thread_rng();
    with_tournament(&state, path.id, |t| {
        t.add_player(path.team_id, &body.name, body.position, &mut rng)
            .map(|_| ())
    })
}

#[delete("/api/tournaments/{id}/teams/{team_id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.remove_player(path.team_id, path.player_id))
}

/// Adjust a player's scored points (clamped at zero).
#[put("/api/tournaments/{id}/teams/{team_id}/players/{player_id}/points")]
async fn api_adjust_player_points(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<DeltaBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.adjust_player_points(path.team_id, path.player_id, body.delta)
    })
}

/// Generate the round-robin schedule (needs at least two teams).
#[post("/api/tournaments/{id}/schedule")]
async fn api_generate_schedule(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut rng = rand::thread_rng();
    let mut enough_teams = true;
    let response = with_tournament(&state, path.id, |t| {
        enough_teams = t.can_generate_schedule();
        if enough_teams {
            generate_schedule(t, &mut rng);
            log::info!("Generated {} matches for {}", t.matches.len(), t.name);
        }
        Ok(())
    });
    if !enough_teams {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "At least two teams are needed to generate a schedule" }));
    }
    response
}

#[post("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| start_match(t, path.match_id))
}

/// Add or remove a point on one side of the current set.
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_update_score(state: AppState, path: Path<MatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        update_match_score(t, path.match_id, body.side, body.delta)
    })
}

/// Close the current set; 400 with the set rule when it is not over.
#[post("/api/tournaments/{id}/matches/{match_id}/finish-set")]
async fn api_finish_set(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        finish_current_set(t, path.match_id).map(|_| ())
    })
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, path.id, |t| {
        HttpResponse::Ok().json(calculate_standings(&t.teams, &t.matches))
    })
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, path.id, |t| match standings_csv(t) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => error_response(&e),
    })
}

#[get("/api/tournaments/{id}/players/ranking")]
async fn api_player_ranking(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, path.id, |t| HttpResponse::Ok().json(player_rankings(t)))
}

/// Rules assistant chat; always answers, with a fixed apology on failure.
#[post("/api/assistant")]
async fn api_assistant(assistant: Assistant, body: Json<AssistantBody>) -> HttpResponse {
    let reply = ask_assistant(&***assistant, &body.history, &body.message);
    HttpResponse::Ok().json(AssistantResponse { reply })
}

fn initial_state(config: &ServerConfig) -> ServerState {
    let mut state = ServerState::default();
    if config.demo_tournament {
        match Tournament::demo(&mut rand::thread_rng()) {
            Ok(t) => {
                let id = state.store.insert(t);
                state.last_activity.insert(id, Instant::now());
                log::info!("Seeded demo tournament {}", id);
            }
            Err(e) => log::warn!("Could not seed demo tournament: {}", e),
        }
    }
    state
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(initial_state(&config)));
    let assistant: Assistant = Data::new(Box::new(RuleBookAssistant) as Box<dyn RulesAssistant + Send + Sync>);

    // Background task: every 30 minutes, remove tournaments that have been idle too long
    let state_cleanup = state.clone();
    let inactivity_timeout = config.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let ServerState {
                store,
                last_activity,
            } = &mut *g;
            let removed = store.retain(|t| {
                last_activity
                    .get(&t.id)
                    .map_or(true, |at| at.elapsed() < inactivity_timeout)
            });
            last_activity.retain(|id, _| store.get(*id).is_ok());
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(assistant.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_rename_tournament)
            .service(api_delete_tournament)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_import_roster)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_adjust_player_points)
            .service(api_generate_schedule)
            .service(api_start_match)
            .service(api_update_score)
            .service(api_finish_set)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_player_ranking)
            .service(api_assistant)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    fn test_state() -> AppState {
        Data::new(RwLock::new(ServerState::default()))
    }

    #[actix_web::test]
    async fn create_tournament_and_generate_schedule() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api_create_tournament)
                .service(api_add_team)
                .service(api_generate_schedule),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "name": "Spring League" }))
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        // One team is not enough.
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/teams"))
            .set_json(serde_json::json!({ "name": "Lions" }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/schedule"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        for name in ["Tigers", "Bears"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/tournaments/{id}/teams"))
                .set_json(serde_json::json!({ "name": name }))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/schedule"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["matches"].as_array().unwrap().len(), 3);
        assert_eq!(body["matches"][0]["status"], "SCHEDULED");
    }

    #[actix_web::test]
    async fn unfinished_set_is_rejected_with_the_set_rule() {
        let state = test_state();
        let mut rng = rand::thread_rng();
        let mut t = Tournament::new("Cup", &mut rng).unwrap();
        let lions = t.add_team("Lions", &mut rng).unwrap();
        t.add_team("Tigers", &mut rng).unwrap();
        generate_schedule(&mut t, &mut rng);
        let match_id = t.matches[0].id;
        let id = state.write().unwrap().store.insert(t);

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api_update_score)
                .service(api_finish_set)
                .service(api_remove_team),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/tournaments/{id}/matches/{match_id}/score"))
            .set_json(serde_json::json!({ "side": "a", "delta": 24 }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["matches"][0]["status"], "LIVE");

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/matches/{match_id}/finish-set"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("25") && error.contains("2-point lead"), "{error}");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/tournaments/{id}/teams/{lions}"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["teams"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn huge_inactivity_hours_saturate() {
        assert_eq!(inactivity_timeout(12), Duration::from_secs(12 * 3600));
        assert_eq!(inactivity_timeout(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[actix_web::test]
    async fn unknown_tournament_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .service(api_get_tournament),
        )
        .await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{}", Uuid::nil()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn assistant_answers_rules_questions() {
        let assistant: Assistant = Data::new(Box::new(RuleBookAssistant) as Box<dyn RulesAssistant + Send + Sync>);
        let app = test::init_service(App::new().app_data(assistant).service(api_assistant)).await;
        let req = test::TestRequest::post()
            .uri("/api/assistant")
            .set_json(serde_json::json!({ "message": "How many points in the tie-break?" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["reply"].as_str().unwrap().contains("15"));
    }
}
