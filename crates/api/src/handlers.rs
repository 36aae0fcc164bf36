// ABOUTME: HTTP route handlers: per-game stats lookups, admin key creation, and liveness.
// ABOUTME: Every stats route authorizes and rate-limits before touching the scrape client.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use playerstats_scrape::{Cs2, Cs2Stats, Playlist, Season, Tft, TftStats, Valorant, ValorantStats};

use crate::keys::{generate_key, ApiKey, Permission};
use crate::shared::{AppError, AppState};

/// Builds the application router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/valorant/player/:id", get(valorant_default))
        .route("/valorant/player/:id/:season", get(valorant_scoped))
        .route("/cs2/player/:id", get(cs2_default))
        .route("/cs2/player/:id/:playlist", get(cs2_scoped))
        .route("/tft/player/:id", get(tft_stats))
        .route("/admin/create-api-key", post(create_api_key))
        .with_state(state)
}

/// Liveness probe with no dependencies.
async fn status() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn not_found(player: &str) -> AppError {
    AppError::NotFound(format!("stats not found for player '{}'", player))
}

fn scrape_failed(err: playerstats_scrape::ScrapeError) -> AppError {
    AppError::Store(err.to_string())
}

#[instrument(name = "valorant_stats", skip(state, headers))]
async fn valorant_default(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ValorantStats>, AppError> {
    fetch_valorant(state, headers, id, Season::Current).await
}

#[instrument(name = "valorant_stats_scoped", skip(state, headers))]
async fn valorant_scoped(
    State(state): State<AppState>,
    Path((id, season)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<ValorantStats>, AppError> {
    let season = season
        .parse::<Season>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    fetch_valorant(state, headers, id, season).await
}

async fn fetch_valorant(
    state: AppState,
    headers: HeaderMap,
    id: String,
    season: Season,
) -> Result<Json<ValorantStats>, AppError> {
    state.authorize(&headers, "valorant").await?;
    let stats = state
        .scraper
        .player_stats(&Valorant, &id, season)
        .await
        .map_err(scrape_failed)?;
    stats.map(Json).ok_or_else(|| not_found(&id))
}

#[instrument(name = "cs2_stats", skip(state, headers))]
async fn cs2_default(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Cs2Stats>, AppError> {
    fetch_cs2(state, headers, id, Playlist::Premier).await
}

#[instrument(name = "cs2_stats_scoped", skip(state, headers))]
async fn cs2_scoped(
    State(state): State<AppState>,
    Path((id, playlist)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Cs2Stats>, AppError> {
    let playlist = playlist
        .parse::<Playlist>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    fetch_cs2(state, headers, id, playlist).await
}

async fn fetch_cs2(
    state: AppState,
    headers: HeaderMap,
    id: String,
    playlist: Playlist,
) -> Result<Json<Cs2Stats>, AppError> {
    state.authorize(&headers, "cs2").await?;
    let stats = state
        .scraper
        .player_stats(&Cs2, &id, playlist)
        .await
        .map_err(scrape_failed)?;
    stats.map(Json).ok_or_else(|| not_found(&id))
}

#[instrument(name = "tft_stats", skip(state, headers))]
async fn tft_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TftStats>, AppError> {
    state.authorize(&headers, "tft").await?;
    let stats = state
        .scraper
        .player_stats(&Tft, &id, ())
        .await
        .map_err(scrape_failed)?;
    stats.map(Json).ok_or_else(|| not_found(&id))
}

#[derive(Debug, Deserialize)]
struct CreateKeyParams {
    user: String,
    permission: String,
}

/// Creates a new API key. Requires an admin credential; a pre-chosen key
/// may be supplied via the `X-New-Api-Key` header, otherwise a random
/// 32-character alphanumeric key is generated.
#[instrument(name = "create_api_key", skip(state, headers))]
async fn create_api_key(
    State(state): State<AppState>,
    Query(params): Query<CreateKeyParams>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ApiKey>), AppError> {
    let caller = state.authorize(&headers, "admin/create-api-key").await?;
    if caller.permission != Permission::Admin {
        return Err(AppError::Forbidden(
            "admin permission required".to_string(),
        ));
    }

    let permission = params.permission.parse::<Permission>()?;
    let key = headers
        .get("x-new-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(generate_key);

    let record = ApiKey {
        key,
        user: params.user,
        permission,
        created_at: Utc::now(),
    };
    state.keys.insert(&record).await?;

    info!(user = %record.user, permission = %record.permission, "API key created");
    Ok((StatusCode::CREATED, Json(record)))
}
