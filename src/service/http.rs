//! HTTP API, health endpoints and Prometheus metrics
//!
//! All `/api` routes are scoped to the account named by the `x-account-id`
//! header. Operational routes (`/`, `/health`, `/ready`, `/metrics`) are not.

use crate::engine::TeamRequest;
use crate::error::GameNightError;
use crate::service::app::ServiceContext;
use crate::service::health::{HealthCheck, HealthStatus};
use crate::teams::{team_label, TeamAssignment};
use crate::types::{
    AccountId, Game, GameId, LeaderboardEntry, NewPlayer, NewScore, Player, PlayerId, ScoreEvent,
    DEFAULT_ACCOUNT,
};
use crate::utils::current_timestamp;
use axum::{
    extract::{FromRequestParts, MatchedPath, Path, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::convert::Infallible;
use tracing::{debug, error, info};

/// Header carrying the caller's account id
pub const ACCOUNT_HEADER: &str = "x-account-id";

/// Account the request is scoped to
#[derive(Debug, Clone, PartialEq)]
pub struct Account(pub AccountId);

impl<S> FromRequestParts<S> for Account
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = parts
            .headers
            .get(ACCOUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ACCOUNT);
        Ok(Account(account.to_string()))
    }
}

/// Error response carrying the status derived from [`GameNightError`]
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<GameNightError>() {
            Some(GameNightError::InvalidArgument { .. }) => StatusCode::BAD_REQUEST,
            Some(GameNightError::PlayerNotFound { .. }) | Some(GameNightError::GameNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            Some(GameNightError::UsernameTaken { .. }) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:#}", self.0);
            "Internal server error".to_string()
        } else {
            debug!("Request rejected: {}", self.0);
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkillResponse {
    skill_level: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamsBody {
    participants: Vec<PlayerId>,
    #[serde(default)]
    team_count: Option<usize>,
    #[serde(default, rename = "game")]
    game_id: GameId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamsResponse {
    team_count: usize,
    labels: Vec<String>,
    rows: Vec<BTreeMap<String, Option<String>>>,
    assignments: BTreeMap<PlayerId, String>,
}

impl TeamsResponse {
    fn render(assignment: &TeamAssignment, label_prefix: &str) -> Self {
        let labels: Vec<String> = (0..assignment.team_count)
            .map(|bucket| team_label(label_prefix, bucket))
            .collect();

        let rows = assignment
            .rows
            .iter()
            .map(|row| {
                row.seats
                    .iter()
                    .enumerate()
                    .map(|(bucket, seat)| {
                        (
                            labels[bucket].clone(),
                            seat.as_ref().map(|entry| entry.username.clone()),
                        )
                    })
                    .collect()
            })
            .collect();

        let assignments = assignment
            .buckets
            .iter()
            .map(|(player_id, bucket)| (*player_id, labels[*bucket].clone()))
            .collect();

        Self {
            team_count: assignment.team_count,
            labels,
            rows,
            assignments,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameBody {
    existing_username: String,
    new_username: String,
}

#[derive(Debug, Deserialize)]
struct GameBody {
    game: String,
}

#[derive(Debug, Deserialize)]
struct ScoreBody {
    value: f64,
    game: GameId,
}

/// Build the full router over `context`
pub fn router(context: ServiceContext) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/skill/{player_id}/{game_id}", get(skill_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .route("/api/teams", post(teams_handler))
        .route(
            "/api/players",
            get(list_players).post(add_player).put(rename_player),
        )
        .route("/api/player/{player_id}", get(get_player).delete(delete_player))
        .route("/api/games", get(list_games).post(add_game))
        .route("/api/scores/{player_id}", get(list_scores).post(add_score))
        .route_layer(middleware::from_fn_with_state(
            context.clone(),
            track_requests,
        ))
        .with_state(context)
}

async fn track_requests(
    State(context): State<ServiceContext>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    context
        .metrics()
        .record_http_request(&route, response.status().as_u16());
    response
}

/// Root endpoint handler - shows service information
async fn root_handler(State(context): State<ServiceContext>) -> impl IntoResponse {
    Json(json!({
        "service": context.config().service.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/health",
            "/ready",
            "/metrics",
            "/api/skill/{player_id}/{game_id}",
            "/api/leaderboard",
            "/api/teams",
            "/api/players",
            "/api/games",
            "/api/scores/{player_id}"
        ]
    }))
}

async fn health_handler(State(context): State<ServiceContext>) -> Response {
    debug!("Health check requested");

    match HealthCheck::check(&context).await {
        Ok(health) => {
            let status = match health.status {
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::OK,
            };
            (status, Json(health)).into_response()
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": context.config().service.name,
                    "version": env!("CARGO_PKG_VERSION")
                })),
            )
                .into_response()
        }
    }
}

async fn ready_handler(State(context): State<ServiceContext>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(&context).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Ready"),
        Ok(HealthStatus::Degraded) => (StatusCode::OK, "Degraded but ready"),
        Ok(HealthStatus::Unhealthy) => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
        }
    }
}

async fn metrics_handler(State(context): State<ServiceContext>) -> Response {
    let metric_families = context.metrics().registry().gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(output) => {
            debug!("Serving {} metric families", metric_families.len());
            (
                [(header::CONTENT_TYPE, encoder.format_type().to_string())],
                output,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}

async fn skill_handler(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Path((player_id, game_id)): Path<(PlayerId, GameId)>,
) -> ApiResult<Json<SkillResponse>> {
    let skill_level = context.engine().skill_level(&account, player_id, game_id)?;
    Ok(Json(SkillResponse { skill_level }))
}

async fn leaderboard_handler(
    State(context): State<ServiceContext>,
    Account(account): Account,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(context.engine().leaderboard(&account)?))
}

async fn teams_handler(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Json(body): Json<TeamsBody>,
) -> ApiResult<Json<TeamsResponse>> {
    let request = TeamRequest {
        participants: body.participants,
        team_count: body
            .team_count
            .unwrap_or(context.config().teams.default_team_count),
        game_id: body.game_id,
    };

    let assignment = context.engine().generate_teams(&account, &request)?;
    Ok(Json(TeamsResponse::render(
        &assignment,
        &context.config().teams.label_prefix,
    )))
}

async fn list_players(
    State(context): State<ServiceContext>,
    Account(account): Account,
) -> ApiResult<Json<Vec<Player>>> {
    Ok(Json(context.store().players(&account)?))
}

async fn add_player(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Json(new_player): Json<NewPlayer>,
) -> ApiResult<(StatusCode, Json<Player>)> {
    let player = context
        .store()
        .add_player(&account, new_player)
        .inspect_err(|_| context.metrics().record_store_error("add_player"))?;

    context.metrics().record_entity_mutation("player_added");
    info!("Added player {} ({}) to account {}", player.username, player.id, account);
    Ok((StatusCode::CREATED, Json(player)))
}

async fn rename_player(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Json(body): Json<RenameBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = context.store();
    let owned = store
        .players(&account)?
        .iter()
        .any(|p| p.username == body.existing_username);
    if !owned {
        return Err(GameNightError::PlayerNotFound {
            player_id: body.existing_username,
        }
        .into());
    }

    let player = store.rename_player(&body.existing_username, &body.new_username)?;
    context.metrics().record_entity_mutation("player_renamed");
    info!(
        "Renamed player {} from {} to {}",
        player.id, body.existing_username, player.username
    );
    Ok(Json(json!({
        "message": "Username updated successfully",
        "player": player
    })))
}

/// Look up a player of `account`; players of other accounts are reported missing
fn owned_player(context: &ServiceContext, account: &str, player_id: PlayerId) -> ApiResult<Player> {
    match context.store().player(player_id)? {
        Some(player) if player.account_id == account => Ok(player),
        _ => Err(GameNightError::PlayerNotFound {
            player_id: player_id.to_string(),
        }
        .into()),
    }
}

async fn get_player(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Path(player_id): Path<PlayerId>,
) -> ApiResult<Json<Player>> {
    Ok(Json(owned_player(&context, &account, player_id)?))
}

async fn delete_player(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Path(player_id): Path<PlayerId>,
) -> ApiResult<Json<serde_json::Value>> {
    owned_player(&context, &account, player_id)?;
    let removed = context.store().remove_player(player_id)?;

    context.metrics().record_entity_mutation("player_removed");
    info!("Removed player {} ({})", removed.username, removed.id);
    Ok(Json(json!({
        "message": "Player deleted successfully",
        "deletedPlayer": removed
    })))
}

async fn list_games(
    State(context): State<ServiceContext>,
    Account(account): Account,
) -> ApiResult<Json<Vec<Game>>> {
    Ok(Json(context.store().games(&account)?))
}

async fn add_game(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Json(body): Json<GameBody>,
) -> ApiResult<(StatusCode, Json<Game>)> {
    let game = context.store().add_game(&account, &body.game)?;
    context.metrics().record_entity_mutation("game_added");
    info!("Added game {} ({}) to account {}", game.game, game.id, account);
    Ok((StatusCode::CREATED, Json(game)))
}

async fn list_scores(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Path(player_id): Path<PlayerId>,
) -> ApiResult<Json<serde_json::Value>> {
    owned_player(&context, &account, player_id)?;
    let scores: Vec<ScoreEvent> = context.store().scores(player_id)?;
    Ok(Json(json!({
        "playerId": player_id,
        "scores": scores
    })))
}

async fn add_score(
    State(context): State<ServiceContext>,
    Account(account): Account,
    Path(player_id): Path<PlayerId>,
    Json(body): Json<ScoreBody>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    owned_player(&context, &account, player_id)?;
    let in_account = context
        .store()
        .games(&account)?
        .iter()
        .any(|g| g.id == body.game);
    if !in_account {
        return Err(GameNightError::GameNotFound { game_id: body.game }.into());
    }

    let event = context
        .store()
        .append_score(
            player_id,
            NewScore {
                game_id: body.game,
                value: body.value,
                recorded_at: current_timestamp(),
            },
        )
        .inspect_err(|_| context.metrics().record_store_error("append_score"))?;

    context.metrics().record_score_recorded();
    debug!(
        "Recorded score {} for player {} in game {}",
        event.value, player_id, event.game_id
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Score added successfully",
            "score": event
        })),
    ))
}
