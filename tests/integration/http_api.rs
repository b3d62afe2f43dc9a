//! End-to-end tests of the HTTP API

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use game_night::config::AppConfig;
use game_night::service::{router, ServiceContext, ACCOUNT_HEADER};
use game_night::store::InMemoryScoreStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const ACCOUNT: &str = "board-game-cafe";

fn app() -> Router {
    let context =
        ServiceContext::new(AppConfig::default(), Arc::new(InMemoryScoreStore::new())).unwrap();
    router(context)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, ACCOUNT, method, uri, body).await
}

async fn send_as(
    app: &Router,
    account: &str,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(ACCOUNT_HEADER, account);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, username: &str) -> u64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/players",
        Some(json!({ "firstName": "Test", "lastName": "Player", "username": username })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn test_game_night_flow() {
    let app = app();

    let (status, game) = send(&app, "POST", "/api/games", Some(json!({ "game": "Catan" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let game_id = game["id"].as_u64().unwrap();
    assert_eq!(game["game"], "Catan");

    let a = register(&app, "ana").await;
    let b = register(&app, "ben").await;
    let c = register(&app, "cai").await;

    for (player, value) in [(a, 10.0), (b, 5.0)] {
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/scores/{}", player),
            Some(json!({ "value": value, "game": game_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["score"]["value"], value);
    }

    let (status, skill) = send(&app, "GET", &format!("/api/skill/{}/{}", a, game_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(skill["skillLevel"], 10.0);

    let (_, total) = send(&app, "GET", &format!("/api/skill/{}/0", a), None).await;
    assert_eq!(total["skillLevel"], 3.0);

    let (status, leaderboard) = send(&app, "GET", "/api/leaderboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        leaderboard,
        json!([
            { "id": a, "username": "ana", "points": 3 },
            { "id": b, "username": "ben", "points": 2 },
            { "id": c, "username": "cai", "points": 0 }
        ])
    );

    let (status, teams) = send(
        &app,
        "POST",
        "/api/teams",
        Some(json!({ "participants": [c, a, b], "teamCount": 2, "game": game_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams["teamCount"], 2);
    assert_eq!(teams["labels"], json!(["Team 1", "Team 2"]));

    let rows = teams["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let mut first_row: Vec<&str> = rows[0]
        .as_object()
        .unwrap()
        .values()
        .filter_map(Value::as_str)
        .collect();
    first_row.sort();
    assert_eq!(first_row, vec!["ana", "ben"]);
    let seated_last: Vec<&Value> = rows[1]
        .as_object()
        .unwrap()
        .values()
        .filter(|v| !v.is_null())
        .collect();
    assert_eq!(seated_last, vec![&json!("cai")]);
    assert_eq!(teams["assignments"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_skill_is_hidden_from_other_accounts() {
    let app = app();
    let (_, game) = send(&app, "POST", "/api/games", Some(json!({ "game": "Azul" }))).await;
    let game_id = game["id"].as_u64().unwrap();
    let id = register(&app, "tile-layer").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/scores/{}", id),
        Some(json!({ "value": 42, "game": game_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/skill/{}/{}", id, game_id);
    let (_, own) = send(&app, "GET", &uri, None).await;
    assert_eq!(own["skillLevel"], 42.0);

    let (status, foreign) = send_as(&app, "rival-club", "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(foreign["skillLevel"], 0.0);

    let (status, _) = send_as(&app, "rival-club", "GET", &format!("/api/scores/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_count_defaults_from_config() {
    let app = app();
    let ids = [
        register(&app, "p1").await,
        register(&app, "p2").await,
        register(&app, "p3").await,
        register(&app, "p4").await,
    ];

    let (status, teams) = send(
        &app,
        "POST",
        "/api/teams",
        Some(json!({ "participants": ids })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams["teamCount"], 2);
    assert_eq!(teams["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_player_management() {
    let app = app();
    let id = register(&app, "oldname").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/players",
        Some(json!({ "existingUsername": "oldname", "newUsername": "newname" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"]["username"], "newname");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/players",
        Some(json!({ "existingUsername": "ghost", "newUsername": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, player) = send(&app, "GET", &format!("/api/player/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(player["username"], "newname");
    assert_eq!(player["accountId"], ACCOUNT);

    let (status, body) = send(&app, "DELETE", &format!("/api/player/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedPlayer"]["id"], id);

    let (status, _) = send(&app, "GET", &format!("/api/player/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, players) = send(&app, "GET", "/api/players", None).await;
    assert_eq!(players, json!([]));
}

#[tokio::test]
async fn test_score_validation() {
    let app = app();
    let id = register(&app, "scorer").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/scores/{}", id),
        Some(json!({ "value": 3, "game": 77 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/scores/999",
        Some(json!({ "value": 3, "game": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &format!("/api/scores/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scores"], json!([]));
}

#[tokio::test]
async fn test_readiness_requires_running_service() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
