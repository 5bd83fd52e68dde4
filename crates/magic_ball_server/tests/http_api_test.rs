//! HTTP API tests driving the router in-process.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use magic_ball_server::{SESSION_HEADER, ServerConfig, SessionManager, router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(config: ServerConfig) -> Router {
    router(SessionManager::new(config.with_seed(Some(42))))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn raw_post(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_new_game_and_push() {
    let app = app(ServerConfig::default());
    let (status, body) = send(
        &app,
        "POST",
        "/api/game/new",
        None,
        Some(json!({"game_type": "human_vs_human"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["game_state"]["game_status"], 1);
    assert_eq!(body["game_state"]["current_player"], "white");
    assert_eq!(body["game_state"]["ball_position"], "middle");
    assert_eq!(body["game_state"]["board"][4][2], "white");
    assert_eq!(body["game_state"]["board"][2][2], Value::Null);

    let (status, body) = send(
        &app,
        "POST",
        "/api/game/move",
        None,
        Some(json!({"type": "push", "source_tile": "C5", "target_tile": "C4"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_state"]["current_player"], "black");
    assert_eq!(body["game_state"]["board"][3][2], "white");
    assert!(body["move_description"].as_str().unwrap().contains("C4"));
}

#[tokio::test]
async fn test_state_fields_sit_beside_success() {
    let app = app(ServerConfig::default());
    send(&app, "POST", "/api/game/new", None, Some(json!({"game_type": "human_vs_human"}))).await;

    let (status, body) = send(&app, "GET", "/api/game/state", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["current_player"], "white");
    assert_eq!(body["ball_position"], "middle");
    assert_eq!(body["game_status"], 1);
    assert_eq!(body["board"][0][0], "black");
    assert!(body.get("game_state").is_none());
}

#[tokio::test]
async fn test_rejection_shape() {
    let app = app(ServerConfig::default());
    send(&app, "POST", "/api/game/new", None, Some(json!({"game_type": "human_vs_human"}))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/game/move",
        None,
        Some(json!({"type": "push", "source_tile": "C1", "target_tile": "C2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid-source");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_missing_session_is_not_found() {
    let app = app(ServerConfig::default());
    let (status, body) = send(&app, "GET", "/api/game/state", Some("ghost"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no-session");
}

#[tokio::test]
async fn test_malformed_bodies() {
    let app = app(ServerConfig::default());
    send(&app, "POST", "/api/game/new", None, Some(json!({"game_type": "human_vs_human"}))).await;

    let (status, body) = raw_post(&app, "/api/game/move", "{not json").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "malformed-request");

    let (status, body) = raw_post(&app, "/api/game/move", r#"{"type":"teleport"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "malformed-request");

    let (status, body) = raw_post(&app, "/api/game/move", r#"{"type":"card","card_index":0}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "malformed-request");

    let (status, body) = raw_post(&app, "/api/game/new", r#"{"game_type":"solo"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/api/game/card-moves/first", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "malformed-request");
}

#[tokio::test]
async fn test_session_header_isolates_games() {
    let app = app(ServerConfig::default());
    for session in ["alice", "bob"] {
        send(
            &app,
            "POST",
            "/api/game/new",
            Some(session),
            Some(json!({"game_type": "human_vs_human"})),
        )
        .await;
    }

    send(
        &app,
        "POST",
        "/api/game/move",
        Some("alice"),
        Some(json!({"type": "push", "source_tile": "A5", "target_tile": "A4"})),
    )
    .await;

    let (_, alice) = send(&app, "GET", "/api/game/state", Some("alice"), None).await;
    let (_, bob) = send(&app, "GET", "/api/game/state", Some("bob"), None).await;
    assert_eq!(alice["current_player"], "black");
    assert_eq!(bob["current_player"], "white");

    let (status, _) = send(&app, "GET", "/api/game/state", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ai_cards_are_concealed() {
    let app = app(ServerConfig::default());
    send(
        &app,
        "POST",
        "/api/game/new",
        None,
        Some(json!({
            "game_type": "human_vs_ai",
            "human_player_side": "white",
            "white_cards": ["jump"],
            "black_cards": ["tank", "knight"],
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/game/cards", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["white_cards"][0]["name"], "jump");
    assert_eq!(body["white_cards"][0]["already_used"], false);
    assert_eq!(body["black_cards"][0]["name"], "?");
    assert_eq!(body["black_cards"][1]["name"], "?");

    let (_, body) = send(&app, "GET", "/api/game/state", None, None).await;
    assert_eq!(body["black_cards"][0]["name"], "?");
    assert_eq!(body["human_player_side"], "white");
}

#[tokio::test]
async fn test_ai_card_moves_are_concealed() {
    let app = app(ServerConfig::default());
    send(
        &app,
        "POST",
        "/api/game/new",
        None,
        Some(json!({
            "game_type": "human_vs_ai",
            "human_player_side": "black",
            "white_cards": ["tank"],
            "black_cards": [],
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/game/card-moves/0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card_name"], "?");
    assert_eq!(body["card_description"], "?");
    assert_eq!(body["marker_shape"], "?");
    assert!(body["moves"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_card_moves_shown_when_concealment_disabled() {
    let app = app(ServerConfig::default().with_conceal_opponent_cards(false));
    send(
        &app,
        "POST",
        "/api/game/new",
        None,
        Some(json!({
            "game_type": "human_vs_ai",
            "human_player_side": "black",
            "white_cards": ["tank"],
            "black_cards": [],
        })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/game/card-moves/0", None, None).await;
    assert_eq!(body["card_name"], "Tank");
}

#[tokio::test]
async fn test_concealment_can_be_disabled() {
    let app = app(ServerConfig::default().with_conceal_opponent_cards(false));
    send(
        &app,
        "POST",
        "/api/game/new",
        None,
        Some(json!({
            "game_type": "human_vs_ai",
            "black_cards": ["tank"],
        })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/game/cards", None, None).await;
    assert_eq!(body["black_cards"][0]["name"], "tank");
}

#[tokio::test]
async fn test_card_moves_and_marker_move() {
    let app = app(ServerConfig::default());
    send(
        &app,
        "POST",
        "/api/game/new",
        None,
        Some(json!({
            "game_type": "human_vs_human",
            "white_cards": ["jump"],
            "black_cards": [],
        })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/game/card-moves/0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card_name"], "Jump");
    assert_eq!(body["marker_shape"], "two_marker");
    assert_eq!(body["moves"].as_array().unwrap().len(), 5);
    assert_eq!(body["moves"][0]["tile_marker_1"], "A5");
    assert_eq!(body["moves"][0]["tile_marker_2"], "A3");

    let (status, body) = send(
        &app,
        "POST",
        "/api/game/move",
        None,
        Some(json!({"type": "card", "card_index": 0, "tile_marker_1": "B5", "tile_marker_2": "B3"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_state"]["board"][2][1], "white");
    assert_eq!(body["game_state"]["white_cards"][0]["already_used"], true);
    assert_eq!(body["game_state"]["ball_position"], "black");

    let (status, body) = send(&app, "GET", "/api/game/card-moves/3", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown-or-used-card");
}

#[tokio::test]
async fn test_automated_move_endpoint() {
    let app = app(ServerConfig::default());
    send(
        &app,
        "POST",
        "/api/game/new",
        Some("ai"),
        Some(json!({"game_type": "human_vs_ai", "human_player_side": "black"})),
    )
    .await;

    let (status, body) = send(&app, "POST", "/api/game/automated-move", Some("ai"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_state"]["current_player"], "black");
    assert_eq!(body["game_state"]["history"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/game/valid-moves", Some("ai"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["moves"].as_array().unwrap().is_empty());
}
