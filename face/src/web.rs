//! HTTP and WebSocket front end.

use crate::geometry::render_svg;
use crate::robot::{Mode, Robot};
use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use mouth::MouthState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub robot: Arc<Robot>,
    /// Formatted log lines forwarded to sockets.
    pub logs: broadcast::Sender<String>,
}

#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Deserialize)]
struct SubmitRequest {
    #[serde(default)]
    mode: Mode,
    text: String,
}

/// Everything the page needs to draw itself.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusReport {
    pub mouth: MouthState,
    pub loading: bool,
    pub speaking: bool,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Update<'a> {
    Mouth(&'a MouthState),
    Loading { loading: bool },
    Log { line: &'a str },
}

fn report(robot: &Robot) -> StatusReport {
    StatusReport {
        mouth: robot.state(),
        loading: robot.loading(),
        speaking: robot.speaking(),
    }
}

/// Serve the embedded `index.html`.
pub async fn index() -> Html<&'static str> {
    static INDEX: &str = include_str!("../index.html");
    Html(INDEX)
}

async fn face_svg(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_svg(&state.robot.state()),
    )
}

async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(report(&state.robot))
}

async fn speak(State(state): State<AppState>, Json(req): Json<TextRequest>) -> StatusCode {
    state.robot.speak(&req.text).await;
    StatusCode::ACCEPTED
}

async fn ask(State(state): State<AppState>, Json(req): Json<TextRequest>) -> StatusCode {
    let robot = state.robot.clone();
    tokio::spawn(async move { robot.ask(&req.text).await });
    StatusCode::ACCEPTED
}

async fn stop(State(state): State<AppState>) -> StatusCode {
    state.robot.stop().await;
    StatusCode::NO_CONTENT
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move { handle_socket(socket, state).await })
}

async fn send(socket: &mut WebSocket, update: &Update<'_>) -> bool {
    match serde_json::to_string(update) {
        Ok(payload) => socket.send(WsMessage::Text(payload.into())).await.is_ok(),
        Err(_) => false,
    }
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut mouth = state.robot.subscribe();
    let mut loading = state.robot.watch_loading();
    let mut logs = state.logs.subscribe();
    let current = state.robot.state();
    if !send(&mut socket, &Update::Mouth(&current)).await {
        return;
    }
    let thinking = *loading.borrow_and_update();
    if !send(&mut socket, &Update::Loading { loading: thinking }).await {
        return;
    }
    loop {
        tokio::select! {
            snapshot = mouth.recv() => {
                match snapshot {
                    Ok(snapshot) => {
                        if !send(&mut socket, &Update::Mouth(&snapshot)).await { break; }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            changed = loading.changed() => {
                if changed.is_err() { break; }
                let thinking = *loading.borrow_and_update();
                if !send(&mut socket, &Update::Loading { loading: thinking }).await { break; }
            }
            line = logs.recv() => {
                match line {
                    Ok(line) => {
                        if !send(&mut socket, &Update::Log { line: &line }).await { break; }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Ok(req) = serde_json::from_str::<SubmitRequest>(text.as_str()) {
                            let robot = state.robot.clone();
                            tokio::spawn(async move { robot.submit(req.mode, &req.text).await });
                        } else {
                            debug!("ignoring malformed socket message");
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }
}

/// Build the application router with the provided state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/face.svg", get(face_svg))
        .route("/state", get(status))
        .route("/speak", post(speak))
        .route("/ask", post(ask))
        .route("/stop", post(stop))
        .route("/ws", get(ws_handler))
        .with_state(state)
}
