use async_trait::async_trait;
use face::{AppState, Robot, StatusReport, app};
use futures::{SinkExt, Stream, StreamExt};
use llm::{LLMClient, LLMError};
use mouth::{MouthState, Profile};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tts::{SimulatedEngine, TtsMouth, VoiceSettings};

struct EchoLLM;

#[async_trait]
impl LLMClient for EchoLLM {
    async fn ask(&self, question: &str) -> Result<String, LLMError> {
        Ok(format!("You asked {question}"))
    }
}

struct Served {
    base: String,
    robot: Arc<Robot>,
    logs: broadcast::Sender<String>,
}

async fn serve() -> Served {
    let profile = Profile::default();
    let engine = Arc::new(SimulatedEngine::new(profile.analyzer()));
    let mouth = Arc::new(TtsMouth::with_profile(engine, profile, VoiceSettings::default()));
    let driver = mouth.driver().clone();
    let robot = Arc::new(Robot::new(mouth, driver, Arc::new(EchoLLM)));
    let (logs, _) = broadcast::channel(16);
    let state = AppState {
        robot: robot.clone(),
        logs: logs.clone(),
    };
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app(state)).await.unwrap() });
    Served {
        base: format!("http://{addr}"),
        robot,
        logs,
    }
}

async fn status(base: &str) -> StatusReport {
    reqwest::get(format!("{base}/state"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn index_serves_page() {
    let served = serve().await;
    let resp = reqwest::get(&served.base).await.unwrap();
    assert!(resp.status().is_success());
    let body = resp.text().await.unwrap();
    assert!(body.contains("<title>Robot</title>"));
}

#[tokio::test]
async fn idle_state_and_face() {
    let served = serve().await;
    let report = status(&served.base).await;
    assert_eq!(
        report,
        StatusReport {
            mouth: MouthState::idle(),
            loading: false,
            speaking: false,
        }
    );

    let resp = reqwest::get(format!("{}/face.svg", served.base)).await.unwrap();
    assert_eq!(resp.headers()["content-type"], "image/svg+xml");
    let svg = resp.text().await.unwrap();
    assert!(svg.starts_with("<svg"));
}

#[tokio::test]
async fn speak_then_stop() {
    let served = serve().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/speak", served.base))
        .json(&serde_json::json!({ "text": "hello there little robot" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::ACCEPTED);

    let mut report = status(&served.base).await;
    for _ in 0..50 {
        if report.mouth.is_animating {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        report = status(&served.base).await;
    }
    assert!(report.speaking);
    assert_eq!(report.mouth.current_word, "hello");

    let resp = client
        .post(format!("{}/stop", served.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
    assert!(!served.robot.speaking());
    assert_eq!(status(&served.base).await.mouth, MouthState::idle());
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let served = serve().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/speak", served.base))
        .header("content-type", "application/json")
        .body("{\"words\": 3}")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    assert!(!served.robot.speaking());
}

async fn next_json<S>(socket: &mut S) -> Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("socket went quiet")
            .unwrap()
            .unwrap();
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

#[tokio::test]
async fn socket_streams_face_updates() {
    let served = serve().await;
    let url = format!("{}/ws", served.base.replace("http", "ws"));
    let (mut socket, _) = connect_async(url).await.unwrap();

    let first = next_json(&mut socket).await;
    assert_eq!(first["type"], "mouth");
    assert_eq!(first["isAnimating"], false);
    let second = next_json(&mut socket).await;
    assert_eq!(second["type"], "loading");
    assert_eq!(second["loading"], false);

    let request = serde_json::json!({ "mode": "speak", "text": "beep boop" }).to_string();
    socket.send(Message::Text(request.into())).await.unwrap();
    loop {
        let update = next_json(&mut socket).await;
        if update["type"] == "mouth" && update["isAnimating"] == true {
            assert_eq!(update["currentWord"], "beep");
            assert_eq!(update["currentSyllable"], 1);
            break;
        }
    }
}

#[tokio::test]
async fn socket_forwards_logs_and_answers() {
    let served = serve().await;
    let url = format!("{}/ws", served.base.replace("http", "ws"));
    let (mut socket, _) = connect_async(url).await.unwrap();
    next_json(&mut socket).await;
    next_json(&mut socket).await;

    served.logs.send("INFO hello from the robot".into()).unwrap();
    let log = next_json(&mut socket).await;
    assert_eq!(log["type"], "log");
    assert_eq!(log["line"], "INFO hello from the robot");

    let request = serde_json::json!({ "mode": "ask", "text": "why?" }).to_string();
    socket.send(Message::Text(request.into())).await.unwrap();
    loop {
        let update = next_json(&mut socket).await;
        if update["type"] == "mouth" && update["currentWord"] == "you" {
            break;
        }
    }
    assert!(!served.robot.loading());
}
