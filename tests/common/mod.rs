#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use axum::{
    debug_handler,
    extract::{ws::Message, Multipart, Query, State, WebSocketUpgrade},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use kindred::{api, Api, Config, Prompt};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub route: &'static str,
    pub last_id: Option<i64>,
    pub csrf: Option<String>,
    pub body: Value,
    /// (field name, file name) of every multipart part
    pub parts: Vec<(String, String)>,
}

#[derive(Default)]
struct Script {
    replies: HashMap<&'static str, VecDeque<(StatusCode, Value)>>,
    requests: Vec<Recorded>,
}

#[derive(Clone, Default)]
pub struct FakeState(Arc<Mutex<Script>>);

impl FakeState {
    fn record(&self, recorded: Recorded) {
        self.0.lock().unwrap().requests.push(recorded);
    }

    fn reply(&self, route: &'static str) -> (StatusCode, Json<Value>) {
        let scripted = self.0.lock().unwrap()
            .replies
            .get_mut(route)
            .and_then(VecDeque::pop_front);

        let (status, body) = scripted.unwrap_or_else(|| (StatusCode::OK, default_reply(route)));
        (status, Json(body))
    }
}

fn default_reply(route: &str) -> Value {
    match route {
        api::LOAD_MESSAGES => json!({ "messages": [] }),
        api::LOAD_PROFILES => json!({ "profiles": [] }),
        api::UPLOAD_PHOTOS => json!({ "success": true, "profilePhotos": [] }),
        _ => json!({ "success": true }),
    }
}

#[derive(Deserialize)]
struct CursorQuery {
    last_id: Option<i64>,
}

fn csrf(headers: &HeaderMap) -> Option<String> {
    headers.get(api::CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[debug_handler]
async fn load_messages(
    State(state): State<FakeState>,
    Query(CursorQuery { last_id }): Query<CursorQuery>,
) -> impl IntoResponse {
    state.record(Recorded { route: api::LOAD_MESSAGES, last_id, ..Default::default() });
    state.reply(api::LOAD_MESSAGES)
}

#[debug_handler]
async fn load_profiles(
    State(state): State<FakeState>,
    Query(CursorQuery { last_id }): Query<CursorQuery>,
) -> impl IntoResponse {
    state.record(Recorded { route: api::LOAD_PROFILES, last_id, ..Default::default() });
    state.reply(api::LOAD_PROFILES)
}

#[debug_handler]
async fn upload_photos(
    State(state): State<FakeState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let _ = field.bytes().await;
        parts.push((name, file_name));
    }

    state.record(Recorded { route: api::UPLOAD_PHOTOS, csrf: csrf(&headers), parts, ..Default::default() });
    state.reply(api::UPLOAD_PHOTOS)
}

#[debug_handler]
async fn delete_photos(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.record(Recorded { route: api::DELETE_PHOTOS, csrf: csrf(&headers), body, ..Default::default() });
    state.reply(api::DELETE_PHOTOS)
}

/// Relays every chat message back the way the server's group broadcast does.
#[debug_handler]
async fn chat_ws(State(state): State<FakeState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |stream| async move {
        let (mut sender, mut receiver) = stream.split();

        while let Some(Ok(msg)) = receiver.next().await {
            let Ok(body) = serde_json::from_slice::<Value>(&msg.into_data()) else {
                continue
            };
            state.record(Recorded { route: api::CHAT_SOCKET, body: body.clone(), ..Default::default() });

            let relayed = json!({
                "message": body["message"],
                "username": body["username"],
                "time": "10:15",
            });
            if sender.send(Message::Text(relayed.to_string().into())).await.is_err() {
                break;
            }
        }
    })
}

pub struct FakeServer {
    pub base_url: String,
    state: FakeState,
}

impl FakeServer {
    pub async fn spawn() -> FakeServer {
        let state = FakeState::default();
        let app = Router::new()
            .route(api::LOAD_MESSAGES, get(load_messages))
            .route(api::LOAD_PROFILES, get(load_profiles))
            .route(api::UPLOAD_PHOTOS, post(upload_photos))
            .route(api::DELETE_PHOTOS, post(delete_photos))
            .route(api::CHAT_SOCKET, get(chat_ws))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeServer { base_url: format!("http://{addr}"), state }
    }

    pub fn script(&self, route: &'static str, status: StatusCode, body: Value) {
        self.state.0.lock().unwrap()
            .replies
            .entry(route)
            .or_default()
            .push_back((status, body));
    }

    pub fn requests(&self, route: &str) -> Vec<Recorded> {
        self.state.0.lock().unwrap()
            .requests
            .iter()
            .filter(|r| r.route == route)
            .cloned()
            .collect()
    }

    pub fn config(&self, viewer: &str) -> Config {
        Config::new(&self.base_url)
            .unwrap()
            .with_viewer(viewer)
            .with_csrf_token("tok")
    }

    pub fn api(&self, viewer: &str) -> Api {
        Api::new(&self.config(viewer)).unwrap()
    }
}

/// Records dialogs instead of blocking on them.
pub struct RecordingPrompt {
    pub alerts: RefCell<Vec<String>>,
    pub confirms: Cell<usize>,
    pub answer: bool,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> RecordingPrompt {
        RecordingPrompt { alerts: RefCell::default(), confirms: Cell::new(0), answer }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Prompt for RecordingPrompt {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }

    fn confirm(&self, _message: &str) -> bool {
        self.confirms.set(self.confirms.get() + 1);
        self.answer
    }
}
