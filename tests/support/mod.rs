// Shared fixtures for the integration tests: a local country.is and dataset stand-in plus scripted
// UI fakes.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use ip_geoguesser::domain::ports::{MapView, MarkerKind, PlayerPrompt, TextSlot};
use ip_geoguesser::domain::{Bounds, Coordinate};
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// What the stub answers for a single lookup request.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Country(&'static str),
    Status(u16),
    NotJson,
}

// What the stub answers on `/countries.json`.
#[derive(Debug, Clone, Copy)]
pub enum DatasetReply {
    Body(&'static str),
    Status(u16),
}

#[derive(Clone)]
struct StubState {
    script: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Reply,
    dataset: DatasetReply,
    hits: Arc<AtomicUsize>,
    no_store_hits: Arc<AtomicUsize>,
    dataset_hits: Arc<AtomicUsize>,
}

pub struct LookupStub {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    no_store_hits: Arc<AtomicUsize>,
    dataset_hits: Arc<AtomicUsize>,
}

impl LookupStub {
    // Serves `script` in order, then `fallback` forever, on an ephemeral port.
    pub async fn start(script: Vec<Reply>, fallback: Reply) -> Self {
        Self::start_with_dataset(script, fallback, DatasetReply::Status(404)).await
    }

    pub async fn start_with_dataset(
        script: Vec<Reply>,
        fallback: Reply,
        dataset: DatasetReply,
    ) -> Self {
        let state = StubState {
            script: Arc::new(Mutex::new(script.into())),
            fallback,
            dataset,
            hits: Arc::new(AtomicUsize::new(0)),
            no_store_hits: Arc::new(AtomicUsize::new(0)),
            dataset_hits: Arc::new(AtomicUsize::new(0)),
        };
        let hits = Arc::clone(&state.hits);
        let no_store_hits = Arc::clone(&state.no_store_hits);
        let dataset_hits = Arc::clone(&state.dataset_hits);

        // The static route wins over the `{ip}` capture.
        let app = Router::new()
            .route("/countries.json", get(countries))
            .route("/{ip}", get(lookup))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
            no_store_hits,
            dataset_hits,
        }
    }

    pub fn dataset_url(&self) -> String {
        format!("{}/countries.json", self.base_url)
    }

    pub fn dataset_hits(&self) -> usize {
        self.dataset_hits.load(Ordering::SeqCst)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn no_store_hits(&self) -> usize {
        self.no_store_hits.load(Ordering::SeqCst)
    }
}

async fn countries(State(state): State<StubState>) -> Response {
    state.dataset_hits.fetch_add(1, Ordering::SeqCst);
    match state.dataset {
        DatasetReply::Body(body) => (StatusCode::OK, body).into_response(),
        DatasetReply::Status(code) => StatusCode::from_u16(code)
            .expect("valid status code")
            .into_response(),
    }
}

async fn lookup(
    State(state): State<StubState>,
    Path(ip): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let no_store = headers
        .get(header::CACHE_CONTROL)
        .and_then(|value| value.to_str().ok())
        == Some("no-store");
    if no_store {
        state.no_store_hits.fetch_add(1, Ordering::SeqCst);
    }

    let reply = state
        .script
        .lock()
        .expect("script lock")
        .pop_front()
        .unwrap_or(state.fallback);

    match reply {
        Reply::Country(code) => Json(serde_json::json!({ "ip": ip, "country": code })).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code)
            .expect("valid status code")
            .into_response(),
        Reply::NotJson => (StatusCode::OK, "definitely not json").into_response(),
    }
}

#[derive(Default)]
pub struct CapturedView {
    pub texts: Vec<(TextSlot, String)>,
    pub markers: Vec<(MarkerKind, Coordinate)>,
    pub lines: usize,
    pub bounds: usize,
}

impl CapturedView {
    pub fn last_text(&self, slot: TextSlot) -> Option<&str> {
        self.texts
            .iter()
            .rev()
            .find(|(s, _)| *s == slot)
            .map(|(_, text)| text.as_str())
    }
}

impl MapView for CapturedView {
    fn clear(&mut self) {}

    fn render_marker(&mut self, kind: MarkerKind, at: Coordinate) {
        self.markers.push((kind, at));
    }

    fn render_line(&mut self, _from: Coordinate, _to: Coordinate) {
        self.lines += 1;
    }

    fn fit_bounds(&mut self, _bounds: Bounds) {
        self.bounds += 1;
    }

    fn display_text(&mut self, slot: TextSlot, text: &str) {
        self.texts.push((slot, text.to_string()));
    }
}

pub struct ScriptedPrompt {
    guesses: VecDeque<Coordinate>,
    answers: VecDeque<bool>,
}

impl ScriptedPrompt {
    pub fn new(guesses: Vec<Coordinate>, answers: Vec<bool>) -> Self {
        Self {
            guesses: guesses.into(),
            answers: answers.into(),
        }
    }
}

#[async_trait]
impl PlayerPrompt for ScriptedPrompt {
    async fn next_guess(&mut self) -> Option<Coordinate> {
        self.guesses.pop_front()
    }

    async fn confirm(&mut self, _question: &str) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }
}
