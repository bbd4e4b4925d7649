#![allow(clippy::unwrap_used, dead_code)]
//! A local chat completions endpoint for integration tests.
//!
//! Each request to `/v1/chat/completions` receives the next scripted
//! response. Requests are recorded so tests can assert on retries and
//! payloads.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use futures_util::stream;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub enum MockResponse {
    /// A streaming reply made of text chunks, terminated by `[DONE]`.
    Sse(Vec<String>),
    /// A non-success reply with an OpenAI-style error body.
    Error {
        status: u16,
        message: String,
        headers: Vec<(String, String)>,
    },
}

impl MockResponse {
    pub fn sse(chunks: &[&str]) -> Self {
        Self::Sse(chunks.iter().map(|c| (*c).to_string()).collect())
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::Error {
            status,
            message: message.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let Self::Error { headers, .. } = &mut self {
            headers.push((name.to_string(), value.to_string()));
        }
        self
    }

    fn into_response(self) -> Response {
        match self {
            Self::Sse(chunks) => {
                let events = chunks
                    .into_iter()
                    .map(|chunk| {
                        json!({ "choices": [{ "delta": { "content": chunk } }] }).to_string()
                    })
                    .chain(std::iter::once("[DONE]".to_string()))
                    .map(|data| Ok::<_, Infallible>(Event::default().data(data)));
                Sse::new(stream::iter(events)).into_response()
            }
            Self::Error {
                status,
                message,
                headers,
            } => {
                let status = StatusCode::from_u16(status).unwrap();
                let mut response =
                    (status, Json(json!({ "error": { "message": message } }))).into_response();
                for (name, value) in headers {
                    response.headers_mut().insert(
                        HeaderName::from_bytes(name.as_bytes()).unwrap(),
                        HeaderValue::from_str(&value).unwrap(),
                    );
                }
                response
            }
        }
    }
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn completions_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { authorization, body });

    let next = state.responses.lock().unwrap().pop_front();
    next.map_or_else(
        || (StatusCode::GONE, "no scripted response left").into_response(),
        MockResponse::into_response,
    )
}

pub struct MockServer {
    pub url: String,
    state: MockState,
}

impl MockServer {
    /// Serves `responses` in order, one per request.
    ///
    /// The server runs on the current tokio runtime; tests that block on a
    /// child process need a multi-threaded runtime.
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        let state = MockState {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(completions_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// An endpoint URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
