//! In-process mock of the IAM and container-service endpoints.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;

use iksctl::config::{Config, ReloadConfig};
use iksctl::iam::BearerToken;
use iksctl::iks::ContainerServiceClient;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type RouteKey = (String, String);

#[derive(Default)]
struct MockState {
    // Responses are served in order; the last one repeats
    routes: Mutex<HashMap<RouteKey, Vec<(u16, String)>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn iam_url(&self) -> String {
        format!("{}identity/token", self.base_url())
    }

    pub fn containers_url(&self) -> String {
        format!("{}global/", self.base_url())
    }

    /// Queue a response for `method` on `path` (path relative to the server root)
    pub fn respond(&self, method: &str, path: &str, status: u16, body: impl Into<String>) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry((method.to_string(), format!("/{}", path.trim_start_matches('/'))))
            .or_default()
            .push((status, body.into()));
        self
    }

    /// Queue a container-service response, `path` relative to the API base
    pub fn api(&self, method: &str, path: &str, status: u16, body: impl Into<String>) -> &Self {
        self.respond(method, &format!("global/{}", path), status, body)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        let path = format!("/global/{}", path);
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn config(&self) -> Config {
        let mut config = Config::example();
        config.endpoints.iam_url = self.iam_url();
        config.endpoints.containers_url = self.containers_url();
        config.http.timeout_secs = 5;
        config.reload = ReloadConfig {
            initial_delay_secs: 0,
            poll_interval_secs: 0,
            timeout_secs: 5,
        };
        config
    }

    pub fn client(&self, token: &str) -> ContainerServiceClient {
        ContainerServiceClient::new(
            self.containers_url(),
            &BearerToken::new(token),
            std::time::Duration::from_secs(5),
        )
        .unwrap()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let mut routes = state.routes.lock().unwrap();
    let (status, body) = match routes.get_mut(&(method.to_string(), path)) {
        Some(queue) if queue.len() > 1 => queue.remove(0),
        Some(queue) if !queue.is_empty() => queue[0].clone(),
        _ => (
            404,
            r#"{"code":"mock","description":"no route"}"#.to_string(),
        ),
    };

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}
