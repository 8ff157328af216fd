#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};

use kvc_console::access::CapabilityTable;
use kvc_console::api::ApiClient;
use kvc_console::models::{Role, UserProfile};
use kvc_console::pages::Console;
use kvc_console::session::SessionContext;

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    content_type: Option<String>,
    body: String,
    delay: Option<Duration>,
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<HashMap<(String, String), Canned>>>,
    log: Arc<Mutex<Vec<Recorded>>>,
}

/// In-process stand-in for the REST backend. Routes answer with canned
/// responses; anything unknown gets a 404.
pub struct MockBackend {
    pub base_url: String,
    state: MockState,
    server: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    /// JSON answer for `method path`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, Some("application/json"), &body.to_string());
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, content_type: Option<&str>, body: &str) {
        self.install(method, path, Canned {
            status,
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
            delay: None,
        });
    }

    pub fn respond_slowly(&self, method: &str, path: &str, delay: Duration, body: Value) {
        self.install(method, path, Canned {
            status: 200,
            content_type: Some("application/json".into()),
            body: body.to_string(),
            delay: Some(delay),
        });
    }

    fn install(&self, method: &str, path: &str, canned: Canned) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_uppercase(), path.to_string()), canned);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);

    state.log.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: header(AUTHORIZATION),
        accept: header(ACCEPT),
        content_type: header(CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    });

    let canned = state
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned();

    let canned = canned.unwrap_or(Canned {
        status: 404,
        content_type: Some("application/json".into()),
        body: json!({ "detail": "No encontrado." }).to_string(),
        delay: None,
    });

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::builder().status(StatusCode::from_u16(canned.status).unwrap());
    if let Some(content_type) = &canned.content_type {
        response = response.header(CONTENT_TYPE, content_type);
    }
    response.body(Body::from(canned.body)).unwrap()
}

pub fn profile(slugs: &[&str]) -> UserProfile {
    UserProfile {
        id: 10,
        username: "mrojas".into(),
        first_name: "María".into(),
        last_name: "Rojas".into(),
        email: Some("mrojas@kvc.cl".into()),
        is_active: true,
        roles: slugs
            .iter()
            .enumerate()
            .map(|(i, slug)| Role {
                id: i as i64 + 1,
                nombre: slug.to_string(),
                slug: slug.to_string(),
                descripcion: String::new(),
            })
            .collect(),
    }
}

/// Console talking to `backend` with an in-memory session.
pub fn console_for(backend: &MockBackend) -> Console {
    let api = ApiClient::new(&backend.base_url, SessionContext::in_memory()).expect("valid base url");
    Console::new(api, CapabilityTable::console_defaults())
}

/// Console already logged in with the given role slugs.
pub fn logged_in(backend: &MockBackend, token: &str, slugs: &[&str]) -> Console {
    let console = console_for(backend);
    console.session().save_auth(token, &profile(slugs)).expect("save session");
    console
}
