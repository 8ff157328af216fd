use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde_json::{json, Value};

use crate::config::{normalize_base_url, ConsoleConfig};
use crate::error::{ConsoleError, Result, FORBIDDEN_FALLBACK_MESSAGE, UNKNOWN_STATUS_TEXT};
use crate::models::TokenPair;
use crate::session::SessionContext;

pub const LOGIN_PATH: &str = "/api/auth/token/";

/// The one place that talks HTTP to the backend.
///
/// Attaches the stored bearer token, serializes bodies and turns every
/// non-2xx answer into a [`ConsoleError`]. Nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionContext) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30), session)
    }

    pub fn from_config(config: &ConsoleConfig, session: SessionContext) -> Result<Self> {
        Self::with_timeout(
            &config.api.base_url,
            Duration::from_secs(config.api.request_timeout_secs),
            session,
        )
    }

    pub fn with_timeout(base_url: &str, timeout: Duration, session: SessionContext) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        url::Url::parse(&base_url)
            .map_err(|e| ConsoleError::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");

        let mut builder = self.http.request(method.clone(), &url).header(ACCEPT, "application/json");

        if let Some(token) = self.session.token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        tracing::debug!(%method, %url, status = response.status().as_u16(), "api response");

        handle_response(&self.session, response).await
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.request(Method::DELETE, path, None).await
    }

    /// GET a collection. Anything that is not a JSON array reads as empty.
    pub async fn get_list(&self, path: &str) -> Result<Vec<Value>> {
        match self.get(path).await? {
            Some(Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    /// Exchanges credentials for a token pair and stores the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let body = json!({ "username": username, "password": password });
        let data = self.post(LOGIN_PATH, &body).await?.unwrap_or(Value::Null);
        let tokens: TokenPair = serde_json::from_value(data)?;

        // only the access token and the profile are persisted
        self.session.save_auth(&tokens.access, &tokens.user)?;
        tracing::info!(user = %tokens.user.username, "logged in");
        Ok(tokens)
    }
}

/// Maps a backend response to the console's result type.
///
/// A 401 clears the stored session before failing.
pub async fn handle_response(session: &SessionContext, response: Response) -> Result<Option<Value>> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let data = if is_json {
        match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).ok(),
            Err(_) => None,
        }
    } else {
        None
    };

    if status.is_success() {
        return Ok(data);
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            tracing::warn!("backend rejected the session token; clearing local session");
            if let Err(e) = session.clear_auth() {
                tracing::warn!("failed to clear session: {}", e);
            }
            Err(ConsoleError::SessionExpired)
        }
        StatusCode::FORBIDDEN => {
            tracing::warn!("backend denied the request");
            let detail = body_message(data.as_ref(), &["detail"])
                .unwrap_or_else(|| FORBIDDEN_FALLBACK_MESSAGE.to_string());
            Err(ConsoleError::Forbidden(detail))
        }
        _ => {
            let detail = body_message(data.as_ref(), &["detail", "message"]).unwrap_or_else(|| {
                format!(
                    "Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or(UNKNOWN_STATUS_TEXT)
                )
            });
            Err(ConsoleError::http(status.as_u16(), detail))
        }
    }
}

/// First non-empty string among `keys` in a JSON object body.
fn body_message(data: Option<&Value>, keys: &[&str]) -> Option<String> {
    let data = data?;
    keys.iter()
        .filter_map(|k| data.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
