use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted token and profile. `None` means the
    /// default under `$HOME/.config/kvc/session`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// When set, every capability area uses this slug for the accounting role.
    pub accounting_slug: Option<String>,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // NEXT_PUBLIC_API_BASE_URL is honoured so existing deployment env files keep working
        if let Ok(v) = env::var("KVC_API_BASE_URL").or_else(|_| env::var("NEXT_PUBLIC_API_BASE_URL")) {
            if !v.trim().is_empty() {
                self.api.base_url = normalize_base_url(&v);
            }
        }
        if let Ok(v) = env::var("KVC_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        if let Ok(v) = env::var("KVC_SESSION_DIR") {
            if !v.trim().is_empty() {
                self.session.dir = Some(PathBuf::from(v));
            }
        }

        if let Ok(v) = env::var("KVC_ACCOUNTING_SLUG") {
            let v = v.trim();
            if !v.is_empty() {
                self.access.accounting_slug = Some(v.to_string());
            }
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                request_timeout_secs: 30,
            },
            session: SessionConfig { dir: None },
            access: AccessConfig { accounting_slug: None },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                request_timeout_secs: 15,
            },
            session: SessionConfig { dir: None },
            access: AccessConfig { accounting_slug: None },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                request_timeout_secs: 10,
            },
            session: SessionConfig { dir: None },
            access: AccessConfig { accounting_slug: None },
        }
    }
}

/// Strips trailing slashes so request paths (which start with `/`) can be appended directly.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<ConsoleConfig> = Lazy::new(ConsoleConfig::from_env);

pub fn config() -> &'static ConsoleConfig {
    &CONFIG
}
