// Console error types
use thiserror::Error;

pub const SESSION_EXPIRED_MESSAGE: &str = "Sesión vencida o credenciales inválidas.";
pub const FORBIDDEN_FALLBACK_MESSAGE: &str = "Usted no tiene permiso para realizar esta acción.";
/// Status text for codes without a standard reason phrase.
pub const UNKNOWN_STATUS_TEXT: &str = "Error en la API";

pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Every failure a console operation can surface to the user.
///
/// Pages never look at status codes; they match on these variants (or just
/// display the message).
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// 401 from the backend. The local session has already been cleared.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    /// 403 from the backend. The session is kept.
    #[error("{0}")]
    Forbidden(String),

    /// Any other non-2xx response.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Required-field checks failed before submission.
    #[error("{0}")]
    Validation(String),

    /// No stored session; the caller should send the user to the login entry point.
    #[error("No hay una sesión activa. Inicie sesión para continuar.")]
    NotAuthenticated,

    /// The client-side role gate rejected the action.
    #[error("{0}")]
    NotAuthorized(String),

    /// The page that issued the request went away before it completed.
    #[error("request cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConsoleError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        ConsoleError::Forbidden(message.into())
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ConsoleError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ConsoleError::Validation(message.into())
    }

    pub fn not_authorized(message: impl Into<String>) -> Self {
        ConsoleError::NotAuthorized(message.into())
    }

    /// HTTP status behind this error, when it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::SessionExpired => Some(401),
            ConsoleError::Forbidden(_) => Some(403),
            ConsoleError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ConsoleError::SessionExpired)
    }

    /// True when the user has to log in again before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(self, ConsoleError::SessionExpired | ConsoleError::NotAuthenticated)
    }

    /// Stable code used in JSON output.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConsoleError::SessionExpired => "SESSION_EXPIRED",
            ConsoleError::Forbidden(_) => "FORBIDDEN",
            ConsoleError::Http { .. } => "HTTP_ERROR",
            ConsoleError::Validation(_) => "VALIDATION_ERROR",
            ConsoleError::NotAuthenticated => "NOT_AUTHENTICATED",
            ConsoleError::NotAuthorized(_) => "NOT_AUTHORIZED",
            ConsoleError::Cancelled => "CANCELLED",
            ConsoleError::Config(_) => "CONFIG_ERROR",
            ConsoleError::Transport(_) => "TRANSPORT_ERROR",
            ConsoleError::Storage(_) => "STORAGE_ERROR",
            ConsoleError::Json(_) => "INVALID_JSON",
        }
    }
}
