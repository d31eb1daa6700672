// ── Core error types ──
//
// User-facing errors from sidekick-core. Consumers never see raw HTTP
// or JSON failures; the `From<sidekick_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Not authorized -- log in to the admin service")]
    Unauthorized,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Admin service error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No project configured -- owner and repo are required")]
    NoProject,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sidekick_api::Error> for CoreError {
    fn from(err: sidekick_api::Error) -> Self {
        match err {
            sidekick_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sidekick_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sidekick_api::Error::ClientBuild(message) => CoreError::Config { message },
            sidekick_api::Error::Status { status: 401, .. } => CoreError::Unauthorized,
            sidekick_api::Error::Status { status: 404, url } => CoreError::NotFound { url },
            sidekick_api::Error::Status { status, url } => CoreError::Api {
                message: format!("HTTP {status} from {url}"),
                status: Some(status),
            },
            sidekick_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
