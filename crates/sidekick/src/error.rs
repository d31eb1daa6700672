//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sidekick_config::ConfigError;
use sidekick_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the admin service at {url}: {reason}")]
    #[diagnostic(
        code(sidekick::connection_failed),
        help(
            "Check your network connection and the admin origin.\n\
             URL: {url}\n\
             Try: sidekick --admin-origin https://admin.hlx.page status <url>\n\
             Slow responses: raise --timeout"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The admin service requires a login for this project")]
    #[diagnostic(
        code(sidekick::auth_required),
        help(
            "Pass a token with --auth-token, set SIDEKICK_AUTH_TOKEN,\n\
             or configure authTokenEnv on the project profile."
        )
    )]
    AuthRequired,

    // ── Project ──────────────────────────────────────────────────────

    #[error("No project configured")]
    #[diagnostic(
        code(sidekick::no_project),
        help(
            "Create a profile with: sidekick config init --project-owner <OWNER> --project-repo <REPO>\n\
             Or pass --owner and --repo. Config file: {path}"
        )
    )]
    NoProject { path: String },

    #[error("Project '{name}' not found in configuration")]
    #[diagnostic(
        code(sidekick::project_not_found),
        help(
            "Available projects: {available}\n\
             Create one with: sidekick config init --name {name}"
        )
    )]
    ProjectNotFound { name: String, available: String },

    // ── Status ───────────────────────────────────────────────────────

    #[error("Status unavailable: {key}")]
    #[diagnostic(code(sidekick::status))]
    Status { key: String, not_found: bool },

    #[error("API error: {message}")]
    #[diagnostic(code(sidekick::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sidekick::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(sidekick::config))]
    Config(Box<figment::Error>),

    #[error("{0}")]
    #[diagnostic(code(sidekick::config_file))]
    ConfigFile(String),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(sidekick::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(sidekick::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthRequired => exit_code::AUTH,
            Self::Status { not_found: true, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoProject { .. } | Self::ProjectNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ProjectNotFound { name, available } => {
                Self::ProjectNotFound { name, available }
            }
            ConfigError::Figment(err) => Self::Config(err),
            ConfigError::Io(err) => Self::Io(err),
            ConfigError::Serialization(err) => Self::ConfigFile(err.to_string()),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Unauthorized => Self::AuthRequired,
            CoreError::InvalidResponse { message } | CoreError::Api { message, .. } => {
                Self::ApiError { message }
            }
            err @ (CoreError::Timeout | CoreError::NotFound { .. }) => Self::ApiError {
                message: err.to_string(),
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::NoProject => Self::NoProject {
                path: sidekick_config::config_path().display().to_string(),
            },
        }
    }
}
