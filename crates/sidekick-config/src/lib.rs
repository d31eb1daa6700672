//! Shared configuration for sidekick tools.
//!
//! TOML project profiles, auth-token resolution (env + plaintext), and
//! translation to `sidekick_core` store settings. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use sidekick_core::{DEFAULT_ADMIN_ORIGIN, RawConfig, TransportConfig};

/// Environment variable holding an admin-service auth token.
pub const AUTH_TOKEN_ENV: &str = "SIDEKICK_AUTH_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("project '{name}' not found (available: {available})")]
    ProjectNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Project used when none is named on the command line.
    pub default_project: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named project profiles.
    #[serde(default)]
    pub projects: HashMap<String, Project>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_project: Some("default".into()),
            defaults: Defaults::default(),
            projects: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_admin_origin")]
    pub admin_origin: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Sample user events to the log.
    #[serde(default)]
    pub telemetry: bool,

    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            admin_origin: default_admin_origin(),
            timeout: default_timeout(),
            telemetry: false,
            output: default_output(),
        }
    }
}

fn default_admin_origin() -> String {
    DEFAULT_ADMIN_ORIGIN.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}

impl Defaults {
    pub fn admin_origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.admin_origin).map_err(|e| ConfigError::Validation {
            field: "admin_origin".into(),
            reason: format!("invalid URL '{}': {e}", self.admin_origin),
        })
    }

    /// Transport settings without credentials.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(Duration::from_secs(self.timeout))
    }
}

/// A named project: the site config the store starts from, plus where
/// to find its auth token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub site: RawConfig,

    /// Auth token (plaintext; prefer `authTokenEnv`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Environment variable name containing the auth token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token_env: Option<String>,
}

impl Config {
    /// Project name from an explicit choice, the configured default, or
    /// the only project there is.
    pub fn active_project_name(&self, explicit: Option<&str>) -> Option<String> {
        if let Some(name) = explicit {
            return Some(name.to_owned());
        }
        if let Some(ref name) = self.default_project {
            if self.projects.contains_key(name) {
                return Some(name.clone());
            }
        }
        match self.projects.len() {
            1 => self.projects.keys().next().cloned(),
            _ => None,
        }
    }

    pub fn project(&self, name: &str) -> Result<&Project, ConfigError> {
        self.projects
            .get(name)
            .ok_or_else(|| ConfigError::ProjectNotFound {
                name: name.into(),
                available: self.project_names(),
            })
    }

    /// Sorted, comma-separated project names for messages.
    pub fn project_names(&self) -> String {
        let mut names: Vec<_> = self.projects.keys().map(String::as_str).collect();
        if names.is_empty() {
            return "(none)".into();
        }
        names.sort_unstable();
        names.join(", ")
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "sidekick", "sidekick").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sidekick");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from a specific file + environment.
///
/// Env keys nest with a double underscore, e.g. `SIDEKICK_DEFAULTS__TIMEOUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("SIDEKICK_")
                .ignore(&["auth_token", "config", "project", "output", "timeout"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

/// Resolve an auth token: the project's `authTokenEnv`, then
/// `SIDEKICK_AUTH_TOKEN`, then plaintext in the profile.
///
/// Anonymous access is valid, so a missing token is `None`.
pub fn resolve_auth_token(project: Option<&Project>) -> Option<SecretString> {
    if let Some(env_name) = project.and_then(|p| p.auth_token_env.as_deref()) {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(AUTH_TOKEN_ENV) {
        if !val.is_empty() {
            return Some(SecretString::from(val));
        }
    }

    project
        .and_then(|p| p.auth_token.clone())
        .map(SecretString::from)
}
