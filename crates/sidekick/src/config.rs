//! CLI configuration: a thin wrapper around `sidekick_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--owner, --admin-origin, --auth-token, etc.).

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;
use tracing::{debug, warn};
use url::Url;

use sidekick_core::{
    AppStore, Location, NoopTelemetry, RawConfig, TelemetrySink, TracingTelemetry,
};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sidekick_config::{Config, Defaults, Project, config_path};

// ── Loading ─────────────────────────────────────────────────────────

/// The config file in use: `--config` or the platform default.
pub fn active_path(global: &GlobalOpts) -> std::path::PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(sidekick_config::load_config_from(&active_path(global))?)
}

/// `defaults.output` from the config file, for when `-o` is not given.
///
/// Load errors are left for the command itself to report.
pub fn configured_output(global: &GlobalOpts) -> Option<OutputFormat> {
    let cfg = match load(global) {
        Ok(cfg) => cfg,
        Err(e) => {
            debug!(error = %e, "config unavailable, using default output");
            return None;
        }
    };
    match OutputFormat::from_str(&cfg.defaults.output, true) {
        Ok(format) => Some(format),
        Err(_) => {
            warn!(output = %cfg.defaults.output, "ignoring unknown defaults.output");
            None
        }
    }
}

pub fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    sidekick_config::save_config_to(cfg, &active_path(global))?;
    Ok(())
}

/// The profile selected by `--project` or the config's default, if any.
///
/// An explicitly named project must exist.
pub fn active_project<'a>(
    global: &GlobalOpts,
    cfg: &'a Config,
) -> Result<Option<(String, &'a Project)>, CliError> {
    let Some(name) = cfg.active_project_name(global.project.as_deref()) else {
        return Ok(None);
    };
    let project = cfg.project(&name)?;
    Ok(Some((name, project)))
}

// ── Resolution ──────────────────────────────────────────────────────

/// The raw site config for this invocation: the active profile with
/// flag overrides applied.
pub fn resolve_raw(global: &GlobalOpts, project: Option<&Project>) -> RawConfig {
    let mut raw = project.map(|p| p.site.clone()).unwrap_or_default();

    if let Some(ref owner) = global.owner {
        raw.owner = Some(owner.clone());
    }
    if let Some(ref repo) = global.repo {
        raw.repo = Some(repo.clone());
    }
    if let Some(ref git_ref) = global.git_ref {
        raw.git_ref = Some(git_ref.clone());
    }
    if let Some(ref version) = global.admin_version {
        raw.admin_version = Some(version.clone());
    }
    if global.no_remote {
        raw.mark_extended();
    }
    raw
}

/// Auth token: flag (or its env var) first, then the shared chain.
fn resolve_auth_token(global: &GlobalOpts, project: Option<&Project>) -> Option<SecretString> {
    global
        .auth_token
        .clone()
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
        .or_else(|| sidekick_config::resolve_auth_token(project))
}

fn admin_origin(global: &GlobalOpts, defaults: &Defaults) -> Result<Url, CliError> {
    match global.admin_origin {
        Some(ref origin) => Url::parse(origin).map_err(|e| CliError::Validation {
            field: "admin-origin".into(),
            reason: format!("invalid URL '{origin}': {e}"),
        }),
        None => Ok(defaults.admin_origin_url()?),
    }
}

/// Build an initialized store for the active project.
///
/// Fails with `NoProject` when neither the profile nor the flags name
/// an owner and repo.
pub async fn build_store(
    global: &GlobalOpts,
    location: Option<Location>,
) -> Result<AppStore, CliError> {
    let cfg = load(global)?;
    let project = active_project(global, &cfg)?;
    let profile = project.as_ref().map(|(_, p)| *p);

    let raw = resolve_raw(global, profile);
    if raw.project_ref().is_none() {
        return Err(CliError::NoProject {
            path: active_path(global).display().to_string(),
        });
    }

    let mut transport = cfg.defaults.transport();
    if let Some(secs) = global.timeout {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }
    if let Some(token) = resolve_auth_token(global, profile) {
        transport = transport.with_auth_token(token);
    }

    let telemetry: Arc<dyn TelemetrySink> = if cfg.defaults.telemetry {
        Arc::new(TracingTelemetry)
    } else {
        Arc::new(NoopTelemetry)
    };

    let mut builder = AppStore::builder()
        .admin_origin(admin_origin(global, &cfg.defaults)?)
        .transport(transport)
        .telemetry(telemetry);
    if let Some(location) = location {
        builder = builder.location(location);
    }
    let store = builder.build()?;

    if let Some((name, _)) = project {
        debug!(project = %name, "using project profile");
    }
    store.initialize(Some(raw)).await;
    Ok(store)
}
