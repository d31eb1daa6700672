//! `sidekick status <url>`: fetch a resource's status from the admin service.

use serde_json::Value;
use tracing::debug;

use sidekick_core::{FetchOutcome, RuntimeStatus, StatusError};

use crate::cli::{GlobalOpts, UrlArgs};
use crate::config;
use crate::error::CliError;
use crate::output::{self, flag, or_dash};

use super::util::parse_location;

fn code(value: Option<u16>) -> String {
    value.map_or_else(|| "-".into(), |c| c.to_string())
}

fn detail(status: &RuntimeStatus, url: &str, color: bool) -> String {
    output::render_detail(&[
        ("URL", url.to_owned()),
        ("Web path", or_dash(status.web_path())),
        ("Resource path", or_dash(status.resource_path())),
        ("Edit", code(status.environment_status("edit"))),
        ("Preview", code(status.preview_status())),
        ("Live", code(status.live_status())),
        ("Logged in", flag(status.is_authenticated(), color)),
        (
            "Endpoint",
            status
                .api_url()
                .map_or_else(|| "-".into(), ToString::to_string),
        ),
    ])
}

/// `endpoint` is the status URL that was requested.
fn failure(error: &StatusError, endpoint: &str) -> CliError {
    match error {
        StatusError::Unreachable => CliError::ConnectionFailed {
            url: endpoint.to_owned(),
            reason: error.key(),
        },
        _ => CliError::Status {
            key: error.key(),
            not_found: matches!(
                error,
                StatusError::DocumentNotFound | StatusError::ContentNotFound
            ),
        },
    }
}

pub async fn handle(args: UrlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let location = parse_location(&args.url)?;
    let store = config::build_store(global, Some(location)).await?;
    let mut events = store.subscribe();

    let outcome = store.refresh_status(true).await;
    while let Ok(event) = events.try_recv() {
        debug!(event = %event.name, "received event");
    }
    store.teardown();

    match outcome {
        FetchOutcome::Fetched => {}
        FetchOutcome::Unauthorized => return Err(CliError::AuthRequired),
        FetchOutcome::Failed(error) => {
            let endpoint = store
                .status()
                .api_url()
                .map_or_else(|| store.admin_origin().to_string(), ToString::to_string);
            return Err(failure(&error, &endpoint));
        }
        FetchOutcome::Skipped => {
            return Err(CliError::NoProject {
                path: config::active_path(global).display().to_string(),
            });
        }
        FetchOutcome::Coalesced | FetchOutcome::Cancelled => {
            return Err(CliError::ApiError {
                message: "status fetch did not complete".into(),
            });
        }
    }

    let status = store.status();
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &Value::Object(status.payload().clone()),
        |_| detail(&status, &args.url, color),
        |_| code(status.preview_status()),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
