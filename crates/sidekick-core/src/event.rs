// ── Events and telemetry ──
//
// Every meaningful state change is announced as a `SidekickEvent` on a
// broadcast channel. User-initiated events are also sampled to a
// telemetry sink as `sidekick:{name}`.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;

/// Fired once the configuration has been resolved.
pub const CONTEXT_LOADED: &str = "contextloaded";
/// Fired after a status fetch lands.
pub const STATUS_FETCHED: &str = "statusfetched";

/// Prefix of host-defined events that are always sampled.
pub const CUSTOM_EVENT_PREFIX: &str = "custom:";

/// Events triggered by user interaction, forwarded to telemetry.
pub const USER_EVENTS: [&str; 14] = [
    "shown",
    "hidden",
    "updated",
    "previewed",
    "published",
    "unpublished",
    "deleted",
    "envswitched",
    "loggedin",
    "loggedout",
    "helpnext",
    "helpdismissed",
    "helpacknowlegded",
    "helpoptedout",
];

pub fn is_user_event(name: &str) -> bool {
    USER_EVENTS.contains(&name) || name.starts_with(CUSTOM_EVENT_PREFIX)
}

/// One-shot change notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidekickEvent {
    pub name: String,
    pub data: Value,
}

impl SidekickEvent {
    /// The `{ detail: { data } }` envelope host pages listen for.
    pub fn detail(&self) -> Value {
        json!({ "detail": { "data": self.data } })
    }
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to serialize event data: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Telemetry ────────────────────────────────────────────────────────

/// Source and target of a sampled user action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TelemetryData {
    pub source: String,
    pub target: String,
}

/// Fire-and-forget telemetry sink.
pub trait TelemetrySink: Send + Sync {
    fn sample(&self, checkpoint: &str, data: &TelemetryData);
}

/// Discards every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn sample(&self, _checkpoint: &str, _data: &TelemetryData) {}
}

/// Emits samples as `tracing` events under the `sidekick::telemetry` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn sample(&self, checkpoint: &str, data: &TelemetryData) {
        info!(
            target: "sidekick::telemetry",
            checkpoint,
            source = %data.source,
            target_url = %data.target,
            "sample"
        );
    }
}
