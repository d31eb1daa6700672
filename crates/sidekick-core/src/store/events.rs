// ── Event broadcasting ──

use serde_json::{Value, json};
use tracing::{debug, trace};

use super::AppStore;
use crate::event::{EventError, SidekickEvent, TelemetryData, is_user_event};

impl AppStore {
    /// Fire an event to every subscriber.
    ///
    /// Without `data`, a snapshot of config, location and status is sent.
    /// User events are also sampled to telemetry. Returns the number of
    /// receivers reached; having none is not an error.
    pub fn fire_event(&self, name: &str, data: Option<Value>) -> Result<usize, EventError> {
        let data = match data {
            Some(data) => data,
            None => self.snapshot()?,
        };

        if is_user_event(name) {
            let sample = self.telemetry_data(&data);
            self.inner.telemetry.sample(&format!("sidekick:{name}"), &sample);
        }

        let event = SidekickEvent {
            name: name.to_owned(),
            data,
        };
        let delivered = self.inner.event_tx.send(event).unwrap_or(0);
        debug!(event = name, delivered, "event fired");
        Ok(delivered)
    }

    /// `{ config, location, status }` as plain JSON.
    pub fn snapshot(&self) -> Result<Value, EventError> {
        let config = serde_json::to_value(&*self.config())?;
        let location = serde_json::to_value(&*self.location())?;
        let status = serde_json::to_value(&*self.inner.status.borrow())?;
        trace!("built event snapshot");
        Ok(json!({
            "config": config,
            "location": location,
            "status": status,
        }))
    }

    fn telemetry_data(&self, data: &Value) -> TelemetryData {
        let field = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_owned);
        TelemetryData {
            source: field("sourceUrl").unwrap_or_else(|| self.location().href.clone()),
            target: field("targetUrl").unwrap_or_else(|| {
                self.inner
                    .status
                    .borrow()
                    .web_path()
                    .unwrap_or_default()
                    .to_owned()
            }),
        }
    }
}
