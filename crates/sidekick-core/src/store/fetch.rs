// ── Status fetching ──
//
// One request per status URL at a time. Results replace the cached
// status and are announced with `statusfetched`; failures only show up
// as `status.error`.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use sidekick_api::{EditUrl, Error as ApiError};

use super::AppStore;
use crate::classify;
use crate::event::STATUS_FETCHED;
use crate::status::{RuntimeStatus, StatusError};

/// What a status fetch ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Owner, repo or ref missing; nothing to fetch.
    Skipped,
    /// A fetch for the same URL was already in flight.
    Coalesced,
    /// Status replaced with a fresh payload.
    Fetched,
    /// The admin service wants a login; status holds `{ "status": 401 }`.
    Unauthorized,
    /// Recorded in `status.error`.
    Failed(StatusError),
    /// The store was torn down before the response landed.
    Cancelled,
}

/// Removes its URL from the in-flight set when dropped.
struct InFlightGuard<'a> {
    map: &'a DashMap<String, ()>,
    key: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(map: &'a DashMap<String, ()>, key: String) -> Option<Self> {
        match map.entry(key.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self { map, key })
            }
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

impl AppStore {
    /// Fetch status in the background and return immediately.
    ///
    /// Completion is announced through `statusfetched`; the handle is
    /// only there for callers that want to observe the outcome.
    pub fn fetch_status(&self, refresh_location: bool) -> JoinHandle<FetchOutcome> {
        let store = self.clone();
        let cancel = self.inner.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => FetchOutcome::Cancelled,
                outcome = store.refresh_status(refresh_location) => outcome,
            }
        })
    }

    /// Fetch status and wait for the result.
    pub async fn refresh_status(&self, refresh_location: bool) -> FetchOutcome {
        let config = self.config();
        let Some(project) = config.project_ref() else {
            debug!("no project configured, skipping status fetch");
            return FetchOutcome::Skipped;
        };

        let cached = if refresh_location {
            None
        } else {
            self.inner.status.borrow().endpoint()
        };
        let (url, editor) = match cached {
            Some(endpoint) => endpoint,
            None => match self.status_url(&project) {
                Ok((url, editor)) => {
                    let cache = url.clone();
                    self.inner
                        .status
                        .send_modify(|status| status.set_endpoint(cache, editor));
                    (url, editor)
                }
                Err(e) => {
                    warn!(error = %e, "cannot build status URL");
                    return self.record_failure(StatusError::Unreachable);
                }
            },
        };

        let Some(_guard) = InFlightGuard::acquire(&self.inner.in_flight, url.to_string()) else {
            debug!(%url, "status fetch already in flight");
            return FetchOutcome::Coalesced;
        };

        let admin = self.admin(config.admin_version.as_deref());
        match admin.get::<Value>(url).await {
            Ok(Value::Object(payload)) => {
                self.land_payload(payload);
                FetchOutcome::Fetched
            }
            Ok(_) => self.record_failure(StatusError::Invalid),
            Err(e) if e.is_unauthorized() => {
                debug!("status requires login");
                self.land_payload(RuntimeStatus::unauthorized_payload());
                FetchOutcome::Unauthorized
            }
            Err(e) => {
                let error = map_error(&e, editor);
                warn!(error = %e, key = %error, "status fetch failed");
                self.record_failure(error)
            }
        }
    }

    /// Status endpoint for the current location, and whether that
    /// location is an editor.
    fn status_url(
        &self,
        project: &sidekick_api::ProjectRef,
    ) -> Result<(Url, bool), sidekick_api::Error> {
        let config = self.config();
        let location = self.location();
        let admin = self.admin(config.admin_version.as_deref());
        let editor = classify::is_editor(&config, &location);

        let url = if editor || classify::is_admin(&config, &location) {
            admin.status_url(project, "", &EditUrl::Url(location.href.clone()))?
        } else {
            admin.status_url(project, &location.pathname, &EditUrl::Auto)?
        };
        Ok((url, editor))
    }

    fn land_payload(&self, payload: serde_json::Map<String, Value>) {
        let data = Value::Object(payload.clone());
        self.inner.status.send_modify(|status| status.replace(payload));
        if let Err(e) = self.fire_event(STATUS_FETCHED, Some(data)) {
            warn!(error = %e, "failed to fire {STATUS_FETCHED}");
        }
    }

    fn record_failure(&self, error: StatusError) -> FetchOutcome {
        let recorded = error.clone();
        self.inner.status.send_modify(|status| status.set_error(recorded));
        FetchOutcome::Failed(error)
    }

}

/// `editor` describes the location the fetched endpoint was built for,
/// which may differ from the current one when the endpoint is cached.
fn map_error(error: &ApiError, editor: bool) -> StatusError {
    match error {
        ApiError::Deserialization { .. } => StatusError::Invalid,
        _ => match error.status_code() {
            Some(404) if editor => StatusError::DocumentNotFound,
            Some(404) => StatusError::ContentNotFound,
            Some(code) => StatusError::Http(code),
            None => StatusError::Unreachable,
        },
    }
}
