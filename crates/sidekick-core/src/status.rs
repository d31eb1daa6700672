// ── Runtime status ──
//
// The last status payload fetched from the admin service, plus the
// cached endpoint and the last failure. The payload shape belongs to
// the admin service, so it is kept as JSON with typed accessors for the
// fields the store and UI read.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use url::Url;

/// Semantic status-fetch failure, rendered as a UI message key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// 404 while looking at an editor.
    DocumentNotFound,
    /// 404 anywhere else.
    ContentNotFound,
    /// Any other non-success HTTP status.
    Http(u16),
    /// The body was not a JSON object.
    Invalid,
    /// No response at all.
    Unreachable,
}

impl StatusError {
    /// Message key for the UI, e.g. `error_status_404_document`.
    pub fn key(&self) -> String {
        match self {
            Self::DocumentNotFound => "error_status_404_document".into(),
            Self::ContentNotFound => "error_status_404_content".into(),
            Self::Http(code) => format!("error_status_{code}"),
            Self::Invalid => "error_status_invalid".into(),
            Self::Unreachable => "error_status_unreachable".into(),
        }
    }
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

impl Serialize for StatusError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

/// Cached status of the current resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuntimeStatus {
    #[serde(flatten)]
    payload: Map<String, Value>,
    #[serde(rename = "apiUrl", skip_serializing_if = "Option::is_none")]
    api_url: Option<Url>,
    /// `api_url` was built for an editor location.
    #[serde(skip)]
    editor_endpoint: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StatusError>,
}

impl RuntimeStatus {
    /// The synthetic payload recorded for a 401 response.
    pub fn unauthorized_payload() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("status".into(), json!(401));
        map
    }

    // ── Mutation (store only) ────────────────────────────────────────

    /// Replace the payload wholesale, keeping the cached endpoint.
    pub(crate) fn replace(&mut self, payload: Map<String, Value>) {
        self.payload = payload;
        self.error = None;
    }

    pub(crate) fn set_error(&mut self, error: StatusError) {
        self.error = Some(error);
    }

    pub(crate) fn set_endpoint(&mut self, url: Url, editor: bool) {
        self.api_url = Some(url);
        self.editor_endpoint = editor;
    }

    pub(crate) fn clear_endpoint(&mut self) {
        self.api_url = None;
        self.editor_endpoint = false;
    }

    /// The cached endpoint and whether it targets an editor document.
    pub(crate) fn endpoint(&self) -> Option<(Url, bool)> {
        self.api_url.clone().map(|url| (url, self.editor_endpoint))
    }

    /// Same payload and error; the cached endpoint is ignored.
    pub(crate) fn same_result(&self, other: &Self) -> bool {
        self.payload == other.payload && self.error == other.error
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn api_url(&self) -> Option<&Url> {
        self.api_url.as_ref()
    }

    pub fn error(&self) -> Option<&StatusError> {
        self.error.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn web_path(&self) -> Option<&str> {
        self.payload.get("webPath").and_then(Value::as_str)
    }

    pub fn resource_path(&self) -> Option<&str> {
        self.payload.get("resourcePath").and_then(Value::as_str)
    }

    /// HTTP status of a per-environment block (`preview`, `live`, `edit`, ...).
    pub fn environment_status(&self, environment: &str) -> Option<u16> {
        self.payload
            .get(environment)?
            .get("status")?
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
    }

    pub fn preview_status(&self) -> Option<u16> {
        self.environment_status("preview")
    }

    pub fn live_status(&self) -> Option<u16> {
        self.environment_status("live")
    }

    /// Top-level `status` field; only set by the synthetic 401 payload.
    pub fn status_code(&self) -> Option<u16> {
        self.payload
            .get("status")?
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
    }

    /// The admin service asked for a login.
    pub fn needs_login(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn profile(&self) -> Option<&Value> {
        self.payload.get("profile").filter(|p| !p.is_null())
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile().is_some()
    }

    /// Whether the user holds `permission` on `feature`.
    ///
    /// Features without a block, or blocks without a `permissions` list,
    /// impose no restriction.
    pub fn is_authorized(&self, feature: &str, permission: &str) -> bool {
        let Some(block) = self.payload.get(feature) else {
            return true;
        };
        let Some(permissions) = block.get("permissions").and_then(Value::as_array) else {
            return true;
        };
        permissions
            .iter()
            .any(|p| p.as_str() == Some(permission))
    }
}
