// ── Location snapshot ──
//
// A value copy of the page the sidekick is looking at, shaped like a
// browser `Location`: `protocol` keeps its colon, `search` and `hash`
// keep their leading `?`/`#` and are empty when absent.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Snapshot of the current navigation target.
///
/// `Location::default()` has an empty host, which the classifier treats
/// as a local development page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub href: String,
    pub host: String,
    pub hostname: String,
    pub pathname: String,
    pub protocol: String,
    pub search: String,
    pub hash: String,
}

impl Location {
    /// First value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(self.search.trim_start_matches('?').as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// The last path segment (the file name, for file-like paths).
    pub fn file_name(&self) -> &str {
        self.pathname.rsplit('/').next().unwrap_or_default()
    }

    /// The extension of the last path segment, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let file = self.file_name();
        file.rfind('.')
            .filter(|&idx| idx > 0)
            .and_then(|idx| file.get(idx + 1..))
            .filter(|ext| !ext.is_empty())
    }

    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.href).ok()
    }
}

/// `host[:port]`, omitting the port when it is the scheme default.
pub fn host_with_port(url: &Url) -> String {
    let hostname = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{hostname}:{port}"),
        None => hostname.to_owned(),
    }
}

impl From<&Url> for Location {
    fn from(url: &Url) -> Self {
        Self {
            href: url.to_string(),
            host: host_with_port(url),
            hostname: url.host_str().unwrap_or_default().to_owned(),
            pathname: url.path().to_owned(),
            protocol: format!("{}:", url.scheme()),
            search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
            hash: url.fragment().map(|f| format!("#{f}")).unwrap_or_default(),
        }
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Self::from(&url)
    }
}

impl FromStr for Location {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s).map(Self::from)
    }
}
