// Admin service HTTP client
//
// Wraps `reqwest::Client` with admin-service URL construction and JSON
// body decoding. Callers get typed payloads or a classified `Error`;
// mapping those into UI-facing keys is `sidekick-core`'s business.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::project::{AdminApi, EditUrl, ProjectRef};
use crate::transport::TransportConfig;

/// Production admin service origin.
pub const DEFAULT_ADMIN_ORIGIN: &str = "https://admin.hlx.page";

/// Query parameter pinning the admin service to a specific version.
pub const ADMIN_VERSION_PARAM: &str = "hlx-admin-version";

/// Raw HTTP client for the admin service.
///
/// All methods return decoded bodies; non-success statuses surface as
/// [`Error::Status`] so the caller can branch on the code.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    origin: Url,
    admin_version: Option<String>,
}

impl AdminClient {
    /// Create a new admin client from a `TransportConfig`.
    pub fn new(origin: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, origin))
    }

    /// Create an admin client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, origin: Url) -> Self {
        Self {
            http,
            origin,
            admin_version: None,
        }
    }

    /// Pin every admin URL to the given service version.
    pub fn with_admin_version(mut self, version: Option<String>) -> Self {
        self.admin_version = version.filter(|v| !v.is_empty());
        self
    }

    /// The admin service origin.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// The configured admin service version, if pinned.
    pub fn admin_version(&self) -> Option<&str> {
        self.admin_version.as_deref()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{origin}/{api}/{owner}/{repo}/{ref}{path}`.
    ///
    /// `path` is normalized to start with `/` unless empty. The admin
    /// version parameter is appended when configured.
    pub fn admin_url(&self, api: AdminApi, project: &ProjectRef, path: &str) -> Result<Url, Error> {
        let base = self.origin.as_str().trim_end_matches('/');
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{path}")
        };
        let full = format!(
            "{base}/{}/{}/{}/{}{path}",
            api.path_segment(),
            project.owner,
            project.repo,
            project.git_ref,
        );
        let mut url = Url::parse(&full)?;
        if let Some(ref version) = self.admin_version {
            url.query_pairs_mut()
                .append_pair(ADMIN_VERSION_PARAM, version);
        }
        Ok(url)
    }

    /// Status endpoint for a resource path, with the `editUrl` hint.
    pub fn status_url(
        &self,
        project: &ProjectRef,
        path: &str,
        edit_url: &EditUrl,
    ) -> Result<Url, Error> {
        let mut url = self.admin_url(AdminApi::Status, project, path)?;
        url.query_pairs_mut()
            .append_pair("editUrl", edit_url.as_str());
        Ok(url)
    }

    /// Project-specific sidekick configuration document.
    pub fn config_url(&self, project: &ProjectRef) -> Result<Url, Error> {
        self.admin_url(AdminApi::Sidekick, project, "/config.json")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    ///
    /// Works for any URL, not just admin-service ones: the dev-mode
    /// config document lives on the local dev origin.
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();

        if !status.is_success() {
            let url = resp.url().to_string();
            trace!(status = status.as_u16(), "non-success response");
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Fetch the project's sidekick configuration override.
    pub async fn fetch_project_config<T: DeserializeOwned>(
        &self,
        project: &ProjectRef,
    ) -> Result<T, Error> {
        let url = self.config_url(project)?;
        self.get(url).await
    }
}
