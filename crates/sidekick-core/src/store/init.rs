// ── Configuration resolution ──
//
// Merges the caller's raw config with the remote project override (at
// most once per raw config), finalizes it, and announces the context.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use super::AppStore;
use crate::config::{ConfigOverride, RawConfig, SiteConfig};
use crate::error::CoreError;
use crate::event::CONTEXT_LOADED;

/// Path of the project config on a local dev server.
const DEV_CONFIG_PATH: &str = "/tools/sidekick/config.json";

impl AppStore {
    /// Resolve the configuration and mark the store initialized.
    ///
    /// Falls back to the page config, then to an empty config. A failing
    /// override fetch is logged and the local config is used as-is.
    pub async fn initialize(&self, raw: Option<RawConfig>) -> Arc<SiteConfig> {
        let mut raw = raw
            .or_else(|| self.inner.page_config.clone())
            .unwrap_or_default();

        if raw.needs_extension() {
            match self.load_project_override(&raw).await {
                Ok(overrides) => {
                    raw.apply_override(overrides);
                    raw.mark_extended();
                    debug!("project config merged");
                }
                Err(e) => {
                    warn!(error = %e, "project config unavailable, using local config");
                }
            }
        }

        let config = Arc::new(SiteConfig::resolve(&raw));
        self.inner.raw.store(Some(Arc::new(raw)));
        self.inner.config.store(Arc::clone(&config));
        self.inner.status.send_modify(|status| status.clear_endpoint());
        self.inner.initialized.send_replace(true);

        info!(
            owner = config.owner.as_deref().unwrap_or_default(),
            repo = config.repo.as_deref().unwrap_or_default(),
            git_ref = %config.git_ref,
            "sidekick context loaded"
        );

        if let Err(e) = self.fire_event(CONTEXT_LOADED, None) {
            warn!(error = %e, "failed to fire {CONTEXT_LOADED}");
        }

        config
    }

    /// Run resolution again on the last raw config. An already-merged
    /// config is not merged a second time.
    pub async fn reinitialize(&self) -> Arc<SiteConfig> {
        let raw = self.raw_config().map(|raw| (*raw).clone());
        self.initialize(raw).await
    }

    /// Where the project override for a raw config lives.
    pub fn project_override_url(&self, raw: &RawConfig) -> Result<Url, CoreError> {
        let project = raw.project_ref().ok_or(CoreError::NoProject)?;
        if raw.dev_mode {
            let origin = raw
                .dev_origin
                .as_deref()
                .filter(|o| !o.is_empty())
                .unwrap_or(crate::config::DEFAULT_DEV_ORIGIN);
            let origin = Url::parse(origin).map_err(|e| CoreError::Config {
                message: format!("invalid devOrigin '{origin}': {e}"),
            })?;
            return origin.join(DEV_CONFIG_PATH).map_err(|e| CoreError::Config {
                message: format!("invalid dev config URL: {e}"),
            });
        }
        Ok(self
            .admin(raw.admin_version.as_deref())
            .config_url(&project)?)
    }

    /// Fetch the typed project override for a raw config.
    pub async fn load_project_override(&self, raw: &RawConfig) -> Result<ConfigOverride, CoreError> {
        let url = self.project_override_url(raw)?;
        let overrides = self.inner.admin.get::<ConfigOverride>(url).await?;
        Ok(overrides)
    }
}
