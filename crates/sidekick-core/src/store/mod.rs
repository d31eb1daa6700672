// ── Application state store ──
//
// Owns the resolved site config, the current location and the runtime
// status. Consumers hold read snapshots and subscriptions; every
// mutation goes through `AppStore` methods.

mod events;
mod fetch;
mod init;

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use dashmap::DashMap;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use sidekick_api::{AdminClient, DEFAULT_ADMIN_ORIGIN, TransportConfig};

use crate::classify::{self, Classification, Environment};
use crate::config::{RawConfig, SiteConfig};
use crate::error::CoreError;
use crate::event::{NoopTelemetry, SidekickEvent, TelemetrySink};
use crate::location::Location;
use crate::plugin::PluginConfig;
use crate::status::RuntimeStatus;
use crate::stream::StatusStream;

pub use fetch::FetchOutcome;

const EVENT_CHANNEL_SIZE: usize = 64;

// ── AppStore ─────────────────────────────────────────────────────────

/// The sidekick's application state.
///
/// Cheaply cloneable via `Arc<AppStoreInner>`. Lifecycle: build at
/// activation, [`initialize()`](Self::initialize), mutate through fetch
/// and event methods, [`teardown()`](Self::teardown) when discarded.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<AppStoreInner>,
}

struct AppStoreInner {
    admin: AdminClient,
    /// Configuration provided by the embedding page, used when
    /// `initialize` is called without one.
    page_config: Option<RawConfig>,
    /// The last raw config that went through resolution.
    raw: ArcSwapOption<RawConfig>,
    config: ArcSwap<SiteConfig>,
    location: ArcSwap<Location>,
    status: watch::Sender<RuntimeStatus>,
    initialized: watch::Sender<bool>,
    event_tx: broadcast::Sender<SidekickEvent>,
    telemetry: Arc<dyn TelemetrySink>,
    /// Status URLs with a request on the wire.
    in_flight: DashMap<String, ()>,
    cancel: CancellationToken,
}

impl AppStore {
    pub fn builder() -> AppStoreBuilder {
        AppStoreBuilder::default()
    }

    // ── Snapshots ────────────────────────────────────────────────────

    /// The resolved configuration (defaults until initialized).
    pub fn config(&self) -> Arc<SiteConfig> {
        self.inner.config.load_full()
    }

    /// The last raw configuration passed through resolution.
    pub fn raw_config(&self) -> Option<Arc<RawConfig>> {
        self.inner.raw.load_full()
    }

    pub fn location(&self) -> Arc<Location> {
        self.inner.location.load_full()
    }

    pub fn status(&self) -> RuntimeStatus {
        self.inner.status.borrow().clone()
    }

    pub fn is_initialized(&self) -> bool {
        *self.inner.initialized.borrow()
    }

    /// Resolve once the store has been initialized.
    pub async fn wait_initialized(&self) {
        let mut rx = self.inner.initialized.subscribe();
        let _ = rx.wait_for(|ready| *ready).await;
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to fired events. UI and host-page listeners share the channel.
    pub fn subscribe(&self) -> broadcast::Receiver<SidekickEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Subscribe to runtime status changes.
    pub fn status_stream(&self) -> StatusStream {
        StatusStream::new(self.inner.status.subscribe())
    }

    // ── Location ─────────────────────────────────────────────────────

    /// Record a navigation. The cached status endpoint is kept until a
    /// fetch asks for a location refresh.
    pub fn set_location(&self, location: Location) {
        debug!(href = %location.href, "location updated");
        self.inner.location.store(Arc::new(location));
    }

    // ── Classification ───────────────────────────────────────────────

    pub fn classification(&self) -> Classification {
        classify::classify(&self.config(), &self.location())
    }

    pub fn environment(&self) -> Environment {
        self.classification().environment()
    }

    pub fn is_dev(&self) -> bool {
        classify::is_dev(&self.config(), &self.location())
    }

    pub fn is_inner(&self) -> bool {
        classify::is_inner(&self.config(), &self.location())
    }

    pub fn is_outer(&self) -> bool {
        classify::is_outer(&self.config(), &self.location())
    }

    pub fn is_prod(&self) -> bool {
        classify::is_prod(&self.config(), &self.location())
    }

    pub fn is_project(&self) -> bool {
        classify::is_project(&self.config(), &self.location())
    }

    pub fn is_admin(&self) -> bool {
        classify::is_admin(&self.config(), &self.location())
    }

    pub fn is_editor(&self) -> bool {
        classify::is_editor(&self.config(), &self.location())
    }

    pub fn is_content(&self) -> bool {
        classify::is_content(&self.config(), &self.location())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.status.borrow().is_authenticated()
    }

    pub fn is_authorized(&self, feature: &str, permission: &str) -> bool {
        self.inner.status.borrow().is_authorized(feature, permission)
    }

    /// Whether a plugin applies to the current location.
    pub fn is_plugin_eligible(&self, plugin: &PluginConfig) -> bool {
        let location = self.location();
        plugin.is_eligible(&self.classification(), &location.pathname)
    }

    /// Configured plugins that apply to the current location.
    pub fn eligible_plugins(&self) -> Vec<PluginConfig> {
        let classification = self.classification();
        let location = self.location();
        self.config()
            .plugins
            .iter()
            .filter(|p| p.is_eligible(&classification, &location.pathname))
            .cloned()
            .collect()
    }

    /// URL of the current resource on another environment.
    ///
    /// Uses the fetched `webPath`, falling back to the location's path.
    pub fn environment_url(&self, environment: Environment) -> Option<Url> {
        let config = self.config();
        let status = self.status();
        let location = self.location();
        let path = status.web_path().unwrap_or(location.pathname.as_str());
        let path = if path.is_empty() { "/" } else { path };

        let host = match environment {
            Environment::Dev => return Url::parse(&config.dev_origin).ok()?.join(path).ok(),
            Environment::Preview => config.inner_host.as_deref()?,
            Environment::Live => config.outer_host.as_deref()?,
            Environment::Prod => config.host.as_deref()?,
            Environment::Editor | Environment::Admin | Environment::Unknown => return None,
        };
        Url::parse(&format!("https://{host}{path}")).ok()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Cancel in-flight status fetches spawned by this store.
    pub fn teardown(&self) {
        debug!("tearing down app store");
        self.inner.cancel.cancel();
    }

    /// Admin client, pinned to the config's service version when it has one.
    pub fn admin_origin(&self) -> &Url {
        self.inner.admin.origin()
    }

    pub(crate) fn admin(&self, admin_version: Option<&str>) -> AdminClient {
        let client = self.inner.admin.clone();
        match admin_version {
            Some(version) => client.with_admin_version(Some(version.to_owned())),
            None => client,
        }
    }
}

// ── Builder ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct AppStoreBuilder {
    admin: Option<AdminClient>,
    admin_origin: Option<Url>,
    transport: TransportConfig,
    page_config: Option<RawConfig>,
    location: Location,
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl AppStoreBuilder {
    /// Use a pre-built admin client (takes precedence over origin/transport).
    pub fn admin_client(mut self, client: AdminClient) -> Self {
        self.admin = Some(client);
        self
    }

    pub fn admin_origin(mut self, origin: Url) -> Self {
        self.admin_origin = Some(origin);
        self
    }

    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Configuration published by the embedding page.
    pub fn page_config(mut self, config: RawConfig) -> Self {
        self.page_config = Some(config);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    pub fn build(self) -> Result<AppStore, CoreError> {
        let admin = match self.admin {
            Some(client) => client,
            None => {
                let origin = match self.admin_origin {
                    Some(origin) => origin,
                    None => Url::parse(DEFAULT_ADMIN_ORIGIN).map_err(|e| CoreError::Config {
                        message: format!("invalid admin origin: {e}"),
                    })?,
                };
                AdminClient::new(origin, &self.transport)?
            }
        };

        let (status, _) = watch::channel(RuntimeStatus::default());
        let (initialized, _) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Ok(AppStore {
            inner: Arc::new(AppStoreInner {
                admin,
                page_config: self.page_config,
                raw: ArcSwapOption::empty(),
                config: ArcSwap::from_pointee(SiteConfig::default()),
                location: ArcSwap::from_pointee(self.location),
                status,
                initialized,
                event_tx,
                telemetry: self
                    .telemetry
                    .unwrap_or_else(|| Arc::new(NoopTelemetry)),
                in_flight: DashMap::new(),
                cancel: CancellationToken::new(),
            }),
        })
    }
}
