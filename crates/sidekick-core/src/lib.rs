//! Application state for the sidekick, between `sidekick-api` and UI
//! consumers (the CLI here, an extension UI elsewhere).
//!
//! - **[`AppStore`]**: central facade. [`initialize()`](AppStore::initialize)
//!   resolves the site config (merging the remote project override once),
//!   [`fetch_status()`](AppStore::fetch_status) refreshes the cached
//!   resource status in the background, and
//!   [`fire_event()`](AppStore::fire_event) broadcasts changes.
//!
//! - **[`SiteConfig`]**: Immutable site descriptor with derived
//!   environment hosts ([`hosts`]).
//!
//! - **Classification** ([`classify`]): Predicates answering which
//!   environment or document-management view a [`Location`] belongs to.
//!
//! - **[`StatusStream`]**: Subscription handle for status changes.

pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod hosts;
pub mod location;
pub mod pattern;
pub mod plugin;
pub mod status;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::{Classification, Environment};
pub use config::{ConfigOverride, RawConfig, SiteConfig, ViewConfig};
pub use error::CoreError;
pub use event::{
    CONTEXT_LOADED, EventError, NoopTelemetry, STATUS_FETCHED, SidekickEvent, TelemetryData,
    TelemetrySink, TracingTelemetry,
};
pub use hosts::EnvironmentHosts;
pub use location::Location;
pub use plugin::{PluginConfig, PluginEnvironment};
pub use status::{RuntimeStatus, StatusError};
pub use store::{AppStore, AppStoreBuilder, FetchOutcome};
pub use stream::{StatusStream, StatusUpdates};

// Transport types consumers need to build a store.
pub use sidekick_api::{AdminClient, DEFAULT_ADMIN_ORIGIN, TransportConfig};
