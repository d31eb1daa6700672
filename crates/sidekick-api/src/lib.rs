// sidekick-api: Async Rust client for the sidekick admin service

pub mod client;
pub mod error;
pub mod project;
pub mod transport;

pub use client::{ADMIN_VERSION_PARAM, AdminClient, DEFAULT_ADMIN_ORIGIN};
pub use error::Error;
pub use project::{AdminApi, EditUrl, ProjectRef};
pub use transport::TransportConfig;
