// ── Site configuration ──
//
// `RawConfig` is what the embedding page (or the CLI profile) hands in.
// `ConfigOverride` is the typed project document fetched from the admin
// service. `SiteConfig` is the finalized, immutable result the rest of
// the store reads from.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use sidekick_api::ProjectRef;

use crate::hosts::{self, HostInputs};
use crate::location::host_with_port;
use crate::pattern::glob_matches;
use crate::plugin::PluginConfig;

pub const DEFAULT_REF: &str = "main";
pub const DEFAULT_DEV_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_SCRIPT_URL: &str = "https://www.hlx.live/tools/sidekick/module.js";
pub const DEFAULT_LANG: &str = "en";

/// Fields the remote project document may carry but never changes.
pub const PINNED_FIELDS: [&str; 5] = ["owner", "repo", "ref", "devMode", "adminVersion"];

// ── Views ────────────────────────────────────────────────────────────

/// A special viewer for resources matching a path glob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub path: String,
    pub viewer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ViewConfig {
    pub fn matches(&self, path: &str) -> bool {
        glob_matches(&self.path, path)
    }
}

/// The built-in viewer for JSON resources, always the last view.
pub fn default_json_view(script_root: &str) -> ViewConfig {
    ViewConfig {
        path: "**.json".into(),
        viewer: format!("{script_root}/view/json/json.html"),
        title: Some("JSON".into()),
    }
}

// ── Mountpoints ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) if s.is_empty() => Vec::new(),
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Accept `"url"`, `["url", ...]` or `null` for mountpoint fields.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(Vec::from).unwrap_or_default())
}

/// Like [`one_or_many`], but `null` means "not provided".
fn optional_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(Vec::from))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Millis(i64),
    Rfc3339(DateTime<Utc>),
}

/// Accept epoch milliseconds (as set by the host page) or RFC 3339.
fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Timestamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Timestamp::Rfc3339(at)) => Ok(Some(at)),
        Some(Timestamp::Millis(ms)) => DateTime::from_timestamp_millis(ms)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
    }
}

// ── RawConfig ────────────────────────────────────────────────────────

/// Caller-supplied configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(
        alias = "mountpoints",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mountpoint: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_host: Option<String>,
    /// Legacy alias for `live_host`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_host: Option<String>,
    pub dev_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub special_views: Vec<ViewConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginConfig>,
    /// Use the `aem.page`/`aem.live` domains instead of `hlx.*`.
    pub aem_domain: bool,
    /// Set once a remote project override has been merged in.
    #[serde(
        rename = "_extended",
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub extended: Option<DateTime<Utc>>,
}

impl RawConfig {
    pub fn git_ref(&self) -> &str {
        self.git_ref
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REF)
    }

    /// The project identity, when both owner and repo are known.
    pub fn project_ref(&self) -> Option<ProjectRef> {
        let owner = self.owner.as_deref().filter(|o| !o.is_empty())?;
        let repo = self.repo.as_deref().filter(|r| !r.is_empty())?;
        Some(ProjectRef::new(owner, repo, self.git_ref()))
    }

    /// Whether a remote override should still be fetched.
    pub fn needs_extension(&self) -> bool {
        self.extended.is_none() && self.project_ref().is_some()
    }

    /// Mark the config as extended so it is never merged again.
    pub fn mark_extended(&mut self) {
        self.extended = Some(Utc::now());
    }

    /// Merge a remote project override. Remote fields win; pinned fields
    /// are untouchable because `ConfigOverride` cannot carry them.
    pub fn apply_override(&mut self, overrides: ConfigOverride) {
        for field in overrides.pinned_fields() {
            debug!(field, "ignoring pinned field in project config");
        }
        for field in overrides.unknown.keys() {
            warn!(field = %field, "rejecting unknown field in project config");
        }

        let ConfigOverride {
            project,
            host,
            preview_host,
            live_host,
            outer_host,
            mountpoint,
            dev_origin,
            lang,
            script_root,
            special_views,
            plugins,
            ..
        } = overrides;

        merge(&mut self.project, project);
        merge(&mut self.host, host);
        merge(&mut self.preview_host, preview_host);
        merge(&mut self.live_host, live_host);
        merge(&mut self.outer_host, outer_host);
        merge(&mut self.dev_origin, dev_origin);
        merge(&mut self.lang, lang);
        merge(&mut self.script_root, script_root);
        if let Some(mountpoint) = mountpoint {
            self.mountpoint = mountpoint;
        }
        if let Some(special_views) = special_views {
            self.special_views = special_views;
        }
        if let Some(plugins) = plugins {
            self.plugins = plugins;
        }
    }
}

fn merge<T>(target: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *target = incoming;
    }
}

impl From<&SiteConfig> for RawConfig {
    fn from(cfg: &SiteConfig) -> Self {
        Self {
            owner: cfg.owner.clone(),
            repo: cfg.repo.clone(),
            git_ref: Some(cfg.git_ref.clone()),
            mountpoint: cfg.mountpoint.clone(),
            project: cfg.project.clone(),
            host: cfg.host.clone(),
            preview_host: cfg.preview_host.clone(),
            live_host: cfg.live_host.clone(),
            outer_host: None,
            dev_mode: cfg.dev_mode,
            dev_origin: Some(cfg.dev_origin.clone()),
            admin_version: cfg.admin_version.clone(),
            script_url: None,
            script_root: Some(cfg.script_root.clone()),
            lang: Some(cfg.lang.clone()),
            special_views: cfg.special_views.clone(),
            plugins: cfg.plugins.clone(),
            aem_domain: cfg.aem_domain,
            extended: None,
        }
    }
}

// ── ConfigOverride ───────────────────────────────────────────────────

/// The project-specific sidekick document served by the admin service.
///
/// Only the fields listed here can override local configuration.
/// Pinned fields are parsed so they can be reported, then discarded.
/// Anything else lands in `unknown` and is rejected on merge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverride {
    pub project: Option<String>,
    pub host: Option<String>,
    pub preview_host: Option<String>,
    pub live_host: Option<String>,
    pub outer_host: Option<String>,
    #[serde(alias = "contentSourceUrl", deserialize_with = "optional_one_or_many")]
    pub mountpoint: Option<Vec<String>>,
    pub dev_origin: Option<String>,
    pub lang: Option<String>,
    pub script_root: Option<String>,
    pub special_views: Option<Vec<ViewConfig>>,
    pub plugins: Option<Vec<PluginConfig>>,

    // Pinned: never applied.
    owner: Option<Value>,
    repo: Option<Value>,
    #[serde(rename = "ref")]
    git_ref: Option<Value>,
    dev_mode: Option<Value>,
    admin_version: Option<Value>,

    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl ConfigOverride {
    /// Names of pinned fields present in the remote document.
    pub fn pinned_fields(&self) -> Vec<&'static str> {
        let present = [
            self.owner.is_some(),
            self.repo.is_some(),
            self.git_ref.is_some(),
            self.dev_mode.is_some(),
            self.admin_version.is_some(),
        ];
        PINNED_FIELDS
            .iter()
            .zip(present)
            .filter_map(|(name, is_present)| is_present.then_some(*name))
            .collect()
    }
}

// ── SiteConfig ───────────────────────────────────────────────────────

/// Finalized site descriptor. Never mutated after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub mountpoint: Vec<String>,
    pub project: Option<String>,
    pub host: Option<String>,
    pub preview_host: Option<String>,
    pub live_host: Option<String>,
    pub dev_mode: bool,
    pub dev_origin: String,
    pub admin_version: Option<String>,
    pub script_root: String,
    pub lang: String,
    #[serde(default)]
    pub special_views: Vec<ViewConfig>,
    pub views: Vec<ViewConfig>,
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
    #[serde(default)]
    pub aem_domain: bool,
    pub inner_host: Option<String>,
    pub outer_host: Option<String>,
    pub std_inner_host: Option<String>,
    pub std_outer_host: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::resolve(&RawConfig::default())
    }
}

impl SiteConfig {
    /// Finalize a raw (possibly extended) configuration.
    pub fn resolve(raw: &RawConfig) -> Self {
        let git_ref = raw.git_ref().to_owned();
        let hosts = hosts::derive(&HostInputs {
            owner: raw.owner.as_deref(),
            repo: raw.repo.as_deref(),
            git_ref: &git_ref,
            aem_domain: raw.aem_domain,
            preview_host: raw.preview_host.as_deref(),
            live_host: raw.live_host.as_deref(),
            outer_host: raw.outer_host.as_deref(),
        });

        let script_root = raw
            .script_root
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| {
                script_root_from(raw.script_url.as_deref().unwrap_or(DEFAULT_SCRIPT_URL))
            });

        let mut views = raw.special_views.clone();
        views.push(default_json_view(&script_root));

        Self {
            owner: raw.owner.clone().filter(|o| !o.is_empty()),
            repo: raw.repo.clone().filter(|r| !r.is_empty()),
            git_ref,
            mountpoint: raw.mountpoint.clone(),
            project: raw.project.clone(),
            host: raw.host.clone().filter(|h| !h.is_empty()),
            preview_host: raw.preview_host.clone().filter(|h| !h.is_empty()),
            live_host: raw.live_host.clone().filter(|h| !h.is_empty()),
            dev_mode: raw.dev_mode,
            dev_origin: raw
                .dev_origin
                .clone()
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| DEFAULT_DEV_ORIGIN.to_owned()),
            admin_version: raw.admin_version.clone().filter(|v| !v.is_empty()),
            script_root,
            lang: raw
                .lang
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LANG.to_owned()),
            special_views: raw.special_views.clone(),
            views,
            plugins: raw.plugins.clone(),
            aem_domain: raw.aem_domain,
            inner_host: hosts.inner,
            outer_host: hosts.outer,
            std_inner_host: hosts.std_inner,
            std_outer_host: hosts.std_outer,
        }
    }

    /// The project identity, when owner and repo are both known.
    pub fn project_ref(&self) -> Option<ProjectRef> {
        let owner = self.owner.as_deref()?;
        let repo = self.repo.as_deref()?;
        Some(ProjectRef::new(owner, repo, self.git_ref.as_str()))
    }

    /// `host[:port]` of the local dev origin.
    pub fn dev_host(&self) -> Option<String> {
        Url::parse(&self.dev_origin).ok().map(|u| host_with_port(&u))
    }

    /// `host[:port]` of the primary mountpoint.
    pub fn mountpoint_host(&self) -> Option<String> {
        self.mountpoint
            .first()
            .and_then(|mp| Url::parse(mp).ok())
            .map(|u| host_with_port(&u))
    }

    /// First view whose glob matches the path.
    pub fn find_view(&self, path: &str) -> Option<&ViewConfig> {
        self.views.iter().find(|view| view.matches(path))
    }
}

/// Strip the trailing file name from a script URL.
pub fn script_root_from(script_url: &str) -> String {
    match script_url.rfind('/') {
        Some(idx) => script_url[..idx].to_owned(),
        None => script_url.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_without_input() {
        let cfg = SiteConfig::resolve(&RawConfig::default());
        assert_eq!(cfg.git_ref, "main");
        assert_eq!(cfg.dev_origin, "http://localhost:3000");
        assert_eq!(cfg.script_root, "https://www.hlx.live/tools/sidekick");
        assert_eq!(cfg.lang, "en");
        assert_eq!(cfg.std_inner_host, None);
        assert_eq!(cfg.views.len(), 1);
        assert_eq!(cfg.project_ref(), None);
    }

    #[test]
    fn special_views_precede_default_view() {
        let cfg = SiteConfig::resolve(&raw(json!({
            "specialViews": [
                { "path": "/docs/**", "viewer": "https://example.com/viewer.html", "title": "Docs" }
            ]
        })));
        assert_eq!(cfg.views.len(), 2);
        assert_eq!(cfg.views[0].path, "/docs/**");
        assert_eq!(cfg.views[1].path, "**.json");
        assert_eq!(
            cfg.views[1].viewer,
            "https://www.hlx.live/tools/sidekick/view/json/json.html"
        );
        assert_eq!(cfg.find_view("/docs/a.json").unwrap().path, "/docs/**");
        assert_eq!(cfg.find_view("/query-index.json").unwrap().path, "**.json");
        assert!(cfg.find_view("/index").is_none());
    }

    #[test]
    fn script_root_from_custom_url() {
        let cfg = SiteConfig::resolve(&raw(json!({
            "scriptUrl": "https://cdn.example.com/sidekick/v7/module.js"
        })));
        assert_eq!(cfg.script_root, "https://cdn.example.com/sidekick/v7");

        let cfg = SiteConfig::resolve(&raw(json!({
            "scriptUrl": "https://cdn.example.com/sidekick/v7/module.js",
            "scriptRoot": "https://other.example.com/root"
        })));
        assert_eq!(cfg.script_root, "https://other.example.com/root");
    }

    #[test]
    fn mountpoint_accepts_string_or_array() {
        let single = raw(json!({ "mountpoint": "https://adobe.sharepoint.com/sites/blog" }));
        assert_eq!(single.mountpoint, vec!["https://adobe.sharepoint.com/sites/blog"]);

        let many = raw(json!({ "mountpoints": ["https://a.example", "https://b.example"] }));
        assert_eq!(many.mountpoint.len(), 2);

        let cfg = SiteConfig::resolve(&single);
        assert_eq!(cfg.mountpoint_host().as_deref(), Some("adobe.sharepoint.com"));
    }

    #[test]
    fn override_keeps_pinned_fields() {
        let mut cfg = raw(json!({
            "owner": "adobe",
            "repo": "blog",
            "ref": "feature",
            "devMode": true,
            "adminVersion": "1"
        }));
        let overrides: ConfigOverride = serde_json::from_value(json!({
            "owner": "evil",
            "repo": "other",
            "ref": "main",
            "devMode": false,
            "adminVersion": "2",
            "project": "Blog",
            "previewHost": "preview.blog.adobe.com",
            "contentSourceUrl": "https://adobe.sharepoint.com/sites/blog",
            "somethingElse": 42
        }))
        .unwrap();

        assert_eq!(
            overrides.pinned_fields(),
            vec!["owner", "repo", "ref", "devMode", "adminVersion"]
        );
        assert!(overrides.unknown.contains_key("somethingElse"));

        cfg.apply_override(overrides);

        assert_eq!(cfg.owner.as_deref(), Some("adobe"));
        assert_eq!(cfg.repo.as_deref(), Some("blog"));
        assert_eq!(cfg.git_ref(), "feature");
        assert!(cfg.dev_mode);
        assert_eq!(cfg.admin_version.as_deref(), Some("1"));
        assert_eq!(cfg.project.as_deref(), Some("Blog"));
        assert_eq!(cfg.preview_host.as_deref(), Some("preview.blog.adobe.com"));
        assert_eq!(
            cfg.mountpoint,
            vec!["https://adobe.sharepoint.com/sites/blog"]
        );
    }

    #[test]
    fn override_leaves_absent_fields_alone() {
        let mut cfg = raw(json!({ "owner": "adobe", "repo": "blog", "host": "blog.adobe.com" }));
        cfg.apply_override(ConfigOverride::default());
        assert_eq!(cfg.host.as_deref(), Some("blog.adobe.com"));
    }

    #[test]
    fn needs_extension_only_once() {
        let mut cfg = raw(json!({ "owner": "adobe", "repo": "blog" }));
        assert!(cfg.needs_extension());
        cfg.mark_extended();
        assert!(!cfg.needs_extension());
        assert!(!RawConfig::default().needs_extension());
    }

    #[test]
    fn extended_accepts_epoch_millis_and_rfc3339() {
        let cfg = raw(json!({ "owner": "a", "repo": "b", "_extended": 1_700_000_000_000_i64 }));
        assert_eq!(cfg.owner.as_deref(), Some("a"));
        assert_eq!(
            cfg.extended.unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
        assert!(!cfg.needs_extension());

        let cfg = raw(json!({ "owner": "a", "repo": "b", "_extended": "2023-11-14T22:13:20Z" }));
        assert_eq!(cfg.extended.unwrap().timestamp_millis(), 1_700_000_000_000);

        let cfg = raw(json!({ "owner": "a", "repo": "b", "_extended": null }));
        assert!(cfg.needs_extension());
    }

    #[test]
    fn serialization_round_trip() {
        let cfg = SiteConfig::resolve(&raw(json!({
            "owner": "adobe",
            "repo": "blog",
            "ref": "main",
            "mountpoint": "https://adobe.sharepoint.com/sites/blog",
            "project": "Blog",
            "previewHost": "preview.blog.adobe.com",
            "liveHost": "live.blog.adobe.com",
            "host": "blog.adobe.com",
            "devMode": true,
            "devOrigin": "http://localhost:3001",
            "adminVersion": "ci42",
            "specialViews": [
                { "path": "/docs/**", "viewer": "https://example.com/viewer.html" }
            ]
        })));

        let serialized = serde_json::to_string(&cfg).unwrap();
        let parsed: SiteConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, cfg);

        // Re-parsed as caller input, the non-transient fields survive.
        let reparsed: RawConfig = serde_json::from_str(&serialized).unwrap();
        let again = SiteConfig::resolve(&reparsed);
        assert_eq!(again.owner, cfg.owner);
        assert_eq!(again.repo, cfg.repo);
        assert_eq!(again.git_ref, cfg.git_ref);
        assert_eq!(again.mountpoint, cfg.mountpoint);
        assert_eq!(again.project, cfg.project);
        assert_eq!(again.preview_host, cfg.preview_host);
        assert_eq!(again.live_host, cfg.live_host);
        assert_eq!(again.host, cfg.host);
        assert_eq!(again.dev_mode, cfg.dev_mode);
        assert_eq!(again.dev_origin, cfg.dev_origin);
        assert_eq!(again.special_views, cfg.special_views);
        assert_eq!(again.admin_version, cfg.admin_version);
    }
}
