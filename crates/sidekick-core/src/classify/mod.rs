// ── Location classification ──
//
// Stateless predicates over a resolved `SiteConfig` and a `Location`.
// Host comparisons are exact string equality: custom and standard hosts
// are the only aliases.

pub mod sharepoint;

use serde::Serialize;
use strum::{Display, EnumString};

use crate::config::SiteConfig;
use crate::location::Location;

pub const GOOGLE_DOCS_HOST: &str = "docs.google.com";
pub const GOOGLE_DRIVE_HOST: &str = "drive.google.com";

/// File extensions served as content resources.
pub const CONTENT_EXTENSIONS: [&str; 9] =
    ["json", "pdf", "svg", "png", "jpg", "jpeg", "gif", "webp", "mp4"];

/// Local development server (or the empty-host test page).
pub fn is_dev(config: &SiteConfig, location: &Location) -> bool {
    location.host.is_empty() || config.dev_host().as_deref() == Some(location.host.as_str())
}

fn matches_host(host: &str, candidates: [Option<&String>; 2]) -> bool {
    !host.is_empty() && candidates.into_iter().flatten().any(|c| c == host)
}

/// Inner (preview) CDN, custom or standard.
pub fn is_inner(config: &SiteConfig, location: &Location) -> bool {
    matches_host(
        &location.host,
        [config.inner_host.as_ref(), config.std_inner_host.as_ref()],
    )
}

/// Outer (live) CDN, custom or standard.
pub fn is_outer(config: &SiteConfig, location: &Location) -> bool {
    matches_host(
        &location.host,
        [config.outer_host.as_ref(), config.std_outer_host.as_ref()],
    )
}

/// Production host.
pub fn is_prod(config: &SiteConfig, location: &Location) -> bool {
    matches_host(&location.host, [config.host.as_ref(), None])
}

/// A page of this project on any of its environments.
pub fn is_project(config: &SiteConfig, location: &Location) -> bool {
    config.owner.is_some()
        && config.repo.is_some()
        && (is_dev(config, location)
            || is_inner(config, location)
            || is_outer(config, location)
            || is_prod(config, location))
}

/// Document-management (folder) view.
pub fn is_admin(config: &SiteConfig, location: &Location) -> bool {
    (sharepoint::is_sharepoint(config, location) && sharepoint::is_folder(location))
        || location.hostname == GOOGLE_DRIVE_HOST
}

/// Document editor or viewer.
pub fn is_editor(config: &SiteConfig, location: &Location) -> bool {
    if sharepoint::is_sharepoint(config, location)
        && (sharepoint::is_editor(location) || sharepoint::is_viewer(location))
    {
        return true;
    }
    if location.hostname == GOOGLE_DOCS_HOST {
        return true;
    }
    !location.host.is_empty()
        && config.mountpoint_host().as_deref() == Some(location.host.as_str())
        && !is_admin(config, location)
}

/// Editor, admin, or a content file served directly.
pub fn is_content(config: &SiteConfig, location: &Location) -> bool {
    is_editor(config, location)
        || is_admin(config, location)
        || location
            .extension()
            .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

// ── Classification summary ───────────────────────────────────────────

/// All predicates evaluated once for a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub dev: bool,
    pub inner: bool,
    pub outer: bool,
    pub prod: bool,
    pub project: bool,
    pub editor: bool,
    pub admin: bool,
    pub content: bool,
}

/// The single environment a location is best described by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Dev,
    Preview,
    Live,
    Prod,
    Editor,
    Admin,
    Unknown,
}

impl Classification {
    pub fn environment(&self) -> Environment {
        if self.editor {
            Environment::Editor
        } else if self.admin {
            Environment::Admin
        } else if self.inner {
            Environment::Preview
        } else if self.outer {
            Environment::Live
        } else if self.prod {
            Environment::Prod
        } else if self.dev {
            Environment::Dev
        } else {
            Environment::Unknown
        }
    }
}

/// Evaluate every predicate for a location.
pub fn classify(config: &SiteConfig, location: &Location) -> Classification {
    let editor = is_editor(config, location);
    let admin = is_admin(config, location);
    Classification {
        dev: is_dev(config, location),
        inner: is_inner(config, location),
        outer: is_outer(config, location),
        prod: is_prod(config, location),
        project: is_project(config, location),
        editor,
        admin,
        content: is_content(config, location),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::RawConfig;

    fn config() -> SiteConfig {
        let raw: RawConfig = serde_json::from_value(json!({
            "owner": "adobe",
            "repo": "blog",
            "host": "blog.adobe.com",
            "mountpoint": "https://adobe.sharepoint.com/sites/blog/Shared%20Documents/website"
        }))
        .unwrap();
        SiteConfig::resolve(&raw)
    }

    fn loc(href: &str) -> Location {
        href.parse().unwrap()
    }

    #[test]
    fn environments_by_host() {
        let cfg = config();
        assert!(is_inner(&cfg, &loc("https://main--blog--adobe.hlx.page/en/")));
        assert!(is_outer(&cfg, &loc("https://main--blog--adobe.hlx.live/en/")));
        assert!(is_prod(&cfg, &loc("https://blog.adobe.com/en/")));
        assert!(is_dev(&cfg, &loc("http://localhost:3000/en/")));
        assert!(is_dev(&cfg, &Location::default()));
        assert!(!is_dev(&cfg, &loc("http://localhost:3001/en/")));
    }

    #[test]
    fn project_requires_owner_and_repo() {
        let cfg = SiteConfig::resolve(&RawConfig {
            host: Some("blog.adobe.com".into()),
            owner: Some("adobe".into()),
            ..RawConfig::default()
        });
        for href in [
            "https://blog.adobe.com/",
            "http://localhost:3000/",
            "https://main--blog--adobe.hlx.page/",
        ] {
            assert!(!is_project(&cfg, &loc(href)), "{href}");
        }
        assert!(!is_project(&cfg, &Location::default()));
        assert!(is_project(&config(), &loc("https://blog.adobe.com/")));
    }

    #[test]
    fn sharepoint_folder_is_admin_not_editor() {
        let cfg = config();
        let l = loc(
            "https://adobe.sharepoint.com/sites/blog/Shared%20Documents/Forms/AllItems.aspx?id=/sites/x/Documents/sub",
        );
        assert!(is_admin(&cfg, &l));
        assert!(!is_editor(&cfg, &l));
        assert!(is_content(&cfg, &l));
    }

    #[test]
    fn sharepoint_document_is_editor_via_viewer() {
        let cfg = config();
        let l = loc(
            "https://adobe.sharepoint.com/sites/blog/Shared%20Documents/Forms/AllItems.aspx?id=/sites/x/Documents/index.docx",
        );
        assert!(is_editor(&cfg, &l));
        assert!(!is_admin(&cfg, &l));
    }

    #[test]
    fn google_hosts() {
        let cfg = config();
        assert!(is_editor(&cfg, &loc("https://docs.google.com/document/d/abc/edit")));
        assert!(is_admin(&cfg, &loc("https://drive.google.com/drive/folders/abc")));
    }

    #[test]
    fn content_extensions() {
        let cfg = config();
        assert!(is_content(&cfg, &loc("https://main--blog--adobe.hlx.page/query-index.json")));
        assert!(is_content(&cfg, &loc("https://blog.adobe.com/media/doc.PDF")));
        assert!(!is_content(&cfg, &loc("https://blog.adobe.com/en/post")));
    }

    #[test]
    fn classification_environment() {
        let cfg = config();
        let c = classify(&cfg, &loc("https://main--blog--adobe.hlx.live/"));
        assert!(c.outer && c.project);
        assert_eq!(c.environment(), Environment::Live);
        assert_eq!(
            classify(&cfg, &loc("https://example.com/")).environment(),
            Environment::Unknown
        );
    }
}
