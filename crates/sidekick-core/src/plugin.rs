// ── Plugin eligibility ──
//
// Plugins declare where they apply; the store answers whether the
// current location qualifies. Rendering plugin buttons is the UI's job.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::classify::Classification;
use crate::pattern::glob_matches;

/// Environment a plugin can be restricted to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PluginEnvironment {
    Dev,
    Preview,
    Live,
    Prod,
    Edit,
    Admin,
    Any,
}

impl PluginEnvironment {
    fn matches(self, classification: &Classification) -> bool {
        match self {
            Self::Dev => classification.dev,
            Self::Preview => classification.inner,
            Self::Live => classification.outer,
            Self::Prod => classification.prod,
            Self::Edit => classification.editor,
            Self::Admin => classification.admin,
            Self::Any => true,
        }
    }
}

/// Eligibility metadata of a sidekick plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Empty means any environment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<PluginEnvironment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_paths: Vec<String>,
}

impl PluginConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            environments: Vec::new(),
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
        }
    }

    /// Whether the plugin applies to a classified location and path.
    pub fn is_eligible(&self, classification: &Classification, path: &str) -> bool {
        let env_ok = self.environments.is_empty()
            || self
                .environments
                .iter()
                .any(|env| env.matches(classification));
        if !env_ok {
            return false;
        }

        let included = self.include_paths.is_empty()
            || self.include_paths.iter().any(|glob| glob_matches(glob, path));
        let excluded = self.exclude_paths.iter().any(|glob| glob_matches(glob, path));

        included && !excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview() -> Classification {
        Classification {
            inner: true,
            project: true,
            ..Classification::default()
        }
    }

    #[test]
    fn no_restrictions_means_eligible() {
        assert!(PluginConfig::new("tagger").is_eligible(&preview(), "/en/index"));
    }

    #[test]
    fn environment_filter() {
        let plugin = PluginConfig {
            environments: vec![PluginEnvironment::Edit, PluginEnvironment::Live],
            ..PluginConfig::new("library")
        };
        assert!(!plugin.is_eligible(&preview(), "/"));

        let plugin = PluginConfig {
            environments: vec![PluginEnvironment::Preview],
            ..PluginConfig::new("library")
        };
        assert!(plugin.is_eligible(&preview(), "/"));
    }

    #[test]
    fn path_filters() {
        let plugin = PluginConfig {
            include_paths: vec!["/blog/**".into()],
            exclude_paths: vec!["/blog/drafts/**".into()],
            ..PluginConfig::new("publish-later")
        };
        assert!(plugin.is_eligible(&preview(), "/blog/2024/post"));
        assert!(!plugin.is_eligible(&preview(), "/blog/drafts/post"));
        assert!(!plugin.is_eligible(&preview(), "/products/x"));
    }

    #[test]
    fn environment_names_parse() {
        assert_eq!("edit".parse::<PluginEnvironment>().ok(), Some(PluginEnvironment::Edit));
        assert_eq!(PluginEnvironment::Preview.to_string(), "preview");
    }
}
