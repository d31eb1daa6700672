/// Identity of a project on the admin service: `owner/repo@ref`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectRef {
    pub owner: String,
    pub repo: String,
    pub git_ref: String,
}

impl ProjectRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        git_ref: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            git_ref: git_ref.into(),
        }
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.git_ref)
    }
}

/// Admin-service API surface. Each one is a top-level path segment:
/// `{origin}/{api}/{owner}/{repo}/{ref}{path}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminApi {
    /// Resource status across environments.
    Status,
    /// Project-specific sidekick configuration.
    Sidekick,
}

impl AdminApi {
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Sidekick => "sidekick",
        }
    }
}

/// The `editUrl` query parameter sent with status requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditUrl {
    /// Let the admin service resolve the source document from the path.
    Auto,
    /// The document-management or editor URL the user is looking at.
    Url(String),
}

impl EditUrl {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => "auto",
            Self::Url(url) => url,
        }
    }
}
