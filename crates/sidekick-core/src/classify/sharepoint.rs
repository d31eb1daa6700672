// ── SharePoint URL shapes ──
//
// Document libraries list folders under `/Forms/AllItems.aspx` (or the
// OneDrive equivalent) and open files in the same view with an `id`
// query parameter pointing at the file. Office editors live under
// `/_layouts/15/*.aspx` or `/:w:/`-style share links and always carry a
// `sourcedoc` parameter.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::SiteConfig;
use crate::location::Location;

static EDITOR_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(/_layouts/15/\w+\.aspx$)|(/:[wxp]:/)").expect("valid editor path regex")
});

const FOLDER_LINK: &str = "/:f:/";

/// Whether the location is served by the project's SharePoint.
pub fn is_sharepoint(config: &SiteConfig, location: &Location) -> bool {
    if location.host.is_empty() {
        return false;
    }
    config.mountpoint_host().as_deref() == Some(location.host.as_str())
        || location.hostname.ends_with(".sharepoint.com")
}

fn is_listing(pathname: &str) -> bool {
    pathname.ends_with("/Forms/AllItems.aspx") || pathname.ends_with("/onedrive.aspx")
}

/// Position of the first dot in the basename of the `id` parameter.
///
/// `-1` when the basename has no dot, `None` when there is no `id`.
fn id_dot_index(location: &Location) -> Option<isize> {
    let id = location.query_param("id")?;
    let basename = id.rsplit('/').next().unwrap_or_default();
    Some(
        basename
            .find('.')
            .and_then(|idx| isize::try_from(idx).ok())
            .unwrap_or(-1),
    )
}

/// Folder listing: a library view on a folder, or a folder share link.
pub fn is_folder(location: &Location) -> bool {
    let pathname = location.pathname.as_str();
    if !is_listing(pathname) && !pathname.contains(FOLDER_LINK) {
        return false;
    }
    match id_dot_index(location) {
        None => true,
        Some(idx) => idx == -1 || idx == 0,
    }
}

/// Document preview inside a library view.
pub fn is_viewer(location: &Location) -> bool {
    is_listing(&location.pathname) && id_dot_index(location).is_some_and(|idx| idx > 0)
}

/// Office web editor.
pub fn is_editor(location: &Location) -> bool {
    EDITOR_PATH.is_match(&location.pathname)
        && location.search.to_ascii_lowercase().contains("sourcedoc=")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(href: &str) -> Location {
        href.parse().unwrap_or_default()
    }

    #[test]
    fn folder_without_id() {
        assert!(is_folder(&loc(
            "https://adobe.sharepoint.com/sites/blog/Shared%20Documents/Forms/AllItems.aspx"
        )));
    }

    #[test]
    fn folder_with_directory_id() {
        let l = loc(
            "https://adobe.sharepoint.com/sites/blog/Shared%20Documents/Forms/AllItems.aspx?id=%2Fsites%2Fblog%2FShared%20Documents%2Fsub",
        );
        assert!(is_folder(&l));
        assert!(!is_viewer(&l));
    }

    #[test]
    fn dot_file_counts_as_folder() {
        let l = loc("https://adobe.sharepoint.com/Forms/AllItems.aspx?id=/sites/blog/.helix");
        assert!(is_folder(&l));
        assert!(!is_viewer(&l));
    }

    #[test]
    fn viewer_with_document_id() {
        let l = loc("https://adobe.sharepoint.com/Forms/AllItems.aspx?id=/sites/blog/index.docx");
        assert!(is_viewer(&l));
        assert!(!is_folder(&l));
    }

    #[test]
    fn folder_share_link() {
        assert!(is_folder(&loc(
            "https://adobe.sharepoint.com/:f:/r/sites/blog/Shared%20Documents/en"
        )));
    }

    #[test]
    fn editor_requires_sourcedoc() {
        assert!(is_editor(&loc(
            "https://adobe.sharepoint.com/:w:/r/sites/blog/_layouts/15/Doc.aspx?sourcedoc=%7BABC%7D&file=index.docx"
        )));
        assert!(is_editor(&loc(
            "https://adobe.sharepoint.com/sites/blog/_layouts/15/Doc.aspx?sourcedoc=%7BABC%7D"
        )));
        assert!(!is_editor(&loc(
            "https://adobe.sharepoint.com/sites/blog/_layouts/15/Doc.aspx?file=index.docx"
        )));
    }
}
