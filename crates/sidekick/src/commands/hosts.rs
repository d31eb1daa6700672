//! `sidekick hosts`: the resolved project and its environment hosts.

use serde::Serialize;

use sidekick_core::SiteConfig;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HostsView {
    owner: Option<String>,
    repo: Option<String>,
    #[serde(rename = "ref")]
    git_ref: String,
    dev: String,
    preview: Option<String>,
    live: Option<String>,
    prod: Option<String>,
    std_preview: Option<String>,
    std_live: Option<String>,
    mountpoint: Option<String>,
    lang: String,
}

impl From<&SiteConfig> for HostsView {
    fn from(cfg: &SiteConfig) -> Self {
        Self {
            owner: cfg.owner.clone(),
            repo: cfg.repo.clone(),
            git_ref: cfg.git_ref.clone(),
            dev: cfg.dev_origin.clone(),
            preview: cfg.inner_host.clone(),
            live: cfg.outer_host.clone(),
            prod: cfg.host.clone(),
            std_preview: cfg.std_inner_host.clone(),
            std_live: cfg.std_outer_host.clone(),
            mountpoint: cfg.mountpoint.first().cloned(),
            lang: cfg.lang.clone(),
        }
    }
}

fn detail(v: &HostsView) -> String {
    output::render_detail(&[
        ("Owner", or_dash(v.owner.as_deref())),
        ("Repo", or_dash(v.repo.as_deref())),
        ("Ref", v.git_ref.clone()),
        ("Dev", v.dev.clone()),
        ("Preview", or_dash(v.preview.as_deref())),
        ("Live", or_dash(v.live.as_deref())),
        ("Prod", or_dash(v.prod.as_deref())),
        ("Std preview", or_dash(v.std_preview.as_deref())),
        ("Std live", or_dash(v.std_live.as_deref())),
        ("Mountpoint", or_dash(v.mountpoint.as_deref())),
        ("Lang", v.lang.clone()),
    ])
}

/// One host per line, preview first.
fn plain(v: &HostsView) -> String {
    [&v.preview, &v.live, &v.prod]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let store = config::build_store(global, None).await?;
    let view = HostsView::from(&*store.config());
    let out = output::render_single(&global.output, &view, detail, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
