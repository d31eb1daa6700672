//! `sidekick views <path>`: configured special views, marking the one
//! that applies to a path.

use serde::Serialize;
use tabled::Tabled;

use sidekick_core::ViewConfig;

use crate::cli::{GlobalOpts, OutputFormat, ViewsArgs};
use crate::config;
use crate::error::CliError;
use crate::output::{self, flag, or_dash};

#[derive(Debug, Serialize)]
struct ViewEntry {
    #[serde(flatten)]
    view: ViewConfig,
    matched: bool,
}

#[derive(Tabled)]
struct ViewRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Viewer")]
    viewer: String,
    #[tabled(rename = "Match")]
    matched: String,
}

pub async fn handle(args: ViewsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = config::build_store(global, None).await?;
    let cfg = store.config();

    // Only the first matching view applies.
    let selected = cfg.find_view(&args.path);
    let entries: Vec<ViewEntry> = cfg
        .views
        .iter()
        .map(|view| ViewEntry {
            view: view.clone(),
            matched: selected.is_some_and(|s| std::ptr::eq(s, view)),
        })
        .collect();

    // Plain output is just the viewer that applies, for scripting.
    if matches!(global.output, OutputFormat::Plain) {
        if let Some(view) = selected {
            output::print_output(&view.viewer, global.quiet);
        }
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &entries,
        |e| ViewRow {
            path: e.view.path.clone(),
            title: or_dash(e.view.title.as_deref()),
            viewer: e.view.viewer.clone(),
            matched: flag(e.matched, color),
        },
        |e| e.view.viewer.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
