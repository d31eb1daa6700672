//! `sidekick plugins <url>`: configured plugins and whether they apply.

use serde::Serialize;
use tabled::Tabled;

use sidekick_core::PluginConfig;

use crate::cli::{GlobalOpts, OutputFormat, UrlArgs};
use crate::config;
use crate::error::CliError;
use crate::output::{self, flag, or_dash};

use super::util::parse_location;

#[derive(Debug, Serialize)]
struct PluginEntry {
    #[serde(flatten)]
    plugin: PluginConfig,
    eligible: bool,
}

#[derive(Tabled)]
struct PluginRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Environments")]
    environments: String,
    #[tabled(rename = "Eligible")]
    eligible: String,
}

pub async fn handle(args: UrlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let location = parse_location(&args.url)?;
    let store = config::build_store(global, Some(location)).await?;

    let entries: Vec<PluginEntry> = store
        .config()
        .plugins
        .iter()
        .map(|plugin| PluginEntry {
            eligible: store.is_plugin_eligible(plugin),
            plugin: plugin.clone(),
        })
        .collect();

    if entries.is_empty() && !global.quiet {
        eprintln!("No plugins configured for this project.");
        return Ok(());
    }

    // Plain output lists only the plugins that apply.
    if matches!(global.output, OutputFormat::Plain) {
        let ids: Vec<&str> = entries
            .iter()
            .filter(|e| e.eligible)
            .map(|e| e.plugin.id.as_str())
            .collect();
        output::print_output(&ids.join("\n"), global.quiet);
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &entries,
        |e| PluginRow {
            id: e.plugin.id.clone(),
            title: or_dash(e.plugin.title.as_deref()),
            environments: if e.plugin.environments.is_empty() {
                "any".into()
            } else {
                e.plugin
                    .environments
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            },
            eligible: flag(e.eligible, color),
        },
        |e| e.plugin.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
