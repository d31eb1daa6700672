//! `sidekick classify <url>`: which environment a URL belongs to.

use serde::Serialize;

use sidekick_core::{Classification, Environment};

use crate::cli::{GlobalOpts, UrlArgs};
use crate::config;
use crate::error::CliError;
use crate::output::{self, flag};

use super::util::parse_location;

#[derive(Debug, Serialize)]
struct ClassifyView {
    url: String,
    environment: Environment,
    #[serde(flatten)]
    classification: Classification,
}

pub async fn handle(args: UrlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let location = parse_location(&args.url)?;
    let store = config::build_store(global, Some(location)).await?;

    let classification = store.classification();
    let view = ClassifyView {
        url: args.url,
        environment: classification.environment(),
        classification,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            let c = &v.classification;
            output::render_detail(&[
                ("URL", v.url.clone()),
                ("Environment", v.environment.to_string()),
                ("Project", flag(c.project, color)),
                ("Dev", flag(c.dev, color)),
                ("Preview", flag(c.inner, color)),
                ("Live", flag(c.outer, color)),
                ("Prod", flag(c.prod, color)),
                ("Editor", flag(c.editor, color)),
                ("Admin", flag(c.admin, color)),
                ("Content", flag(c.content, color)),
            ])
        },
        |v| v.environment.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
