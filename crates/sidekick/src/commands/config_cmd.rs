//! Config subcommand handlers.

use clap::ValueEnum;

use sidekick_core::RawConfig;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs, OutputFormat};
use crate::config::{self, Config, Project};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for project in cfg.projects.values_mut() {
        if project.auth_token.is_some() {
            project.auth_token = Some("****".into());
        }
    }
    cfg
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

/// Empty values clear optional fields.
fn optional(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

const PROJECT_KEYS: &str = "owner, repo, ref, host, previewHost, liveHost, mountpoint, project, \
     devMode, devOrigin, adminVersion, scriptUrl, lang, aemDomain, authToken, authTokenEnv, \
     defaults.adminOrigin, defaults.timeout, defaults.telemetry, defaults.output";

fn set_default(cfg: &mut Config, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "adminOrigin" | "admin_origin" => cfg.defaults.admin_origin = value,
        "timeout" => {
            cfg.defaults.timeout = value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?;
        }
        "telemetry" => cfg.defaults.telemetry = parse_bool(key, &value)?,
        "output" => {
            OutputFormat::from_str(&value, true).map_err(|_| CliError::Validation {
                field: "output".into(),
                reason: "must be one of table, json, json-compact, yaml, plain".into(),
            })?;
            cfg.defaults.output = value;
        }
        other => return Err(unknown_key(other)),
    }
    Ok(())
}

fn set_project(project: &mut Project, key: &str, value: String) -> Result<(), CliError> {
    let site = &mut project.site;
    match key {
        "owner" => site.owner = optional(value),
        "repo" => site.repo = optional(value),
        "ref" => site.git_ref = optional(value),
        "host" => site.host = optional(value),
        "previewHost" | "preview_host" => site.preview_host = optional(value),
        "liveHost" | "live_host" => site.live_host = optional(value),
        "mountpoint" => site.mountpoint = optional(value).into_iter().collect(),
        "project" => site.project = optional(value),
        "devMode" | "dev_mode" => site.dev_mode = parse_bool(key, &value)?,
        "devOrigin" | "dev_origin" => site.dev_origin = optional(value),
        "adminVersion" | "admin_version" => site.admin_version = optional(value),
        "scriptUrl" | "script_url" => site.script_url = optional(value),
        "lang" => site.lang = optional(value),
        "aemDomain" | "aem_domain" => site.aem_domain = parse_bool(key, &value)?,
        "authToken" | "auth_token" => project.auth_token = optional(value),
        "authTokenEnv" | "auth_token_env" => project.auth_token_env = optional(value),
        other => return Err(unknown_key(other)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> CliError {
    CliError::Validation {
        field: key.into(),
        reason: format!("unknown config key '{key}'. Valid keys: {PROJECT_KEYS}"),
    }
}

fn init(args: InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::active_path(global);
    let mut cfg = config::load(global)?;

    if cfg.projects.contains_key(&args.name) && !args.force {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: format!(
                "project '{}' already exists; pass --force to replace it",
                args.name
            ),
        });
    }

    let project = Project {
        site: RawConfig {
            owner: Some(args.project_owner),
            repo: Some(args.project_repo),
            git_ref: args.project_ref,
            host: args.host,
            mountpoint: args.mountpoint.into_iter().collect(),
            aem_domain: args.aem_domain,
            ..RawConfig::default()
        },
        ..Project::default()
    };
    cfg.projects.insert(args.name.clone(), project);
    if cfg.active_project_name(None).is_none() || cfg.projects.len() == 1 {
        cfg.default_project = Some(args.name.clone());
    }

    config::save(&cfg, global)?;
    if !global.quiet {
        eprintln!("✓ Project '{}' written to {}", args.name, path.display());
        eprintln!("  Try it: sidekick hosts --project {}", args.name);
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init(init_args) => init(init_args, global),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load(global)?);
            let as_toml = toml::to_string_pretty(&cfg)
                .map_err(|e| CliError::ConfigFile(e.to_string()))?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| as_toml.clone(),
                |c| c.default_project.clone().unwrap_or_default(),
            )?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::active_path(global).display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load(global)?;

            if let Some(default_key) = key.strip_prefix("defaults.") {
                set_default(&mut cfg, default_key, value)?;
                config::save(&cfg, global)?;
                if !global.quiet {
                    eprintln!("✓ Set {key}");
                }
                return Ok(());
            }

            let name = cfg
                .active_project_name(global.project.as_deref())
                .unwrap_or_else(|| "default".into());
            let project = cfg.projects.entry(name.clone()).or_default();
            set_project(project, &key, value)?;

            config::save(&cfg, global)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on project '{name}'");
            }
            Ok(())
        }

        // ── Projects ────────────────────────────────────────────────
        ConfigCommand::Projects => {
            let cfg = config::load(global)?;
            if cfg.projects.is_empty() {
                eprintln!("No projects configured. Run: sidekick config init");
                return Ok(());
            }
            let default = cfg.active_project_name(None);
            let mut names: Vec<_> = cfg.projects.keys().collect();
            names.sort();
            for name in names {
                let marker = if default.as_ref() == Some(name) { " *" } else { "" };
                println!("{name}{marker}");
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;
            cfg.project(&name)?;
            cfg.default_project = Some(name.clone());
            config::save(&cfg, global)?;
            if !global.quiet {
                eprintln!("✓ Default project set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_project_keys() {
        let mut project = Project::default();
        set_project(&mut project, "previewHost", "preview.example.com".into()).unwrap();
        set_project(&mut project, "aemDomain", "true".into()).unwrap();
        set_project(&mut project, "mountpoint", "https://drive.google.com/x".into()).unwrap();

        assert_eq!(project.site.preview_host.as_deref(), Some("preview.example.com"));
        assert!(project.site.aem_domain);
        assert_eq!(project.site.mountpoint, vec!["https://drive.google.com/x"]);

        set_project(&mut project, "previewHost", String::new()).unwrap();
        assert!(project.site.preview_host.is_none());
    }

    #[test]
    fn rejects_unknown_and_malformed_values() {
        let mut project = Project::default();
        assert!(set_project(&mut project, "bogus", "x".into()).is_err());
        assert!(set_project(&mut project, "devMode", "maybe".into()).is_err());

        let mut cfg = Config::default();
        assert!(set_default(&mut cfg, "timeout", "soon".into()).is_err());
        set_default(&mut cfg, "timeout", "5".into()).unwrap();
        assert_eq!(cfg.defaults.timeout, 5);

        assert!(set_default(&mut cfg, "output", "xml".into()).is_err());
        set_default(&mut cfg, "output", "json-compact".into()).unwrap();
        assert_eq!(cfg.defaults.output, "json-compact");
    }

    #[test]
    fn show_masks_tokens() {
        let mut cfg = Config::default();
        cfg.projects.insert(
            "default".into(),
            Project {
                auth_token: Some("secret".into()),
                ..Project::default()
            },
        );
        let shown = redacted(&cfg);
        assert_eq!(shown.projects["default"].auth_token.as_deref(), Some("****"));
    }
}
