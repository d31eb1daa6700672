//! Clap derive structures for the `sidekick` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sidekick -- inspect sidekick site configuration from the command line
#[derive(Debug, Parser)]
#[command(
    name = "sidekick",
    version,
    about = "Inspect sidekick site configuration, hosts and resource status",
    long_about = "Resolves a project's sidekick configuration (merging the project\n\
        document from the admin service), derives its preview and live hosts,\n\
        classifies URLs and fetches resource status.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the platform default
    #[arg(long, env = "SIDEKICK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Project profile to use
    #[arg(long, short = 'p', env = "SIDEKICK_PROJECT", global = true)]
    pub project: Option<String>,

    /// Repository owner (overrides profile)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name (overrides profile)
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Git ref (overrides profile)
    #[arg(long = "ref", value_name = "REF", global = true)]
    pub git_ref: Option<String>,

    /// Admin service origin
    #[arg(long, env = "SIDEKICK_ADMIN_ORIGIN", global = true)]
    pub admin_origin: Option<String>,

    /// Pin a specific admin service version
    #[arg(long, global = true)]
    pub admin_version: Option<String>,

    /// Admin service auth token
    #[arg(long, env = "SIDEKICK_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Skip the remote project config; use the local profile as-is
    #[arg(long, global = true)]
    pub no_remote: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SIDEKICK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config default)
    #[arg(long, env = "SIDEKICK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the project's environment hosts
    Hosts,

    /// Classify a URL against the project's environments
    #[command(alias = "cls")]
    Classify(UrlArgs),

    /// Fetch the admin-service status of a resource
    #[command(alias = "st")]
    Status(UrlArgs),

    /// List special views and the one matching a path
    Views(ViewsArgs),

    /// List plugins and whether they apply to a URL
    Plugins(UrlArgs),

    /// Manage CLI configuration and project profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct UrlArgs {
    /// Page, editor or admin URL
    pub url: String,
}

#[derive(Debug, Args)]
pub struct ViewsArgs {
    /// Resource path, e.g. /data/products.json
    pub path: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with a project profile
    Init(InitArgs),

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active project profile
    Set {
        /// Profile key, e.g. host, previewHost, mountpoint
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured projects
    Projects,

    /// Set the default project
    Use {
        /// Project name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Profile name
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Repository owner
    #[arg(long, value_name = "OWNER")]
    pub project_owner: String,

    /// Repository name
    #[arg(long, value_name = "REPO")]
    pub project_repo: String,

    /// Git ref
    #[arg(long, value_name = "REF")]
    pub project_ref: Option<String>,

    /// Production host
    #[arg(long)]
    pub host: Option<String>,

    /// Content source (mountpoint) URL
    #[arg(long)]
    pub mountpoint: Option<String>,

    /// Use the aem.page / aem.live domains
    #[arg(long)]
    pub aem_domain: bool,

    /// Replace an existing profile of the same name
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
