//! Command dispatch. Each handler builds its own store because the
//! location it classifies comes from the command's arguments.

pub mod classify;
pub mod config_cmd;
pub mod hosts;
pub mod plugins;
pub mod status;
pub mod util;
pub mod views;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Hosts => hosts::handle(global).await,
        Command::Classify(args) => classify::handle(args, global).await,
        Command::Status(args) => status::handle(args, global).await,
        Command::Views(args) => views::handle(args, global).await,
        Command::Plugins(args) => plugins::handle(args, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions(args.shell);
            Ok(())
        }
    }
}

fn completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;

    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "sidekick", &mut std::io::stdout());
}
