// tfup/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use tfup_common::config::Config;
use tfup_common::error::Result;

// Module declarations
pub mod install;
pub mod list;
pub mod uninstall;
pub mod versions;

use crate::cli::install::InstallArgs;
use crate::cli::list::List;
use crate::cli::uninstall::UninstallArgs;
use crate::cli::versions::VersionsArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "tfup", bin_name = "tfup")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Install(InstallArgs),
    List(List),
    Versions(VersionsArgs),
    Uninstall(UninstallArgs),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Install(command) => command.run(config).await,
            Self::List(command) => command.run(config).await,
            Self::Versions(command) => command.run(config).await,
            Self::Uninstall(command) => command.run(config).await,
        }
    }
}
