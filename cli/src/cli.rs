//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Console for agent groups and collection configs on a fleet config server
#[derive(Parser)]
#[command(
    name = "fleetctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (any non-empty NO_COLOR except "0"/"false")
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config server address, overriding server.address
    #[arg(long, global = true, env = "FLEET_SERVER_ADDRESS")]
    pub server: Option<String>,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage agent groups
    #[command(subcommand)]
    Group(commands::group::GroupCommand),

    /// Manage collection configs
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Edit applied associations interactively
    Console(commands::console::ConsoleArgs),

    /// Show and set console settings
    #[command(subcommand)]
    Settings(commands::settings::SettingsCommand),

    /// List config-server actions and their messages
    Schema(commands::schema::SchemaArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let flags = AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            behaviour: BehaviourFlags {
                yes: self.yes,
                server: self.server,
            },
        };
        let app = AppContext::new(&flags)?;

        match self.command {
            Command::Group(cmd) => commands::group::run(&app, cmd).await,
            Command::Config(cmd) => commands::config::run(&app, cmd).await,
            Command::Console(args) => commands::console::run(&app, args).await,
            Command::Settings(cmd) => commands::settings::run(&app, cmd),
            Command::Schema(args) => commands::schema::run(&app, &args),
        }
    }
}
