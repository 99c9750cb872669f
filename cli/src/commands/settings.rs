//! `fleetctl settings`: show and set console settings.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::settings_service;

/// Settings subcommands.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show current settings
    Show,
    /// Print one setting
    Get {
        /// Setting key, e.g. server.address
        key: String,
    },
    /// Set a setting value
    Set {
        /// Setting key
        key: String,
        /// Setting value
        value: String,
    },
}

/// Run the settings command.
pub fn run(app: &AppContext, cmd: SettingsCommand) -> Result<ExitCode> {
    match cmd {
        SettingsCommand::Show => {
            let settings = settings_service::load_settings(&app.config_store)?;
            let path = app.config_store.path()?;
            app.renderer().render_settings(&settings, &path)?;
        }
        SettingsCommand::Get { key } => {
            let settings = settings_service::load_settings(&app.config_store)?;
            let value = settings.get(&key)?;
            app.renderer().render_setting(&key, &value)?;
        }
        SettingsCommand::Set { key, value } => {
            let settings = settings_service::set_setting(&app.config_store, &key, &value)?;
            let stored = settings.get(&key)?;
            app.renderer().render_done(&format!("Set {key} = {stored}"))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
