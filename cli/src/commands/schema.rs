//! `fleetctl schema`: inspect the config-server actions.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use fleet_common::Action;

use crate::app::AppContext;
use crate::application::SchemaRegistry;
use crate::domain::SchemaError;

#[derive(Args)]
pub struct SchemaArgs {
    /// Show the endpoint and message fields of one action
    pub action: Option<String>,
}

/// Run the schema command. Does not contact the server.
pub fn run(app: &AppContext, args: &SchemaArgs) -> Result<ExitCode> {
    let registry = SchemaRegistry::load(&app.settings.server)?;
    let renderer = app.renderer();
    match &args.action {
        None => renderer.render_actions(&registry)?,
        Some(name) => {
            let action: Action = name
                .parse()
                .map_err(|_| SchemaError::UnknownAction(name.clone()))?;
            renderer.render_action(&registry, action)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
