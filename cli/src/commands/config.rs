//! `fleetctl config`: collection config management subcommands.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fleet_common::ConfigType;

use crate::app::AppContext;
use crate::application::services::associations::edit_associations;
use crate::application::services::summaries::fill_rows;
use crate::application::services::{associations, configs};
use crate::commands::group::AssociationArgs;
use crate::domain::config_doc::validate_detail;
use crate::domain::{AgentGroup, Config, ConfigEdit, EntityKey, EntityKind, SummaryCache};

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// List configs
    List {
        /// Also fetch the groups each config is applied to
        #[arg(long, short = 's')]
        summaries: bool,
    },
    /// Show one config, including its detail document
    Get {
        /// Config name
        name: String,
    },
    /// Create a config from a YAML detail document
    Create(CreateArgs),
    /// Change a config's type, context or detail
    Update(UpdateArgs),
    /// Delete a config
    Delete {
        /// Config name
        name: String,
    },
    /// Show or edit the agent groups a config is applied to
    Groups(AssociationArgs),
    /// Check a detail document locally without contacting the server
    Validate {
        /// Detail file, or `-` for stdin
        file: PathBuf,
        #[arg(long = "type", value_enum, default_value = "pipeline")]
        config_type: ConfigType,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Config name
    pub name: String,
    #[arg(long = "type", value_enum, default_value = "pipeline")]
    pub config_type: ConfigType,
    #[arg(long, short = 'c', default_value = "")]
    pub context: String,
    /// Detail file, or `-` for stdin
    #[arg(long, short = 'f')]
    pub detail_file: PathBuf,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Config name
    pub name: String,
    #[arg(long = "type", value_enum)]
    pub config_type: Option<ConfigType>,
    #[arg(long, short = 'c')]
    pub context: Option<String>,
    /// Detail file, or `-` for stdin
    #[arg(long, short = 'f')]
    pub detail_file: Option<PathBuf>,
}

/// Read a detail document from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file or stdin cannot be read.
pub fn read_detail(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut detail = String::new();
        std::io::stdin()
            .read_to_string(&mut detail)
            .context("cannot read detail from stdin")?;
        return Ok(detail);
    }
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Run the config command.
pub async fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Validate { file, config_type } => validate(app, &file, config_type),
        cmd => run_remote(app, cmd).await,
    }
}

fn validate(app: &AppContext, file: &Path, config_type: ConfigType) -> Result<ExitCode> {
    validate_detail(config_type, &read_detail(file)?)?;
    app.renderer()
        .render_done(&format!("{} is a valid config detail", file.display()))?;
    Ok(ExitCode::SUCCESS)
}

async fn run_remote(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    let client = app.client()?;
    let renderer = app.renderer();
    match cmd {
        ConfigCommand::List { summaries } => {
            let configs = configs::list_configs(&client).await?;
            let mut cache = SummaryCache::new();
            let rows = if summaries {
                fill_rows(&client, &mut cache, EntityKind::Config, configs).await
            } else {
                cache.refresh_listing(EntityKind::Config, configs)
            };
            renderer.render_configs(&rows, summaries)?;
        }
        ConfigCommand::Get { name } => {
            let config = configs::get_config(&client, &name).await?;
            renderer.render_config(&config)?;
        }
        ConfigCommand::Create(args) => {
            let config = Config {
                name: args.name,
                config_type: args.config_type,
                version: 0,
                context: args.context,
                detail: read_detail(&args.detail_file)?,
            };
            configs::create_config(&client, &config).await?;
            renderer.render_done(&format!("Created config '{}'", config.name))?;
        }
        ConfigCommand::Update(args) => {
            let edit = ConfigEdit {
                config_type: args.config_type,
                context: args.context,
                detail: args.detail_file.as_deref().map(read_detail).transpose()?,
            };
            let updated = configs::update_config(&client, &args.name, &edit).await?;
            renderer.render_done(&format!("Updated config '{}'", updated.name))?;
        }
        ConfigCommand::Delete { name } => {
            let prompt = format!("Delete config '{name}'?");
            if !app.non_interactive && !app.confirm(&prompt, false)? {
                app.output.info("Cancelled");
                return Ok(ExitCode::SUCCESS);
            }
            configs::delete_config(&client, &name).await?;
            renderer.render_done(&format!("Deleted config '{name}'"))?;
        }
        ConfigCommand::Groups(args) => {
            let owner = EntityKey::config(&args.name);
            if args.add.is_empty() && args.remove.is_empty() {
                let applied = associations::applied_names(&client, &owner).await?;
                renderer.render_applied(&owner, &applied)?;
                return Ok(ExitCode::SUCCESS);
            }
            let mut cache = SummaryCache::new();
            let edit = edit_associations::<AgentGroup>(
                &client,
                &mut cache,
                &app.reporter(),
                &args.name,
                &args.add,
                &args.remove,
            )
            .await?;
            renderer.render_batch(&owner, edit.op, &edit.batch, &edit.applied)?;
            if let Some(err) = &edit.refresh_error {
                app.output.error(&format!("Could not reload {owner}: {err}"));
            }
            if !edit.batch.all_succeeded() || edit.refresh_error.is_some() {
                return Ok(ExitCode::FAILURE);
            }
        }
        ConfigCommand::Validate { file, config_type } => return validate(app, &file, config_type),
    }
    Ok(ExitCode::SUCCESS)
}
