//! `fleetctl group`: agent group management subcommands.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleet_common::TagOperator;

use crate::app::AppContext;
use crate::application::services::associations::edit_associations;
use crate::application::services::summaries::fill_rows;
use crate::application::services::{associations, groups};
use crate::domain::group;
use crate::domain::{AgentGroup, Config, EntityKey, EntityKind, GroupEdit, SummaryCache, Tag};

/// Group subcommands.
#[derive(Subcommand)]
pub enum GroupCommand {
    /// List agent groups
    List {
        /// Also fetch agent counts and applied configs
        #[arg(long, short = 's')]
        summaries: bool,
    },
    /// Show one agent group
    Get {
        /// Group name
        name: String,
    },
    /// Create an agent group
    Create(CreateArgs),
    /// Change a group's description, tags or tag operator
    Update(UpdateArgs),
    /// Delete an agent group
    Delete {
        /// Group name
        name: String,
    },
    /// List the agents matched by a group
    Agents {
        /// Group name
        name: String,
    },
    /// Show or edit the configs applied to a group
    Configs(AssociationArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// Group name
    pub name: String,
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
    /// Tag as name=value (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<Tag>,
    /// How tags are matched against agent tags
    #[arg(long, value_enum, default_value = "and")]
    pub operator: TagOperator,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Group name
    pub name: String,
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    /// Replace the tags with these (repeatable)
    #[arg(long = "tag", short = 't', conflicts_with = "clear_tags")]
    pub tags: Vec<Tag>,
    /// Remove every tag
    #[arg(long)]
    pub clear_tags: bool,
    #[arg(long, value_enum)]
    pub operator: Option<TagOperator>,
}

impl UpdateArgs {
    fn edit(&self) -> GroupEdit {
        let tags = if self.clear_tags {
            Some(Vec::new())
        } else if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.clone())
        };
        GroupEdit {
            description: self.description.clone(),
            tags,
            tag_operator: self.operator,
        }
    }
}

/// Peers to add to or remove from an owner's applied set. Without either
/// flag the applied set is shown.
#[derive(Args)]
pub struct AssociationArgs {
    /// Owner name
    pub name: String,
    /// Apply these peers (repeatable)
    #[arg(long, num_args = 1.., conflicts_with = "remove")]
    pub add: Vec<String>,
    /// Remove these peers (repeatable)
    #[arg(long, num_args = 1..)]
    pub remove: Vec<String>,
}

/// Run the group command.
pub async fn run(app: &AppContext, cmd: GroupCommand) -> Result<ExitCode> {
    let client = app.client()?;
    let renderer = app.renderer();
    match cmd {
        GroupCommand::List { summaries } => {
            let groups = groups::list_groups(&client).await?;
            let mut cache = SummaryCache::new();
            let rows = if summaries {
                fill_rows(&client, &mut cache, EntityKind::Group, groups).await
            } else {
                cache.refresh_listing(EntityKind::Group, groups)
            };
            renderer.render_groups(&rows, summaries)?;
        }
        GroupCommand::Get { name } => {
            let group = groups::get_group(&client, &name).await?;
            renderer.render_group(&group)?;
        }
        GroupCommand::Create(args) => {
            let group = AgentGroup {
                group_name: args.name,
                description: args.description,
                tags: args.tags,
                tag_operator: args.operator,
            };
            groups::create_group(&client, &group).await?;
            renderer.render_done(&format!("Created agent group '{}'", group.group_name))?;
        }
        GroupCommand::Update(args) => {
            let updated = groups::update_group(&client, &args.name, &args.edit()).await?;
            renderer.render_done(&format!("Updated agent group '{}'", updated.group_name))?;
        }
        GroupCommand::Delete { name } => {
            group::guard_delete(&name)?;
            let prompt = format!("Delete agent group '{name}'?");
            if !app.non_interactive && !app.confirm(&prompt, false)? {
                app.output.info("Cancelled");
                return Ok(ExitCode::SUCCESS);
            }
            groups::delete_group(&client, &name).await?;
            renderer.render_done(&format!("Deleted agent group '{name}'"))?;
        }
        GroupCommand::Agents { name } => {
            let agents = groups::list_agents(&client, &name).await?;
            renderer.render_agents(&name, &agents)?;
        }
        GroupCommand::Configs(args) => {
            let owner = EntityKey::group(&args.name);
            if args.add.is_empty() && args.remove.is_empty() {
                let applied = associations::applied_names(&client, &owner).await?;
                renderer.render_applied(&owner, &applied)?;
                return Ok(ExitCode::SUCCESS);
            }
            let mut cache = SummaryCache::new();
            let edit = edit_associations::<Config>(
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
    }
    Ok(ExitCode::SUCCESS)
}
