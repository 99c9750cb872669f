//! `fleetctl console`: interactive editor for one entity's applied set.
//!
//! The applied peers are shown as tabs. Closing a tab stages the peer for
//! removal; nothing is sent until the view is saved. New peers are added
//! through a picker and applied as soon as the picker is confirmed.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use dialoguer::{MultiSelect, Select};

use crate::app::AppContext;
use crate::application::ports::Transport;
use crate::application::rpc::RpcClient;
use crate::application::services::associations::{AssociationSession, Commit, Peer};
use crate::domain::{AgentGroup, Config, Keyed, LedgerOp, SummaryCache};
use crate::output::HumanRenderer;

#[derive(Clone, Copy, ValueEnum)]
pub enum OwnerKind {
    /// Edit the configs applied to an agent group
    Group,
    /// Edit the agent groups a config is applied to
    Config,
}

#[derive(Args)]
pub struct ConsoleArgs {
    #[arg(value_enum)]
    pub kind: OwnerKind,
    /// Name of the group or config; picked from a list when omitted
    pub name: Option<String>,
}

/// A peer the console can show in its active tab.
trait Shown: Peer {
    fn show(&self, renderer: &HumanRenderer<'_>);
}

impl Shown for Config {
    fn show(&self, renderer: &HumanRenderer<'_>) {
        renderer.render_config(self);
    }
}

impl Shown for AgentGroup {
    fn show(&self, renderer: &HumanRenderer<'_>) {
        renderer.render_group(self);
    }
}

#[derive(Clone, Copy)]
enum MenuItem {
    Switch,
    CloseTab,
    Add,
    Save,
    Reload,
    Cancel,
}

impl MenuItem {
    const ALL: [MenuItem; 6] = [
        MenuItem::Switch,
        MenuItem::CloseTab,
        MenuItem::Add,
        MenuItem::Save,
        MenuItem::Reload,
        MenuItem::Cancel,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuItem::Switch => "Switch tab",
            MenuItem::CloseTab => "Close active tab (stage removal)",
            MenuItem::Add => "Add...",
            MenuItem::Save => "Save",
            MenuItem::Reload => "Reload",
            MenuItem::Cancel => "Cancel",
        }
    }
}

/// Run the console command.
pub async fn run(app: &AppContext, args: ConsoleArgs) -> Result<ExitCode> {
    if app.is_json() || app.non_interactive || !app.output.is_tty {
        bail!(
            "the console needs an interactive terminal; use `fleetctl group configs` or `fleetctl config groups` instead"
        );
    }
    let client = app.client()?;
    match args.kind {
        OwnerKind::Group => {
            let name = owner_name::<AgentGroup>(&client, args.name).await?;
            edit::<Config>(app, &client, &name).await
        }
        OwnerKind::Config => {
            let name = owner_name::<Config>(&client, args.name).await?;
            edit::<AgentGroup>(app, &client, &name).await
        }
    }
}

/// The owner given on the command line, or one picked from the listing.
async fn owner_name<O: Peer>(
    client: &RpcClient<impl Transport>,
    given: Option<String>,
) -> Result<String> {
    if let Some(name) = given {
        return Ok(name);
    }
    let mut names: Vec<String> = O::list_all(client)
        .await?
        .iter()
        .map(|owner| owner.key().to_string())
        .collect();
    if names.is_empty() {
        bail!("no {} to edit", O::KIND.label());
    }
    let index = Select::new()
        .with_prompt(format!("Choose {}", O::KIND.label()))
        .items(&names)
        .default(0)
        .interact()
        .context("owner selection")?;
    Ok(names.swap_remove(index))
}

async fn edit<P: Shown>(
    app: &AppContext,
    client: &RpcClient<impl Transport>,
    owner_name: &str,
) -> Result<ExitCode> {
    let renderer = HumanRenderer::new(&app.output);
    let mut cache = SummaryCache::new();
    let mut session = AssociationSession::<P>::new(owner_name);
    session.open(client).await?;

    loop {
        println!();
        renderer.render_tabs(
            session.owner(),
            &session.tabs().keys(),
            session.tabs().active(),
        );
        if let Some(peer) = session.tabs().active_peer() {
            println!();
            peer.show(&renderer);
        }
        let pending = session.ledger().pending_removal();
        if !pending.is_empty() {
            app.output
                .warn(&format!("Pending removal: {}", pending.join(", ")));
        }
        println!();

        let labels: Vec<&str> = MenuItem::ALL.iter().map(|m| m.label()).collect();
        let choice = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()
            .context("menu selection")?;

        let outcome = match MenuItem::ALL[choice] {
            MenuItem::Switch => switch_tab(&mut session),
            MenuItem::CloseTab => close_active(&mut session),
            MenuItem::Add => add_peers(app, client, &mut cache, &mut session).await,
            MenuItem::Reload => session.reload(client).await,
            MenuItem::Save => match session.save(client, &mut cache).await {
                Ok(commit) => {
                    report(app, &session, LedgerOp::Remove, &commit);
                    if commit.batch.all_succeeded() && commit.refresh_error.is_none() {
                        app.output.success("Saved");
                        return Ok(ExitCode::SUCCESS);
                    }
                    Ok(())
                }
                Err(err) => Err(err),
            },
            MenuItem::Cancel => {
                let discard = session.ledger().pending_removal().is_empty()
                    || app.confirm("Discard staged removals?", false)?;
                if discard {
                    session.cancel();
                    app.output.info("Cancelled");
                    return Ok(ExitCode::SUCCESS);
                }
                Ok(())
            }
        };
        if let Err(err) = outcome {
            app.output.error(&format!("{err:#}"));
        }
        if !session.tabs().is_open() {
            app.output.warn("The association view could not be reloaded and was closed");
            return Ok(ExitCode::FAILURE);
        }
    }
}

fn switch_tab<P: Shown>(session: &mut AssociationSession<P>) -> Result<()> {
    let keys = session.tabs().keys();
    if keys.is_empty() {
        return Ok(());
    }
    let current = session
        .tabs()
        .active()
        .and_then(|active| keys.iter().position(|k| k == active))
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Show")
        .items(&keys)
        .default(current)
        .interact()
        .context("tab selection")?;
    session.select_active(&keys[idx])?;
    Ok(())
}

fn close_active<P: Shown>(session: &mut AssociationSession<P>) -> Result<()> {
    let Some(active) = session.tabs().active().map(ToString::to_string) else {
        return Ok(());
    };
    session.remove_peer_from_view(&active)
}

async fn add_peers<P: Shown>(
    app: &AppContext,
    client: &RpcClient<impl Transport>,
    cache: &mut SummaryCache,
    session: &mut AssociationSession<P>,
) -> Result<()> {
    let options = session.open_addition_picker(client).await?;
    let mut picker = MultiSelect::new().with_prompt(format!(
        "Add {}s to {} (applied ones stay checked)",
        P::KIND.label(),
        session.owner()
    ));
    for option in &options {
        picker = picker.item_checked(option.peer.key(), option.applied);
    }
    let chosen = match picker.interact() {
        Ok(chosen) => chosen,
        Err(err) => {
            session.discard_picker();
            return Err(err).context("peer selection");
        }
    };
    for idx in chosen {
        let option = &options[idx];
        if !option.applied {
            session.toggle_addition(option.peer.key())?;
        }
    }
    let commit = session.commit_additions(client, cache).await?;
    report(app, session, LedgerOp::Apply, &commit);
    Ok(())
}

fn report<P: Shown>(
    app: &AppContext,
    session: &AssociationSession<P>,
    op: LedgerOp,
    commit: &Commit,
) {
    let owner = session.owner();
    if let Some(err) = &commit.refresh_error {
        app.output.error(&format!("Could not reload {owner}: {err}"));
    }
    let batch = &commit.batch;
    let verb = if op == LedgerOp::Remove { "Removed" } else { "Applied" };
    for peer in batch.succeeded_peers() {
        app.output.success(&format!("{verb} {}", owner.peer(peer)));
    }
    if let Some((peer, err)) = batch.first_failure() {
        app.output.error(&format!("{}: {err}", owner.peer(peer)));
    }
}
