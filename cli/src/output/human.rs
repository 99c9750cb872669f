//! Human-readable terminal renderer.

use std::path::Path;

use fleet_common::Action;
use owo_colors::OwoColorize as _;

use crate::application::SchemaRegistry;
use crate::application::schema::{MessageKind, shape};
use crate::application::services::associations::AssociationBatch;
use crate::domain::model::join_tags;
use crate::domain::{
    Agent, AgentGroup, Config, ConsoleConfig, CountCell, EntityKey, EntityKind, LedgerOp, Row,
};
use crate::output::OutputContext;

const NOT_FETCHED: &str = "not fetched";

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Pad first, then style, so ANSI codes do not break alignment.
    fn count_cell(&self, cell: &CountCell, width: usize) -> String {
        let text = format!("{:<width$}", cell.to_string());
        match self.ctx.styles.count(cell) {
            Some(style) => text.style(style).to_string(),
            None => text,
        }
    }

    fn agent_cell(&self, count: Option<usize>, width: usize) -> String {
        match count {
            Some(n) => format!("{n:<width$}"),
            None => format!("{NOT_FETCHED:<width$}").style(self.ctx.styles.dim).to_string(),
        }
    }

    /// Render the agent group listing.
    pub fn render_groups(&self, rows: &[Row<AgentGroup>], summaries: bool) {
        if rows.is_empty() {
            self.ctx
                .info("No agent groups. Create one: fleetctl group create <NAME>");
            return;
        }
        let header = if summaries {
            format!("{:<20} {:<8} {:<12} {:<30} {}", "NAME", "OPERATOR", "AGENTS", "CONFIGS", "TAGS")
        } else {
            format!("{:<20} {:<8} {:<30} {}", "NAME", "OPERATOR", "TAGS", "DESCRIPTION")
        };
        println!("  {}", header.style(self.ctx.styles.bold));
        for row in rows {
            let group = &row.entity;
            let operator = format!("{:?}", group.tag_operator).to_uppercase();
            if summaries {
                println!(
                    "  {:<20} {:<8} {} {} {}",
                    group.group_name,
                    operator,
                    self.agent_cell(row.summary.agent_count, 12),
                    self.count_cell(&row.summary.peer_cell(), 30),
                    join_tags(&group.tags),
                );
            } else {
                println!(
                    "  {:<20} {:<8} {:<30} {}",
                    group.group_name,
                    operator,
                    join_tags(&group.tags),
                    group.description,
                );
            }
        }
    }

    pub fn render_group(&self, group: &AgentGroup) {
        self.ctx.kv("Name:", &group.group_name);
        self.ctx.kv("Description:", &group.description);
        self.ctx
            .kv("Operator:", &format!("{:?}", group.tag_operator).to_uppercase());
        self.ctx.kv("Tags:", &join_tags(&group.tags));
        if group.is_default() {
            self.ctx
                .info("Built-in group: only the description can be changed.");
        }
    }

    /// Render the config listing.
    pub fn render_configs(&self, rows: &[Row<Config>], summaries: bool) {
        if rows.is_empty() {
            self.ctx.info(
                "No configs. Create one: fleetctl config create <NAME> --detail-file <FILE>",
            );
            return;
        }
        let header = if summaries {
            format!("{:<24} {:<9} {:<8} {:<30} {}", "NAME", "TYPE", "VERSION", "GROUPS", "CONTEXT")
        } else {
            format!("{:<24} {:<9} {:<8} {}", "NAME", "TYPE", "VERSION", "CONTEXT")
        };
        println!("  {}", header.style(self.ctx.styles.bold));
        for row in rows {
            let config = &row.entity;
            let kind = format!("{:?}", config.config_type).to_uppercase();
            if summaries {
                println!(
                    "  {:<24} {:<9} {:<8} {} {}",
                    config.name,
                    kind,
                    config.version,
                    self.count_cell(&row.summary.peer_cell(), 30),
                    config.context,
                );
            } else {
                println!(
                    "  {:<24} {:<9} {:<8} {}",
                    config.name, kind, config.version, config.context
                );
            }
        }
    }

    pub fn render_config(&self, config: &Config) {
        self.ctx.kv("Name:", &config.name);
        self.ctx
            .kv("Type:", &format!("{:?}", config.config_type).to_uppercase());
        self.ctx.kv("Version:", &config.version.to_string());
        self.ctx.kv("Context:", &config.context);
        println!();
        self.ctx.header("Detail:");
        for line in config.detail.lines() {
            println!("    {line}");
        }
    }

    /// Render the agents matched by a group. An empty list is a warning.
    pub fn render_agents(&self, group_name: &str, agents: &[Agent]) {
        if agents.is_empty() {
            self.ctx.warn("Agent not found");
            return;
        }
        self.ctx
            .header(&format!("Agents in group '{group_name}' ({})", agents.len()));
        println!(
            "  {}",
            format!(
                "{:<24} {:<10} {:<20} {:<16} {:<10} {:<10} {}",
                "ID", "TYPE", "HOSTNAME", "IP", "STATUS", "VERSION", "HEARTBEAT"
            )
            .style(self.ctx.styles.bold)
        );
        for agent in agents {
            println!(
                "  {:<24} {:<10} {:<20} {:<16} {:<10} {:<10} {}",
                agent.agent_id,
                agent.agent_type,
                agent.hostname,
                agent.ip,
                agent.running_status,
                agent.version,
                format_timestamp(agent.latest_heartbeat_time),
            );
        }
    }

    /// Render the applied peers of one entity.
    pub fn render_applied(&self, owner: &EntityKey, applied: &[String]) {
        let peer_label = owner.kind.peer().label();
        if applied.is_empty() {
            let (cmd, flag) = match owner.kind {
                EntityKind::Group => ("group configs", "CONFIG"),
                EntityKind::Config => ("config groups", "GROUP"),
            };
            self.ctx.info(&format!(
                "No {peer_label}s applied to {owner}. Add one: fleetctl {cmd} {} --add <{flag}>",
                owner.name
            ));
            return;
        }
        self.ctx
            .header(&format!("{} {peer_label}(s) applied to {owner}", applied.len()));
        for name in applied {
            println!("    {name}");
        }
    }

    /// Render the outcome of an apply or removal batch, then the applied set
    /// as the server now holds it.
    pub fn render_batch(
        &self,
        owner: &EntityKey,
        op: LedgerOp,
        batch: &AssociationBatch,
        applied: &[String],
    ) {
        let verb = match op {
            LedgerOp::Remove => "Removed",
            _ => "Applied",
        };
        for peer in batch.succeeded_peers() {
            self.ctx.success(&format!("{verb} {}", owner.peer(peer)));
        }
        for (_, err) in &batch.failed {
            self.ctx.error(&err.to_string());
        }
        self.render_applied(owner, applied);
    }

    /// Render the tab strip of an association view.
    pub fn render_tabs(&self, owner: &EntityKey, keys: &[String], active: Option<&str>) {
        self.ctx.header(&format!("Applied to {owner}"));
        if keys.is_empty() {
            println!("    {}", "(none)".style(self.ctx.styles.affordance));
            return;
        }
        let strip: Vec<String> = keys
            .iter()
            .map(|key| {
                if Some(key.as_str()) == active {
                    format!(" {key} ").style(self.ctx.styles.active).to_string()
                } else {
                    format!("[{key}]")
                }
            })
            .collect();
        println!("    {}", strip.join(" "));
    }

    /// Render the current console settings.
    pub fn render_settings(&self, config: &ConsoleConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Settings ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<22} {}", "server.address:", config.server.address);
        println!("  {:<22} {}", "server.api_prefix:", config.server.api_prefix);
        println!("  {:<22} {}", "server.service:", config.server.service);
        println!("  {:<22} {}", "server.timeout_secs:", config.server.timeout_secs);
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["FLEET_CONFIG", "FLEET_SERVER_ADDRESS", "NO_COLOR"] {
            println!(
                "    {:<22} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Print a single setting value, bare, for use in scripts.
    pub fn render_setting(&self, value: &str) {
        println!("{value}");
    }

    /// Render every action with its verb and endpoint.
    pub fn render_actions(&self, registry: &SchemaRegistry) {
        println!(
            "  {}",
            format!("{:<32} {:<7} {}", "ACTION", "METHOD", "ENDPOINT").style(self.ctx.styles.bold)
        );
        for action in registry.actions() {
            println!(
                "  {:<32} {:<7} {}",
                action.name(),
                action.method().as_str(),
                registry.endpoint(action)
            );
        }
    }

    /// Render one action's endpoint and message shapes.
    pub fn render_action(&self, registry: &SchemaRegistry, action: Action) {
        self.ctx.kv("Action:", action.name());
        self.ctx.kv("Method:", action.method().as_str());
        self.ctx.kv("Endpoint:", &registry.endpoint(action));
        for kind in [MessageKind::Request, MessageKind::Response] {
            let shape = shape(action, kind);
            println!();
            self.ctx.header(&format!("{kind}: {}", shape.type_name));
            for (tag, field) in shape.fields.iter().enumerate() {
                println!("    {:>2}  {field}", tag + 1);
            }
        }
    }

    pub fn render_done(&self, message: &str) {
        self.ctx.success(message);
    }
}

/// Render a unix timestamp in seconds as UTC, or `-` when unset.
#[must_use]
pub fn format_timestamp(secs: i64) -> String {
    if secs <= 0 {
        return "-".to_string();
    }
    chrono::DateTime::from_timestamp(secs, 0)
        .map_or_else(|| secs.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}
