//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use fleet_common::Action;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::SchemaRegistry;
use crate::application::services::associations::AssociationBatch;
use crate::domain::{Agent, AgentGroup, Config, ConsoleConfig, EntityKey, LedgerOp, Row};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print an in-progress step prefixed with `→`. Suppressed when `quiet`.
    pub fn step(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "→".style(self.styles.info));
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<14} {value}", key.style(self.styles.dim));
        }
    }
}

/// Renders command results in the selected output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    pub fn render_groups(&self, rows: &[Row<AgentGroup>], summaries: bool) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_groups(rows, summaries);
                Ok(())
            }
            Renderer::Json(r) => r.render_rows(rows, summaries),
        }
    }

    pub fn render_group(&self, group: &AgentGroup) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_group(group);
                Ok(())
            }
            Renderer::Json(r) => r.render(group),
        }
    }

    pub fn render_configs(&self, rows: &[Row<Config>], summaries: bool) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_configs(rows, summaries);
                Ok(())
            }
            Renderer::Json(r) => r.render_rows(rows, summaries),
        }
    }

    pub fn render_config(&self, config: &Config) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_config(config);
                Ok(())
            }
            Renderer::Json(r) => r.render(config),
        }
    }

    pub fn render_agents(&self, group_name: &str, agents: &[Agent]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_agents(group_name, agents);
                Ok(())
            }
            Renderer::Json(r) => r.render(&agents),
        }
    }

    pub fn render_applied(&self, owner: &EntityKey, applied: &[String]) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_applied(owner, applied);
                Ok(())
            }
            Renderer::Json(r) => r.render_applied(owner, applied),
        }
    }

    pub fn render_batch(
        &self,
        owner: &EntityKey,
        op: LedgerOp,
        batch: &AssociationBatch,
        applied: &[String],
    ) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_batch(owner, op, batch, applied);
                Ok(())
            }
            Renderer::Json(r) => r.render_batch(owner, op, batch, applied),
        }
    }

    pub fn render_settings(&self, config: &ConsoleConfig, path: &Path) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_settings(config, path);
                Ok(())
            }
            Renderer::Json(r) => r.render_settings(config, path),
        }
    }

    pub fn render_setting(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_setting(value);
                Ok(())
            }
            Renderer::Json(r) => r.render_setting(key, value),
        }
    }

    pub fn render_actions(&self, registry: &SchemaRegistry) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_actions(registry);
                Ok(())
            }
            Renderer::Json(r) => r.render_actions(registry),
        }
    }

    pub fn render_action(&self, registry: &SchemaRegistry, action: Action) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_action(registry, action);
                Ok(())
            }
            Renderer::Json(r) => r.render_action(registry, action),
        }
    }

    /// Confirm a completed mutation.
    pub fn render_done(&self, message: &str) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_done(message);
                Ok(())
            }
            Renderer::Json(r) => r.render_done(message),
        }
    }
}
