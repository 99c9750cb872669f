//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the output context, the loaded console settings and the
//! interaction mode. Commands that talk to the config server build their
//! [`RpcClient`] from it, so the schema registry is always loaded first.

use anyhow::{Context, Result};

use crate::application::services::settings_service::load_settings;
use crate::application::{RpcClient, SchemaRegistry};
use crate::domain::ConsoleConfig;
use crate::infra::{HttpTransport, YamlConfigStore};
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `FLEET_YES` env vars).
    pub yes: bool,
    /// Server address overriding the stored `server.address`.
    pub server: Option<String>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Settings file store.
    pub config_store: YamlConfigStore,
    /// Settings in effect for this run, overrides applied.
    pub settings: ConsoleConfig,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `FLEET_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or the server
    /// override is not a valid address.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("FLEET_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore;
        let mut settings = load_settings(&config_store)?;
        if let Some(server) = &flags.behaviour.server {
            settings
                .set("server.address", server)
                .context("invalid --server")?;
        }

        Ok(Self {
            // JSON mode keeps stdout for the single JSON document.
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            config_store,
            settings,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for application services. Silent in JSON mode.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Load the schema registry and connect a client to the configured server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server settings cannot form valid endpoints or
    /// the HTTP client cannot be built.
    pub fn client(&self) -> Result<RpcClient<HttpTransport>> {
        let registry = SchemaRegistry::load(&self.settings.server)
            .context("cannot load the config-server schema")?;
        let transport = HttpTransport::new(&self.settings.server)?;
        Ok(RpcClient::new(registry, transport))
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `FLEET_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
