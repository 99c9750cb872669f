//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed JSON document
//! to stdout. Failures print the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use fleet_common::Action;
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::SchemaRegistry;
use crate::application::schema::{MessageKind, shape};
use crate::application::services::associations::AssociationBatch;
use crate::domain::{ConsoleConfig, EntityKey, LedgerOp, Row};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Document describing a settled association batch.
#[must_use]
pub fn batch_value(owner: &EntityKey, op: LedgerOp, batch: &AssociationBatch, applied: &[String]) -> Value {
    let failed: Vec<Value> = batch
        .failed
        .iter()
        .map(|(peer, err)| {
            json!({
                "peer": peer,
                "status": err.status_code,
                "error": err.to_string(),
            })
        })
        .collect();
    json!({
        "owner": owner,
        "operation": op.label(),
        "succeeded": batch.succeeded_peers().collect::<Vec<_>>(),
        "failed": failed,
        "applied": applied,
    })
}

/// Document listing every action with its verb and endpoint.
#[must_use]
pub fn actions_value(registry: &SchemaRegistry) -> Value {
    let actions: Vec<Value> = registry
        .actions()
        .map(|action| {
            json!({
                "action": action.name(),
                "method": action.method().as_str(),
                "endpoint": registry.endpoint(action),
            })
        })
        .collect();
    Value::Array(actions)
}

/// Machine-readable renderer for `--json`.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print any serializable value.
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{text}");
        Ok(())
    }

    /// Print listing rows; summaries are included only when fetched.
    pub fn render_rows<E: Serialize>(&self, rows: &[Row<E>], summaries: bool) -> Result<()> {
        if summaries {
            self.render(rows)
        } else {
            let entities: Vec<&E> = rows.iter().map(|row| &row.entity).collect();
            self.render(&entities)
        }
    }

    pub fn render_applied(&self, owner: &EntityKey, applied: &[String]) -> Result<()> {
        self.render(&json!({ "owner": owner, "applied": applied }))
    }

    pub fn render_batch(
        &self,
        owner: &EntityKey,
        op: LedgerOp,
        batch: &AssociationBatch,
        applied: &[String],
    ) -> Result<()> {
        self.render(&batch_value(owner, op, batch, applied))
    }

    pub fn render_settings(&self, config: &ConsoleConfig, path: &Path) -> Result<()> {
        self.render(&json!({ "path": path, "settings": config }))
    }

    pub fn render_setting(&self, key: &str, value: &str) -> Result<()> {
        self.render(&json!({ "key": key, "value": value }))
    }

    pub fn render_actions(&self, registry: &SchemaRegistry) -> Result<()> {
        self.render(&actions_value(registry))
    }

    pub fn render_action(&self, registry: &SchemaRegistry, action: Action) -> Result<()> {
        self.render(&json!({
            "action": action.name(),
            "method": action.method().as_str(),
            "endpoint": registry.endpoint(action),
            "request": shape(action, MessageKind::Request),
            "response": shape(action, MessageKind::Response),
        }))
    }

    pub fn render_done(&self, message: &str) -> Result<()> {
        self.render(&json!({ "ok": true, "message": message }))
    }
}
