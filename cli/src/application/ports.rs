//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared wire crate,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;
use fleet_common::Method;

use crate::domain::ConsoleConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// What came back from one HTTP exchange, before protobuf decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for `status`, empty when unknown.
    pub status_text: String,
    /// Response body, `None` when it could not be read.
    pub body: Option<Vec<u8>>,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ── Transport Port ────────────────────────────────────────────────────────────

/// Sends one encoded request to the config server.
///
/// Implementations return `Err` only when no HTTP response was received at
/// all (connection refused, timeout). Non-2xx statuses are `Ok`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, method: Method, url: &str, body: Vec<u8>) -> Result<RawResponse>;
}

impl<T: Transport> Transport for &T {
    async fn send(&self, method: Method, url: &str, body: Vec<u8>) -> Result<RawResponse> {
        (**self).send(method, url, body).await
    }
}

// ── Settings Port ─────────────────────────────────────────────────────────────

/// Abstracts console settings persistence (load/save).
pub trait ConfigStore {
    /// Load settings, falling back to defaults when no file exists.
    fn load(&self) -> Result<ConsoleConfig>;
    /// Persist settings.
    fn save(&self, config: &ConsoleConfig) -> Result<()>;
    /// Location of the settings file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Synchronous.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
