//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config document errors ───────────────────────────────────────────────────

/// A collection config document failed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Config detail is not valid YAML: {0}")]
    Parse(String),

    #[error("Config detail must be a YAML mapping")]
    NotAMapping,

    #[error("Config invalid: '{0}' is required")]
    MissingSection(&'static str),

    #[error("Config invalid: '{0}' must not be empty")]
    EmptySection(&'static str),

    #[error("Config invalid: '{0}' must be a list")]
    NotAList(&'static str),

    #[error("Config invalid: '{0}' must be omitted rather than null")]
    NullSection(&'static str),

    #[error("Config invalid: {section}[{index}] does not declare a Type")]
    MissingType { section: &'static str, index: usize },
}

// ── Agent group errors ───────────────────────────────────────────────────────

/// Client-side refusals for agent group edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("The default agent group cannot be deleted.")]
    DefaultNotDeletable,

    #[error("The default agent group only allows its description to change ({0} is frozen).")]
    DefaultFrozen(&'static str),

    #[error("Group name cannot be changed; delete and recreate '{0}' instead.")]
    Renamed(String),

    #[error("Invalid tag '{0}': expected name=value")]
    InvalidTag(String),

    #[error("Agent group name must not be empty.")]
    EmptyName,

    #[error("'default' is the built-in agent group and cannot be created.")]
    ReservedName,
}

// ── Association errors ───────────────────────────────────────────────────────

/// Illegal transitions of an association ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Applied associations changed ({pending} pending removal), please save or discard first")]
    ConcurrentEdit { pending: usize },

    #[error("Another {0} is still in progress")]
    Busy(&'static str),

    #[error("'{0}' is not applied")]
    NotApplied(String),

    #[error("'{0}' is already applied")]
    AlreadyApplied(String),

    #[error("The addition picker is not open")]
    PickerClosed,
}

/// Illegal transitions of the tab/selection controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No association view is open")]
    NotOpen,

    #[error("'{0}' is not shown in this view")]
    UnknownPeer(String),
}

// ── Schema errors ────────────────────────────────────────────────────────────

/// Startup-time failures building the action endpoint table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Invalid server address '{0}': expected http:// or https://")]
    InvalidAddress(String),

    #[error("Invalid API prefix '{0}'")]
    InvalidPrefix(String),

    #[error("Invalid service name '{0}'")]
    InvalidService(String),
}

// ── Settings errors ──────────────────────────────────────────────────────────

/// Errors related to console settings key/value validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
