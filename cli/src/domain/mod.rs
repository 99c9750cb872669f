//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod batch;
pub mod config_doc;
pub mod error;
pub mod group;
pub mod ledger;
pub mod model;
pub mod selection;
pub mod settings;
pub mod summary;

pub use batch::BatchResult;
pub use config_doc::{ConfigEdit, validate_config};
pub use group::GroupEdit;
pub use error::{GroupError, LedgerError, SchemaError, SelectionError, SettingsError, ValidationError};
pub use ledger::{AssociationLedger, LedgerOp, LedgerPhase, PickerOption};
pub use model::{Agent, AgentGroup, Config, EntityKey, EntityKind, Keyed, Tag};
pub use selection::{TabController, TabState, next_active};
pub use settings::{ConsoleConfig, ServerConfig};
pub use summary::{CountCell, Row, Summary, SummaryCache};
