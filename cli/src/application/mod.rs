//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` and `fleet_common`, never on
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod ports;
pub mod rpc;
pub mod schema;
pub mod services;

pub use ports::{ConfigStore, ProgressReporter, RawResponse, Transport};
pub use rpc::{Payload, RpcClient, RpcFailure, RpcOutcome};
pub use schema::{MessageKind, MessageShape, SchemaRegistry};
