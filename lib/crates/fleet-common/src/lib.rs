//! Shared wire types for the fleet config-server console.

pub mod action;
pub mod proto;

pub use action::{Action, Method, RpcRequest, RpcResponse, UnknownAction};
pub use proto::{ConfigType, RespCode, TagOperator};
