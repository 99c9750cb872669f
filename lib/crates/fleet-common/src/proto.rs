//! Protobuf messages of the config-server user API (`configserver.proto`).
//!
//! Declared by hand with `prost` derives so the wire shapes are checked at
//! compile time. Every request carries `request_id` in field 1; every
//! response carries `response_id`, `code` and `message` in fields 1-3 and its
//! payload from field 4 on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Protobuf package of every message in this module.
pub const PACKAGE: &str = "configserver.proto";

// ── Enumerations ─────────────────────────────────────────────────────────────

/// How an agent group's tags are matched against an agent's tags.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
#[repr(i32)]
pub enum TagOperator {
    And = 0,
    Or = 1,
}

/// Kind of collection config; decides the schema of `ConfigDetail::detail`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize, Deserialize,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
#[repr(i32)]
pub enum ConfigType {
    Pipeline = 0,
    Agent = 1,
}

/// Server-side outcome code carried in every response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RespCode {
    Accept = 0,
    InvalidParameter = 1,
    InternalServerError = 2,
}

// ── Entities ─────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AgentGroupTag {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AgentGroup {
    #[prost(string, tag = "1")]
    pub group_name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, repeated, tag = "3")]
    pub tags: Vec<AgentGroupTag>,
    #[prost(enumeration = "TagOperator", tag = "4")]
    pub tag_operator: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConfigDetail {
    #[prost(enumeration = "ConfigType", tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(int64, tag = "3")]
    pub version: i64,
    #[prost(string, tag = "4")]
    pub context: String,
    #[prost(string, tag = "5")]
    pub detail: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AgentAttributes {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(string, tag = "2")]
    pub category: String,
    #[prost(string, tag = "3")]
    pub ip: String,
    #[prost(string, tag = "4")]
    pub hostname: String,
    #[prost(string, tag = "5")]
    pub region: String,
    #[prost(string, tag = "6")]
    pub zone: String,
    #[prost(map = "string, string", tag = "100")]
    pub extras: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Agent {
    #[prost(string, tag = "1")]
    pub agent_id: String,
    #[prost(string, tag = "2")]
    pub agent_type: String,
    #[prost(message, optional, tag = "3")]
    pub attributes: Option<AgentAttributes>,
    #[prost(message, repeated, tag = "4")]
    pub tags: Vec<AgentGroupTag>,
    #[prost(string, tag = "5")]
    pub running_status: String,
    /// Unix seconds.
    #[prost(int64, tag = "6")]
    pub startup_time: i64,
    /// Unix seconds.
    #[prost(int64, tag = "7")]
    pub latest_heartbeat_time: i64,
    /// Heartbeat interval in seconds.
    #[prost(int32, tag = "8")]
    pub interval: i32,
}

// ── Agent group actions ──────────────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAgentGroupRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(message, optional, tag = "2")]
    pub agent_group: Option<AgentGroup>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAgentGroupResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateAgentGroupRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(message, optional, tag = "2")]
    pub agent_group: Option<AgentGroup>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateAgentGroupResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteAgentGroupRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub group_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteAgentGroupResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAgentGroupRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub group_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAgentGroupResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(message, optional, tag = "4")]
    pub agent_group: Option<AgentGroup>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAgentGroupsRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAgentGroupsResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(message, repeated, tag = "4")]
    pub agent_groups: Vec<AgentGroup>,
}

// ── Config actions ───────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateConfigRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(message, optional, tag = "2")]
    pub config_detail: Option<ConfigDetail>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateConfigResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateConfigRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(message, optional, tag = "2")]
    pub config_detail: Option<ConfigDetail>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateConfigResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteConfigRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub config_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteConfigResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetConfigRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub config_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetConfigResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(message, optional, tag = "4")]
    pub config_detail: Option<ConfigDetail>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListConfigsRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListConfigsResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(message, repeated, tag = "4")]
    pub config_details: Vec<ConfigDetail>,
}

// ── Association actions ──────────────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApplyConfigToAgentGroupRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub group_name: String,
    #[prost(string, tag = "3")]
    pub config_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApplyConfigToAgentGroupResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoveConfigFromAgentGroupRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub group_name: String,
    #[prost(string, tag = "3")]
    pub config_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoveConfigFromAgentGroupResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAppliedConfigsForAgentGroupRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub group_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAppliedConfigsForAgentGroupResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(string, repeated, tag = "4")]
    pub config_names: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAppliedAgentGroupsRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub config_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAppliedAgentGroupsResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(string, repeated, tag = "4")]
    pub agent_group_names: Vec<String>,
}

// ── Agents ───────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAgentsRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub group_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListAgentsResponse {
    #[prost(string, tag = "1")]
    pub response_id: String,
    #[prost(enumeration = "RespCode", tag = "2")]
    pub code: i32,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(message, repeated, tag = "4")]
    pub agents: Vec<Agent>,
}
