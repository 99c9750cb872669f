//! Console-side entity models and their mapping from wire messages.
//!
//! Wire messages carry enumerations as raw `i32` and optional sub-messages;
//! these types resolve both so the rest of the crate never touches them.

use std::fmt;
use std::str::FromStr;

use fleet_common::proto;
pub use fleet_common::{ConfigType, TagOperator};
use serde::Serialize;

use crate::domain::error::GroupError;

/// Name of the agent group every agent belongs to.
pub const DEFAULT_GROUP: &str = "default";

/// An entity addressed by a unique, case-sensitive name.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

// ── Entity keys ──────────────────────────────────────────────────────────────

/// The two entity kinds joined by the applied relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Group,
    Config,
}

impl EntityKind {
    /// The kind on the other side of an association.
    #[must_use]
    pub fn peer(self) -> Self {
        match self {
            EntityKind::Group => EntityKind::Config,
            EntityKind::Config => EntityKind::Group,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Group => "agent group",
            EntityKind::Config => "config",
        }
    }
}

/// Identifies one agent group or one config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub name: String,
}

impl EntityKey {
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Group,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn config(name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Config,
            name: name.into(),
        }
    }

    /// Key of a peer on the other side of the relation.
    #[must_use]
    pub fn peer(&self, name: impl Into<String>) -> Self {
        Self {
            kind: self.kind.peer(),
            name: name.into(),
        }
    }

    /// The `(group_name, config_name)` pair addressing the association
    /// between this entity and `peer`.
    #[must_use]
    pub fn pair<'a>(&'a self, peer: &'a str) -> (&'a str, &'a str) {
        match self.kind {
            EntityKind::Group => (&self.name, peer),
            EntityKind::Config => (peer, &self.name),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind.label(), self.name)
    }
}

// ── Tags ─────────────────────────────────────────────────────────────────────

/// One `name = value` tag. Names may repeat within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl FromStr for Tag {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| GroupError::InvalidTag(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::InvalidTag(s.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

impl From<proto::AgentGroupTag> for Tag {
    fn from(tag: proto::AgentGroupTag) -> Self {
        Self {
            name: tag.name,
            value: tag.value,
        }
    }
}

impl From<&Tag> for proto::AgentGroupTag {
    fn from(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            value: tag.value.clone(),
        }
    }
}

/// Render tags as `a = 1, b = 2`.
#[must_use]
pub fn join_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Agent groups ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGroup {
    pub group_name: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub tag_operator: TagOperator,
}

impl AgentGroup {
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.group_name == DEFAULT_GROUP
    }
}

impl Keyed for AgentGroup {
    fn key(&self) -> &str {
        &self.group_name
    }
}

impl From<proto::AgentGroup> for AgentGroup {
    fn from(group: proto::AgentGroup) -> Self {
        let tag_operator = group.tag_operator();
        Self {
            group_name: group.group_name,
            description: group.description,
            tags: group.tags.into_iter().map(Tag::from).collect(),
            tag_operator,
        }
    }
}

impl From<&AgentGroup> for proto::AgentGroup {
    fn from(group: &AgentGroup) -> Self {
        Self {
            group_name: group.group_name.clone(),
            description: group.description.clone(),
            tags: group.tags.iter().map(proto::AgentGroupTag::from).collect(),
            tag_operator: group.tag_operator as i32,
        }
    }
}

// ── Configs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub name: String,
    #[serde(rename = "type")]
    pub config_type: ConfigType,
    /// Assigned by the server; ignored on create/update.
    pub version: i64,
    pub context: String,
    /// YAML document; its schema depends on `config_type`.
    pub detail: String,
}

impl Keyed for Config {
    fn key(&self) -> &str {
        &self.name
    }
}

impl From<proto::ConfigDetail> for Config {
    fn from(config: proto::ConfigDetail) -> Self {
        let config_type = config.r#type();
        Self {
            name: config.name,
            config_type,
            version: config.version,
            context: config.context,
            detail: config.detail,
        }
    }
}

impl From<&Config> for proto::ConfigDetail {
    fn from(config: &Config) -> Self {
        Self {
            r#type: config.config_type as i32,
            name: config.name.clone(),
            version: config.version,
            context: config.context.clone(),
            detail: config.detail.clone(),
        }
    }
}

// ── Agents ───────────────────────────────────────────────────────────────────

/// A fleet agent. Read-only: agents are created and retired by the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub agent_id: String,
    pub agent_type: String,
    pub version: String,
    pub category: String,
    pub ip: String,
    pub hostname: String,
    pub region: String,
    pub zone: String,
    pub tags: Vec<Tag>,
    pub running_status: String,
    pub startup_time: i64,
    pub latest_heartbeat_time: i64,
    pub interval: i32,
}

impl Keyed for Agent {
    fn key(&self) -> &str {
        &self.agent_id
    }
}

impl From<proto::Agent> for Agent {
    fn from(agent: proto::Agent) -> Self {
        let attrs = agent.attributes.unwrap_or_default();
        Self {
            agent_id: agent.agent_id,
            agent_type: agent.agent_type,
            version: attrs.version,
            category: attrs.category,
            ip: attrs.ip,
            hostname: attrs.hostname,
            region: attrs.region,
            zone: attrs.zone,
            tags: agent.tags.into_iter().map(Tag::from).collect(),
            running_status: agent.running_status,
            startup_time: agent.startup_time,
            latest_heartbeat_time: agent.latest_heartbeat_time,
            interval: agent.interval,
        }
    }
}
