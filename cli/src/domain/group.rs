//! Agent group edit rules.
//!
//! The `default` group exists on every server and is frozen except for its
//! description. The server enforces this too; the console refuses such edits
//! before sending anything.

use crate::domain::error::GroupError;
use crate::domain::model::{AgentGroup, DEFAULT_GROUP, Tag, TagOperator};

/// Fields a user may change on an existing group. `None` keeps the stored
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupEdit {
    pub description: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub tag_operator: Option<TagOperator>,
}

impl GroupEdit {
    /// The group as it would look after this edit.
    #[must_use]
    pub fn apply(&self, current: &AgentGroup) -> AgentGroup {
        AgentGroup {
            group_name: current.group_name.clone(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            tags: self.tags.clone().unwrap_or_else(|| current.tags.clone()),
            tag_operator: self.tag_operator.unwrap_or(current.tag_operator),
        }
    }
}

/// Refuse to delete the default group.
pub fn guard_delete(group_name: &str) -> Result<(), GroupError> {
    if group_name == DEFAULT_GROUP {
        return Err(GroupError::DefaultNotDeletable);
    }
    Ok(())
}

/// Check a proposed update against the stored group.
pub fn guard_update(current: &AgentGroup, proposed: &AgentGroup) -> Result<(), GroupError> {
    if current.group_name != proposed.group_name {
        return Err(GroupError::Renamed(current.group_name.clone()));
    }
    if current.is_default() {
        if current.tags != proposed.tags {
            return Err(GroupError::DefaultFrozen("tags"));
        }
        if current.tag_operator != proposed.tag_operator {
            return Err(GroupError::DefaultFrozen("tag operator"));
        }
    }
    Ok(())
}

/// Check a group about to be created.
pub fn guard_create(group: &AgentGroup) -> Result<(), GroupError> {
    if group.group_name.trim().is_empty() {
        return Err(GroupError::EmptyName);
    }
    if group.is_default() {
        return Err(GroupError::ReservedName);
    }
    Ok(())
}
