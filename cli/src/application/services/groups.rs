//! Application service: agent group use-cases.
//!
//! Default-group rules are checked before any request is sent.

use anyhow::{Context, Result};
use fleet_common::proto;

use crate::application::ports::Transport;
use crate::application::rpc::RpcClient;
use crate::domain::group::{self, GroupEdit};
use crate::domain::{Agent, AgentGroup};

/// Every agent group, in server order.
pub async fn list_groups(client: &RpcClient<impl Transport>) -> Result<Vec<AgentGroup>> {
    let resp = client.invoke(proto::ListAgentGroupsRequest::default()).await?;
    Ok(resp.agent_groups.into_iter().map(AgentGroup::from).collect())
}

/// One agent group by name.
///
/// # Errors
///
/// Returns an error if the call fails or the server returned no group.
pub async fn get_group(client: &RpcClient<impl Transport>, name: &str) -> Result<AgentGroup> {
    let resp = client
        .invoke(proto::GetAgentGroupRequest {
            group_name: name.to_string(),
            ..Default::default()
        })
        .await?;
    resp.agent_group
        .map(AgentGroup::from)
        .with_context(|| format!("Agent group '{name}' not found"))
}

pub async fn create_group(client: &RpcClient<impl Transport>, agent_group: &AgentGroup) -> Result<()> {
    group::guard_create(agent_group)?;
    client
        .invoke(proto::CreateAgentGroupRequest {
            agent_group: Some(agent_group.into()),
            ..Default::default()
        })
        .await?;
    tracing::info!(group = %agent_group.group_name, "agent group created");
    Ok(())
}

/// Apply `edit` to the stored group and send the result.
///
/// The stored group is fetched first so the default-group rules are checked
/// against what the server holds. Returns the group as sent.
pub async fn update_group(
    client: &RpcClient<impl Transport>,
    name: &str,
    edit: &GroupEdit,
) -> Result<AgentGroup> {
    let current = get_group(client, name).await?;
    let proposed = edit.apply(&current);
    group::guard_update(&current, &proposed)?;
    client
        .invoke(proto::UpdateAgentGroupRequest {
            agent_group: Some((&proposed).into()),
            ..Default::default()
        })
        .await?;
    tracing::info!(group = %name, "agent group updated");
    Ok(proposed)
}

pub async fn delete_group(client: &RpcClient<impl Transport>, name: &str) -> Result<()> {
    group::guard_delete(name)?;
    client
        .invoke(proto::DeleteAgentGroupRequest {
            group_name: name.to_string(),
            ..Default::default()
        })
        .await?;
    tracing::info!(group = %name, "agent group deleted");
    Ok(())
}

/// Agents currently matched by a group. An empty list is not an error.
pub async fn list_agents(client: &RpcClient<impl Transport>, group_name: &str) -> Result<Vec<Agent>> {
    let resp = client
        .invoke(proto::ListAgentsRequest {
            group_name: group_name.to_string(),
            ..Default::default()
        })
        .await?;
    Ok(resp.agents.into_iter().map(Agent::from).collect())
}
