//! Application service: collection config use-cases.
//!
//! Config documents are validated before any request is sent, so an invalid
//! document never reaches the server.

use anyhow::{Context, Result};
use fleet_common::proto;

use crate::application::ports::Transport;
use crate::application::rpc::RpcClient;
use crate::domain::{Config, ConfigEdit, validate_config};

pub async fn list_configs(client: &RpcClient<impl Transport>) -> Result<Vec<Config>> {
    let resp = client.invoke(proto::ListConfigsRequest::default()).await?;
    Ok(resp.config_details.into_iter().map(Config::from).collect())
}

/// One config by name.
///
/// # Errors
///
/// Returns an error if the call fails or the server returned no config.
pub async fn get_config(client: &RpcClient<impl Transport>, name: &str) -> Result<Config> {
    let resp = client
        .invoke(proto::GetConfigRequest {
            config_name: name.to_string(),
            ..Default::default()
        })
        .await?;
    resp.config_detail
        .map(Config::from)
        .with_context(|| format!("Config '{name}' not found"))
}

pub async fn create_config(client: &RpcClient<impl Transport>, config: &Config) -> Result<()> {
    anyhow::ensure!(!config.name.trim().is_empty(), "Config name must not be empty.");
    validate_config(config)?;
    client
        .invoke(proto::CreateConfigRequest {
            config_detail: Some(config.into()),
            ..Default::default()
        })
        .await?;
    tracing::info!(config = %config.name, "config created");
    Ok(())
}

/// Apply `edit` to the stored config, validate and send the result.
pub async fn update_config(
    client: &RpcClient<impl Transport>,
    name: &str,
    edit: &ConfigEdit,
) -> Result<Config> {
    let current = get_config(client, name).await?;
    let proposed = edit.apply(&current);
    validate_config(&proposed)?;
    client
        .invoke(proto::UpdateConfigRequest {
            config_detail: Some((&proposed).into()),
            ..Default::default()
        })
        .await?;
    tracing::info!(config = %name, "config updated");
    Ok(proposed)
}

pub async fn delete_config(client: &RpcClient<impl Transport>, name: &str) -> Result<()> {
    client
        .invoke(proto::DeleteConfigRequest {
            config_name: name.to_string(),
            ..Default::default()
        })
        .await?;
    tracing::info!(config = %name, "config deleted");
    Ok(())
}
