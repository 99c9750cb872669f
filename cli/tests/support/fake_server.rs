//! In-memory config server shared by the unit and integration harnesses.
//!
//! Decodes each request with its paired message type, applies it to a small
//! store and encodes the reply. Every response type shares fields 1-3, so
//! error replies are encoded once and decode as any response.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anyhow::Result;
use fleet_common::proto;
use fleet_common::{Action, Method, RespCode};
use fleet_console::application::{RawResponse, Transport};
use prost::Message;

type Reply = Result<Vec<u8>, (u16, String)>;

#[derive(Default)]
struct State {
    groups: BTreeMap<String, proto::AgentGroup>,
    configs: BTreeMap<String, proto::ConfigDetail>,
    /// `(group, config)` pairs in the order they were applied.
    applied: Vec<(String, String)>,
    agents: Vec<proto::Agent>,
    /// Calls of `action` naming this group or config fail with the status.
    failures: Vec<(Action, String, u16)>,
    calls: HashMap<Action, usize>,
}

pub struct FakeConfigServer {
    state: Mutex<State>,
}

impl Default for FakeConfigServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeConfigServer {
    /// A server holding only the `default` group.
    #[must_use]
    pub fn new() -> Self {
        let server = Self {
            state: Mutex::new(State::default()),
        };
        server.add_group("default");
        server
    }

    pub fn add_group(&self, name: &str) {
        self.state.lock().unwrap().groups.insert(
            name.to_string(),
            proto::AgentGroup {
                group_name: name.to_string(),
                ..Default::default()
            },
        );
    }

    pub fn add_config(&self, name: &str) {
        self.state.lock().unwrap().configs.insert(
            name.to_string(),
            proto::ConfigDetail {
                name: name.to_string(),
                version: 1,
                detail: "inputs:\n  - Type: input_file\nflushers:\n  - Type: flusher_stdout\n"
                    .to_string(),
                ..Default::default()
            },
        );
    }

    pub fn add_agent(&self, id: &str) {
        self.state.lock().unwrap().agents.push(proto::Agent {
            agent_id: id.to_string(),
            agent_type: "ilogtail".to_string(),
            running_status: "running".to_string(),
            ..Default::default()
        });
    }

    pub fn apply_pair(&self, group: &str, config: &str) {
        let mut state = self.state.lock().unwrap();
        let pair = (group.to_string(), config.to_string());
        if !state.applied.contains(&pair) {
            state.applied.push(pair);
        }
    }

    /// Make every `action` call that names `entity` fail with `status`.
    pub fn fail(&self, action: Action, entity: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((action, entity.to_string(), status));
    }

    #[must_use]
    pub fn calls(&self, action: Action) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(&action)
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.values().sum()
    }

    /// Applied configs of `group`, in application order.
    #[must_use]
    pub fn configs_of(&self, group: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .applied
            .iter()
            .filter(|(g, _)| g == group)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Handle one request body for `action`, returning HTTP status and body.
    pub fn handle(&self, action: Action, body: &[u8]) -> (u16, Vec<u8>) {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(action).or_default() += 1;
        match dispatch(&mut state, action, body) {
            Ok(reply) => (200, reply),
            Err((status, message)) => {
                let code = if status >= 500 {
                    RespCode::InternalServerError
                } else {
                    RespCode::InvalidParameter
                };
                let reply = proto::DeleteConfigResponse {
                    response_id: String::new(),
                    code: code as i32,
                    message,
                };
                (status, reply.encode_to_vec())
            }
        }
    }
}

fn decode<M: Message + Default>(body: &[u8]) -> Result<M, (u16, String)> {
    M::decode(body).map_err(|e| (400, format!("undecodable request: {e}")))
}

fn injected(state: &State, action: Action, names: &[&str]) -> Result<(), (u16, String)> {
    match state
        .failures
        .iter()
        .find(|(a, entity, _)| *a == action && names.contains(&entity.as_str()))
    {
        Some((_, entity, status)) => Err((*status, format!("injected failure for {entity}"))),
        None => Ok(()),
    }
}

fn group_missing(name: &str) -> (u16, String) {
    (404, format!("Agent group {name} doesn't exist"))
}

fn config_missing(name: &str) -> (u16, String) {
    (404, format!("Config {name} doesn't exist"))
}

#[allow(clippy::too_many_lines)]
fn dispatch(state: &mut State, action: Action, body: &[u8]) -> Reply {
    match action {
        Action::CreateAgentGroup => {
            let req: proto::CreateAgentGroupRequest = decode(body)?;
            let group = req.agent_group.unwrap_or_default();
            injected(state, action, &[&group.group_name])?;
            if state.groups.contains_key(&group.group_name) {
                return Err((400, format!("Agent group {} already exists", group.group_name)));
            }
            state.groups.insert(group.group_name.clone(), group);
            Ok(proto::CreateAgentGroupResponse::default().encode_to_vec())
        }
        Action::UpdateAgentGroup => {
            let req: proto::UpdateAgentGroupRequest = decode(body)?;
            let group = req.agent_group.unwrap_or_default();
            injected(state, action, &[&group.group_name])?;
            let Some(stored) = state.groups.get_mut(&group.group_name) else {
                return Err(group_missing(&group.group_name));
            };
            *stored = group;
            Ok(proto::UpdateAgentGroupResponse::default().encode_to_vec())
        }
        Action::DeleteAgentGroup => {
            let req: proto::DeleteAgentGroupRequest = decode(body)?;
            injected(state, action, &[&req.group_name])?;
            if state.groups.remove(&req.group_name).is_none() {
                return Err(group_missing(&req.group_name));
            }
            state.applied.retain(|(g, _)| *g != req.group_name);
            Ok(proto::DeleteAgentGroupResponse::default().encode_to_vec())
        }
        Action::GetAgentGroup => {
            let req: proto::GetAgentGroupRequest = decode(body)?;
            injected(state, action, &[&req.group_name])?;
            let group = state
                .groups
                .get(&req.group_name)
                .cloned()
                .ok_or_else(|| group_missing(&req.group_name))?;
            Ok(proto::GetAgentGroupResponse {
                agent_group: Some(group),
                ..Default::default()
            }
            .encode_to_vec())
        }
        Action::ListAgentGroups => Ok(proto::ListAgentGroupsResponse {
            agent_groups: state.groups.values().cloned().collect(),
            ..Default::default()
        }
        .encode_to_vec()),
        Action::CreateConfig => {
            let req: proto::CreateConfigRequest = decode(body)?;
            let mut config = req.config_detail.unwrap_or_default();
            injected(state, action, &[&config.name])?;
            if state.configs.contains_key(&config.name) {
                return Err((400, format!("Config {} already exists", config.name)));
            }
            config.version = 1;
            state.configs.insert(config.name.clone(), config);
            Ok(proto::CreateConfigResponse::default().encode_to_vec())
        }
        Action::UpdateConfig => {
            let req: proto::UpdateConfigRequest = decode(body)?;
            let mut config = req.config_detail.unwrap_or_default();
            injected(state, action, &[&config.name])?;
            let Some(stored) = state.configs.get_mut(&config.name) else {
                return Err(config_missing(&config.name));
            };
            config.version = stored.version + 1;
            *stored = config;
            Ok(proto::UpdateConfigResponse::default().encode_to_vec())
        }
        Action::DeleteConfig => {
            let req: proto::DeleteConfigRequest = decode(body)?;
            injected(state, action, &[&req.config_name])?;
            if state.configs.remove(&req.config_name).is_none() {
                return Err(config_missing(&req.config_name));
            }
            state.applied.retain(|(_, c)| *c != req.config_name);
            Ok(proto::DeleteConfigResponse::default().encode_to_vec())
        }
        Action::GetConfig => {
            let req: proto::GetConfigRequest = decode(body)?;
            injected(state, action, &[&req.config_name])?;
            let config = state
                .configs
                .get(&req.config_name)
                .cloned()
                .ok_or_else(|| config_missing(&req.config_name))?;
            Ok(proto::GetConfigResponse {
                config_detail: Some(config),
                ..Default::default()
            }
            .encode_to_vec())
        }
        Action::ListConfigs => Ok(proto::ListConfigsResponse {
            config_details: state.configs.values().cloned().collect(),
            ..Default::default()
        }
        .encode_to_vec()),
        Action::ApplyConfigToAgentGroup => {
            let req: proto::ApplyConfigToAgentGroupRequest = decode(body)?;
            injected(state, action, &[&req.group_name, &req.config_name])?;
            if !state.groups.contains_key(&req.group_name) {
                return Err(group_missing(&req.group_name));
            }
            if !state.configs.contains_key(&req.config_name) {
                return Err(config_missing(&req.config_name));
            }
            let pair = (req.group_name, req.config_name);
            if !state.applied.contains(&pair) {
                state.applied.push(pair);
            }
            Ok(proto::ApplyConfigToAgentGroupResponse::default().encode_to_vec())
        }
        Action::RemoveConfigFromAgentGroup => {
            let req: proto::RemoveConfigFromAgentGroupRequest = decode(body)?;
            injected(state, action, &[&req.group_name, &req.config_name])?;
            let pair = (req.group_name, req.config_name);
            let before = state.applied.len();
            state.applied.retain(|p| *p != pair);
            if state.applied.len() == before {
                return Err((404, format!("Config {} is not applied to agent group {}", pair.1, pair.0)));
            }
            Ok(proto::RemoveConfigFromAgentGroupResponse::default().encode_to_vec())
        }
        Action::GetAppliedConfigsForAgentGroup => {
            let req: proto::GetAppliedConfigsForAgentGroupRequest = decode(body)?;
            injected(state, action, &[&req.group_name])?;
            if !state.groups.contains_key(&req.group_name) {
                return Err(group_missing(&req.group_name));
            }
            let config_names = state
                .applied
                .iter()
                .filter(|(g, _)| *g == req.group_name)
                .map(|(_, c)| c.clone())
                .collect();
            Ok(proto::GetAppliedConfigsForAgentGroupResponse {
                config_names,
                ..Default::default()
            }
            .encode_to_vec())
        }
        Action::GetAppliedAgentGroups => {
            let req: proto::GetAppliedAgentGroupsRequest = decode(body)?;
            injected(state, action, &[&req.config_name])?;
            if !state.configs.contains_key(&req.config_name) {
                return Err(config_missing(&req.config_name));
            }
            let agent_group_names = state
                .applied
                .iter()
                .filter(|(_, c)| *c == req.config_name)
                .map(|(g, _)| g.clone())
                .collect();
            Ok(proto::GetAppliedAgentGroupsResponse {
                agent_group_names,
                ..Default::default()
            }
            .encode_to_vec())
        }
        Action::ListAgents => {
            let req: proto::ListAgentsRequest = decode(body)?;
            injected(state, action, &[&req.group_name])?;
            if !state.groups.contains_key(&req.group_name) {
                return Err(group_missing(&req.group_name));
            }
            // Every agent matches every group; tag matching is the server's job.
            Ok(proto::ListAgentsResponse {
                agents: state.agents.clone(),
                ..Default::default()
            }
            .encode_to_vec())
        }
    }
}

/// Route a URL's last path segment to an action.
#[must_use]
pub fn action_of(url: &str) -> Option<Action> {
    url.rsplit('/').next()?.parse().ok()
}

/// [`Transport`] that hands requests straight to a [`FakeConfigServer`].
pub struct FakeTransport<'a> {
    pub server: &'a FakeConfigServer,
}

impl Transport for FakeTransport<'_> {
    async fn send(&self, method: Method, url: &str, body: Vec<u8>) -> Result<RawResponse> {
        let Some(action) = action_of(url) else {
            return Ok(RawResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: None,
            });
        };
        assert_eq!(method, action.method(), "{action} sent with wrong verb");
        let (status, body) = self.server.handle(action, &body);
        let status_text = match status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            _ => "Internal Server Error",
        };
        Ok(RawResponse {
            status,
            status_text: status_text.to_string(),
            body: Some(body),
        })
    }
}
