//! The closed set of user API actions and their static bindings.
//!
//! Each action maps to one HTTP verb, one request message and one response
//! message. The binding is expressed through [`RpcRequest`], so a request
//! type can only ever be sent as its own action and decoded as its own
//! response.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::proto::{self, RespCode};

/// HTTP verb an action is sent with. `GET` is never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

/// A response message: the shared envelope fields every response carries.
pub trait RpcResponse: prost::Message + Default {
    /// Server-provided message; empty when the server sent none.
    fn message(&self) -> &str;
    /// Server-side outcome code.
    fn status(&self) -> RespCode;
}

/// A request message bound to exactly one action and response type.
pub trait RpcRequest: prost::Message + Default {
    const ACTION: Action;
    type Response: RpcResponse;

    /// Overwrite the correlation identifier sent with this request.
    fn set_request_id(&mut self, id: String);
    fn request_id(&self) -> &str;
}

macro_rules! actions {
    ($(
        $action:ident => $method:ident,
        $req:ident [$($req_field:literal),*],
        $resp:ident [$($resp_field:literal),*];
    )*) => {
        /// A user API action of the config server.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Action {
            $($action,)*
        }

        impl Action {
            /// Every action, in declaration order.
            pub const ALL: &'static [Action] = &[$(Action::$action,)*];

            /// PascalCase action name, as used in the URL path.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(Action::$action => stringify!($action),)*
                }
            }

            #[must_use]
            pub fn method(self) -> Method {
                match self {
                    $(Action::$action => Method::$method,)*
                }
            }

            /// Field names of the request message, in tag order.
            #[must_use]
            pub fn request_fields(self) -> &'static [&'static str] {
                match self {
                    $(Action::$action => &["request_id", $($req_field),*],)*
                }
            }

            /// Field names of the response message, in tag order.
            #[must_use]
            pub fn response_fields(self) -> &'static [&'static str] {
                match self {
                    $(Action::$action => &["response_id", "code", "message", $($resp_field),*],)*
                }
            }
        }

        impl FromStr for Action {
            type Err = UnknownAction;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($action) => Ok(Action::$action),)*
                    other => Err(UnknownAction(other.to_string())),
                }
            }
        }

        $(
            impl RpcRequest for proto::$req {
                const ACTION: Action = Action::$action;
                type Response = proto::$resp;

                fn set_request_id(&mut self, id: String) {
                    self.request_id = id;
                }

                fn request_id(&self) -> &str {
                    &self.request_id
                }
            }

            impl RpcResponse for proto::$resp {
                fn message(&self) -> &str {
                    &self.message
                }

                fn status(&self) -> RespCode {
                    self.code()
                }
            }
        )*
    };
}

actions! {
    CreateAgentGroup => Post,
        CreateAgentGroupRequest ["agent_group"],
        CreateAgentGroupResponse [];
    UpdateAgentGroup => Put,
        UpdateAgentGroupRequest ["agent_group"],
        UpdateAgentGroupResponse [];
    DeleteAgentGroup => Delete,
        DeleteAgentGroupRequest ["group_name"],
        DeleteAgentGroupResponse [];
    GetAgentGroup => Post,
        GetAgentGroupRequest ["group_name"],
        GetAgentGroupResponse ["agent_group"];
    ListAgentGroups => Post,
        ListAgentGroupsRequest [],
        ListAgentGroupsResponse ["agent_groups"];
    CreateConfig => Post,
        CreateConfigRequest ["config_detail"],
        CreateConfigResponse [];
    UpdateConfig => Put,
        UpdateConfigRequest ["config_detail"],
        UpdateConfigResponse [];
    DeleteConfig => Delete,
        DeleteConfigRequest ["config_name"],
        DeleteConfigResponse [];
    GetConfig => Post,
        GetConfigRequest ["config_name"],
        GetConfigResponse ["config_detail"];
    ListConfigs => Post,
        ListConfigsRequest [],
        ListConfigsResponse ["config_details"];
    ApplyConfigToAgentGroup => Put,
        ApplyConfigToAgentGroupRequest ["group_name", "config_name"],
        ApplyConfigToAgentGroupResponse [];
    RemoveConfigFromAgentGroup => Delete,
        RemoveConfigFromAgentGroupRequest ["group_name", "config_name"],
        RemoveConfigFromAgentGroupResponse [];
    GetAppliedConfigsForAgentGroup => Post,
        GetAppliedConfigsForAgentGroupRequest ["group_name"],
        GetAppliedConfigsForAgentGroupResponse ["config_names"];
    GetAppliedAgentGroups => Post,
        GetAppliedAgentGroupsRequest ["config_name"],
        GetAppliedAgentGroupsResponse ["agent_group_names"];
    ListAgents => Post,
        ListAgentsRequest ["group_name"],
        ListAgentsResponse ["agents"];
}

impl Action {
    /// Fully-qualified protobuf name of the request message.
    #[must_use]
    pub fn request_type(self) -> String {
        format!("{}.{}Request", crate::proto::PACKAGE, self.name())
    }

    /// Fully-qualified protobuf name of the response message.
    #[must_use]
    pub fn response_type(self) -> String {
        format!("{}.{}Response", crate::proto::PACKAGE, self.name())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
