//! Schema registry: the endpoint table and message shapes of every action.
//!
//! The protocol description is compiled into `fleet_common`, so loading the
//! registry cannot fail on the description itself; it fails when the
//! configured server location cannot produce valid endpoints. An
//! [`RpcClient`](crate::application::RpcClient) can only be built from a
//! loaded registry.

use std::fmt;

use fleet_common::{Action, Method};
use serde::Serialize;

use crate::domain::{SchemaError, ServerConfig};

/// Which half of an action's message pair to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    Request,
    Response,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Request => f.write_str("Request"),
            MessageKind::Response => f.write_str("Response"),
        }
    }
}

/// Structure of one request or response message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageShape {
    pub type_name: String,
    /// Field names in tag order.
    pub fields: &'static [&'static str],
}

/// Loaded once per process; maps actions to endpoints and shapes.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    base: String,
}

impl SchemaRegistry {
    /// Build the endpoint table for `server`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address, prefix or service name cannot form a
    /// valid endpoint URL.
    pub fn load(server: &ServerConfig) -> Result<Self, SchemaError> {
        let address = server.address.trim().trim_end_matches('/');
        let host = address
            .strip_prefix("http://")
            .or_else(|| address.strip_prefix("https://"))
            .ok_or_else(|| SchemaError::InvalidAddress(server.address.clone()))?;
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(SchemaError::InvalidAddress(server.address.clone()));
        }

        let prefix = server.api_prefix.trim_matches('/');
        let prefix_ok = prefix.is_empty()
            || prefix
                .split('/')
                .all(|seg| !seg.is_empty() && seg.chars().all(is_path_char));
        if !prefix_ok {
            return Err(SchemaError::InvalidPrefix(server.api_prefix.clone()));
        }

        let service = server.service.as_str();
        if service.is_empty() || !service.chars().all(is_path_char) {
            return Err(SchemaError::InvalidService(server.service.clone()));
        }

        let base = if prefix.is_empty() {
            format!("{address}/{service}")
        } else {
            format!("{address}/{prefix}/{service}")
        };
        tracing::debug!(%base, "schema registry loaded");
        Ok(Self { base })
    }

    /// `<address>/<api-prefix>/<service>`, without a trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full URL an action is sent to.
    #[must_use]
    pub fn endpoint(&self, action: Action) -> String {
        format!("{}/{}", self.base, action.name())
    }

    #[must_use]
    pub fn method(&self, action: Action) -> Method {
        action.method()
    }

    /// Look up the message shape for an action given by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownAction`] if no action has that name.
    pub fn resolve(&self, name: &str, kind: MessageKind) -> Result<MessageShape, SchemaError> {
        let action: Action = name
            .parse()
            .map_err(|_| SchemaError::UnknownAction(name.to_string()))?;
        Ok(shape(action, kind))
    }

    /// Every action in declaration order.
    pub fn actions(&self) -> impl Iterator<Item = Action> {
        Action::ALL.iter().copied()
    }
}

/// Shape of a known action's message.
#[must_use]
pub fn shape(action: Action, kind: MessageKind) -> MessageShape {
    match kind {
        MessageKind::Request => MessageShape {
            type_name: action.request_type(),
            fields: action.request_fields(),
        },
        MessageKind::Response => MessageShape {
            type_name: action.response_type(),
            fields: action.response_fields(),
        },
    }
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')
}
