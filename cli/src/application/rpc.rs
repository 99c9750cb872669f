//! Typed RPC client over the [`Transport`] port.
//!
//! `call` never fails: network errors and undecodable bodies become an
//! outcome with `ok == false` and a synthetic message naming the verb and
//! action. Callers that want `?` use [`RpcOutcome::into_result`] or
//! [`RpcClient::invoke`].

use fleet_common::{Action, RespCode, RpcRequest, RpcResponse};
use prost::Message;
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::Transport;
use crate::application::schema::SchemaRegistry;

/// Status text used when no HTTP response was received.
pub const NETWORK_ERROR: &str = "network error";

/// Response body as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Decoded(T),
    /// The body was missing or not a valid response message.
    Synthetic { message: String },
}

/// Uniform result of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcOutcome<T> {
    pub action: Action,
    /// HTTP 2xx with a body that decoded as the expected response.
    pub ok: bool,
    /// HTTP status, `0` when the request never got a response.
    pub status_code: u16,
    pub status_text: String,
    pub payload: Payload<T>,
}

impl<T: RpcResponse> RpcOutcome<T> {
    /// Server-provided or synthetic message; empty when neither exists.
    #[must_use]
    pub fn message(&self) -> &str {
        match &self.payload {
            Payload::Decoded(resp) => resp.message(),
            Payload::Synthetic { message } => message,
        }
    }

    /// Succeeds only for a 2xx response whose body decoded and whose code
    /// is `ACCEPT`.
    ///
    /// # Errors
    ///
    /// Returns an [`RpcFailure`] describing the action, status and message.
    pub fn into_result(self) -> Result<T, RpcFailure> {
        match self.payload {
            Payload::Decoded(resp) if self.ok && resp.status() == RespCode::Accept => Ok(resp),
            payload => {
                let message = match &payload {
                    Payload::Decoded(resp) => resp.message().to_string(),
                    Payload::Synthetic { message } => message.clone(),
                };
                Err(RpcFailure {
                    action: self.action,
                    status_code: self.status_code,
                    status_text: self.status_text,
                    message,
                })
            }
        }
    }
}

/// A failed call, shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{action}: {status_code} {status_text}: {}", display_message(.message))]
pub struct RpcFailure {
    pub action: Action,
    pub status_code: u16,
    pub status_text: String,
    pub message: String,
}

fn display_message(message: &str) -> &str {
    if message.is_empty() {
        "unknown error"
    } else {
        message
    }
}

/// Stateless between calls; every call gets a fresh request id.
pub struct RpcClient<T> {
    registry: SchemaRegistry,
    transport: T,
}

impl<T: Transport> RpcClient<T> {
    #[must_use]
    pub fn new(registry: SchemaRegistry, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Encode, send and decode one request.
    pub async fn call<R: RpcRequest>(&self, mut request: R) -> RpcOutcome<R::Response> {
        let action = R::ACTION;
        let method = action.method();
        let request_id = Uuid::new_v4().to_string();
        request.set_request_id(request_id.clone());
        let url = self.registry.endpoint(action);
        let synthetic = || Payload::Synthetic {
            message: format!("{method} {action}"),
        };

        tracing::debug!(%action, %request_id, %url, "sending request");
        let raw = match self.transport.send(method, &url, request.encode_to_vec()).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%action, %request_id, error = %err, "request failed");
                return RpcOutcome {
                    action,
                    ok: false,
                    status_code: 0,
                    status_text: NETWORK_ERROR.to_string(),
                    payload: synthetic(),
                };
            }
        };

        let payload = raw
            .body
            .as_deref()
            .and_then(|body| R::Response::decode(body).ok())
            .map_or_else(synthetic, Payload::Decoded);
        let decoded = matches!(payload, Payload::Decoded(_));
        let ok = raw.is_success() && decoded;
        if ok {
            tracing::debug!(%action, %request_id, status = raw.status, "response received");
        } else if raw.is_success() {
            tracing::warn!(%action, %request_id, status = raw.status, "response body could not be decoded");
        } else {
            tracing::warn!(%action, %request_id, status = raw.status, "server returned an error");
        }
        RpcOutcome {
            action,
            ok,
            status_code: raw.status,
            status_text: raw.status_text,
            payload,
        }
    }

    /// [`call`](Self::call) followed by [`RpcOutcome::into_result`].
    ///
    /// # Errors
    ///
    /// Returns an [`RpcFailure`] when the call did not succeed.
    pub async fn invoke<R: RpcRequest>(&self, request: R) -> Result<R::Response, RpcFailure> {
        self.call(request).await.into_result()
    }
}
