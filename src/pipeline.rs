//! The `/wake` request pipeline.
//!
//! ```text
//! RECEIVED → ID_PRESENT → KEY_PRESENT → ID_FORMAT_OK → KEY_FORMAT_OK
//!          → AUTHENTICATED → ID_KNOWN → DISPATCH → RESPONDED
//! ```
//!
//! Each stage either advances or ends the request with a [`RequestError`].
//! Stages never repeat and nothing is remembered between calls. Registry
//! lookup sits behind authentication so unauthenticated callers learn
//! nothing about which ids exist.

use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::config::validation::{validate_config, ValidationError};
use crate::config::{ConfigError, GatewayConfig};
use crate::http::request::RequestContext;
use crate::http::response::ResponseCode;
use crate::observability::metrics;
use crate::registry::DeviceRegistry;
use crate::security::{mask_credential, validate_credential, validate_id, Authenticator};
use crate::wol::{Dispatcher, PacketTransport, TransportError, TransportErrorKind};

/// Raw `/wake` query parameters.
#[derive(Debug, Clone, Default)]
pub struct WakeParams {
    pub id: Option<String>,
    pub key: Option<String>,
}

impl WakeParams {
    /// Pick `id` and `key` out of decoded query pairs. The first occurrence
    /// of each wins; unrelated parameters are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (name, value) in pairs {
            match name.as_str() {
                "id" if params.id.is_none() => params.id = Some(value),
                "key" if params.key.is_none() => params.key = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// What a successful wake reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeReceipt {
    pub device_id: String,
    /// Physical address as registered.
    pub address: String,
}

/// Every way a wake request can end short of success.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    /// Carries the validator's reason.
    #[error("{0}")]
    InvalidParameter(String),

    #[error("Invalid API key")]
    InvalidKey,

    #[error("No MAC address registered for this ID")]
    UnknownId,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RequestError {
    pub fn code(&self) -> ResponseCode {
        match self {
            RequestError::MissingParameter(_) => ResponseCode::MissingParameter,
            RequestError::InvalidParameter(_) => ResponseCode::InvalidParameter,
            RequestError::InvalidKey => ResponseCode::InvalidKey,
            RequestError::UnknownId => ResponseCode::UnknownId,
            RequestError::Transport(e) => match e.kind {
                TransportErrorKind::PermissionDenied => ResponseCode::PermissionDenied,
                TransportErrorKind::NetworkUnreachable => ResponseCode::NetworkError,
                TransportErrorKind::Other => ResponseCode::SendFailed,
            },
        }
    }

    /// Text safe to show the caller. Transport failures get a fixed message;
    /// the OS error stays in the server log.
    pub fn public_message(&self) -> String {
        match self {
            RequestError::Transport(e) => match e.kind {
                TransportErrorKind::PermissionDenied => {
                    "Permission denied while sending magic packet. \
                     Check system privileges and network configuration."
                        .to_string()
                }
                TransportErrorKind::NetworkUnreachable => {
                    "Network is unreachable. Check network configuration.".to_string()
                }
                TransportErrorKind::Other => {
                    "Failed to send magic packet due to system error.".to_string()
                }
            },
            other => other.to_string(),
        }
    }
}

/// Validator → authenticator → registry → dispatcher, in that order.
#[derive(Debug, Clone)]
pub struct WakePipeline {
    authenticator: Authenticator,
    registry: Arc<DeviceRegistry>,
    dispatcher: Dispatcher,
}

impl WakePipeline {
    pub fn new(
        authenticator: Authenticator,
        registry: Arc<DeviceRegistry>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            authenticator,
            registry,
            dispatcher,
        }
    }

    /// Assemble the pipeline from validated configuration.
    pub fn from_config(
        config: &GatewayConfig,
        transport: Arc<dyn PacketTransport>,
    ) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        let registry =
            DeviceRegistry::from_entries(&config.devices).map_err(ConfigError::Validation)?;
        let broadcast: Ipv4Addr = config.wake.broadcast_address.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::BroadcastAddress(
                config.wake.broadcast_address.clone(),
            )])
        })?;

        Ok(Self::new(
            Authenticator::new(config.wake.secret.clone()),
            Arc::new(registry),
            Dispatcher::new(transport, broadcast, config.wake.port),
        ))
    }

    /// Run one request through every stage.
    pub async fn run(
        &self,
        params: &WakeParams,
        ctx: &RequestContext,
    ) -> Result<WakeReceipt, RequestError> {
        let result = self.advance(params, ctx).await;

        let code = match &result {
            Ok(_) => ResponseCode::SendSuccess,
            Err(e) => e.code(),
        };
        metrics::record_wake_outcome(code.as_str());
        tracing::debug!(
            request_id = %ctx.request_id,
            source = %ctx.source,
            stage = "RESPONDED",
            code = code.as_str(),
            "Wake request finished"
        );

        result
    }

    async fn advance(
        &self,
        params: &WakeParams,
        ctx: &RequestContext,
    ) -> Result<WakeReceipt, RequestError> {
        let id = present(params.id.as_deref());
        let key = present(params.key.as_deref());

        let Some(id) = id else {
            return Err(reject(ctx, "ID_PRESENT", RequestError::MissingParameter("id")));
        };
        let Some(key) = key else {
            return Err(reject(ctx, "KEY_PRESENT", RequestError::MissingParameter("key")));
        };

        if let Err(reason) = validate_id(id) {
            tracing::warn!(
                request_id = %ctx.request_id,
                source = %ctx.source,
                stage = "ID_FORMAT_OK",
                code = ResponseCode::InvalidParameter.as_str(),
                device_id = %id.escape_debug(),
                "Invalid ID format: {reason}"
            );
            return Err(RequestError::InvalidParameter(reason.to_string()));
        }

        if let Err(reason) = validate_credential(key) {
            tracing::warn!(
                request_id = %ctx.request_id,
                source = %ctx.source,
                stage = "KEY_FORMAT_OK",
                code = ResponseCode::InvalidParameter.as_str(),
                "Invalid API key format: {reason}"
            );
            return Err(RequestError::InvalidParameter(reason.to_string()));
        }

        tracing::debug!(
            request_id = %ctx.request_id,
            source = %ctx.source,
            stage = "KEY_FORMAT_OK",
            "Parameters well-formed"
        );

        if !self.authenticator.authenticate(key) {
            tracing::warn!(
                request_id = %ctx.request_id,
                source = %ctx.source,
                stage = "AUTHENTICATED",
                code = ResponseCode::InvalidKey.as_str(),
                key = %mask_credential(key),
                device_id = %id,
                "Invalid API key attempt"
            );
            metrics::record_auth_failure(&ctx.source);
            return Err(RequestError::InvalidKey);
        }

        let Some(device) = self.registry.lookup(id) else {
            tracing::warn!(
                request_id = %ctx.request_id,
                source = %ctx.source,
                stage = "ID_KNOWN",
                code = ResponseCode::UnknownId.as_str(),
                device_id = %id,
                "No MAC address registered for this ID"
            );
            return Err(RequestError::UnknownId);
        };

        tracing::debug!(
            request_id = %ctx.request_id,
            source = %ctx.source,
            stage = "DISPATCH",
            device_id = %id,
            target = %self.dispatcher.target(),
            "Sending magic packet"
        );

        match self.dispatcher.send(&device.mac).await {
            Ok(()) => {
                tracing::info!(
                    request_id = %ctx.request_id,
                    source = %ctx.source,
                    stage = "DISPATCH",
                    code = ResponseCode::SendSuccess.as_str(),
                    mac = %device.address,
                    device_id = %id,
                    key = %mask_credential(key),
                    "WOL packet sent"
                );
                Ok(WakeReceipt {
                    device_id: id.to_string(),
                    address: device.address.clone(),
                })
            }
            Err(e) => {
                let error = RequestError::from(e);
                let code = error.code().as_str();
                match &error {
                    RequestError::Transport(te)
                        if te.kind == TransportErrorKind::PermissionDenied =>
                    {
                        tracing::warn!(
                            request_id = %ctx.request_id,
                            source = %ctx.source,
                            stage = "DISPATCH",
                            code,
                            mac = %device.address,
                            device_id = %id,
                            error = %te.source,
                            "Permission denied sending WOL packet"
                        );
                    }
                    _ => {
                        tracing::error!(
                            request_id = %ctx.request_id,
                            source = %ctx.source,
                            stage = "DISPATCH",
                            code,
                            mac = %device.address,
                            device_id = %id,
                            error = %error,
                            "Failed to send WOL packet"
                        );
                    }
                }
                Err(error)
            }
        }
    }
}

/// Empty query values count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn reject(ctx: &RequestContext, stage: &'static str, error: RequestError) -> RequestError {
    tracing::warn!(
        request_id = %ctx.request_id,
        source = %ctx.source,
        stage,
        code = error.code().as_str(),
        "{error}"
    );
    error
}
