//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce secret strength bounds
//! - Check address literals (broadcast, bind, metrics)
//! - Check every registry entry
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{Ipv4Addr, SocketAddr};

use crate::config::schema::GatewayConfig;
use crate::registry::DeviceRegistry;
use crate::security::validation::{MAX_CREDENTIAL_LEN, MIN_CREDENTIAL_LEN};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("WOL_API_KEY is not set; a secret of at least {MIN_CREDENTIAL_LEN} characters is required")]
    MissingSecret,

    #[error("WOL_API_KEY is too short (minimum {MIN_CREDENTIAL_LEN} characters, got {len})")]
    SecretTooShort { len: usize },

    #[error("WOL_API_KEY is too long (maximum {MAX_CREDENTIAL_LEN} characters, got {len})")]
    SecretTooLong { len: usize },

    #[error("BROADCAST_IP '{0}' is not a valid IPv4 address")]
    BroadcastAddress(String),

    #[error("bind address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("metrics address '{0}' is not a valid socket address")]
    MetricsAddress(String),

    #[error("no devices registered")]
    EmptyRegistry,

    #[error("device id '{id}' is invalid: {reason}")]
    DeviceId { id: String, reason: String },

    #[error("device '{id}' has an invalid physical address: {reason}")]
    DeviceAddress { id: String, reason: String },

    #[error("LOG_FILE must not be empty")]
    EmptyLogFile,

    #[error("log_max_bytes must be greater than zero")]
    LogRotationSize,
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let secret = config.wake.secret.expose();
    let secret_len = secret.chars().count();
    if secret.is_empty() {
        errors.push(ValidationError::MissingSecret);
    } else if secret_len < MIN_CREDENTIAL_LEN {
        errors.push(ValidationError::SecretTooShort { len: secret_len });
    } else if secret_len > MAX_CREDENTIAL_LEN {
        errors.push(ValidationError::SecretTooLong { len: secret_len });
    }

    if config.wake.broadcast_address.parse::<Ipv4Addr>().is_err() {
        errors.push(ValidationError::BroadcastAddress(
            config.wake.broadcast_address.clone(),
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(registry_errors) = DeviceRegistry::from_entries(&config.devices) {
        errors.extend(registry_errors);
    }

    let observability = &config.observability;
    if observability.log_file.trim().is_empty() {
        errors.push(ValidationError::EmptyLogFile);
    }
    if observability.log_max_bytes == 0 {
        errors.push(ValidationError::LogRotationSize);
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Secret;

    fn valid() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.wake.secret = Secret::new("wol_prod_test_key_1234567890_secure");
        config
            .devices
            .insert("123456789".into(), "AA:BB:CC:DD:EE:FF".into());
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn secret_bounds() {
        let mut config = valid();
        config.wake.secret = Secret::default();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::MissingSecret]));

        config.wake.secret = Secret::new("x".repeat(19));
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::SecretTooShort { len: 19 }])
        );

        config.wake.secret = Secret::new("x".repeat(257));
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::SecretTooLong { len: 257 }])
        );
    }

    #[test]
    fn broadcast_must_be_ipv4_literal() {
        for bad in ["10.10.10", "256.1.1.1", "ff02::1", "broadcast", ""] {
            let mut config = valid();
            config.wake.broadcast_address = bad.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::BroadcastAddress(bad.into())]),
                "{bad}"
            );
        }

        // Not required to be a .255 address.
        let mut config = valid();
        config.wake.broadcast_address = "192.168.1.10".into();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.observability.log_file = " ".into();
        config.observability.log_max_bytes = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "bad".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingSecret,
                ValidationError::BindAddress("nowhere".into()),
                ValidationError::EmptyRegistry,
                ValidationError::EmptyLogFile,
                ValidationError::LogRotationSize,
                ValidationError::MetricsAddress("bad".into()),
            ]
        );
    }

    #[test]
    fn metrics_address_ignored_when_disabled() {
        let mut config = valid();
        config.observability.metrics_address = "bad".into();
        assert_eq!(validate_config(&config), Ok(()));
    }
}
