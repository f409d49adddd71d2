//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the wake gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Authentication secret and packet target.
    pub wake: WakeConfig,

    /// Device id to physical address table.
    pub devices: BTreeMap<String, String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5001".to_string(),
        }
    }
}

/// Wake-on-LAN settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WakeConfig {
    /// Shared secret callers must present as `key`. No default.
    pub secret: Secret,

    /// IPv4 broadcast address the magic packet is sent to.
    pub broadcast_address: String,

    /// UDP destination port (9 is the discard port used by most NICs).
    pub port: u16,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            secret: Secret::default(),
            broadcast_address: "10.10.10.255".to_string(),
            port: 9,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Path of the persistent log file.
    pub log_file: String,

    /// Rotate the log file once it would grow past this many bytes.
    pub log_max_bytes: u64,

    /// Number of rotated files kept next to the active one.
    pub log_backups: usize,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: "/var/log/rustdesk-wol-proxy.log".to_string(),
            log_max_bytes: 5 * 1024 * 1024,
            log_backups: 3,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A secret string that never shows up in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw secret. Only the authenticator should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<unset>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5001");
        assert_eq!(config.wake.broadcast_address, "10.10.10.255");
        assert_eq!(config.wake.port, 9);
        assert!(config.wake.secret.is_empty());
        assert!(config.devices.is_empty());
        assert_eq!(config.observability.log_max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.observability.log_backups, 3);
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let secret = Secret::new("wol_prod_test_key_1234567890_secure");
        let rendered = format!("{:?}", secret);
        assert!(!rendered.contains("wol_prod"));
        assert_eq!(rendered, "Secret(***)");
    }

    #[test]
    fn parses_partial_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [wake]
            secret = "wol_prod_test_key_1234567890_secure"

            [devices]
            "123456789" = "AA:BB:CC:DD:EE:FF"
            "#,
        )
        .unwrap();

        assert_eq!(config.wake.secret.expose(), "wol_prod_test_key_1234567890_secure");
        assert_eq!(config.wake.port, 9);
        assert_eq!(config.devices.get("123456789").map(String::as_str), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn example_file_matches_defaults() {
        let config: GatewayConfig =
            toml::from_str(include_str!("../../wol-gateway.example.toml")).unwrap();
        let defaults = GatewayConfig::default();

        assert!(config.wake.secret.is_empty());
        assert_eq!(config.listener.bind_address, defaults.listener.bind_address);
        assert_eq!(config.wake.broadcast_address, defaults.wake.broadcast_address);
        assert_eq!(config.observability.log_max_bytes, defaults.observability.log_max_bytes);
        assert_eq!(config.devices.len(), 2);
    }
}
