//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{GatewayConfig, Secret};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_SECRET: &str = "WOL_API_KEY";
pub const ENV_BROADCAST: &str = "BROADCAST_IP";
pub const ENV_LOG_FILE: &str = "LOG_FILE";
pub const ENV_DEVICES: &str = "ID_TO_MAC_MAPPING";
pub const ENV_BIND: &str = "WOL_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{var} is malformed: {reason}")]
    Environment { var: &'static str, reason: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, merge and validate configuration.
///
/// Defaults are overlaid with the TOML file at `path` (if any), then with
/// the process environment.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// [`load_config`] with an injectable environment lookup.
pub fn load_config_with_env<F>(path: Option<&Path>, env: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = env(ENV_SECRET) {
        config.wake.secret = Secret::new(secret);
    }
    if let Some(broadcast) = env(ENV_BROADCAST) {
        config.wake.broadcast_address = broadcast;
    }
    if let Some(log_file) = env(ENV_LOG_FILE) {
        config.observability.log_file = log_file;
    }
    if let Some(bind) = env(ENV_BIND) {
        config.listener.bind_address = bind;
    }
    if let Some(mapping) = env(ENV_DEVICES) {
        config.devices = parse_device_mapping(&mapping)?;
    }
    Ok(())
}

/// Parse `id=mac,id=mac` into a device table. Whitespace around items is
/// ignored; a trailing comma is allowed.
pub fn parse_device_mapping(
    raw: &str,
) -> Result<std::collections::BTreeMap<String, String>, ConfigError> {
    let mut devices = std::collections::BTreeMap::new();

    for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let (id, mac) = item.split_once('=').ok_or_else(|| ConfigError::Environment {
            var: ENV_DEVICES,
            reason: format!("entry '{item}' is not of the form id=mac"),
        })?;
        let (id, mac) = (id.trim(), mac.trim());

        if devices.insert(id.to_string(), mac.to_string()).is_some() {
            return Err(ConfigError::Environment {
                var: ENV_DEVICES,
                reason: format!("device id '{id}' appears more than once"),
            });
        }
    }

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const SECRET: &str = "wol_prod_test_key_1234567890_secure";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn environment_only() {
        let config = load_config_with_env(
            None,
            env(&[
                (ENV_SECRET, SECRET),
                (ENV_DEVICES, "123456789=AA:BB:CC:DD:EE:FF, 987654321=11:22:33:44:55:66"),
                (ENV_BROADCAST, "192.168.0.255"),
                (ENV_LOG_FILE, "/tmp/wol.log"),
            ]),
        )
        .unwrap();

        assert_eq!(config.wake.secret.expose(), SECRET);
        assert_eq!(config.wake.broadcast_address, "192.168.0.255");
        assert_eq!(config.observability.log_file, "/tmp/wol.log");
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices["987654321"], "11:22:33:44:55:66");
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = load_config_with_env(None, env(&[(ENV_DEVICES, "1=AA:BB:CC:DD:EE:FF")]))
            .unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::MissingSecret]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_then_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:6001"

            [wake]
            secret = "from_file_secret_value_0001"
            port = 7

            [devices]
            "123456789" = "AA:BB:CC:DD:EE:FF"
            "#
        )
        .unwrap();

        let config = load_config_with_env(Some(file.path()), env(&[(ENV_SECRET, SECRET)])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:6001");
        assert_eq!(config.wake.port, 7);
        assert_eq!(config.wake.secret.expose(), SECRET);
        assert_eq!(config.devices.len(), 1);
    }

    #[test]
    fn unreadable_or_invalid_file() {
        let missing = load_config_with_env(Some(Path::new("/nonexistent/wol.toml")), env(&[]));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[wake\nsecret = ").unwrap();
        let parsed = load_config_with_env(Some(file.path()), env(&[]));
        assert!(matches!(parsed, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn device_mapping_format() {
        let devices = parse_device_mapping(" a=AA:BB:CC:DD:EE:FF ,b = 11:22:33:44:55:66,").unwrap();
        assert_eq!(devices["a"], "AA:BB:CC:DD:EE:FF");
        assert_eq!(devices["b"], "11:22:33:44:55:66");

        assert!(matches!(
            parse_device_mapping("a:AA:BB:CC:DD:EE:FF"),
            Err(ConfigError::Environment { var: ENV_DEVICES, .. })
        ));
        assert!(matches!(
            parse_device_mapping("a=AA:BB:CC:DD:EE:FF,a=11:22:33:44:55:66"),
            Err(ConfigError::Environment { .. })
        ));
    }

    #[test]
    fn validation_message_lists_every_problem() {
        let err = ConfigError::Validation(vec![
            ValidationError::MissingSecret,
            ValidationError::EmptyRegistry,
        ]);
        let text = err.to_string();
        assert!(text.starts_with("Validation failed: "));
        assert!(text.contains("WOL_API_KEY is not set"));
        assert!(text.contains("no devices registered"));
    }
}
