//! Device registry.
//!
//! Maps device ids to the physical address their wake packet targets. Built
//! once from configuration, validated entry by entry, and never mutated
//! afterwards; share it behind an `Arc`.

use std::collections::{BTreeMap, HashMap};

use crate::config::validation::ValidationError;
use crate::security::validation::validate_id;
use crate::wol::packet::MacAddress;

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDevice {
    /// Address exactly as configured; this is what responses echo.
    pub address: String,
    pub mac: MacAddress,
}

/// Immutable device id → physical address table.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, RegisteredDevice>,
}

impl DeviceRegistry {
    /// Build from a configured table, reporting every malformed entry.
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut devices = HashMap::with_capacity(entries.len());

        if entries.is_empty() {
            errors.push(ValidationError::EmptyRegistry);
        }

        for (id, address) in entries {
            if let Err(reason) = validate_id(id) {
                errors.push(ValidationError::DeviceId {
                    id: id.clone(),
                    reason: reason.to_string(),
                });
                continue;
            }
            match address.trim().parse::<MacAddress>() {
                Ok(mac) => {
                    devices.insert(
                        id.clone(),
                        RegisteredDevice {
                            address: address.trim().to_string(),
                            mac,
                        },
                    );
                }
                Err(e) => errors.push(ValidationError::DeviceAddress {
                    id: id.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        if errors.is_empty() {
            Ok(Self { devices })
        } else {
            Err(errors)
        }
    }

    pub fn lookup(&self, device_id: &str) -> Option<&RegisteredDevice> {
        self.devices.get(device_id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
