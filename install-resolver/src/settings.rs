// SPDX-License-Identifier: GPL-3.0-only

//! Endpoint policy settings
//!
//! The machine config server ports, path prefix and API name prefixes used
//! when deriving an ignition endpoint. Defaults match what an installed
//! cluster serves; a TOML document may override any subset of them.

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// Machine config server port for plain HTTP
pub const DEFAULT_HTTP_PORT: u16 = 22624;

/// Machine config server port for HTTPS
pub const DEFAULT_HTTPS_PORT: u16 = 22623;

/// Path prefix in front of the pool selector on derived endpoints
pub const CONFIG_PATH_PREFIX: &str = "config/";

/// Prefix of the public API name
pub const PUBLIC_API_PREFIX: &str = "api.";

/// Prefix of the internal API name serving the HTTPS machine config server
pub const INTERNAL_API_PREFIX: &str = "api-int.";

pub const MASTER_SELECTOR: &str = "master";
pub const WORKER_SELECTOR: &str = "worker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointSettings {
    pub http_port: u16,
    pub https_port: u16,
    pub config_path_prefix: String,
    pub public_api_prefix: String,
    pub internal_api_prefix: String,
    pub master_selector: String,
    pub worker_selector: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            https_port: DEFAULT_HTTPS_PORT,
            config_path_prefix: CONFIG_PATH_PREFIX.to_string(),
            public_api_prefix: PUBLIC_API_PREFIX.to_string(),
            internal_api_prefix: INTERNAL_API_PREFIX.to_string(),
            master_selector: MASTER_SELECTOR.to_string(),
            worker_selector: WORKER_SELECTOR.to_string(),
        }
    }
}

impl EndpointSettings {
    /// Parse settings from TOML, filling unspecified fields with defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(raw).map_err(|error| ResolveError::InvalidSettings(error.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 || self.https_port == 0 {
            return Err(ResolveError::InvalidSettings(
                "ports must be non-zero".to_string(),
            ));
        }

        let required = [
            ("public_api_prefix", &self.public_api_prefix),
            ("internal_api_prefix", &self.internal_api_prefix),
            ("master_selector", &self.master_selector),
            ("worker_selector", &self.worker_selector),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(ResolveError::InvalidSettings(format!(
                    "{name} must not be empty"
                )));
            }
        }

        if self.config_path_prefix.starts_with('/') {
            return Err(ResolveError::InvalidSettings(
                "config_path_prefix must be relative to the endpoint root".to_string(),
            ));
        }

        Ok(())
    }
}
