//! Host models

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a host plays in the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HostRole {
    Master,
    Worker,
    Arbiter,
    Bootstrap,
    /// Role not yet finalized
    #[default]
    AutoAssign,
    /// A role token this build does not recognize
    #[serde(other)]
    Unknown,
}

impl HostRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Worker => "worker",
            Self::Arbiter => "arbiter",
            Self::Bootstrap => "bootstrap",
            Self::AutoAssign => "auto-assign",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HostRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized tokens parse as [`HostRole::Unknown`].
impl FromStr for HostRole {
    type Err = Infallible;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let role = match token {
            "master" => Self::Master,
            "worker" => Self::Worker,
            "arbiter" => Self::Arbiter,
            "bootstrap" => Self::Bootstrap,
            "auto-assign" => Self::AutoAssign,
            _ => Self::Unknown,
        };
        Ok(role)
    }
}

/// A node being installed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    pub id: Uuid,

    #[serde(default)]
    pub cluster_id: Option<Uuid>,

    #[serde(default)]
    pub role: HostRole,

    /// Overrides the role-derived machine config pool
    #[serde(default)]
    pub machine_config_pool_name: Option<String>,

    // === Recorded installation disk ===
    #[serde(default)]
    pub installation_disk_id: Option<String>,

    #[serde(default)]
    pub installation_disk_path: Option<String>,

    // === Ignition ===
    /// Bearer token for the ignition endpoint
    #[serde(default)]
    pub ignition_endpoint_token: Option<String>,

    /// Raw ignition config override document (JSON)
    #[serde(default)]
    pub ignition_config_overrides: Option<String>,

    /// Raw inventory document (JSON)
    #[serde(default)]
    pub inventory: String,
}

impl Host {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            cluster_id: None,
            role: HostRole::default(),
            machine_config_pool_name: None,
            installation_disk_id: None,
            installation_disk_path: None,
            ignition_endpoint_token: None,
            ignition_config_overrides: None,
            inventory: String::new(),
        }
    }

    /// Machine config pool override, if set to a non-empty value
    pub fn pool_override(&self) -> Option<&str> {
        non_empty(&self.machine_config_pool_name)
    }

    pub fn recorded_disk_id(&self) -> Option<&str> {
        non_empty(&self.installation_disk_id)
    }

    pub fn recorded_disk_path(&self) -> Option<&str> {
        non_empty(&self.installation_disk_path)
    }

    pub fn endpoint_token(&self) -> Option<&str> {
        non_empty(&self.ignition_endpoint_token)
    }

    pub fn config_overrides(&self) -> Option<&str> {
        non_empty(&self.ignition_config_overrides)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
