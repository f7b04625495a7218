//! Disk encryption policy models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Roles named in a role-subset encryption policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EnabledRoles {
    pub masters: bool,
    pub arbiters: bool,
    pub workers: bool,
}

/// Which host roles get disk encryption
///
/// Wire form is `all`, `none`, or a comma-joined subset of
/// `masters`, `arbiters`, `workers` (e.g. `masters,workers`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DiskEncryptionEnableOn {
    All,
    #[default]
    None,
    Roles(EnabledRoles),
}

impl DiskEncryptionEnableOn {
    pub const fn roles(masters: bool, arbiters: bool, workers: bool) -> Self {
        Self::Roles(EnabledRoles {
            masters,
            arbiters,
            workers,
        })
    }
}

/// Error for an unrecognized `enable_on` token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid disk encryption enable_on value: {0:?}")]
pub struct ParseEnableOnError(String);

impl FromStr for DiskEncryptionEnableOn {
    type Err = ParseEnableOnError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => return Ok(Self::All),
            "none" => return Ok(Self::None),
            _ => {}
        }

        let mut roles = EnabledRoles::default();
        for token in value.split(',').map(str::trim) {
            match token {
                "masters" => roles.masters = true,
                "arbiters" => roles.arbiters = true,
                "workers" => roles.workers = true,
                _ => return Err(ParseEnableOnError(value.to_string())),
            }
        }

        Ok(Self::Roles(roles))
    }
}

impl TryFrom<String> for DiskEncryptionEnableOn {
    type Error = ParseEnableOnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DiskEncryptionEnableOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::None => f.write_str("none"),
            Self::Roles(roles) => {
                let names: Vec<&str> = [
                    (roles.masters, "masters"),
                    (roles.arbiters, "arbiters"),
                    (roles.workers, "workers"),
                ]
                .into_iter()
                .filter_map(|(enabled, name)| enabled.then_some(name))
                .collect();
                if names.is_empty() {
                    f.write_str("none")
                } else {
                    f.write_str(&names.join(","))
                }
            }
        }
    }
}

impl From<DiskEncryptionEnableOn> for String {
    fn from(value: DiskEncryptionEnableOn) -> Self {
        value.to_string()
    }
}

/// Cluster disk encryption settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiskEncryption {
    #[serde(default)]
    pub enable_on: DiskEncryptionEnableOn,
}
