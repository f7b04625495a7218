//! Cluster model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DiskEncryption;

/// The cluster a host is being installed into
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    pub id: Uuid,

    #[serde(default)]
    pub name: Option<String>,

    /// API VIP DNS name or IP literal (e.g., "api.mycluster.example.com", "192.168.1.100")
    #[serde(default)]
    pub api_vip_dns_name: String,

    /// Empty for imported (day-2) clusters
    #[serde(default)]
    pub base_dns_domain: Option<String>,

    // === Ignition endpoint customization ===
    /// Custom ignition endpoint replacing the derived machine config server URL
    #[serde(default)]
    pub ignition_endpoint_url: Option<String>,

    /// Base64-encoded PEM bundle trusted for the ignition endpoint
    #[serde(default)]
    pub ignition_endpoint_ca_certificate: Option<String>,

    #[serde(default)]
    pub disk_encryption: Option<DiskEncryption>,
}

impl Cluster {
    pub fn new(id: Uuid, api_vip_dns_name: impl Into<String>) -> Self {
        Self {
            id,
            name: None,
            api_vip_dns_name: api_vip_dns_name.into(),
            base_dns_domain: None,
            ignition_endpoint_url: None,
            ignition_endpoint_ca_certificate: None,
            disk_encryption: None,
        }
    }

    pub fn custom_endpoint(&self) -> Option<&str> {
        self.ignition_endpoint_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    pub fn endpoint_ca_certificate(&self) -> Option<&str> {
        self.ignition_endpoint_ca_certificate
            .as_deref()
            .filter(|cert| !cert.is_empty())
    }
}
