// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a CA certificate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateOrigin {
    /// `Cluster::ignition_endpoint_ca_certificate`
    Cluster,
    /// `ignition.security.tls.certificateAuthorities` in host overrides
    HostOverrides,
}

impl fmt::Display for CertificateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster => f.write_str("cluster ignition endpoint"),
            Self::HostOverrides => f.write_str("host ignition config overrides"),
        }
    }
}

/// Error types for installation config resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("installation disk not found for host {host_id}")]
    NotFound { host_id: String },

    #[error("failed to parse inventory of host {host_id}: {reason}")]
    InvalidInventory { host_id: String, reason: String },

    #[error("invalid CA certificate in {origin} for host {host_id}: {reason}")]
    InvalidCertificate {
        origin: CertificateOrigin,
        host_id: String,
        reason: String,
    },

    #[error("invalid ignition config overrides for host {host_id}: {reason}")]
    InvalidOverrideDocument { host_id: String, reason: String },

    #[error("invalid ignition endpoint URL {url:?}: {reason}")]
    InvalidEndpointUrl { url: String, reason: String },

    #[error("cluster {cluster_id} not found for host {host_id}")]
    ClusterNotFound { host_id: String, cluster_id: String },

    #[error("invalid endpoint settings: {0}")]
    InvalidSettings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializable classification of a [`ResolveError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveErrorKind {
    NotFound,
    InvalidInventory,
    InvalidCertificate,
    InvalidOverrideDocument,
    InvalidEndpointUrl,
    ClusterNotFound,
    InvalidSettings,
    Internal,
}

impl ResolveError {
    pub fn kind(&self) -> ResolveErrorKind {
        match self {
            Self::NotFound { .. } => ResolveErrorKind::NotFound,
            Self::InvalidInventory { .. } => ResolveErrorKind::InvalidInventory,
            Self::InvalidCertificate { .. } => ResolveErrorKind::InvalidCertificate,
            Self::InvalidOverrideDocument { .. } => ResolveErrorKind::InvalidOverrideDocument,
            Self::InvalidEndpointUrl { .. } => ResolveErrorKind::InvalidEndpointUrl,
            Self::ClusterNotFound { .. } => ResolveErrorKind::ClusterNotFound,
            Self::InvalidSettings(_) => ResolveErrorKind::InvalidSettings,
            Self::Json(_) => ResolveErrorKind::Internal,
        }
    }
}

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;
