// SPDX-License-Identifier: GPL-3.0-only

//! API VIP connectivity check
//!
//! Before installation the agent on a host checks the ignition endpoint it
//! will boot from. The request it is handed carries the resolved URL, the
//! CA bundle to trust and, when the host has one, its bearer token.

use std::collections::HashMap;

use install_types::{Cluster, Host};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::endpoint::EndpointResolver;
use crate::error::{ResolveError, Result};

/// Step type the agent dispatches the request under
pub const STEP_TYPE: &str = "api-vip-connectivity-check";

const AUTHORIZATION_HEADER: &str = "Authorization";

/// Seam to the cluster store
pub trait ClusterLookup: Send + Sync {
    fn find_cluster(&self, cluster_id: Uuid) -> Option<Cluster>;
}

impl ClusterLookup for HashMap<Uuid, Cluster> {
    fn find_cluster(&self, cluster_id: Uuid) -> Option<Cluster> {
        self.get(&cluster_id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub key: String,
    pub value: String,
}

/// Arguments of a connectivity check; field order is the wire order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityCheckRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignition_endpoint_token: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub request_headers: Vec<RequestHeader>,

    pub url: String,
}

/// Builds connectivity check requests for hosts of known clusters
pub struct ConnectivityCheckStep<L> {
    lookup: L,
    resolver: EndpointResolver,
}

impl<L: ClusterLookup> ConnectivityCheckStep<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_resolver(lookup, EndpointResolver::new())
    }

    pub fn with_resolver(lookup: L, resolver: EndpointResolver) -> Self {
        Self { lookup, resolver }
    }

    pub fn request(&self, host: &Host) -> Result<ConnectivityCheckRequest> {
        let cluster = self.cluster_of(host)?;
        let endpoint = self.resolver.resolve(&cluster, host)?;

        let token = host.endpoint_token().map(str::to_string);
        let request_headers = token
            .iter()
            .map(|token| RequestHeader {
                key: AUTHORIZATION_HEADER.to_string(),
                value: format!("Bearer {token}"),
            })
            .collect();

        Ok(ConnectivityCheckRequest {
            ca_certificate: endpoint.ca_bundle,
            ignition_endpoint_token: token,
            request_headers,
            url: endpoint.url,
        })
    }

    /// JSON arguments for the agent
    pub fn build(&self, host: &Host) -> Result<String> {
        let request = self.request(host)?;
        tracing::info!("Built {} step for host {}", STEP_TYPE, host.id);
        Ok(serde_json::to_string(&request)?)
    }

    fn cluster_of(&self, host: &Host) -> Result<Cluster> {
        let not_found = |cluster_id: String| {
            tracing::warn!("Cluster {} of host {} not found", cluster_id, host.id);
            ResolveError::ClusterNotFound {
                host_id: host.id.to_string(),
                cluster_id,
            }
        };

        let cluster_id = host.cluster_id.ok_or_else(|| not_found("<unset>".to_string()))?;
        self.lookup
            .find_cluster(cluster_id)
            .ok_or_else(|| not_found(cluster_id.to_string()))
    }
}
