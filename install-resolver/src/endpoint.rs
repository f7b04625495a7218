// SPDX-License-Identifier: GPL-3.0-only

//! Ignition endpoint resolution
//!
//! A cluster either names a custom ignition endpoint, which is used as-is
//! with the pool selector appended, or the endpoint is derived from the
//! cluster's API name. Derived endpoints switch to the HTTPS machine config
//! server when the host ends up trusting at least one CA certificate.

use std::net::IpAddr;

use install_types::{Cluster, Host, HostRole};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ResolveError, Result};
use crate::settings::EndpointSettings;
use crate::trust_bundle::merged_ca_bundle;

/// Bytes escaped in the pool selector path segment on both endpoint forms
const POOL_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Where a host fetches its first-boot configuration from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    pub url: String,
    /// Base64 of a PEM bundle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EndpointResolver {
    settings: EndpointSettings,
}

impl EndpointResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EndpointSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EndpointSettings {
        &self.settings
    }

    /// Resolve the ignition URL and CA bundle for `host`.
    ///
    /// Nothing is returned unless both parts resolve.
    pub fn resolve(&self, cluster: &Cluster, host: &Host) -> Result<ResolvedEndpoint> {
        let ca_bundle = merged_ca_bundle(cluster, host)?;
        let segment = utf8_percent_encode(self.pool_selector(host), POOL_SEGMENT).to_string();

        let url = match cluster.custom_endpoint() {
            Some(custom) => custom_endpoint_url(custom, &segment)?,
            None => self.derived_endpoint_url(&cluster.api_vip_dns_name, &segment, ca_bundle.is_some())?,
        };

        tracing::debug!("Resolved ignition endpoint {} for host {}", url, host.id);
        Ok(ResolvedEndpoint { url, ca_bundle })
    }

    /// Machine config pool the host pulls its configuration for
    pub fn pool_selector<'a>(&'a self, host: &'a Host) -> &'a str {
        if let Some(pool) = host.pool_override() {
            return pool;
        }
        match host.role {
            HostRole::Master => &self.settings.master_selector,
            HostRole::Worker
            | HostRole::Arbiter
            | HostRole::Bootstrap
            | HostRole::AutoAssign
            | HostRole::Unknown => &self.settings.worker_selector,
        }
    }

    /// Host names come back lowercased.
    fn derived_endpoint_url(&self, api_name: &str, segment: &str, secure: bool) -> Result<String> {
        let invalid = |reason: &str| ResolveError::InvalidEndpointUrl {
            url: api_name.to_string(),
            reason: reason.to_string(),
        };

        let ip = api_name.parse::<IpAddr>().ok();
        let (scheme, port, name) = if secure {
            ("https", self.settings.https_port, self.internal_api_name(api_name, ip.is_some()))
        } else {
            ("http", self.settings.http_port, api_name.to_string())
        };

        let authority = match ip {
            Some(IpAddr::V6(_)) => format!("[{name}]"),
            _ => name,
        };

        let mut url = Url::parse(&format!("{scheme}://{authority}:{port}"))
            .map_err(|error| invalid(&error.to_string()))?;
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("API name is not a plain host name"));
        }

        url.set_path(&format!("{}{}", self.settings.config_path_prefix, segment));
        Ok(url.into())
    }

    /// `api.<domain>` becomes `api-int.<domain>`; IP literals and other names are kept.
    ///
    /// Prefixes match case-insensitively, like the host names they are part of.
    fn internal_api_name(&self, api_name: &str, is_ip: bool) -> String {
        let public = self.settings.public_api_prefix.as_str();
        let internal = self.settings.internal_api_prefix.as_str();

        if is_ip || strip_prefix_ignore_case(api_name, internal).is_some() {
            return api_name.to_string();
        }
        match strip_prefix_ignore_case(api_name, public) {
            Some(domain) => format!("{internal}{domain}"),
            None => api_name.to_string(),
        }
    }
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &name[prefix.len()..])
}

fn custom_endpoint_url(custom: &str, segment: &str) -> Result<String> {
    Url::parse(custom).map_err(|error| ResolveError::InvalidEndpointUrl {
        url: custom.to_string(),
        reason: error.to_string(),
    })?;

    let base = custom.strip_suffix('/').unwrap_or(custom);
    Ok(format!("{base}/{segment}"))
}

/// Resolve with the default endpoint settings
pub fn resolve_ignition_endpoint(cluster: &Cluster, host: &Host) -> Result<ResolvedEndpoint> {
    EndpointResolver::new().resolve(cluster, host)
}
