// SPDX-License-Identifier: GPL-3.0-only

//! CA bundle handling for the ignition endpoint
//!
//! Certificates arrive base64-encoded on the cluster record and as data URLs
//! inside the host's ignition config overrides. Both end up as DER
//! certificates in a [`CaBundle`], which deduplicates on the raw DER bytes so
//! that PEM line wrapping differences between sources do not matter.

use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use install_types::{Cluster, Host};
use pem::{EncodeConfig, LineEnding, Pem};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use thiserror::Error;

use crate::error::{self, CertificateOrigin, ResolveError};

const CERTIFICATE_TAG: &str = "CERTIFICATE";
const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Error types for certificate payload decoding
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed data URL")]
    DataUrl,

    #[error("not a PEM bundle: {0}")]
    Pem(#[from] pem::PemError),

    #[error("no certificates found")]
    Empty,

    #[error("certificate {index} is not valid X.509: {reason}")]
    X509 { index: usize, reason: String },
}

/// Decode a base64-encoded PEM bundle into DER certificates
pub fn decode_base64_bundle(encoded: &str) -> Result<Vec<Vec<u8>>, BundleError> {
    let bundle = decode_wrapped_base64(encoded.as_bytes())?;
    parse_pem_certificates(&bundle)
}

/// Base64 that may be line-wrapped; ASCII whitespace is dropped before decoding.
fn decode_wrapped_base64(text: &[u8]) -> Result<Vec<u8>, BundleError> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(compact)?)
}

/// Decode the payload of a `data:` URL.
///
/// Payloads marked `;base64,` are base64 text; anything else is percent-escaped.
pub fn decode_data_url(source: &str) -> Result<Vec<u8>, BundleError> {
    let rest = source
        .strip_prefix(DATA_URL_SCHEME)
        .ok_or(BundleError::DataUrl)?;

    if let Some(index) = rest.find(BASE64_MARKER) {
        let payload = &rest[index + BASE64_MARKER.len()..];
        let unescaped: Vec<u8> = percent_decode_str(payload).collect();
        return decode_wrapped_base64(&unescaped);
    }

    let (_, payload) = rest.split_once(',').ok_or(BundleError::DataUrl)?;
    Ok(percent_decode_str(payload).collect())
}

/// Parse a concatenated PEM bundle into DER certificates.
///
/// Blocks that are not `CERTIFICATE` are skipped. At least one certificate
/// is required and every certificate must be valid X.509.
pub fn parse_pem_certificates(bundle: &[u8]) -> Result<Vec<Vec<u8>>, BundleError> {
    let blocks = pem::parse_many(bundle)?;

    let certificates: Vec<Vec<u8>> = blocks
        .into_iter()
        .filter(|block| block.tag() == CERTIFICATE_TAG)
        .map(Pem::into_contents)
        .collect();

    if certificates.is_empty() {
        return Err(BundleError::Empty);
    }

    for (index, der) in certificates.iter().enumerate() {
        x509_parser::parse_x509_certificate(der).map_err(|error| BundleError::X509 {
            index,
            reason: error.to_string(),
        })?;
    }

    Ok(certificates)
}

/// Ordered set of DER certificates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaBundle {
    certificates: Vec<Vec<u8>>,
    seen: HashSet<Vec<u8>>,
}

impl CaBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add certificates, keeping the first occurrence of each.
    ///
    /// Returns the number of duplicates dropped.
    pub fn extend<I>(&mut self, certificates: I) -> usize
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut dropped = 0;
        for der in certificates {
            if self.seen.insert(der.clone()) {
                self.certificates.push(der);
            } else {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn certificates(&self) -> &[Vec<u8>] {
        &self.certificates
    }

    /// PEM text with LF line endings and 64-column base64 lines
    pub fn to_pem(&self) -> String {
        let config = EncodeConfig::new().set_line_ending(LineEnding::LF);
        self.certificates
            .iter()
            .map(|der| pem::encode_config(&Pem::new(CERTIFICATE_TAG, der.clone()), config))
            .collect()
    }

    /// Base64 of [`CaBundle::to_pem`], or `None` for an empty bundle
    pub fn to_base64(&self) -> Option<String> {
        (!self.is_empty()).then(|| STANDARD.encode(self.to_pem()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct OverrideDocument {
    #[serde(default)]
    ignition: Option<IgnitionSection>,
}

#[derive(Debug, Default, Deserialize)]
struct IgnitionSection {
    #[serde(default)]
    security: Option<SecuritySection>,
}

#[derive(Debug, Default, Deserialize)]
struct SecuritySection {
    #[serde(default)]
    tls: Option<TlsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct TlsSection {
    #[serde(default, rename = "certificateAuthorities")]
    certificate_authorities: Option<Vec<Resource>>,
}

#[derive(Debug, Default, Deserialize)]
struct Resource {
    #[serde(default)]
    source: Option<String>,
}

/// `ignition.security.tls.certificateAuthorities[*].source` of an override document.
///
/// Missing sections yield no sources; entries without a source are skipped.
pub fn certificate_authority_sources(overrides: &str) -> serde_json::Result<Vec<String>> {
    let document: OverrideDocument = serde_json::from_str(overrides)?;

    let sources = document
        .ignition
        .and_then(|ignition| ignition.security)
        .and_then(|security| security.tls)
        .and_then(|tls| tls.certificate_authorities)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|resource| resource.source)
        .filter(|source| !source.is_empty())
        .collect();

    Ok(sources)
}

/// Merge the cluster CA certificate with those in the host's overrides.
///
/// Cluster certificates come first. Returns the base64 PEM bundle, or `None`
/// when neither side carries a certificate. An invalid source on either side
/// fails the whole merge.
pub fn merged_ca_bundle(cluster: &Cluster, host: &Host) -> error::Result<Option<String>> {
    let mut bundle = CaBundle::new();

    if let Some(encoded) = cluster.endpoint_ca_certificate() {
        let certificates = decode_base64_bundle(encoded)
            .map_err(|err| invalid_certificate(CertificateOrigin::Cluster, host, err))?;
        bundle.extend(certificates);
    }

    if let Some(overrides) = host.config_overrides() {
        let sources = certificate_authority_sources(overrides).map_err(|err| {
            ResolveError::InvalidOverrideDocument {
                host_id: host.id.to_string(),
                reason: err.to_string(),
            }
        })?;

        for source in sources {
            let certificates = decode_data_url(&source)
                .and_then(|payload| parse_pem_certificates(&payload))
                .map_err(|err| invalid_certificate(CertificateOrigin::HostOverrides, host, err))?;

            let dropped = bundle.extend(certificates);
            if dropped > 0 {
                tracing::debug!(
                    "Dropped {} duplicate CA certificate(s) for host {}",
                    dropped,
                    host.id
                );
            }
        }
    }

    tracing::debug!("Host {} trusts {} CA certificate(s)", host.id, bundle.len());
    Ok(bundle.to_base64())
}

fn invalid_certificate(origin: CertificateOrigin, host: &Host, err: BundleError) -> ResolveError {
    tracing::warn!("Rejecting CA certificate from {} for host {}: {}", origin, host.id, err);
    ResolveError::InvalidCertificate {
        origin,
        host_id: host.id.to_string(),
        reason: err.to_string(),
    }
}
