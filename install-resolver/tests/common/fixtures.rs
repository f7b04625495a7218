use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use install_resolver::install_types::{Cluster, Host, HostRole};
use install_resolver::trust_bundle::decode_base64_bundle;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

/// Red Hat IT Root CA
pub const CA_ROOT: &str = include_str!("../fixtures/ca_root.b64");

/// Red Hat prod Intermediate Certificate Authority
pub const CA_INTERMEDIATE: &str = include_str!("../fixtures/ca_intermediate.b64");

/// openshift root-ca
pub const CA_SERVICE: &str = include_str!("../fixtures/ca_service.b64");

pub const CUSTOM_ENDPOINT: &str = "https://foo.bar:33735/acme";

pub fn cluster(api_name: &str) -> Cluster {
    Cluster::new(Uuid::new_v4(), api_name)
}

pub fn host(role: HostRole) -> Host {
    let mut host = Host::new(Uuid::new_v4());
    host.role = role;
    host
}

pub fn pem_text(encoded: &str) -> String {
    let bytes = STANDARD.decode(encoded).expect("fixture is base64");
    String::from_utf8(bytes).expect("fixture is PEM text")
}

pub fn base64_data_url(encoded: &str) -> String {
    format!("data:text/plain;charset=utf-8;base64,{encoded}")
}

pub fn escaped_data_url(encoded: &str) -> String {
    let pem = pem_text(encoded);
    let escaped = utf8_percent_encode(&pem, NON_ALPHANUMERIC);
    format!("data:text/plain;charset=utf-8,{escaped}")
}

/// Base64 wrapped at 76 columns with CRLF or LF line breaks, as `base64` tools emit it
pub fn wrapped(encoded: &str, line_ending: &str) -> String {
    encoded
        .as_bytes()
        .chunks(76)
        .map(|line| std::str::from_utf8(line).expect("base64 is ASCII"))
        .collect::<Vec<_>>()
        .join(line_ending)
}

/// Ignition overrides trusting the given data URL sources
pub fn overrides_with(sources: &[String]) -> String {
    let authorities: Vec<_> = sources
        .iter()
        .map(|source| serde_json::json!({ "source": source }))
        .collect();

    serde_json::json!({
        "ignition": {
            "version": "3.1.0",
            "security": { "tls": { "certificateAuthorities": authorities } }
        }
    })
    .to_string()
}

/// DER certificates of a base64 PEM bundle, in bundle order
pub fn raw_certificates(encoded: &str) -> Vec<Vec<u8>> {
    decode_base64_bundle(encoded).expect("valid bundle")
}
