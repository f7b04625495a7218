// SPDX-License-Identifier: GPL-3.0-only

//! Installation config resolution for bare-metal hosts
//!
//! Pure functions over already-loaded host and cluster records: which disk a
//! host installs to, whether its disks are encrypted, and where it fetches
//! its first-boot configuration from together with the CA bundle it trusts.

pub mod connectivity;
pub mod disk_selection;
pub mod endpoint;
pub mod error;
pub mod role_policy;
pub mod settings;
pub mod trust_bundle;

// Re-export commonly used types
pub use connectivity::{ClusterLookup, ConnectivityCheckRequest, ConnectivityCheckStep, RequestHeader};
pub use disk_selection::{
    disks_of_holder, disks_of_holder_by_type, host_installation_disk, select_installation_disk,
};
pub use endpoint::{EndpointResolver, ResolvedEndpoint, resolve_ignition_endpoint};
pub use error::{CertificateOrigin, ResolveError, ResolveErrorKind, Result};
pub use role_policy::{is_disk_encryption_enabled_for_role, is_role_valid};
pub use settings::EndpointSettings;
pub use trust_bundle::{CaBundle, merged_ca_bundle};

// Re-export shared models
pub use install_types;
