// SPDX-License-Identifier: GPL-3.0-only

use install_types::{DiskEncryptionEnableOn, HostRole};

/// Role a host is evaluated as for policy lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyRole {
    Master,
    Arbiter,
    Worker,
}

/// Roles without a final assignment match no role subset.
fn policy_role(role: HostRole) -> Option<PolicyRole> {
    match role {
        HostRole::Master | HostRole::Bootstrap => Some(PolicyRole::Master),
        HostRole::Arbiter => Some(PolicyRole::Arbiter),
        HostRole::Worker => Some(PolicyRole::Worker),
        HostRole::AutoAssign | HostRole::Unknown => None,
    }
}

/// Whether disk encryption applies to a host of `role` under `enable_on`.
///
/// Bootstrap hosts are treated as masters.
pub fn is_disk_encryption_enabled_for_role(enable_on: DiskEncryptionEnableOn, role: HostRole) -> bool {
    match enable_on {
        DiskEncryptionEnableOn::All => true,
        DiskEncryptionEnableOn::None => false,
        DiskEncryptionEnableOn::Roles(roles) => match policy_role(role) {
            Some(PolicyRole::Master) => roles.masters,
            Some(PolicyRole::Arbiter) => roles.arbiters,
            Some(PolicyRole::Worker) => roles.workers,
            None => false,
        },
    }
}

/// Whether `role` may be requested for a host.
///
/// Hosts added to an already installed cluster can only join as workers or
/// control-plane nodes; bootstrap and arbiter roles belong to the initial
/// installation.
pub fn is_role_valid(role: HostRole, is_day2_host: bool) -> bool {
    match role {
        HostRole::Master | HostRole::Worker | HostRole::AutoAssign => true,
        HostRole::Arbiter | HostRole::Bootstrap => !is_day2_host,
        HostRole::Unknown => false,
    }
}
