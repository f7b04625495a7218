// SPDX-License-Identifier: GPL-3.0-only

//! Installation disk selection
//!
//! Inventory order is the host's own priority order; nothing here reorders it.

use install_types::{Disk, DriveType, Host, Inventory};

use crate::error::{ResolveError, Result};

/// Pick the installation disk from a fresh inventory.
///
/// A previously selected disk that is still present wins over the first
/// disk, even when the inventory now lists another disk ahead of it.
/// Returns `None` only for an empty inventory.
pub fn select_installation_disk<'a>(disks: &'a [Disk], prior_id: Option<&str>) -> Option<&'a Disk> {
    if let Some(prior_id) = prior_id.filter(|id| !id.is_empty()) {
        if let Some(disk) = disks.iter().find(|disk| disk.id == prior_id) {
            tracing::debug!("Keeping previously selected installation disk {}", disk.id);
            return Some(disk);
        }
        tracing::debug!(
            "Previously selected installation disk {} is no longer in the inventory",
            prior_id
        );
    }

    disks.first()
}

/// Re-materialize the disk a host already recorded as its installation disk.
///
/// The recorded disk ID takes precedence over the recorded path. A path
/// matches a disk's by-path identifier first, then its `/dev/<name>` path.
pub fn host_installation_disk(host: &Host) -> Result<Disk> {
    let inventory =
        Inventory::from_json(&host.inventory).map_err(|error| ResolveError::InvalidInventory {
            host_id: host.id.to_string(),
            reason: error.to_string(),
        })?;

    let found = if let Some(disk_id) = host.recorded_disk_id() {
        inventory.disks.into_iter().find(|disk| disk.id == disk_id)
    } else if let Some(disk_path) = host.recorded_disk_path() {
        find_by_path(inventory.disks, disk_path)
    } else {
        None
    };

    found.ok_or_else(|| {
        tracing::warn!("Installation disk not found for host {}", host.id);
        ResolveError::NotFound {
            host_id: host.id.to_string(),
        }
    })
}

fn find_by_path(disks: Vec<Disk>, disk_path: &str) -> Option<Disk> {
    let index = disks
        .iter()
        .position(|disk| disk.by_path.as_deref() == Some(disk_path))
        .or_else(|| disks.iter().position(|disk| disk.device_path() == disk_path))?;

    disks.into_iter().nth(index)
}

/// All member disks of a multipath holder, in inventory order
pub fn disks_of_holder<'a>(disks: &'a [Disk], holder: &Disk) -> Vec<&'a Disk> {
    disks.iter().filter(|disk| disk.is_held_by(holder)).collect()
}

/// Member disks of a multipath holder with the given drive type, in inventory order
pub fn disks_of_holder_by_type<'a>(
    disks: &'a [Disk],
    holder: &Disk,
    drive_type: DriveType,
) -> Vec<&'a Disk> {
    disks
        .iter()
        .filter(|disk| disk.is_held_by(holder) && disk.drive_type == drive_type)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const DISK_ID: &str = "/dev/disk/by-id/FirstDisk";
    const OTHER_DISK_ID: &str = "/dev/disk/by-path/SecondDiskId";

    fn disk(id: &str, name: &str) -> Disk {
        Disk {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn member(name: &str, holder: &str, drive_type: DriveType) -> Disk {
        Disk {
            id: format!("/dev/disk/by-id/{name}"),
            name: name.to_string(),
            drive_type,
            holders: Some(holder.to_string()),
            ..Default::default()
        }
    }

    fn host_with(disks: Vec<Disk>, disk_id: Option<&str>, disk_path: Option<&str>) -> Host {
        let mut host = Host::new(Uuid::new_v4());
        host.inventory = serde_json::to_string(&Inventory { disks }).expect("serialize inventory");
        host.installation_disk_id = disk_id.map(str::to_string);
        host.installation_disk_path = disk_path.map(str::to_string);
        host
    }

    #[test]
    fn empty_inventory_selects_nothing() {
        assert!(select_installation_disk(&[], None).is_none());
        assert!(select_installation_disk(&[], Some(DISK_ID)).is_none());
    }

    #[test]
    fn first_disk_is_the_default() {
        let disks = vec![disk(DISK_ID, "FirstDisk"), disk(OTHER_DISK_ID, "SecondDisk")];

        let selected = select_installation_disk(&disks, None).expect("selected disk");
        assert_eq!(selected.id, DISK_ID);

        let selected = select_installation_disk(&disks, Some("")).expect("selected disk");
        assert_eq!(selected.id, DISK_ID);
    }

    #[test]
    fn prior_selection_is_sticky() {
        let disks = vec![disk(OTHER_DISK_ID, "SecondDisk"), disk(DISK_ID, "FirstDisk")];

        let selected = select_installation_disk(&disks, Some(DISK_ID)).expect("selected disk");
        assert_eq!(selected.id, DISK_ID);
    }

    #[test]
    fn missing_prior_selection_falls_back_to_first() {
        let disks = vec![disk(OTHER_DISK_ID, "SecondDisk")];

        let selected = select_installation_disk(&disks, Some(DISK_ID)).expect("selected disk");
        assert_eq!(selected.id, OTHER_DISK_ID);
    }

    #[test]
    fn recorded_id_wins_over_recorded_path() {
        let mut by_path = disk("/dev/disk/by-id/b", "sdb");
        by_path.by_path = Some("/dev/disk/by-path/b".to_string());
        let host = host_with(
            vec![disk("/dev/disk/by-id/a", "sda"), by_path],
            Some("/dev/disk/by-id/a"),
            Some("/dev/disk/by-path/b"),
        );

        let found = host_installation_disk(&host).expect("installation disk");
        assert_eq!(found.name, "sda");
    }

    #[test]
    fn recorded_id_does_not_fall_back_to_path() {
        let host = host_with(
            vec![disk("/dev/disk/by-id/a", "sda")],
            Some("/dev/disk/by-id/gone"),
            Some("/dev/sda"),
        );

        let error = host_installation_disk(&host).expect_err("no disk");
        assert!(matches!(error, ResolveError::NotFound { .. }));
    }

    #[test]
    fn by_path_match_is_preferred_over_device_path() {
        let mut first = disk("/dev/disk/by-id/a", "sda");
        first.by_path = Some("/dev/sdb".to_string());
        let second = disk("/dev/disk/by-id/b", "sdb");
        let host = host_with(vec![second, first], None, Some("/dev/sdb"));

        let found = host_installation_disk(&host).expect("installation disk");
        assert_eq!(found.id, "/dev/disk/by-id/a");
    }

    #[test]
    fn invalid_inventory_is_reported() {
        let mut host = Host::new(Uuid::new_v4());
        host.inventory = "invalid json".to_string();
        host.installation_disk_id = Some(DISK_ID.to_string());

        let error = host_installation_disk(&host).expect_err("invalid inventory");
        assert!(matches!(error, ResolveError::InvalidInventory { .. }));
    }

    #[test]
    fn holder_members_in_inventory_order() {
        let holder1 = Disk {
            name: "dm-0".to_string(),
            drive_type: DriveType::Multipath,
            ..Default::default()
        };
        let holder2 = Disk {
            name: "dm-1".to_string(),
            drive_type: DriveType::Multipath,
            ..Default::default()
        };
        let disks = vec![
            holder1.clone(),
            holder2.clone(),
            member("sda", "dm-0", DriveType::Iscsi),
            member("sdb", "dm-0", DriveType::Iscsi),
            member("sdc", "dm-1", DriveType::Fc),
        ];

        let members: Vec<&str> = disks_of_holder(&disks, &holder1)
            .into_iter()
            .map(|disk| disk.name.as_str())
            .collect();
        assert_eq!(members, vec!["sda", "sdb"]);

        let fc = disks_of_holder_by_type(&disks, &holder2, DriveType::Fc);
        assert_eq!(fc.len(), 1);
        assert_eq!(fc[0].name, "sdc");

        assert!(disks_of_holder_by_type(&disks, &holder1, DriveType::Fc).is_empty());
    }
}
