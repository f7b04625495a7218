//! Inventory disk models
//!
//! A `Disk` is an immutable snapshot of one block device as reported by the
//! node's hardware inventory. The order of `Inventory::disks` is the host's own
//! enumeration order and is preserved by parsing.

use serde::{Deserialize, Serialize};

/// Kind of drive backing a disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DriveType {
    #[serde(rename = "HDD")]
    Hdd,
    #[serde(rename = "FDD")]
    Fdd,
    #[serde(rename = "ODD")]
    Odd,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "virtual")]
    Virtual,
    #[serde(rename = "Multipath")]
    Multipath,
    #[serde(rename = "iSCSI")]
    Iscsi,
    #[serde(rename = "FC")]
    Fc,
    #[serde(rename = "LVM")]
    Lvm,
    #[serde(rename = "RAID")]
    Raid,
    #[serde(rename = "ECKD")]
    Eckd,
    #[serde(rename = "ECKD (ESE)")]
    EckdEse,
    #[serde(rename = "FBA")]
    Fba,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One storage device from a host inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Disk {
    // === Identity ===
    /// Stable identifier, usually a by-id path (e.g., "/dev/disk/by-id/wwn-0x5000c500")
    pub id: String,

    /// Kernel device name (e.g., "sda", "dm-0")
    pub name: String,

    /// by-path identifier (e.g., "/dev/disk/by-path/pci-0000:00:1f.2-ata-1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_path: Option<String>,

    /// OS device path as reported by the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    // === Physical Properties ===
    #[serde(default)]
    pub drive_type: DriveType,

    #[serde(default)]
    pub size_bytes: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    // === Multipath ===
    /// Name of the holder device this disk is a member of (e.g., "dm-0")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holders: Option<String>,
}

impl Disk {
    /// Device path constructed from the kernel name
    pub fn device_path(&self) -> String {
        format!("/dev/{}", self.name)
    }

    pub fn is_multipath_member(&self) -> bool {
        self.holders.as_deref().is_some_and(|holder| !holder.is_empty())
    }

    /// Whether this disk is a member of `holder`
    pub fn is_held_by(&self, holder: &Disk) -> bool {
        self.holders.as_deref() == Some(holder.name.as_str())
    }
}

/// Hardware inventory subset relevant to disk selection
///
/// Only the `disks` array is read; every other inventory field is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Inventory {
    #[serde(default)]
    pub disks: Vec<Disk>,
}

impl Inventory {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_keeps_disk_order_and_ignores_unknown_fields() {
        let raw = r#"{
            "hostname": "node-0",
            "cpu": {"count": 8},
            "disks": [
                {"id": "/dev/disk/by-id/b", "name": "sdb", "drive_type": "SSD"},
                {"id": "/dev/disk/by-id/a", "name": "sda", "drive_type": "HDD", "size_bytes": 1024}
            ]
        }"#;

        let inventory = Inventory::from_json(raw).expect("parse inventory");

        assert_eq!(inventory.disks.len(), 2);
        assert_eq!(inventory.disks[0].name, "sdb");
        assert_eq!(inventory.disks[1].name, "sda");
        assert_eq!(inventory.disks[1].size_bytes, 1024);
        assert_eq!(inventory.disks[0].drive_type, DriveType::Ssd);
    }

    #[test]
    fn missing_disks_array_is_an_empty_inventory() {
        let inventory = Inventory::from_json("{}").expect("parse inventory");
        assert!(inventory.disks.is_empty());
    }

    #[test]
    fn unrecognized_drive_type_is_unknown() {
        let disk: Disk =
            serde_json::from_str(r#"{"id": "x", "name": "nvme0n1", "drive_type": "Optane"}"#)
                .expect("parse disk");
        assert_eq!(disk.drive_type, DriveType::Unknown);
    }

    #[test]
    fn multipath_drive_type_tokens() {
        let disk: Disk = serde_json::from_str(
            r#"{"id": "x", "name": "sda", "drive_type": "iSCSI", "holders": "dm-0"}"#,
        )
        .expect("parse disk");
        assert_eq!(disk.drive_type, DriveType::Iscsi);
        assert!(disk.is_multipath_member());

        let holder = Disk {
            name: "dm-0".to_string(),
            drive_type: DriveType::Multipath,
            ..Default::default()
        };
        assert!(disk.is_held_by(&holder));
    }

    #[test]
    fn device_path_uses_kernel_name() {
        let disk = Disk {
            id: "/dev/disk/by-id/x".to_string(),
            name: "vda".to_string(),
            ..Default::default()
        };
        assert_eq!(disk.device_path(), "/dev/vda");
        assert!(!disk.is_multipath_member());
    }
}
