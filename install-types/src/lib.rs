// SPDX-License-Identifier: GPL-3.0-only

//! Canonical models for host installation config resolution
//!
//! These types mirror the records an installation orchestrator keeps for the
//! nodes it provisions. They are read-only inputs to the resolver:
//!
//! - **install-resolver**: picks installation disks and ignition endpoints from them
//! - **install-cli**: deserializes them from JSON documents on disk
//!
//! ## Layout
//!
//! - `Disk` / `Inventory` → hardware inventory as reported by the node agent
//! - `Host` → a node being installed, including its raw inventory document
//! - `Cluster` → the target cluster and its ignition endpoint customizations
//! - `DiskEncryption` → which roles get disk encryption

pub mod cluster;
pub mod disk;
pub mod encryption;
pub mod host;

pub use cluster::Cluster;
pub use disk::{Disk, DriveType, Inventory};
pub use encryption::{DiskEncryption, DiskEncryptionEnableOn, EnabledRoles};
pub use host::{Host, HostRole};
