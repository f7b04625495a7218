// SPDX-License-Identifier: GPL-3.0-only

//! CLI wrapper around install-resolver for scripting and manual checks

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use install_resolver::{
    ConnectivityCheckStep, EndpointResolver, EndpointSettings, host_installation_disk,
    is_disk_encryption_enabled_for_role, is_role_valid, select_installation_disk,
};
use install_types::{Cluster, DiskEncryptionEnableOn, Host, HostRole, Inventory};
use serde::de::DeserializeOwned;

/// Resolve installation disks and ignition endpoints from host and cluster records
#[derive(Parser)]
#[command(name = "install-resolve")]
#[command(about = "Resolve host installation config", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick the installation disk from an inventory document
    SelectDisk {
        /// Inventory JSON file
        inventory: PathBuf,
        /// ID of the previously selected disk
        #[arg(long)]
        prior: Option<String>,
    },
    /// Look up the installation disk recorded on a host
    InstallationDisk {
        /// Host JSON file
        host: PathBuf,
    },
    /// Resolve the ignition endpoint and CA bundle of a host
    Endpoint {
        /// Cluster JSON file
        cluster: PathBuf,
        /// Host JSON file
        host: PathBuf,
        /// Endpoint settings TOML file
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Print the API VIP connectivity check arguments for a host
    ConnectivityArgs {
        /// Cluster JSON file
        cluster: PathBuf,
        /// Host JSON file
        host: PathBuf,
        /// Endpoint settings TOML file
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Check whether disk encryption applies to a role
    Encryption {
        /// Policy: all, none, or a comma list of masters, arbiters, workers
        enable_on: DiskEncryptionEnableOn,
        /// Host role
        role: HostRole,
    },
    /// Check whether a role may be requested for a host
    RoleValid {
        /// Host role
        role: HostRole,
        /// The host joins an already installed cluster
        #[arg(long)]
        day2: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::SelectDisk { inventory, prior } => {
            let raw = read_file(&inventory)?;
            let inventory = Inventory::from_json(&raw)
                .with_context(|| format!("parse inventory {}", inventory.display()))?;
            let selected = select_installation_disk(&inventory.disks, prior.as_deref());
            println!("{}", serde_json::to_string(&selected)?);
        }
        Commands::InstallationDisk { host } => {
            let host: Host = read_json(&host)?;
            let disk = host_installation_disk(&host)?;
            println!("{}", serde_json::to_string(&disk)?);
        }
        Commands::Endpoint {
            cluster,
            host,
            settings,
        } => {
            let cluster: Cluster = read_json(&cluster)?;
            let host: Host = read_json(&host)?;
            let resolver = resolver(settings.as_deref())?;
            let endpoint = resolver.resolve(&cluster, &host)?;
            println!("{}", serde_json::to_string(&endpoint)?);
        }
        Commands::ConnectivityArgs {
            cluster,
            host,
            settings,
        } => {
            let cluster: Cluster = read_json(&cluster)?;
            let mut host: Host = read_json(&host)?;
            if host.cluster_id.is_none() {
                tracing::debug!("Host {} has no cluster, assuming {}", host.id, cluster.id);
                host.cluster_id = Some(cluster.id);
            }

            let step = ConnectivityCheckStep::with_resolver(
                HashMap::from([(cluster.id, cluster)]),
                resolver(settings.as_deref())?,
            );
            println!("{}", step.build(&host)?);
        }
        Commands::Encryption { enable_on, role } => {
            let enabled = is_disk_encryption_enabled_for_role(enable_on, role);
            println!("{}", serde_json::json!({ "enabled": enabled }));
        }
        Commands::RoleValid { role, day2 } => {
            let valid = is_role_valid(role, day2);
            println!("{}", serde_json::json!({ "valid": valid }));
        }
    }

    Ok(())
}

fn resolver(settings: Option<&Path>) -> Result<EndpointResolver> {
    let Some(path) = settings else {
        return Ok(EndpointResolver::new());
    };

    let raw = read_file(path)?;
    let settings = EndpointSettings::from_toml_str(&raw)
        .with_context(|| format!("load settings {}", path.display()))?;
    Ok(EndpointResolver::with_settings(settings))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_file(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}
