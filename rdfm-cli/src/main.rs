use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use itertools::Itertools;
use rdfm_core::reqwest_helpers::create_client;
use rdfm_core::{DeviceResources, ResourceAccessor};
use rdfm_domain::{PendingDevice, RegisteredDevice, RequestOutput};
use tracing::{event, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli_args::{Cli, Commands};

mod cli_args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Cli::parse();
    let cfg = args.client_configuration();

    let endpoints = cfg.endpoints()?;
    let client = create_client(cfg.access_token.clone())?;
    let resources = DeviceResources::new(client, &endpoints);

    event!(Level::DEBUG, "Using management server at {}", cfg.server_url);

    match args.command {
        Commands::ListPending => {
            let outcome = resources.pending.fetch_resources().await.context("Failed to fetch pending devices")?;
            if !outcome.success {
                bail!("Fetching pending devices failed. Got a response code of {}", outcome.code);
            }
            for device in resources.pending_devices().await {
                println!("{}", format_pending_device(&device));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::ListRegistered => {
            let outcome = resources.registered.fetch_resources().await.context("Failed to fetch registered devices")?;
            if !outcome.success {
                bail!("Fetching registered devices failed. Got a response code of {}", outcome.code);
            }
            for device in resources.registered_devices().await {
                println!("{}", format_registered_device(&device));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Register { mac_address, public_key } => {
            match resources.registration().register_device(&mac_address, &public_key).await? {
                RequestOutput::Success => {
                    println!("Device {} registered", mac_address);
                    Ok(ExitCode::SUCCESS)
                }
                RequestOutput::Failure { message } => {
                    eprintln!("{}", message);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn format_pending_device(device: &PendingDevice) -> String {
    let last_appeared = device
        .last_appeared
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    let metadata = device
        .metadata
        .iter()
        .sorted()
        .map(|(k, v)| format!("{k}={v}"))
        .join(", ");

    format!("{}\t{}\t{}\t{}", device.mac_address, last_appeared, metadata, device.public_key)
}

fn format_registered_device(device: &RegisteredDevice) -> String {
    let last_access = device
        .last_access
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    let groups = device.groups.iter().join(",");

    format!("{}\t{}\t{}\t{}\tgroups: [{}]", device.id, device.name, device.mac_address, last_access, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_pending_device_sorts_metadata() {
        let device = PendingDevice {
            mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
            public_key: "ssh-ed25519 AAAA".to_string(),
            metadata: HashMap::from([("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]),
            last_appeared: None,
        };

        assert_eq!(format_pending_device(&device), "AA:BB:CC:DD:EE:FF\t-\ta=1, b=2\tssh-ed25519 AAAA");
    }

    #[test]
    fn test_format_registered_device() {
        let device = RegisteredDevice {
            id: 3,
            name: "board".to_string(),
            mac_address: "11:22:33:44:55:66".to_string(),
            public_key: None,
            last_access: None,
            capabilities: HashMap::new(),
            metadata: HashMap::new(),
            groups: vec![1, 4],
        };

        assert_eq!(format_registered_device(&device), "3\tboard\t11:22:33:44:55:66\t-\tgroups: [1,4]");
    }
}
