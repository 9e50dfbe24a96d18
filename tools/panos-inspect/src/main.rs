//! PAN-OS inspector
//!
//! Connects to a firewall and prints ethernet interface configuration:
//! - `panos-inspect info`: device version and system info
//! - `panos-inspect list [--running]`: interface names
//! - `panos-inspect show NAME [--running]`: one interface
//!
//! Connection settings come from `PANOS_*` environment variables, with
//! `PANOS_JSON_CONFIG` naming an optional credentials file for anything
//! left unset.

use anyhow::{Context, Result, bail};
use panos_client::{ClientConfig, XapiClient};
use panos_client::netw::Network;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

enum Command {
    Info,
    List { running: bool },
    Show { name: String, running: bool },
}

fn parse_args(args: &[String]) -> Result<Command> {
    let running = args.iter().any(|a| a == "--running");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();
    match positional.as_slice() {
        [] => Ok(Command::List { running }),
        [cmd] if cmd.as_str() == "info" => Ok(Command::Info),
        [cmd] if cmd.as_str() == "list" => Ok(Command::List { running }),
        [cmd, name] if cmd.as_str() == "show" => Ok(Command::Show {
            name: name.to_string(),
            running,
        }),
        _ => bail!("usage: panos-inspect [info | list [--running] | show NAME [--running]]"),
    }
}

fn load_config() -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("reading PANOS_* environment")?;
    if let Ok(path) = env::var("PANOS_JSON_CONFIG") {
        config
            .merge_json_file(&path)
            .with_context(|| format!("loading credentials from {}", path))?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_args(&args)?;
    let config = load_config()?;

    info!("Configuration:");
    info!("  Hostname: {}", config.hostname);
    info!("  Protocol: {}", config.protocol.scheme());

    let client = XapiClient::connect(config).await.context("connecting to firewall")?;

    if let Command::Info = command {
        let mut fields: Vec<_> = client.system_info().iter().collect();
        fields.sort();
        for (key, value) in fields {
            println!("{}: {}", key, value);
        }
        return Ok(());
    }

    let network = Network::new(Arc::new(client));
    let eth = &network.ethernet_interface;
    match command {
        Command::List { running } => {
            let names = if running { eth.show_list().await? } else { eth.get_list().await? };
            for name in names {
                println!("{}", name);
            }
        }
        Command::Show { name, running } => {
            let entry = if running { eth.show(&name).await? } else { eth.get(&name).await? };
            println!("{:#?}", entry);
        }
        Command::Info => {}
    }

    Ok(())
}
