// src/main.rs

//! # MyID - Command Line Entry Point
//!
//! Read-only queries against the configured registry and ledger.
//!
//! ## Usage
//! - `myid did <did>`: resolve a DID document from the registry
//! - `myid vc <signature>`: read a credential's registry state from the ledger
//! - `myid valid <signature>`: ask the ledger whether a credential is valid
//!
//! Settings come from `myid.toml` and `MYID_*` variables, see [`Settings`].

use anyhow::{bail, Context};
use log::info;
use myid_sdk::blockchain::json_rpc_client::JsonRpcLedgerClient;
use myid_sdk::services::http_transport::ReqwestTransport;
use myid_sdk::utils::logging;
use myid_sdk::{CredentialService, RegistryClient, Settings};
use std::sync::Arc;

const USAGE: &str = "usage: myid <did|vc|valid> <argument>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    logging::init(&settings);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, argument) = match args.as_slice() {
        [command, argument] => (command.as_str(), argument.as_str()),
        _ => bail!(USAGE),
    };

    match command {
        "did" => {
            let transport = Arc::new(ReqwestTransport::new(settings.http_timeout())?);
            let registry = RegistryClient::new(settings.registry_url.clone(), transport);
            info!("resolving {} at {}", argument, registry.url());
            match registry.get_did(argument).await? {
                Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
                None => bail!("{} is not registered", argument),
            }
        }
        "vc" | "valid" => {
            let ledger = Arc::new(
                JsonRpcLedgerClient::new(settings.ledger_url.clone(), settings.http_timeout())
                    .context("failed to build ledger client")?,
            );
            let service = CredentialService::from_settings(ledger, &settings);
            if command == "vc" {
                match service.get(argument).await? {
                    Some(info) => println!("{}", serde_json::to_string_pretty(&info.to_json())?),
                    None => bail!("no credential with signature {}", argument),
                }
            } else {
                println!("{}", service.is_valid(argument).await?);
            }
        }
        _ => bail!(USAGE),
    }

    Ok(())
}
