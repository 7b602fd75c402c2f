use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod db;
mod host;
mod models;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use commands::App;
use config::Config;
use host::ConsoleHost;
use services::gateway_service::JsonRpcGateway;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("ledger_transfer=info".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    match &config.wallet_rpc_url {
        Some(url) => info!("Using wallet at {}", url),
        None => info!("WALLET_RPC_URL not set, running without a wallet"),
    }
    info!("Contract: {}", config.contract_address);

    let storage: Arc<dyn db::LocalStorage> = match db::init_storage(&config.cache_path) {
        Ok(s) => {
            info!("Local cache at {}", config.cache_path.display());
            s
        }
        Err(e) => {
            warn!("Failed to open local cache, counts will not persist: {}", e);
            Arc::new(db::MemoryStorage::new())
        }
    };

    let app = App {
        gateway: Arc::new(JsonRpcGateway::from_config(&config)),
        storage,
        host: Arc::new(ConsoleHost::new()),
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = commands::handle_command(&app, &args).await {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
