pub mod connect;
pub mod help;
pub mod send;
pub mod transaction;

use std::sync::Arc;

use tracing::{info, warn};

use crate::db::LocalStorage;
use crate::host::{ConsoleHost, Host};
use crate::services::gateway_service::WalletGateway;
use crate::services::transaction_service::TransactionCoordinator;
use crate::utils::extract_clean_error;

/// Everything needed to (re)build a coordinator
pub struct App {
    pub gateway: Arc<dyn WalletGateway>,
    pub storage: Arc<dyn LocalStorage>,
    pub host: Arc<ConsoleHost>,
}

impl App {
    async fn start(&self, startup_checks: bool) -> TransactionCoordinator {
        start_coordinator(
            self.gateway.clone(),
            self.storage.clone(),
            self.host.clone(),
            startup_checks,
        )
        .await
    }
}

/// Commands that ask the wallet for an account themselves
fn prompts_for_wallet(command: &str) -> bool {
    matches!(command, "connect" | "send" | "transfer")
}

/// Build a coordinator, optionally running its startup sequence
async fn start_coordinator(
    gateway: Arc<dyn WalletGateway>,
    storage: Arc<dyn LocalStorage>,
    host: Arc<dyn Host>,
    startup_checks: bool,
) -> TransactionCoordinator {
    let coordinator = TransactionCoordinator::new(gateway, storage, host);

    // Startup failures are logged and the front end stays usable
    if startup_checks {
        if let Err(e) = coordinator.initialize().await {
            warn!("Startup checks failed: {}", e);
        }
    }
    coordinator
}

pub async fn handle_command(app: &App, args: &[String]) -> Result<(), String> {
    let parts: Vec<&str> = args.iter().map(String::as_str).collect();
    let (command, args) = match parts.split_first() {
        Some((command, args)) => (*command, args),
        None => ("help", &[][..]),
    };

    if matches!(command, "help" | "--help" | "-h") {
        return help::execute();
    }

    let coordinator = app.start(!prompts_for_wallet(command)).await;

    let result = match command {
        "connect" => connect::execute(&coordinator).await,
        "send" | "transfer" => send::execute(&coordinator, args).await,
        "history" | "tx" => transaction::execute(&coordinator, args).await,
        "count" => transaction::execute_count(&coordinator).await,
        other => Err(format!("Unknown command '{}'. Run `help` for usage.", other)),
    };

    if let Err(e) = result {
        eprintln!("❌ Error executing command {}: {}", command, e);
        return Err(extract_clean_error(&e));
    }

    // A reload tears the coordinator down and starts over from the ledger
    while app.host.take_reload() {
        info!("Reloading state from the ledger");
        let coordinator = app.start(true).await;
        let state = coordinator.snapshot().await;
        println!("{}", transaction::render_history(&state));
    }

    Ok(())
}
