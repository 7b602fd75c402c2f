use crate::models::FormField;
use crate::services::transaction_service::TransactionCoordinator;

const USAGE: &str = "Usage: send <address> <amount> <keyword> <message...>\n\
                     Example: send 0x5aeda56215b167893e80b4fe645ba6d5bab767de 0.0001 coffee thanks for the beans";

pub async fn execute(coordinator: &TransactionCoordinator, args: &[&str]) -> Result<(), String> {
    if args.len() < 4 {
        return Err(USAGE.to_string());
    }

    let address_to = args[0];
    let amount = args[1];
    let message = args[3..].join(" ");
    let values = [address_to, amount, args[2], message.as_str()];

    // The send needs an account to sign from
    if coordinator.snapshot().await.current_account.is_empty() {
        coordinator.connect_wallet().await.map_err(|e| e.to_string())?;
        if coordinator.snapshot().await.current_account.is_empty() {
            return Err("No wallet account connected".to_string());
        }
    }

    for (field, value) in FormField::ALL.into_iter().zip(values) {
        coordinator.handle_change(field, value).await;
    }

    let form = coordinator.snapshot().await.form_data;
    if let Some(field) = FormField::ALL.into_iter().find(|f| form.get(*f).trim().is_empty()) {
        return Err(format!("Missing {}\n{}", field, USAGE));
    }

    println!("⏳ Sending {} ETH to {}...", amount, address_to);
    coordinator.send_transaction().await.map_err(|e| e.to_string())?;
    println!("💸 Transfer recorded");

    Ok(())
}
