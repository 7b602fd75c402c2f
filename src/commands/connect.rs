use crate::services::transaction_service::TransactionCoordinator;

pub async fn execute(coordinator: &TransactionCoordinator) -> Result<(), String> {
    coordinator.connect_wallet().await.map_err(|e| e.to_string())?;

    let state = coordinator.snapshot().await;
    if state.current_account.is_empty() {
        println!("👛 No account connected");
    } else {
        println!("👛 Connected: {}", state.current_account);
    }
    Ok(())
}
