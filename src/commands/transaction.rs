use crate::services::transaction_service::{CoordinatorState, TransactionCoordinator};
use crate::utils::{shorten_address, Table};

/// Render the history the way the front end lists it, newest first
pub fn render_history(state: &CoordinatorState) -> String {
    if state.transactions.is_empty() {
        return "📋 No transactions yet".to_string();
    }

    let mut table = Table::new(&["From", "To", "Amount", "Keyword", "Message", "Time"]);
    for tx in state.transactions.iter().rev() {
        table.add_row(vec![
            shorten_address(&tx.address_from),
            shorten_address(&tx.address_to),
            format!("{} ETH", tx.amount),
            tx.keyword.clone(),
            tx.message.clone(),
            tx.timestamp.clone(),
        ]);
    }

    format!(
        "📋 Latest transactions ({} total)\n{}",
        state.transactions.len(),
        table.render()
    )
}

pub async fn execute(coordinator: &TransactionCoordinator, args: &[&str]) -> Result<(), String> {
    let refresh = args.first().map(|a| a.eq_ignore_ascii_case("refresh")).unwrap_or(false);
    if refresh {
        coordinator.get_all_transactions().await.map_err(|e| e.to_string())?;
    }

    let state = coordinator.snapshot().await;
    if !state.current_account.is_empty() {
        println!("👛 {}", state.current_account);
    }
    println!("{}", render_history(&state));
    Ok(())
}

pub async fn execute_count(coordinator: &TransactionCoordinator) -> Result<(), String> {
    coordinator
        .check_if_transaction_exists()
        .await
        .map_err(|e| e.to_string())?;

    match coordinator.snapshot().await.transaction_count {
        Some(count) => println!("🧾 {} transactions on the ledger", count),
        None => println!("🧾 Transaction count unknown"),
    }
    Ok(())
}
