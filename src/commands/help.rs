pub fn execute() -> Result<(), String> {
    println!("📖 ledger-transfer commands");
    println!();
    println!("🎯 General");
    println!("  help                                   Show this help message");
    println!();
    println!("👛 Wallet");
    println!("  connect                                Ask the wallet to authorize this client");
    println!();
    println!("💸 Transactions");
    println!("  send <address> <amount> <keyword> <message...>");
    println!("                                         Send coins and record them on the ledger");
    println!("  history                                Show every transaction on the ledger");
    println!("  count                                  Show the cached and on-ledger transaction count");
    println!();
    println!("⚙️  Configuration (.env)");
    println!("  WALLET_RPC_URL, CONTRACT_ADDRESS, CACHE_PATH, RECEIPT_POLL_MS");
    Ok(())
}
