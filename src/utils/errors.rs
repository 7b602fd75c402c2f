/// Extract clean error message from wallet/node error strings
///
/// Removes technical prefixes like:
/// "VM Exception while processing transaction: revert Insufficient balance"
/// "execution reverted: Insufficient balance"
///
/// Returns only the meaningful error message:
/// "Insufficient balance"
pub fn extract_clean_error(error_msg: &str) -> String {
    const PREFIXES: [&str; 3] = [
        "VM Exception while processing transaction: revert ",
        "execution reverted: ",
        "MetaMask Tx Signature: ",
    ];

    for prefix in PREFIXES {
        if let Some(pos) = error_msg.find(prefix) {
            let rest = error_msg[pos + prefix.len()..].trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }

    error_msg.trim().to_string()
}
