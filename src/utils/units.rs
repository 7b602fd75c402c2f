use primitive_types::U256;
use thiserror::Error;

/// Decimal places of the native coin
pub const ETHER_DECIMALS: usize = 18;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Invalid amount: {0}")]
    Invalid(String),
    #[error("Too many decimal places (max 18): {0}")]
    TooPrecise(String),
    #[error("Amount does not fit in 256 bits: {0}")]
    Overflow(String),
}

/// Convert a decimal ether string ("1.0", "0.0005", ".5") to wei
pub fn parse_ether(amount: &str) -> Result<U256, AmountError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Invalid(amount.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountError::Invalid(amount.to_string()));
    }

    // Trailing zeros never add precision
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > ETHER_DECIMALS {
        return Err(AmountError::TooPrecise(amount.to_string()));
    }

    let digits = format!(
        "{}{}{}",
        whole,
        fraction,
        "0".repeat(ETHER_DECIMALS - fraction.len())
    );
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }

    U256::from_dec_str(digits).map_err(|_| AmountError::Overflow(amount.to_string()))
}

/// Convert wei to a floating point ether value for display, as one division
pub fn format_ether(wei: U256) -> f64 {
    wei.to_string().parse::<f64>().unwrap_or(f64::INFINITY) / 1e18
}

/// Hex quantity as JSON-RPC expects it: `0x` prefix, no leading zeros
pub fn to_quantity(value: U256) -> String {
    if value.is_zero() {
        return "0x0".to_string();
    }
    format!("0x{:x}", value)
}

/// Parse a JSON-RPC hex quantity
pub fn from_quantity(quantity: &str) -> Option<U256> {
    let digits = quantity.strip_prefix("0x").unwrap_or(quantity);
    if digits.is_empty() {
        return Some(U256::zero());
    }
    U256::from_str_radix(digits, 16).ok()
}
