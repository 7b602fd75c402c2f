//! Transaction models

use chrono::{Local, TimeZone};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::utils::units::format_ether;

/// A ledger entry exactly as the contract returns it
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    pub sender: String,
    pub receiver: String,
    pub amount: U256,
    pub message: String,
    pub timestamp: U256,
    pub keyword: String,
}

/// Display projection of a ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub address_to: String,
    pub address_from: String,
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    pub amount: f64,
}

impl From<&RawTransaction> for TransactionRecord {
    fn from(raw: &RawTransaction) -> Self {
        TransactionRecord {
            address_to: raw.receiver.clone(),
            address_from: raw.sender.clone(),
            timestamp: format_timestamp(raw.timestamp),
            message: raw.message.clone(),
            keyword: raw.keyword.clone(),
            amount: format_ether(raw.amount),
        }
    }
}

/// Render epoch seconds as a local date time, e.g. "11/14/2023, 10:13:20 PM"
pub fn format_timestamp(seconds: U256) -> String {
    let millis = if seconds > U256::from(i64::MAX as u64 / 1000) {
        None
    } else {
        Some(seconds.low_u64() as i64 * 1000)
    };

    millis
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection() {
        let raw = RawTransaction {
            sender: "0xaaa".to_string(),
            receiver: "0xbbb".to_string(),
            amount: U256::from_dec_str("2500000000000000000").unwrap(),
            message: "m".to_string(),
            timestamp: U256::from(1_700_000_000u64),
            keyword: "k".to_string(),
        };

        let record = TransactionRecord::from(&raw);
        assert_eq!(record.amount, 2.5);
        assert_eq!(record.address_from, "0xaaa");
        assert_eq!(record.address_to, "0xbbb");
        assert_eq!(record.message, "m");
        assert_eq!(record.keyword, "k");

        let expected = Local
            .timestamp_millis_opt(1_700_000_000_000)
            .single()
            .unwrap()
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string();
        assert_eq!(record.timestamp, expected);
        assert!(record.timestamp.contains("2023"));
    }

    #[test]
    fn test_projection_amount_is_a_single_division() {
        let raw = RawTransaction {
            sender: "0xaaa".to_string(),
            receiver: "0xbbb".to_string(),
            amount: U256::from_dec_str("1140000000000000000").unwrap(),
            message: String::new(),
            timestamp: U256::from(1_700_000_000u64),
            keyword: String::new(),
        };

        let record = TransactionRecord::from(&raw);
        assert_eq!(record.amount, 1.14);
        assert_eq!(record.amount, "1140000000000000000".parse::<f64>().unwrap() / 1e18);
    }

    #[test]
    fn test_timestamp_out_of_range() {
        assert_eq!(format_timestamp(U256::MAX), "Invalid Date");
    }
}
