//! Solidity ABI codec for the transactions contract
//!
//! Only the shapes the contract uses are supported: static words (address,
//! uint256), dynamic strings, and a dynamic array of the transfer tuple
//! `(address sender, address receiver, uint256 amount, string message,
//! uint256 timestamp, string keyword)`.

use primitive_types::U256;
use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::models::RawTransaction;

const WORD: usize = 32;

pub const ADD_TO_BLOCKCHAIN: &str = "addToBlockchain(address,uint256,string,string)";
pub const GET_ALL_TRANSACTIONS: &str = "getAllTransactions()";
pub const GET_TRANSACTION_COUNT: &str = "getTransactionCount()";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AbiError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid hex data: {0}")]
    InvalidHex(String),
    #[error("Read past end of data at offset {offset} (len {len})")]
    OutOfBounds { offset: usize, len: usize },
    #[error("Offset or length too large: {0}")]
    Overflow(U256),
    #[error("String is not valid UTF-8")]
    InvalidUtf8,
}

/// First four bytes of the Keccak-256 hash of a function signature
pub fn selector(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    let hash = hasher.finalize();
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Parse a `0x`-prefixed 20-byte address
pub fn parse_address(address: &str) -> Result<[u8; 20], AbiError> {
    let stripped = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let bytes = hex::decode(stripped).map_err(|_| AbiError::InvalidAddress(address.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| AbiError::InvalidAddress(address.to_string()))
}

pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn from_hex_data(data: &str) -> Result<Vec<u8>, AbiError> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|e| AbiError::InvalidHex(e.to_string()))
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn address_word(address: &[u8; 20]) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address);
    word
}

fn encode_string(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let padded = (bytes.len() + WORD - 1) / WORD * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&uint_word(U256::from(bytes.len())));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded, 0);
    out
}

/// Calldata for a function taking no arguments
pub fn encode_call(signature: &str) -> Vec<u8> {
    selector(signature).to_vec()
}

/// Calldata for `addToBlockchain(receiver, amount, message, keyword)`
pub fn encode_add_to_blockchain(
    receiver: &[u8; 20],
    amount: U256,
    message: &str,
    keyword: &str,
) -> Vec<u8> {
    let message_tail = encode_string(message);
    let keyword_tail = encode_string(keyword);
    let head_len = 4 * WORD;

    let mut out = selector(ADD_TO_BLOCKCHAIN).to_vec();
    out.extend_from_slice(&address_word(receiver));
    out.extend_from_slice(&uint_word(amount));
    out.extend_from_slice(&uint_word(U256::from(head_len)));
    out.extend_from_slice(&uint_word(U256::from(head_len + message_tail.len())));
    out.extend_from_slice(&message_tail);
    out.extend_from_slice(&keyword_tail);
    out
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    offset
        .checked_add(WORD)
        .and_then(|end| data.get(offset..end))
        .ok_or(AbiError::OutOfBounds {
            offset,
            len: data.len(),
        })
}

fn read_uint(data: &[u8], offset: usize) -> Result<U256, AbiError> {
    Ok(U256::from_big_endian(read_word(data, offset)?))
}

/// Offsets and lengths can never point past the payload
fn read_usize(data: &[u8], offset: usize) -> Result<usize, AbiError> {
    let value = read_uint(data, offset)?;
    if value > U256::from(data.len()) {
        return Err(AbiError::Overflow(value));
    }
    Ok(value.as_usize())
}

fn read_address(data: &[u8], offset: usize) -> Result<String, AbiError> {
    let word = read_word(data, offset)?;
    Ok(to_hex_data(&word[12..]))
}

fn read_string(data: &[u8], offset: usize) -> Result<String, AbiError> {
    let len = read_usize(data, offset)?;
    let start = offset + WORD;
    let bytes = start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or(AbiError::OutOfBounds {
            offset: start,
            len: data.len(),
        })?;
    String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

/// Decode a single `uint256` return value
pub fn decode_uint256(data: &[u8]) -> Result<U256, AbiError> {
    read_uint(data, 0)
}

/// Decode the `TransferStruct[]` returned by `getAllTransactions()`
pub fn decode_transactions(data: &[u8]) -> Result<Vec<RawTransaction>, AbiError> {
    let array_offset = read_usize(data, 0)?;
    let count = read_usize(data, array_offset)?;
    let base = array_offset + WORD;

    // Each entry needs at least its head offset word
    let mut transactions = Vec::with_capacity(count.min(data.len().saturating_sub(base) / WORD));
    for i in 0..count {
        let tuple = base + read_usize(data, base + i * WORD)?;

        let message_offset = read_usize(data, tuple + 3 * WORD)?;
        let keyword_offset = read_usize(data, tuple + 5 * WORD)?;

        transactions.push(RawTransaction {
            sender: read_address(data, tuple)?,
            receiver: read_address(data, tuple + WORD)?,
            amount: read_uint(data, tuple + 2 * WORD)?,
            message: read_string(data, tuple + message_offset)?,
            timestamp: read_uint(data, tuple + 4 * WORD)?,
            keyword: read_string(data, tuple + keyword_offset)?,
        });
    }

    Ok(transactions)
}
