//! Data models shared by the gateway, the coordinator and the CLI
//!
//! Raw ledger entries come from the contract codec; records are what the
//! front end displays.

pub mod form;
pub mod transaction;

pub use form::{FormData, FormField};
pub use transaction::{RawTransaction, TransactionRecord};
