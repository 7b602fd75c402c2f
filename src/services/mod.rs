pub mod gateway_service;
pub mod transaction_service;
