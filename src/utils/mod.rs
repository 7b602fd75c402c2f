pub mod table;
pub mod errors;
pub mod units;

pub use table::Table;
pub use errors::extract_clean_error;

/// Shorten an address for display: `0x5ae...67de`
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }

    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
