// Path: crates/client/src/intents/address.rs
//! Account address input validation.

use ballot_types::Address;
use std::str::FromStr;

/// Parses a `0x`-prefixed, 40-digit hex address.
///
/// All-lowercase and all-uppercase input is accepted as is. Mixed-case input
/// must carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Option<Address> {
    let s = input.trim();
    let digits = s.strip_prefix("0x")?;
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(s, None).ok()
    } else {
        Address::from_str(s).ok()
    }
}

/// Splits newline-separated input and keeps every line that parses as an
/// address, in input order. Blank and malformed lines are dropped.
pub fn parse_address_list(input: &str) -> Vec<Address> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_address)
        .collect()
}
