//! Hex and fixed-point helpers

use alloy_primitives::U256;

use crate::error::{AbiError, Result};

/// Default token precision (wei per ether)
pub const PRECISION: u32 = 18;

/// Prepend `0x` unless the string already carries it (any case)
pub fn add_0x(hex: &str) -> String {
    if has_0x(hex) {
        hex.to_string()
    } else {
        format!("0x{}", hex)
    }
}

/// Strip a leading `0x`/`0X`
pub fn strip_0x(hex: &str) -> &str {
    if has_0x(hex) {
        &hex[2..]
    } else {
        hex
    }
}

fn has_0x(hex: &str) -> bool {
    hex.len() >= 2 && hex.as_bytes()[0] == b'0' && (hex.as_bytes()[1] | 0x20) == b'x'
}

/// Registry key for a contract address: no prefix, lowercase
pub fn normalize_address(address: &str) -> String {
    strip_0x(address.trim()).to_lowercase()
}

/// Decode hex with or without the `0x` prefix
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(strip_0x(input.trim()))?)
}

/// Encode bytes as `0x`-prefixed lowercase hex
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Render an integer amount with `decimals` fractional digits, trailing zeros trimmed
pub fn format_units(value: U256, decimals: u32) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let unit = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / unit;
    let frac = value % unit;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Parse a decimal amount such as `1.5` into an integer with `decimals` fractional digits
pub fn parse_units(input: &str, decimals: u32) -> Result<U256> {
    let invalid = |reason: &str| AbiError::validation(input, reason);
    let input_trimmed = input.trim();
    let (whole, frac) = match input_trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input_trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("empty amount"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }
    if frac.len() > decimals as usize {
        return Err(invalid("too many fractional digits"));
    }

    let unit = U256::from(10u64).pow(U256::from(decimals));
    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        whole.parse::<U256>().map_err(|_| invalid("amount overflows uint256"))?
    };
    let frac = if frac.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse::<U256>().map_err(|_| invalid("amount overflows uint256"))?
    };

    whole
        .checked_mul(unit)
        .and_then(|scaled| scaled.checked_add(frac))
        .ok_or_else(|| invalid("amount overflows uint256"))
}
