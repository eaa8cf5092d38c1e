//! Canonical signatures, selectors and event topic hashes

use alloy_primitives::{keccak256, Selector, B256};

use super::{AbiItem, Param, TypeKind};
use crate::error::Result;

/// Canonical type of a single parameter, tuples expanded
pub fn param_type(param: &Param) -> Result<String> {
    Ok(TypeKind::from_param(param)?.to_string())
}

/// Canonical signature `name(type1,type2,...)` of a function or event
pub fn signature(item: &AbiItem) -> Result<String> {
    let types = item
        .inputs
        .iter()
        .map(param_type)
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{}({})", item.display_name(), types.join(",")))
}

/// Full 32-byte Keccak-256 hash of the canonical signature (event topic zero)
pub fn ev_sig_hash(item: &AbiItem) -> Result<B256> {
    Ok(keccak256(signature(item)?.as_bytes()))
}

/// First four bytes of the signature hash (function selector)
pub fn fn_sig_hash(item: &AbiItem) -> Result<Selector> {
    Ok(selector_of(&signature(item)?))
}

/// Selector of an already canonical signature string
pub fn selector_of(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::from_slice(&hash[..4])
}
