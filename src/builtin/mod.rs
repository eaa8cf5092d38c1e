//! Built-in interfaces for well-known token standards

mod erc20;

pub use erc20::{erc20, erc20_abi};

use crate::domain::abi::TokenStandard;
use crate::infrastructure::abi::InterfaceEntry;

/// Annotated interface for a token standard
///
/// ERC-721 contracts carry metadata for hints only; their interface has to
/// come from an ABI file.
pub fn interface(standard: TokenStandard) -> Option<Vec<InterfaceEntry>> {
    match standard {
        TokenStandard::Erc20 => Some(erc20()),
        TokenStandard::Erc721 => None,
    }
}
