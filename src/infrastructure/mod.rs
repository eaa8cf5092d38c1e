//! Infrastructure layer - binders, dispatch registry and network access
//!
//! This layer contains:
//! - Contract and event binders built on the codec layer
//! - The multi-contract decoder registry
//! - Alloy-based network capability

pub mod abi;
pub mod ethereum;

pub use abi::{Contract, Decoder, EventBinding, Events, InterfaceEntry, SharedDecoder};
pub use ethereum::{CallArgs, Web3Api};
