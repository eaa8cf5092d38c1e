//! ABI domain models and contracts
//!
//! This module defines descriptors, values, signatures and the strategy
//! traits used by the dispatch registry, independent of the codec engine.

mod decoder;
mod descriptor;
mod kind;
pub mod signature;
mod value;

pub use decoder::{
    CallDecoder, CallHook, ContractInfo, DecodeOutcome, Hint, HintOptions, SignatureInfo,
    TokenStandard,
};
pub use descriptor::{AbiItem, Interface, ItemKind, Param};
pub use kind::{Field, TypeKind};
pub use signature::{ev_sig_hash, fn_sig_hash, selector_of, signature};
pub use value::Value;
