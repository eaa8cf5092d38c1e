//! Contract ABI codec and multi-contract dispatch
//!
//! Layers, leaves first:
//! - [`codec`]: type-descriptor compiler and head/tail binary layout
//! - [`domain::abi`]: descriptors, values, signatures and strategy traits
//! - [`infrastructure::abi`]: contract/event binders and the dispatch registry
//! - [`infrastructure::ethereum`]: network capability for bound calls
//! - [`config`]: TOML-driven contract pre-registration

pub mod builtin;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use codec::{compile, compile_type, Codec};
pub use domain::abi::{
    ev_sig_hash, fn_sig_hash, signature, AbiItem, ContractInfo, DecodeOutcome, Hint,
    HintOptions, Interface, Param, SignatureInfo, Value,
};
pub use error::{AbiError, Result};
pub use infrastructure::abi::{
    Contract, Decoder, EventBinding, Events, InterfaceEntry, SharedDecoder, TopicValues,
};
pub use infrastructure::ethereum::{CallArgs, Web3Api};
