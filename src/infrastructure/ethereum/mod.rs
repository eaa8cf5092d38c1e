//! Ethereum infrastructure - network capability and its Alloy implementation

mod api;
mod provider;

pub use api::{BlockTag, CallArgs, Web3Api};
pub use provider::{create_provider, AlloyWeb3, ProviderConfig};
