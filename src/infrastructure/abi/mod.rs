//! ABI infrastructure - contract/event binders and the multi-contract decoder

mod contract;
mod decoder;
mod events;

pub use contract::{Contract, FunctionBinding};
pub use decoder::{Decoder, InterfaceEntry, SharedDecoder};
pub use events::{EventBinding, Events, TopicValues};
