//! Domain layer - descriptors, values and dispatch contracts

pub mod abi;
