//! Dispatch results and the hint/hook strategy contracts

use std::collections::HashMap;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::Value;
use crate::error::Result;

/// A decoded call or event together with the signature that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureInfo {
    /// Function or event name
    pub name: String,
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Decoded arguments; `None` when the entry declares no inputs
    pub value: Option<Value>,
    /// Human-readable annotation attached by a [`Hint`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Result of a registry lookup
///
/// `Exact` comes from the contract's own registered interface and is
/// authoritative. `Candidates` comes from the global selector index: every
/// entry decoded the payload, any of them may be the real one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodeOutcome {
    Exact(SignatureInfo),
    Candidates(Vec<SignatureInfo>),
}

impl DecodeOutcome {
    pub fn is_exact(&self) -> bool {
        matches!(self, DecodeOutcome::Exact(_))
    }

    pub fn exact(&self) -> Option<&SignatureInfo> {
        match self {
            DecodeOutcome::Exact(info) => Some(info),
            DecodeOutcome::Candidates(_) => None,
        }
    }

    /// Every decoding, exact or not
    pub fn as_slice(&self) -> &[SignatureInfo] {
        match self {
            DecodeOutcome::Exact(info) => std::slice::from_ref(info),
            DecodeOutcome::Candidates(list) => list,
        }
    }

    pub fn into_vec(self) -> Vec<SignatureInfo> {
        match self {
            DecodeOutcome::Exact(info) => vec![info],
            DecodeOutcome::Candidates(list) => list,
        }
    }
}

/// Well-known interface a contract implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStandard {
    Erc20,
    Erc721,
}

/// Descriptive metadata about a contract, consumed by hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    #[serde(default)]
    pub standard: Option<TokenStandard>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub name: Option<String>,
    /// Stable coin price against USD
    #[serde(default)]
    pub price: Option<f64>,
}

/// Context handed to hints and hooks
#[derive(Debug, Clone, Default)]
pub struct HintOptions {
    /// `0x`-prefixed address of the contract being decoded; filled by the registry when unset
    pub contract: Option<String>,
    /// Native value attached to the transaction
    pub amount: Option<U256>,
    /// Metadata of the contract being decoded
    pub contract_info: Option<ContractInfo>,
    /// Metadata of other known contracts, keyed by normalized address
    pub contracts: HashMap<String, ContractInfo>,
}

impl HintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata for the contract under decode: explicit `contract_info` first, then `contracts`
    pub fn info(&self) -> Option<&ContractInfo> {
        self.contract_info.as_ref().or_else(|| {
            self.contract
                .as_deref()
                .and_then(|c| self.contracts.get(&crate::utils::normalize_address(c)))
        })
    }

    /// Metadata of any known contract by address
    pub fn info_for(&self, address: &str) -> Option<&ContractInfo> {
        self.contracts.get(&crate::utils::normalize_address(address))
    }
}

/// Calldata decoding as seen by hooks
///
/// Lets a hook recursively decode nested calls (multicall batches) against
/// the registry that invoked it.
pub trait CallDecoder {
    fn decode_call(
        &self,
        contract: &str,
        data: &[u8],
        opts: &HintOptions,
    ) -> Result<Option<DecodeOutcome>>;
}

/// Attaches a human-readable annotation to a decoded value
///
/// A hint may only produce a string. Any error it returns, or a panic raised
/// while it runs, is discarded by the registry and never turns a successful
/// decode into a failure.
pub trait Hint: Send + Sync {
    fn describe(&self, value: Option<&Value>, opts: &HintOptions) -> anyhow::Result<String>;
}

impl<F> Hint for F
where
    F: Fn(Option<&Value>, &HintOptions) -> anyhow::Result<String> + Send + Sync,
{
    fn describe(&self, value: Option<&Value>, opts: &HintOptions) -> anyhow::Result<String> {
        self(value, opts)
    }
}

/// Rewrites an exact-match call decoding before hints run
///
/// A hook may replace both the value and the signature metadata. Errors
/// propagate to the caller of the decode. Hooks never run for events or for
/// fallback candidates.
pub trait CallHook: Send + Sync {
    fn apply(
        &self,
        decoder: &dyn CallDecoder,
        contract: &str,
        info: SignatureInfo,
        opts: &HintOptions,
    ) -> Result<SignatureInfo>;
}

impl<F> CallHook for F
where
    F: Fn(&dyn CallDecoder, &str, SignatureInfo, &HintOptions) -> Result<SignatureInfo>
        + Send
        + Sync,
{
    fn apply(
        &self,
        decoder: &dyn CallDecoder,
        contract: &str,
        info: SignatureInfo,
        opts: &HintOptions,
    ) -> Result<SignatureInfo> {
        self(decoder, contract, info, opts)
    }
}
