//! Network capability used by bound contracts

use alloy_primitives::{Bytes, U256};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Block reference for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    Number(u64),
    Latest,
    Earliest,
    Pending,
}

/// Call envelope handed to the network capability
///
/// Bound contracts only ever populate `to` and `data`; every other field
/// comes from caller overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallArgs {
    pub to: Option<String>,
    pub from: Option<String>,
    /// `0x`-prefixed calldata
    pub data: Option<String>,
    pub nonce: Option<u64>,
    pub value: Option<U256>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
    pub tag: Option<BlockTag>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn tag(mut self, tag: BlockTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Fields set in `overrides` replace ours
    pub fn merge(self, overrides: CallArgs) -> Self {
        Self {
            to: overrides.to.or(self.to),
            from: overrides.from.or(self.from),
            data: overrides.data.or(self.data),
            nonce: overrides.nonce.or(self.nonce),
            value: overrides.value.or(self.value),
            gas: overrides.gas.or(self.gas),
            gas_price: overrides.gas_price.or(self.gas_price),
            tag: overrides.tag.or(self.tag),
        }
    }
}

/// Abstract network capability
///
/// Implementations perform exactly one request per invocation; retries,
/// timeouts and cancellation are the implementation's business.
#[async_trait::async_trait]
pub trait Web3Api: Send + Sync {
    /// Execute a read-only call (eth_call)
    async fn eth_call(&self, args: CallArgs) -> Result<Bytes>;

    /// Estimate gas for a call (eth_estimateGas)
    async fn estimate_gas(&self, args: CallArgs) -> Result<U256>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_override_wins() {
        let base = CallArgs {
            to: Some("0xaa".into()),
            data: Some("0x01".into()),
            ..Default::default()
        };
        let merged = base.merge(CallArgs::new().to("0xbb").value(U256::from(5u64)));
        assert_eq!(merged.to.as_deref(), Some("0xbb"));
        assert_eq!(merged.data.as_deref(), Some("0x01"));
        assert_eq!(merged.value, Some(U256::from(5u64)));
        assert_eq!(merged.tag, None);
    }
}
