//! Alloy-backed network capability
//!
//! Maps call envelopes onto `eth_call` / `eth_estimateGas` over HTTP,
//! WebSocket or IPC transports.

use std::path::PathBuf;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::{BlockId, BlockNumberOrTag, TransactionInput, TransactionRequest};
use anyhow::{Context, Result};
use tracing::debug;

use super::api::{BlockTag, CallArgs, Web3Api};
use crate::utils::{add_0x, decode_hex};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Pick the transport from the endpoint scheme; anything without one is an IPC path
    pub fn from_endpoint(endpoint: &str) -> Result<Self> {
        let lower = endpoint.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(ProviderConfig::Http(endpoint.to_string()));
        }
        if lower.starts_with("ws://") || lower.starts_with("wss://") {
            return Ok(ProviderConfig::WebSocket(endpoint.to_string()));
        }
        #[cfg(unix)]
        return Ok(ProviderConfig::Ipc(PathBuf::from(endpoint)));
        #[cfg(not(unix))]
        anyhow::bail!("unsupported endpoint: {}", endpoint);
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

// Type aliases for the filled providers
type FilledProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Enum-based provider that stores the connected transport
pub enum AlloyWeb3 {
    Http {
        provider: FilledProvider,
        endpoint: String,
    },
    WebSocket {
        provider: FilledProvider,
        endpoint: String,
    },
    #[cfg(unix)]
    Ipc {
        provider: FilledProvider,
        endpoint: String,
    },
}

impl AlloyWeb3 {
    /// Connect using the given configuration
    pub async fn connect(config: ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Http(url) => {
                let rpc_url = url.parse().context("Invalid HTTP URL")?;
                let provider = ProviderBuilder::new().connect_http(rpc_url);
                Ok(AlloyWeb3::Http {
                    provider,
                    endpoint: url,
                })
            }
            ProviderConfig::WebSocket(url) => {
                let provider = ProviderBuilder::new()
                    .connect(&url)
                    .await
                    .context("Failed to create WebSocket provider")?;
                Ok(AlloyWeb3::WebSocket {
                    provider,
                    endpoint: url,
                })
            }
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => {
                use alloy::providers::IpcConnect;
                let ipc = IpcConnect::new(path.to_string_lossy().to_string());
                let provider = ProviderBuilder::new()
                    .connect_ipc(ipc)
                    .await
                    .context("Failed to create IPC provider")?;
                Ok(AlloyWeb3::Ipc {
                    provider,
                    endpoint: path.display().to_string(),
                })
            }
        }
    }

    /// Get endpoint display name
    pub fn endpoint_name(&self) -> &str {
        match self {
            AlloyWeb3::Http { endpoint, .. } => endpoint,
            AlloyWeb3::WebSocket { endpoint, .. } => endpoint,
            #[cfg(unix)]
            AlloyWeb3::Ipc { endpoint, .. } => endpoint,
        }
    }
}

/// Connect and erase the transport behind the network capability trait
pub async fn create_provider(config: ProviderConfig) -> Result<Box<dyn Web3Api>> {
    Ok(Box::new(AlloyWeb3::connect(config).await?))
}

// Macro to reduce code duplication across transports
macro_rules! impl_provider_call {
    ($self:ident, $method:ident, $request:expr, $block:expr) => {
        match $self {
            AlloyWeb3::Http { provider, .. } => provider.$method($request).block($block).await,
            AlloyWeb3::WebSocket { provider, .. } => {
                provider.$method($request).block($block).await
            }
            #[cfg(unix)]
            AlloyWeb3::Ipc { provider, .. } => provider.$method($request).block($block).await,
        }
    };
}

#[async_trait::async_trait]
impl Web3Api for AlloyWeb3 {
    async fn eth_call(&self, args: CallArgs) -> Result<Bytes> {
        let block = block_id(args.tag);
        let request = to_request(&args)?;
        debug!(endpoint = %self.endpoint_name(), to = ?args.to, "eth_call");
        Ok(impl_provider_call!(self, call, request, block)?)
    }

    async fn estimate_gas(&self, args: CallArgs) -> Result<U256> {
        let block = block_id(args.tag);
        let request = to_request(&args)?;
        debug!(endpoint = %self.endpoint_name(), to = ?args.to, "eth_estimateGas");
        let gas = impl_provider_call!(self, estimate_gas, request, block)?;
        Ok(U256::from(gas))
    }
}

/// Convert a call envelope to an alloy request
fn to_request(args: &CallArgs) -> Result<TransactionRequest> {
    let mut request = TransactionRequest::default();
    if let Some(to) = &args.to {
        request.to = Some(TxKind::Call(parse_address(to)?));
    }
    if let Some(from) = &args.from {
        request.from = Some(parse_address(from)?);
    }
    if let Some(data) = &args.data {
        let input = decode_hex(data).context("Invalid call data")?;
        request.input = TransactionInput::new(Bytes::from(input));
    }
    request.nonce = args.nonce;
    request.value = args.value;
    request.gas = args.gas;
    request.gas_price = args.gas_price;
    Ok(request)
}

fn parse_address(address: &str) -> Result<Address> {
    add_0x(address.trim())
        .parse()
        .with_context(|| format!("Invalid address: {}", address))
}

fn block_id(tag: Option<BlockTag>) -> BlockId {
    let tag = match tag {
        None | Some(BlockTag::Latest) => BlockNumberOrTag::Latest,
        Some(BlockTag::Number(n)) => BlockNumberOrTag::Number(n),
        Some(BlockTag::Earliest) => BlockNumberOrTag::Earliest,
        Some(BlockTag::Pending) => BlockNumberOrTag::Pending,
    };
    BlockId::Number(tag)
}
