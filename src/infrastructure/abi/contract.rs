//! Contract binder - per-function encode/decode/call closures

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Selector, U256};
use tracing::{debug, warn};

use crate::codec::ArgsCodec;
use crate::domain::abi::{fn_sig_hash, signature, AbiItem, Value};
use crate::error::{AbiError, Result};
use crate::infrastructure::ethereum::{CallArgs, Web3Api};
use crate::utils::encode_hex;

/// One bound function of a contract interface
pub struct FunctionBinding {
    name: String,
    signature: String,
    selector: Selector,
    inputs: Option<ArgsCodec>,
    outputs: Option<ArgsCodec>,
    net: Option<Arc<dyn Web3Api>>,
    address: Option<String>,
}

impl FunctionBinding {
    fn new(item: &AbiItem, net: Option<Arc<dyn Web3Api>>, address: Option<String>) -> Result<Self> {
        Ok(Self {
            name: item.display_name().to_string(),
            signature: signature(item)?,
            selector: fn_sig_hash(item)?,
            inputs: compile_args(&item.inputs)?,
            outputs: compile_args(&item.outputs)?,
            net,
            address,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn has_inputs(&self) -> bool {
        self.inputs.is_some()
    }

    pub fn has_outputs(&self) -> bool {
        self.outputs.is_some()
    }

    /// Selector followed by the encoded arguments
    ///
    /// A single-input function takes the bare value; multiple inputs take a
    /// tuple, or a record when every input is named.
    pub fn encode_input(&self, values: Option<&Value>) -> Result<Vec<u8>> {
        let mut out = self.selector.to_vec();
        match (&self.inputs, values) {
            (Some(inputs), Some(values)) => out.extend(inputs.encode(values)?),
            (Some(_), None) => {
                return Err(AbiError::structural(format!(
                    "{}: inputs required but not provided",
                    self.signature
                )))
            }
            (None, _) => {}
        }
        Ok(out)
    }

    /// Decode return data; `None` when the function declares no outputs
    pub fn decode_output(&self, data: &[u8]) -> Result<Option<Value>> {
        self.outputs
            .as_ref()
            .map(|outputs| outputs.decode(data))
            .transpose()
    }

    /// Encode, execute via `eth_call` and decode the returned bytes
    pub async fn call(&self, values: Option<&Value>, overrides: CallArgs) -> Result<Option<Value>> {
        let net = self.network()?;
        let args = self.envelope(values, overrides)?;
        debug!(signature = %self.signature, to = ?args.to, "eth_call");
        let raw = net.eth_call(args).await.map_err(AbiError::Network)?;
        self.decode_output(&raw)
    }

    /// Encode and ask the network for a gas estimate
    pub async fn estimate_gas(&self, values: Option<&Value>, overrides: CallArgs) -> Result<U256> {
        let net = self.network()?;
        let args = self.envelope(values, overrides)?;
        debug!(signature = %self.signature, to = ?args.to, "eth_estimateGas");
        net.estimate_gas(args).await.map_err(AbiError::Network)
    }

    fn network(&self) -> Result<&Arc<dyn Web3Api>> {
        self.net
            .as_ref()
            .ok_or_else(|| AbiError::structural("contract is not bound to a network"))
    }

    fn envelope(&self, values: Option<&Value>, overrides: CallArgs) -> Result<CallArgs> {
        let input = self.encode_input(values)?;
        if self.address.is_none() && overrides.to.is_none() {
            return Err(AbiError::structural("No contract address"));
        }
        let base = CallArgs {
            to: self.address.clone(),
            data: Some(encode_hex(&input)),
            ..Default::default()
        };
        Ok(base.merge(overrides))
    }
}

impl fmt::Debug for FunctionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionBinding")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("selector", &self.selector)
            .field("address", &self.address)
            .field("networked", &self.net.is_some())
            .finish()
    }
}

pub(crate) fn compile_args(params: &[crate::domain::abi::Param]) -> Result<Option<ArgsCodec>> {
    if params.is_empty() {
        Ok(None)
    } else {
        ArgsCodec::new(params).map(Some)
    }
}

/// Functions of one interface keyed by name
///
/// Overloaded names are never merged: every function sharing a name is keyed
/// by its canonical signature instead (e.g. `safeTransferFrom(address,address,uint256)`).
#[derive(Debug)]
pub struct Contract {
    functions: BTreeMap<String, FunctionBinding>,
}

impl Contract {
    /// Offline binding: encode/decode only
    pub fn new(abi: &[AbiItem]) -> Result<Self> {
        Self::bind(abi, None, None)
    }

    /// Binding with `call`/`estimate_gas`; `address` may be supplied per call instead
    pub fn with_network(
        abi: &[AbiItem],
        net: Arc<dyn Web3Api>,
        address: Option<&str>,
    ) -> Result<Self> {
        Self::bind(abi, Some(net), address.map(str::to_string))
    }

    fn bind(
        abi: &[AbiItem],
        net: Option<Arc<dyn Web3Api>>,
        address: Option<String>,
    ) -> Result<Self> {
        let mut name_count: HashMap<&str, usize> = HashMap::new();
        for item in abi.iter().filter(|item| item.is_function()) {
            *name_count.entry(item.display_name()).or_default() += 1;
        }

        let mut functions = BTreeMap::new();
        for item in abi.iter().filter(|item| item.is_function()) {
            let binding = FunctionBinding::new(item, net.clone(), address.clone())?;
            let key = if name_count[item.display_name()] > 1 {
                binding.signature.clone()
            } else {
                binding.name.clone()
            };
            if functions.contains_key(&key) {
                warn!(key = %key, "duplicate function in interface, keeping the last one");
            }
            functions.insert(key, binding);
        }
        debug!(functions = functions.len(), "bound contract interface");
        Ok(Self { functions })
    }

    /// Look up by name, or by canonical signature for overloads
    pub fn function(&self, key: &str) -> Option<&FunctionBinding> {
        self.functions.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionBinding> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
