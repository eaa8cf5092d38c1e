//! Multi-contract decoder - registry of interfaces and best-effort dispatch

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use alloy_primitives::{Selector, B256};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace, warn};

use super::contract::compile_args;
use super::events::EventBinding;
use crate::codec::ArgsCodec;
use crate::domain::abi::{
    fn_sig_hash, signature, AbiItem, CallDecoder, CallHook, DecodeOutcome, Hint, HintOptions,
    SignatureInfo, Value,
};
use crate::error::Result;
use crate::utils::{add_0x, normalize_address, strip_0x};

/// An interface entry annotated with optional strategies
#[derive(Clone)]
pub struct InterfaceEntry {
    pub item: AbiItem,
    pub hint: Option<Arc<dyn Hint>>,
    pub hook: Option<Arc<dyn CallHook>>,
}

impl InterfaceEntry {
    pub fn new(item: AbiItem) -> Self {
        Self {
            item,
            hint: None,
            hook: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Hint + 'static) -> Self {
        self.hint = Some(Arc::new(hint));
        self
    }

    /// Hooks apply to functions only; ignored on events
    pub fn with_hook(mut self, hook: impl CallHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }
}

impl From<AbiItem> for InterfaceEntry {
    fn from(item: AbiItem) -> Self {
        Self::new(item)
    }
}

impl From<&AbiItem> for InterfaceEntry {
    fn from(item: &AbiItem) -> Self {
        Self::new(item.clone())
    }
}

impl fmt::Debug for InterfaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceEntry")
            .field("item", &self.item)
            .field("hint", &self.hint.is_some())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

struct CallRecord {
    name: String,
    signature: String,
    args: Option<ArgsCodec>,
    hint: Option<Arc<dyn Hint>>,
    hook: Option<Arc<dyn CallHook>>,
}

impl CallRecord {
    fn decode(&self, data: &[u8]) -> Result<SignatureInfo> {
        Ok(SignatureInfo {
            name: self.name.clone(),
            signature: self.signature.clone(),
            value: self.args.as_ref().map(|args| args.decode(data)).transpose()?,
            hint: None,
        })
    }
}

struct EventRecord {
    binding: EventBinding,
    hint: Option<Arc<dyn Hint>>,
}

impl EventRecord {
    fn decode(&self, topics: &[&str], data: &str) -> Result<SignatureInfo> {
        Ok(SignatureInfo {
            name: self.binding.name().to_string(),
            signature: self.binding.signature().to_string(),
            value: Some(self.binding.decode(topics, data)?),
            hint: None,
        })
    }
}

#[derive(Default)]
struct Namespace {
    calls: HashMap<Selector, Arc<CallRecord>>,
    events: HashMap<B256, Arc<EventRecord>>,
}

enum Compiled {
    Call(Selector, CallRecord),
    Event(B256, EventRecord),
}

/// Registry of contract interfaces keyed by normalized address
///
/// Every registered function and event is also appended to a global
/// selector/topic index, used when the contract itself is unknown. Entries
/// are never removed.
#[derive(Default)]
pub struct Decoder {
    contracts: HashMap<String, Namespace>,
    calls: HashMap<Selector, Vec<Arc<CallRecord>>>,
    events: HashMap<B256, Vec<Arc<EventRecord>>>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface under `contract`
    ///
    /// Every entry is compiled before anything is inserted, so a descriptor
    /// error leaves the registry untouched. Anonymous and unnamed events are
    /// skipped; other item kinds are ignored.
    pub fn add<I>(&mut self, contract: &str, interface: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<InterfaceEntry>,
    {
        let compiled = interface
            .into_iter()
            .filter_map(|entry| compile_entry(entry.into()).transpose())
            .collect::<Result<Vec<_>>>()?;

        let address = normalize_address(contract);
        let namespace = self.contracts.entry(address.clone()).or_default();
        let (mut functions, mut events) = (0usize, 0usize);
        for record in compiled {
            match record {
                Compiled::Call(selector, record) => {
                    let record = Arc::new(record);
                    if let Some(prev) = namespace.calls.insert(selector, record.clone()) {
                        warn!(
                            contract = %address,
                            selector = %selector,
                            previous = %prev.signature,
                            current = %record.signature,
                            "selector collision, last registration wins"
                        );
                    }
                    self.calls.entry(selector).or_default().push(record);
                    functions += 1;
                }
                Compiled::Event(topic, record) => {
                    let record = Arc::new(record);
                    if let Some(prev) = namespace.events.insert(topic, record.clone()) {
                        warn!(
                            contract = %address,
                            topic = %topic,
                            previous = %prev.binding.signature(),
                            "event topic collision, last registration wins"
                        );
                    }
                    self.events.entry(topic).or_default().push(record);
                    events += 1;
                }
            }
        }
        debug!(contract = %address, functions, events, "registered interface");
        Ok(())
    }

    /// Name of the function `data` calls on `contract`, exact matches only
    pub fn method(&self, contract: &str, data: &[u8]) -> Option<&str> {
        let selector = selector(data)?;
        self.contracts
            .get(&normalize_address(contract))?
            .calls
            .get(&selector)
            .map(|record| record.name.as_str())
    }

    /// Decode calldata sent to `contract`
    ///
    /// An exact match decodes with the contract's own interface, runs its
    /// hook and then its hint; decode and hook errors propagate. Otherwise
    /// every registered entry sharing the selector is tried and all that
    /// decode are returned in registration order. `None` when nothing matches.
    pub fn decode(
        &self,
        contract: &str,
        data: &[u8],
        opts: &HintOptions,
    ) -> Result<Option<DecodeOutcome>> {
        let Some(selector) = selector(data) else {
            return Ok(None);
        };
        let address = normalize_address(contract);
        let args = &data[4..];

        if let Some(record) = self
            .contracts
            .get(&address)
            .and_then(|ns| ns.calls.get(&selector))
        {
            debug!(contract = %address, signature = %record.signature, "exact call match");
            let mut info = record.decode(args)?;
            let value = info.value.clone();
            if let Some(hook) = &record.hook {
                info = hook.apply(self, &address, info, opts)?;
            }
            if let Some(hint) = &record.hint {
                info.hint = describe(hint.as_ref(), value.as_ref(), &address, opts);
            }
            return Ok(Some(DecodeOutcome::Exact(info)));
        }

        let candidates: Vec<SignatureInfo> = self
            .calls
            .get(&selector)
            .into_iter()
            .flatten()
            .filter_map(|record| match record.decode(args) {
                Ok(info) => Some(info),
                Err(err) => {
                    trace!(signature = %record.signature, error = %err, "candidate rejected");
                    None
                }
            })
            .collect();
        debug!(
            contract = %address,
            selector = %selector,
            candidates = candidates.len(),
            "fallback call dispatch"
        );
        Ok((!candidates.is_empty()).then_some(DecodeOutcome::Candidates(candidates)))
    }

    /// Decode a log emitted by `contract`, keyed on `topics[0]`
    ///
    /// Same two tiers as [`Decoder::decode`] without the hook stage.
    pub fn decode_event<T: AsRef<str>>(
        &self,
        contract: &str,
        topics: &[T],
        data: &str,
        opts: &HintOptions,
    ) -> Result<Option<DecodeOutcome>> {
        let topics: Vec<&str> = topics.iter().map(AsRef::as_ref).collect();
        let Some(topic) = topics.first().and_then(|t| parse_topic(t)) else {
            return Ok(None);
        };
        let address = normalize_address(contract);

        if let Some(record) = self
            .contracts
            .get(&address)
            .and_then(|ns| ns.events.get(&topic))
        {
            debug!(contract = %address, signature = %record.binding.signature(), "exact event match");
            let mut info = record.decode(&topics, data)?;
            if let Some(hint) = &record.hint {
                info.hint = describe(hint.as_ref(), info.value.as_ref(), &address, opts);
            }
            return Ok(Some(DecodeOutcome::Exact(info)));
        }

        let candidates: Vec<SignatureInfo> = self
            .events
            .get(&topic)
            .into_iter()
            .flatten()
            .filter_map(|record| match record.decode(&topics, data) {
                Ok(info) => Some(info),
                Err(err) => {
                    trace!(signature = %record.binding.signature(), error = %err, "candidate rejected");
                    None
                }
            })
            .collect();
        debug!(
            contract = %address,
            topic = %topic,
            candidates = candidates.len(),
            "fallback event dispatch"
        );
        Ok((!candidates.is_empty()).then_some(DecodeOutcome::Candidates(candidates)))
    }

    /// Normalized addresses of every registered contract
    pub fn contracts(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    /// Number of registered contracts
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Canonical signatures registered anywhere under `selector`, in registration order
    pub fn signatures_for(&self, selector: Selector) -> Vec<&str> {
        self.calls
            .get(&selector)
            .into_iter()
            .flatten()
            .map(|record| record.signature.as_str())
            .collect()
    }
}

impl CallDecoder for Decoder {
    fn decode_call(
        &self,
        contract: &str,
        data: &[u8],
        opts: &HintOptions,
    ) -> Result<Option<DecodeOutcome>> {
        self.decode(contract, data, opts)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("contracts", &self.contracts.len())
            .field("selectors", &self.calls.len())
            .field("topics", &self.events.len())
            .finish()
    }
}

fn compile_entry(entry: InterfaceEntry) -> Result<Option<Compiled>> {
    let InterfaceEntry { item, hint, hook } = entry;
    if item.is_function() {
        let record = CallRecord {
            name: item.display_name().to_string(),
            signature: signature(&item)?,
            args: compile_args(&item.inputs)?,
            hint,
            hook,
        };
        return Ok(Some(Compiled::Call(fn_sig_hash(&item)?, record)));
    }
    if item.is_event() && !item.anonymous && !item.name.is_empty() {
        let binding = EventBinding::new(&item)?;
        return Ok(Some(Compiled::Event(
            binding.topic(),
            EventRecord { binding, hint },
        )));
    }
    Ok(None)
}

fn selector(data: &[u8]) -> Option<Selector> {
    data.get(..4).map(Selector::from_slice)
}

fn parse_topic(topic: &str) -> Option<B256> {
    let raw = hex::decode(strip_0x(topic)).ok()?;
    (raw.len() == 32).then(|| B256::from_slice(&raw))
}

/// Run a hint with `contract` filled in; errors and panics are logged and dropped
fn describe(
    hint: &dyn Hint,
    value: Option<&Value>,
    address: &str,
    opts: &HintOptions,
) -> Option<String> {
    let filled;
    let opts = if opts.contract.is_none() {
        filled = HintOptions {
            contract: Some(add_0x(address)),
            ..opts.clone()
        };
        &filled
    } else {
        opts
    };
    match panic::catch_unwind(AssertUnwindSafe(|| hint.describe(value, opts))) {
        Ok(Ok(text)) => Some(text),
        Ok(Err(err)) => {
            debug!(contract = %address, error = %err, "hint failed");
            None
        }
        Err(_) => {
            warn!(contract = %address, "hint panicked");
            None
        }
    }
}

/// A [`Decoder`] shared between tasks
///
/// Registration takes the write lock; decoding takes the read lock, so
/// interfaces can be added while decode traffic is running.
#[derive(Debug, Clone, Default)]
pub struct SharedDecoder {
    inner: Arc<RwLock<Decoder>>,
}

impl SharedDecoder {
    pub fn new(decoder: Decoder) -> Self {
        Self {
            inner: Arc::new(RwLock::new(decoder)),
        }
    }

    pub async fn add<I>(&self, contract: &str, interface: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<InterfaceEntry>,
    {
        self.inner.write().await.add(contract, interface)
    }

    pub async fn method(&self, contract: &str, data: &[u8]) -> Option<String> {
        self.inner.read().await.method(contract, data).map(str::to_string)
    }

    pub async fn decode(
        &self,
        contract: &str,
        data: &[u8],
        opts: &HintOptions,
    ) -> Result<Option<DecodeOutcome>> {
        self.inner.read().await.decode(contract, data, opts)
    }

    pub async fn decode_event<T: AsRef<str>>(
        &self,
        contract: &str,
        topics: &[T],
        data: &str,
        opts: &HintOptions,
    ) -> Result<Option<DecodeOutcome>> {
        self.inner.read().await.decode_event(contract, topics, data, opts)
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Decoder> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Decoder> {
        self.inner.write().await
    }
}

impl From<Decoder> for SharedDecoder {
    fn from(decoder: Decoder) -> Self {
        Self::new(decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::Param;
    use crate::error::AbiError;
    use crate::utils::encode_hex;
    use alloy_primitives::{Address, U256};

    const A: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    const B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn word(n: u64) -> [u8; 32] {
        U256::from(n).to_be_bytes::<32>()
    }

    fn call(selector: Selector, words: &[[u8; 32]]) -> Vec<u8> {
        let mut data = selector.to_vec();
        for w in words {
            data.extend_from_slice(w);
        }
        data
    }

    fn mint(ty: &str) -> AbiItem {
        AbiItem::function("mint", vec![Param::unnamed(ty)], vec![])
    }

    #[test]
    fn test_exact_beats_fallback() {
        let mut decoder = Decoder::new();
        decoder.add(A, [mint("uint256")]).unwrap();
        decoder.add(B, [mint("uint256")]).unwrap();
        let selector = fn_sig_hash(&mint("uint256")).unwrap();
        let data = call(selector, &[word(5)]);

        let outcome = decoder
            .decode("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", &data, &HintOptions::new())
            .unwrap()
            .unwrap();
        assert!(outcome.is_exact());
        assert_eq!(outcome.exact().unwrap().value, Some(Value::from(5u64)));

        let outcome = decoder
            .decode("0x0000000000000000000000000000000000000001", &data, &HintOptions::new())
            .unwrap()
            .unwrap();
        assert_eq!(outcome.as_slice().len(), 2);
    }

    #[test]
    fn test_method_and_misses() {
        let mut decoder = Decoder::new();
        decoder.add(A, [mint("uint256")]).unwrap();
        let selector = fn_sig_hash(&mint("uint256")).unwrap();
        assert_eq!(decoder.method(A, &selector.to_vec()), Some("mint"));
        assert_eq!(decoder.method(B, &selector.to_vec()), None);
        assert_eq!(decoder.method(A, &[1, 2]), None);
        assert_eq!(decoder.method(A, &[0, 0, 0, 0]), None);

        let opts = HintOptions::new();
        assert!(decoder.decode(A, &[1, 2, 3], &opts).unwrap().is_none());
        assert!(decoder.decode(A, &[9, 9, 9, 9], &opts).unwrap().is_none());
    }

    #[test]
    fn test_fallback_excludes_failing_candidates() {
        let mut decoder = Decoder::new();
        decoder.add(A, [mint("uint8")]).unwrap();
        let selector = fn_sig_hash(&mint("uint8")).unwrap();

        let data = call(selector, &[word(300)]);
        assert!(decoder.decode(B, &data, &HintOptions::new()).unwrap().is_none());
        // the exact match surfaces the bounds error instead
        assert!(matches!(
            decoder.decode(A, &data, &HintOptions::new()),
            Err(AbiError::Bounds { .. })
        ));

        let data = call(selector, &[word(200)]);
        let outcome = decoder.decode(B, &data, &HintOptions::new()).unwrap().unwrap();
        assert_eq!(outcome.as_slice()[0].signature, "mint(uint8)");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut decoder = Decoder::new();
        let first = AbiItem::function("first", vec![], vec![]);
        decoder.add(A, [first.clone()]).unwrap();
        decoder.add(A, [first.clone()]).unwrap();
        let selector = fn_sig_hash(&first).unwrap();
        assert_eq!(decoder.signatures_for(selector).len(), 2);
        assert_eq!(decoder.len(), 1);

        let outcome = decoder.decode(A, &selector.to_vec(), &HintOptions::new()).unwrap();
        assert_eq!(outcome.unwrap().exact().unwrap().value, None);
    }

    #[test]
    fn test_registration_is_atomic() {
        let mut decoder = Decoder::new();
        let result = decoder.add(A, [mint("uint256"), mint("uint7")]);
        assert!(matches!(result, Err(AbiError::Validation { .. })));
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_hint_failure_is_swallowed() {
        let mut decoder = Decoder::new();
        let entry = InterfaceEntry::new(mint("uint256")).with_hint(
            |_: Option<&Value>, _: &HintOptions| -> anyhow::Result<String> {
                anyhow::bail!("no metadata")
            },
        );
        decoder.add(A, [entry]).unwrap();
        let data = call(fn_sig_hash(&mint("uint256")).unwrap(), &[word(1)]);
        let info = decoder.decode(A, &data, &HintOptions::new()).unwrap().unwrap();
        assert_eq!(info.exact().unwrap().hint, None);
        assert_eq!(info.exact().unwrap().value, Some(Value::from(1u64)));
    }

    #[test]
    fn test_event_hint_failure_is_swallowed() {
        let approval = AbiItem::event(
            "Approval",
            vec![
                Param::new("owner", "address").indexed(),
                Param::new("value", "uint256"),
            ],
        );
        let failing = |_: Option<&Value>, _: &HintOptions| -> anyhow::Result<String> {
            anyhow::bail!("no metadata")
        };
        let panicking = |_: Option<&Value>, _: &HintOptions| -> anyhow::Result<String> {
            panic!("hint bug")
        };
        let mut decoder = Decoder::new();
        decoder
            .add(A, [InterfaceEntry::new(approval.clone()).with_hint(failing)])
            .unwrap();
        decoder
            .add(B, [InterfaceEntry::new(approval.clone()).with_hint(panicking)])
            .unwrap();

        let topics = [
            encode_hex(EventBinding::new(&approval).unwrap().topic()),
            encode_hex(B256::left_padding_from(Address::repeat_byte(3).as_slice())),
        ];
        let data = encode_hex(word(11));
        for contract in [A, B] {
            let outcome = decoder
                .decode_event(contract, &topics, &data, &HintOptions::new())
                .unwrap()
                .unwrap();
            let info = outcome.exact().unwrap();
            assert_eq!(info.hint, None);
            assert_eq!(
                info.value.as_ref().unwrap().get("value"),
                Some(&Value::from(11u64))
            );
        }
    }

    #[test]
    fn test_panicking_call_hint_is_dropped() {
        let mut decoder = Decoder::new();
        let entry = InterfaceEntry::new(mint("uint256")).with_hint(
            |_: Option<&Value>, _: &HintOptions| -> anyhow::Result<String> { panic!("hint bug") },
        );
        decoder.add(A, [entry]).unwrap();
        let data = call(fn_sig_hash(&mint("uint256")).unwrap(), &[word(2)]);
        let info = decoder.decode(A, &data, &HintOptions::new()).unwrap().unwrap();
        assert_eq!(info.exact().unwrap().hint, None);
        assert_eq!(info.exact().unwrap().value, Some(Value::from(2u64)));
    }

    #[test]
    fn test_huge_fixed_array_candidate_is_excluded() {
        let huge = mint("uint8[100000000000]");
        let mut decoder = Decoder::new();
        decoder.add(A, [huge.clone()]).unwrap();
        decoder.add(B, [mint("uint256")]).unwrap();
        let data = call(fn_sig_hash(&huge).unwrap(), &[word(0)]);

        // fallback from an unregistered address filters the candidate out
        let stranger = "0x0000000000000000000000000000000000000002";
        assert!(decoder.decode(stranger, &data, &HintOptions::new()).unwrap().is_none());
        assert!(matches!(
            decoder.decode(A, &data, &HintOptions::new()),
            Err(AbiError::Decode(_))
        ));

        // other registrations keep decoding
        let data = call(fn_sig_hash(&mint("uint256")).unwrap(), &[word(4)]);
        let outcome = decoder.decode(stranger, &data, &HintOptions::new()).unwrap().unwrap();
        assert_eq!(outcome.as_slice()[0].value, Some(Value::from(4u64)));
    }

    #[test]
    fn test_hint_receives_contract() {
        let mut decoder = Decoder::new();
        let entry = InterfaceEntry::new(mint("uint256")).with_hint(
            |value: Option<&Value>, opts: &HintOptions| -> anyhow::Result<String> {
                Ok(format!(
                    "{} on {}",
                    value.map(ToString::to_string).unwrap_or_default(),
                    opts.contract.clone().unwrap_or_default()
                ))
            },
        );
        decoder.add(A, [entry]).unwrap();
        let data = call(fn_sig_hash(&mint("uint256")).unwrap(), &[word(7)]);
        let outcome = decoder.decode(A, &data, &HintOptions::new()).unwrap().unwrap();
        assert_eq!(
            outcome.exact().unwrap().hint.as_deref(),
            Some("7 on 0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        );

        // fallback candidates never get hints
        let outcome = decoder.decode(B, &data, &HintOptions::new()).unwrap().unwrap();
        assert_eq!(outcome.as_slice()[0].hint, None);
    }

    #[test]
    fn test_hook_rewrites_result() {
        let mut decoder = Decoder::new();
        let hook = |_: &dyn CallDecoder,
                    contract: &str,
                    mut info: SignatureInfo,
                    _: &HintOptions|
         -> Result<SignatureInfo> {
            info.name = format!("{}@{}", info.name, contract);
            Ok(info)
        };
        decoder
            .add(A, [InterfaceEntry::new(mint("uint256")).with_hook(hook)])
            .unwrap();
        let data = call(fn_sig_hash(&mint("uint256")).unwrap(), &[word(1)]);
        let outcome = decoder.decode(A, &data, &HintOptions::new()).unwrap().unwrap();
        assert_eq!(
            outcome.exact().unwrap().name,
            "mint@aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        );
    }

    #[test]
    fn test_event_dispatch() {
        let transfer = AbiItem::event(
            "Transfer",
            vec![
                Param::new("from", "address").indexed(),
                Param::new("to", "address").indexed(),
                Param::new("value", "uint256"),
            ],
        );
        let mut decoder = Decoder::new();
        decoder
            .add(
                A,
                [
                    transfer.clone(),
                    AbiItem::event("Hidden", vec![]).anonymous(),
                    AbiItem::event("", vec![]),
                ],
            )
            .unwrap();

        let topic = encode_hex(EventBinding::new(&transfer).unwrap().topic());
        let from = encode_hex(B256::left_padding_from(Address::repeat_byte(1).as_slice()));
        let to = encode_hex(B256::left_padding_from(Address::repeat_byte(2).as_slice()));
        let topics = [topic.clone(), from, to];
        let data = encode_hex(word(42));

        let opts = HintOptions::new();
        let exact = decoder.decode_event(A, &topics, &data, &opts).unwrap().unwrap();
        assert!(exact.is_exact());
        let value = exact.exact().unwrap().value.as_ref().unwrap();
        assert_eq!(value.get("value"), Some(&Value::from(42u64)));

        let fallback = decoder.decode_event(B, &topics, &data, &opts).unwrap().unwrap();
        assert_eq!(fallback.as_slice().len(), 1);

        // wrong topic count: exact match errors, fallback excludes
        let short = [topic];
        assert!(decoder.decode_event(A, &short, &data, &opts).is_err());
        assert!(decoder.decode_event(B, &short, &data, &opts).unwrap().is_none());

        let empty: [&str; 0] = [];
        assert!(decoder.decode_event(A, &empty, &data, &opts).unwrap().is_none());
        assert!(decoder.decode_event(A, &["0xzz"], &data, &opts).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shared_decoder() {
        let shared = SharedDecoder::default();
        shared.add(A, [mint("uint256")]).await.unwrap();

        let reader = shared.clone();
        let data = call(fn_sig_hash(&mint("uint256")).unwrap(), &[word(3)]);
        let handle = tokio::spawn(async move { reader.method(A, &data).await });
        assert_eq!(handle.await.unwrap().as_deref(), Some("mint"));
        assert_eq!(shared.read().await.len(), 1);
    }
}
