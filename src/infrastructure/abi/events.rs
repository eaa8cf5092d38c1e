//! Event binder - log decoding and topic filters

use std::collections::{BTreeMap, HashMap};

use alloy_primitives::{keccak256, B256};
use tracing::warn;

use super::contract::compile_args;
use crate::codec::{compile, compile_kind, ArgsCodec, Codec};
use crate::domain::abi::{ev_sig_hash, signature, AbiItem, Param, TypeKind, Value};
use crate::error::{AbiError, Result};
use crate::utils::{decode_hex, encode_hex, strip_0x};

/// How an indexed field is carried in its topic
#[derive(Debug, Clone)]
enum IndexedCodec {
    /// Word-sized value, ABI-encoded directly into the topic
    Word(Codec),
    /// `string`/`bytes`: topic is the hash of the raw payload
    HashedPayload,
    /// Array: topic is the hash of the concatenated element encodings
    HashedArray(Codec),
    /// Tuple: topic is the hash of the concatenated component encodings
    HashedTuple(Vec<(String, Codec)>),
}

impl IndexedCodec {
    fn new(param: &Param) -> Result<Self> {
        let kind = TypeKind::from_param(param)?;
        Ok(match &kind {
            TypeKind::String | TypeKind::Bytes => IndexedCodec::HashedPayload,
            TypeKind::Array(inner) | TypeKind::FixedArray(_, inner) => {
                // compile the whole array first so descriptor checks still apply
                compile_kind(&kind)?;
                IndexedCodec::HashedArray(compile_kind(inner)?)
            }
            TypeKind::Tuple(_) => IndexedCodec::HashedTuple(
                param
                    .components
                    .iter()
                    .map(|c| Ok((c.name.clone(), compile(c)?)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            word => IndexedCodec::Word(compile_kind(word)?),
        })
    }

    fn topic(&self, value: &Value) -> Result<B256> {
        match self {
            IndexedCodec::Word(codec) => Ok(B256::from_slice(&codec.encode(value)?)),
            IndexedCodec::HashedPayload => match value {
                Value::String(text) => Ok(keccak256(text.as_bytes())),
                Value::Bytes(bytes) | Value::FixedBytes(bytes) => Ok(keccak256(bytes)),
                other => Err(AbiError::mismatch("string or bytes", other.kind_name())),
            },
            IndexedCodec::HashedArray(element) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| AbiError::mismatch("array", value.kind_name()))?;
                let mut parts = Vec::new();
                for item in items {
                    parts.extend(element.encode(item)?);
                }
                Ok(keccak256(parts))
            }
            IndexedCodec::HashedTuple(components) => {
                let mut parts = Vec::new();
                for (i, (name, codec)) in components.iter().enumerate() {
                    let member = match value {
                        Value::Record(_) => value.get(name),
                        _ => value.at(i),
                    }
                    .ok_or_else(|| {
                        AbiError::mismatch(format!("tuple member `{}`", name), "nothing")
                    })?;
                    parts.extend(codec.encode(member)?);
                }
                Ok(keccak256(parts))
            }
        }
    }
}

/// Values for [`EventBinding::topics`]; `None` matches any value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicValues {
    Positional(Vec<Option<Value>>),
    Named(Vec<(String, Option<Value>)>),
}

/// One bound event of a contract interface
#[derive(Debug, Clone)]
pub struct EventBinding {
    name: String,
    signature: String,
    topic: B256,
    anonymous: bool,
    inputs: Vec<Param>,
    named: bool,
    data: Option<ArgsCodec>,
    indexed: Vec<IndexedCodec>,
}

impl EventBinding {
    pub fn new(item: &AbiItem) -> Result<Self> {
        let named = item.inputs.iter().all(Param::has_name);
        let plain: Vec<Param> = item
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .cloned()
            .map(|mut p| {
                if !named {
                    p.name.clear();
                }
                p
            })
            .collect();
        let indexed = item
            .inputs
            .iter()
            .filter(|p| p.indexed)
            .map(IndexedCodec::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: item.name.clone(),
            signature: signature(item)?,
            topic: ev_sig_hash(item)?,
            anonymous: item.anonymous,
            inputs: item.inputs.clone(),
            named,
            data: compile_args(&plain)?,
            indexed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Topic zero of a non-anonymous event
    pub fn topic(&self) -> B256 {
        self.topic
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Decode a log into a tuple (or record when every input is named)
    ///
    /// Hashed indexed fields (`string`, `bytes`, tuples, arrays) come back as
    /// their raw 32-byte topic; they are never reconstructed.
    pub fn decode<T: AsRef<str>>(&self, topics: &[T], data: &str) -> Result<Value> {
        let data = decode_hex(data)?;
        let mut topics = topics.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
        if !self.anonymous {
            let first = topics
                .first()
                .ok_or_else(|| AbiError::structural("No signature on non-anonymous event"))?;
            if !strip_0x(first).eq_ignore_ascii_case(&hex::encode(self.topic)) {
                return Err(AbiError::structural(format!(
                    "Wrong signature: expected {} for {}",
                    encode_hex(self.topic),
                    self.signature
                )));
            }
            topics.remove(0);
        }
        if topics.len() != self.indexed.len() {
            return Err(AbiError::structural(format!(
                "Wrong topics length: expected {}, got {}",
                self.indexed.len(),
                topics.len()
            )));
        }

        let mut plain = match &self.data {
            Some(codec) => codec.decode_values(&data)?,
            None => Vec::new(),
        }
        .into_iter();
        let mut indexed = self
            .indexed
            .iter()
            .zip(topics)
            .map(|(codec, topic)| {
                let raw = decode_hex(topic)?;
                match codec {
                    IndexedCodec::Word(codec) => codec.decode(&raw),
                    _ => Ok(Value::FixedBytes(raw)),
                }
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter();

        let mut values = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let source = if input.indexed { &mut indexed } else { &mut plain };
            let value = source
                .next()
                .ok_or_else(|| AbiError::decode("event field missing from log"))?;
            values.push((input.name.clone(), value));
        }

        Ok(if self.named {
            Value::Record(values)
        } else {
            Value::Tuple(values.into_iter().map(|(_, v)| v).collect())
        })
    }

    /// Topic filter for this event
    ///
    /// A value (or `None` for "any") is required for every declared input,
    /// indexed or not; non-indexed values are accepted and ignored.
    pub fn topics(&self, values: &TopicValues) -> Result<Vec<Option<String>>> {
        let count = match values {
            TopicValues::Positional(list) => list.len(),
            TopicValues::Named(list) => list.len(),
        };
        if count != self.inputs.len() {
            return Err(AbiError::structural(format!(
                "Wrong topics args: expected {} values, got {}",
                self.inputs.len(),
                count
            )));
        }

        let mut out = Vec::with_capacity(self.indexed.len() + 1);
        if !self.anonymous {
            out.push(Some(encode_hex(self.topic)));
        }
        let mut codecs = self.indexed.iter();
        for (i, input) in self.inputs.iter().enumerate() {
            if !input.indexed {
                continue;
            }
            let codec = codecs
                .next()
                .ok_or_else(|| AbiError::structural("indexed field without codec"))?;
            let value = match values {
                TopicValues::Positional(list) => list[i].as_ref(),
                TopicValues::Named(list) => list
                    .iter()
                    .find(|(name, _)| *name == input.name)
                    .ok_or_else(|| {
                        AbiError::structural(format!("missing topic value `{}`", input.name))
                    })?
                    .1
                    .as_ref(),
            };
            out.push(match value {
                Some(value) => Some(encode_hex(codec.topic(value)?)),
                None => None,
            });
        }
        Ok(out)
    }
}

/// Named events of one interface
///
/// Unnamed events are skipped; overloaded names are keyed by canonical signature.
#[derive(Debug, Clone)]
pub struct Events {
    events: BTreeMap<String, EventBinding>,
}

impl Events {
    pub fn new(abi: &[AbiItem]) -> Result<Self> {
        let named = || abi.iter().filter(|item| item.is_event() && !item.name.is_empty());
        let mut name_count: HashMap<&str, usize> = HashMap::new();
        for item in named() {
            *name_count.entry(item.name.as_str()).or_default() += 1;
        }

        let mut events = BTreeMap::new();
        for item in named() {
            let binding = EventBinding::new(item)?;
            let key = if name_count[item.name.as_str()] > 1 {
                binding.signature.clone()
            } else {
                binding.name.clone()
            };
            if events.contains_key(&key) {
                warn!(key = %key, "duplicate event in interface, keeping the last one");
            }
            events.insert(key, binding);
        }
        Ok(Self { events })
    }

    pub fn event(&self, key: &str) -> Option<&EventBinding> {
        self.events.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
