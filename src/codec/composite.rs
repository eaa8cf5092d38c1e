//! Tuples, head/tail sequences and argument lists

use std::collections::HashSet;

use super::buffer::{usize_word, Reader, WORD};
use super::Codec;
use crate::domain::abi::{Param, Value};
use crate::error::{AbiError, Result};

/// Encode values in head/tail layout
///
/// Static members are inlined in the head; dynamic members leave a pointer
/// (relative to the start of this sequence) and are appended to the tail.
pub(crate) fn encode_sequence(items: &[(&Codec, &Value)], out: &mut Vec<u8>) -> Result<()> {
    let head_len = items
        .iter()
        .try_fold(0usize, |acc, (codec, _)| {
            acc.checked_add(codec.size().unwrap_or(WORD))
        })
        .ok_or_else(|| AbiError::decode("sequence head size overflows"))?;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (codec, value) in items {
        if codec.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            codec.encode_body(value, &mut tail)?;
        } else {
            codec.encode_body(value, &mut head)?;
        }
    }
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    Ok(())
}

/// Decode a head/tail sequence starting at the reader's position
pub(crate) fn decode_sequence<'c>(
    codecs: impl Iterator<Item = &'c Codec>,
    reader: &mut Reader<'_>,
) -> Result<Vec<Value>> {
    let base = reader.region();
    // never trust a declared count for the allocation; each value takes at least a word
    let mut values = Vec::with_capacity(codecs.size_hint().0.min(reader.remaining() / WORD));
    for codec in codecs {
        let value = if codec.is_dynamic() {
            let offset = reader.read_usize()?;
            let mut target = base.jump(offset)?;
            codec.decode_body(&mut target)?
        } else {
            codec.decode_body(reader)?
        };
        values.push(value);
    }
    Ok(values)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleField {
    pub name: Option<String>,
    pub codec: Codec,
}

/// Ordered members; keyed record when every member is named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleCodec {
    fields: Vec<TupleField>,
    named: bool,
    size: Option<usize>,
}

impl TupleCodec {
    /// `descriptor` is only used in error messages
    pub(crate) fn new(fields: Vec<TupleField>, descriptor: &str) -> Result<Self> {
        let named = !fields.is_empty() && fields.iter().all(|f| f.name.is_some());
        if named {
            let mut seen = HashSet::new();
            for name in fields.iter().filter_map(|f| f.name.as_deref()) {
                if !seen.insert(name) {
                    return Err(AbiError::validation(
                        descriptor,
                        format!("same field name={}", name),
                    ));
                }
            }
        }
        let mut head = 0usize;
        let mut dynamic = false;
        for field in &fields {
            dynamic |= field.codec.is_dynamic();
            head = head
                .checked_add(field.codec.size().unwrap_or(WORD))
                .ok_or_else(|| AbiError::validation(descriptor, "tuple size overflows"))?;
        }
        let size = (!dynamic).then_some(head);
        Ok(Self {
            fields,
            named,
            size,
        })
    }

    pub fn fields(&self) -> &[TupleField] {
        &self.fields
    }

    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// Pair each field with its value from a positional tuple or a named record
    fn pair<'a>(&'a self, value: &'a Value) -> Result<Vec<(&'a Codec, &'a Value)>> {
        match value {
            Value::Tuple(items) if items.len() == self.fields.len() => Ok(self
                .fields
                .iter()
                .map(|f| &f.codec)
                .zip(items.iter())
                .collect()),
            Value::Record(_) if self.named => self
                .fields
                .iter()
                .map(|f| {
                    let name = f.name.as_deref().unwrap_or_default();
                    value
                        .get(name)
                        .map(|v| (&f.codec, v))
                        .ok_or_else(|| AbiError::mismatch(format!("field `{}`", name), "nothing"))
                })
                .collect(),
            other => Err(AbiError::mismatch(
                format!("{} with {} fields", self, self.fields.len()),
                match other.len() {
                    Some(n) => format!("{} of {}", other.kind_name(), n),
                    None => other.kind_name().to_string(),
                },
            )),
        }
    }

    pub(crate) fn encode_body(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        encode_sequence(&self.pair(value)?, out)
    }

    pub(crate) fn decode_values(&self, reader: &mut Reader<'_>) -> Result<Vec<Value>> {
        decode_sequence(self.fields.iter().map(|f| &f.codec), reader)
    }

    pub(crate) fn decode_body(&self, reader: &mut Reader<'_>) -> Result<Value> {
        let values = self.decode_values(reader)?;
        Ok(self.shape(values))
    }

    /// Positional values into a tuple or record
    pub(crate) fn shape(&self, values: Vec<Value>) -> Value {
        if self.named {
            Value::Record(
                self.fields
                    .iter()
                    .zip(values)
                    .map(|(f, v)| (f.name.clone().unwrap_or_default(), v))
                    .collect(),
            )
        } else {
            Value::Tuple(values)
        }
    }
}

impl std::fmt::Display for TupleCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", field.codec)?;
        }
        f.write_str(")")
    }
}

/// Codec for a function/event argument list
///
/// A list with exactly one entry takes and returns that value directly;
/// longer lists use a tuple, or a record when every entry is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgsCodec {
    tuple: TupleCodec,
}

impl ArgsCodec {
    pub fn new(params: &[Param]) -> Result<Self> {
        let fields = params
            .iter()
            .map(|param| {
                Ok(TupleField {
                    name: param.has_name().then(|| param.name.clone()),
                    codec: super::compile(param)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let descriptor = params
            .iter()
            .map(|p| p.ty.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Ok(Self {
            tuple: TupleCodec::new(fields, &format!("({})", descriptor))?,
        })
    }

    pub fn len(&self) -> usize {
        self.tuple.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuple.fields.is_empty()
    }

    pub fn is_named(&self) -> bool {
        self.tuple.named
    }

    fn is_single(&self) -> bool {
        self.tuple.fields.len() == 1
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        if self.is_single() {
            encode_sequence(&[(&self.tuple.fields[0].codec, value)], &mut out)?;
        } else {
            self.tuple.encode_body(value, &mut out)?;
        }
        Ok(out)
    }

    /// Decoded values in declaration order
    pub fn decode_values(&self, data: &[u8]) -> Result<Vec<Value>> {
        self.tuple.decode_values(&mut Reader::new(data))
    }

    pub fn decode(&self, data: &[u8]) -> Result<Value> {
        let mut values = self.decode_values(data)?;
        if self.is_single() {
            if let Some(value) = values.pop() {
                return Ok(value);
            }
        }
        Ok(self.tuple.shape(values))
    }
}
