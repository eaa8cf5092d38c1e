//! Out-of-line codecs: byte strings, strings and arrays

use super::buffer::{padding, push_padded, usize_word, Reader, WORD};
use super::composite::{decode_sequence, encode_sequence};
use super::Codec;
use crate::domain::abi::Value;
use crate::error::{AbiError, Result};

/// Length-prefixed payload, right-padded to a word boundary
fn encode_payload(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&usize_word(bytes.len()));
    push_padded(out, bytes);
}

fn decode_payload<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8]> {
    let len = reader.read_usize()?;
    let payload = reader.read(len)?;
    reader.read(padding(len))?;
    Ok(payload)
}

pub(crate) fn encode_bytes(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let bytes = value
        .as_bytes()
        .ok_or_else(|| AbiError::mismatch("bytes", value.kind_name()))?;
    encode_payload(bytes, out);
    Ok(())
}

pub(crate) fn decode_bytes(reader: &mut Reader<'_>) -> Result<Value> {
    Ok(Value::Bytes(decode_payload(reader)?.to_vec()))
}

pub(crate) fn encode_string(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let text = value
        .as_str()
        .ok_or_else(|| AbiError::mismatch("string", value.kind_name()))?;
    encode_payload(text.as_bytes(), out);
    Ok(())
}

pub(crate) fn decode_string(reader: &mut Reader<'_>) -> Result<Value> {
    let payload = decode_payload(reader)?;
    let text = std::str::from_utf8(payload)
        .map_err(|err| AbiError::decode(format!("invalid utf-8 string: {}", err)))?;
    Ok(Value::String(text.to_string()))
}

/// Array of `element`; `len` is `Some` for fixed-length arrays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCodec {
    pub(crate) element: Box<Codec>,
    pub(crate) len: Option<usize>,
    pub(crate) size: Option<usize>,
}

impl ArrayCodec {
    pub fn element(&self) -> &Codec {
        &self.element
    }

    /// Declared length of a fixed array
    pub fn len(&self) -> Option<usize> {
        self.len
    }

    pub(crate) fn encode_body(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        let Value::Array(items) = value else {
            return Err(AbiError::mismatch(self.describe(), value.kind_name()));
        };
        match self.len {
            Some(len) if len != items.len() => {
                return Err(AbiError::mismatch(
                    self.describe(),
                    format!("array of {} elements", items.len()),
                ));
            }
            Some(_) => {}
            None => out.extend_from_slice(&usize_word(items.len())),
        }
        let pairs: Vec<(&Codec, &Value)> = items.iter().map(|item| (&*self.element, item)).collect();
        encode_sequence(&pairs, out)
    }

    pub(crate) fn decode_body(&self, reader: &mut Reader<'_>) -> Result<Value> {
        let count = match self.len {
            Some(len) => len,
            None => reader.read_usize()?,
        };
        let head = self.element.size().unwrap_or(WORD);
        // Every element needs at least its head in the remaining bytes
        if count.saturating_mul(head) > reader.remaining() {
            return Err(AbiError::decode(format!(
                "array count {} exceeds remaining {} bytes",
                count,
                reader.remaining()
            )));
        }
        let items = decode_sequence(std::iter::repeat(&*self.element).take(count), reader)?;
        Ok(Value::Array(items))
    }

    fn describe(&self) -> String {
        match self.len {
            Some(len) => format!("{}[{}]", self.element, len),
            None => format!("{}[]", self.element),
        }
    }
}
