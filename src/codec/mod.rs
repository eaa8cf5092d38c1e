//! Binary layout engine
//!
//! Every static unit occupies whole 32-byte words. Dynamic values (strings,
//! byte strings, dynamic arrays and any composite holding one) live out of
//! line and are referenced from the head by a 32-byte offset pointer.

mod buffer;
mod compiler;
mod composite;
mod dynamic;
mod primitive;

use std::fmt;

pub use buffer::WORD;
pub use compiler::{compile, compile_kind, compile_type};
pub use composite::{ArgsCodec, TupleCodec, TupleField};
pub use dynamic::ArrayCodec;

use buffer::Reader;
use composite::{decode_sequence, encode_sequence};

use crate::domain::abi::Value;
use crate::error::Result;

/// A compiled codec for one type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    Uint(usize),
    Int(usize),
    Address,
    Bool,
    FixedBytes(usize),
    Bytes,
    String,
    Array(ArrayCodec),
    Tuple(TupleCodec),
}

impl Codec {
    /// Encoded byte size, `None` when dynamic
    pub fn size(&self) -> Option<usize> {
        match self {
            Codec::Uint(_) | Codec::Int(_) | Codec::Address | Codec::Bool | Codec::FixedBytes(_) => {
                Some(WORD)
            }
            Codec::Bytes | Codec::String => None,
            Codec::Array(array) => array.size,
            Codec::Tuple(tuple) => tuple.size(),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.size().is_none()
    }

    /// Encode as a standalone parameter: dynamic values get a leading pointer word
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        encode_sequence(&[(self, value)], &mut out)?;
        Ok(out)
    }

    /// Inverse of [`Codec::encode`]
    pub fn decode(&self, data: &[u8]) -> Result<Value> {
        let mut values = decode_sequence(std::iter::once(self), &mut Reader::new(data))?;
        Ok(values.remove(0))
    }

    /// Encode the value itself, without a pointer
    pub(crate) fn encode_body(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Codec::Uint(bits) => primitive::encode_uint(*bits, value, out),
            Codec::Int(bits) => primitive::encode_int(*bits, value, out),
            Codec::Address => primitive::encode_address(value, out),
            Codec::Bool => primitive::encode_bool(value, out),
            Codec::FixedBytes(n) => primitive::encode_fixed_bytes(*n, value, out),
            Codec::Bytes => dynamic::encode_bytes(value, out),
            Codec::String => dynamic::encode_string(value, out),
            Codec::Array(array) => array.encode_body(value, out),
            Codec::Tuple(tuple) => tuple.encode_body(value, out),
        }
    }

    pub(crate) fn decode_body(&self, reader: &mut Reader<'_>) -> Result<Value> {
        match self {
            Codec::Uint(bits) => primitive::decode_uint(*bits, reader),
            Codec::Int(bits) => primitive::decode_int(*bits, reader),
            Codec::Address => primitive::decode_address(reader),
            Codec::Bool => primitive::decode_bool(reader),
            Codec::FixedBytes(n) => primitive::decode_fixed_bytes(*n, reader),
            Codec::Bytes => dynamic::decode_bytes(reader),
            Codec::String => dynamic::decode_string(reader),
            Codec::Array(array) => array.decode_body(reader),
            Codec::Tuple(tuple) => tuple.decode_body(reader),
        }
    }
}

/// Canonical type string of the compiled codec
impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Uint(bits) => write!(f, "uint{}", bits),
            Codec::Int(bits) => write!(f, "int{}", bits),
            Codec::Address => f.write_str("address"),
            Codec::Bool => f.write_str("bool"),
            Codec::FixedBytes(n) => write!(f, "bytes{}", n),
            Codec::Bytes => f.write_str("bytes"),
            Codec::String => f.write_str("string"),
            Codec::Array(array) => match array.len {
                Some(len) => write!(f, "{}[{}]", array.element, len),
                None => write!(f, "{}[]", array.element),
            },
            Codec::Tuple(tuple) => write!(f, "{}", tuple),
        }
    }
}
