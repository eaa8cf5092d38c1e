//! Single-word codecs: integers, booleans, addresses, fixed-size byte strings

use alloy_primitives::{Address, I256, U256};

use super::buffer::{Reader, WORD};
use crate::domain::abi::Value;
use crate::error::{AbiError, Result};

/// Unsigned value fits in `bits`
fn uint_in_bounds(value: U256, bits: usize) -> bool {
    value.bit_len() <= bits
}

/// Signed value lies in [-2^(bits-1), 2^(bits-1) - 1]
fn int_in_bounds(value: I256, bits: usize) -> bool {
    let raw = value.into_raw();
    let magnitude = if value.is_negative() { !raw } else { raw };
    magnitude.bit_len() < bits
}

pub(crate) fn encode_uint(bits: usize, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let Value::Uint(v) = value else {
        return Err(AbiError::mismatch(format!("uint{}", bits), value.kind_name()));
    };
    if !uint_in_bounds(*v, bits) {
        return Err(AbiError::bounds(format!("uint{}", bits), v));
    }
    out.extend_from_slice(&v.to_be_bytes::<WORD>());
    Ok(())
}

pub(crate) fn decode_uint(bits: usize, reader: &mut Reader<'_>) -> Result<Value> {
    let v = U256::from_be_slice(reader.read_word()?);
    if !uint_in_bounds(v, bits) {
        return Err(AbiError::bounds(format!("uint{}", bits), v));
    }
    Ok(Value::Uint(v))
}

pub(crate) fn encode_int(bits: usize, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let Value::Int(v) = value else {
        return Err(AbiError::mismatch(format!("int{}", bits), value.kind_name()));
    };
    if !int_in_bounds(*v, bits) {
        return Err(AbiError::bounds(format!("int{}", bits), v));
    }
    out.extend_from_slice(&v.into_raw().to_be_bytes::<WORD>());
    Ok(())
}

pub(crate) fn decode_int(bits: usize, reader: &mut Reader<'_>) -> Result<Value> {
    let v = I256::from_raw(U256::from_be_slice(reader.read_word()?));
    if !int_in_bounds(v, bits) {
        return Err(AbiError::bounds(format!("int{}", bits), v));
    }
    Ok(Value::Int(v))
}

pub(crate) fn encode_address(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let Value::Address(address) = value else {
        return Err(AbiError::mismatch("address", value.kind_name()));
    };
    out.extend_from_slice(&[0u8; WORD - 20]);
    out.extend_from_slice(address.as_slice());
    Ok(())
}

pub(crate) fn decode_address(reader: &mut Reader<'_>) -> Result<Value> {
    let word = reader.read_word()?;
    if word[..WORD - 20].iter().any(|b| *b != 0) {
        return Err(AbiError::decode("address word has non-zero padding"));
    }
    Ok(Value::Address(Address::from_slice(&word[WORD - 20..])))
}

pub(crate) fn encode_bool(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let Value::Bool(flag) = value else {
        return Err(AbiError::mismatch("bool", value.kind_name()));
    };
    let mut word = [0u8; WORD];
    word[WORD - 1] = u8::from(*flag);
    out.extend_from_slice(&word);
    Ok(())
}

pub(crate) fn decode_bool(reader: &mut Reader<'_>) -> Result<Value> {
    let word = reader.read_word()?;
    if word[..WORD - 1].iter().any(|b| *b != 0) {
        return Err(AbiError::decode("bool word has non-zero padding"));
    }
    match word[WORD - 1] {
        0 => Ok(Value::Bool(false)),
        1 => Ok(Value::Bool(true)),
        other => Err(AbiError::decode(format!("invalid bool byte {:#04x}", other))),
    }
}

pub(crate) fn encode_fixed_bytes(size: usize, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    let bytes = match value {
        Value::FixedBytes(bytes) | Value::Bytes(bytes) if bytes.len() == size => bytes,
        other => {
            let found = match other.as_bytes() {
                Some(bytes) => format!("{} bytes", bytes.len()),
                None => other.kind_name().to_string(),
            };
            return Err(AbiError::mismatch(format!("bytes{}", size), found));
        }
    };
    out.extend_from_slice(bytes);
    out.resize(out.len() + WORD - size, 0);
    Ok(())
}

pub(crate) fn decode_fixed_bytes(size: usize, reader: &mut Reader<'_>) -> Result<Value> {
    let word = reader.read_word()?;
    Ok(Value::FixedBytes(word[..size].to_vec()))
}
