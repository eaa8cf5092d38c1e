//! Descriptor compiler: type descriptors to codecs

use super::composite::{TupleCodec, TupleField};
use super::dynamic::ArrayCodec;
use super::Codec;
use crate::domain::abi::{Param, TypeKind};
use crate::error::{AbiError, Result};

/// Compile a parameter descriptor (type string plus tuple components)
pub fn compile(param: &Param) -> Result<Codec> {
    compile_kind(&TypeKind::from_param(param)?)
}

/// Compile a non-tuple type string such as `uint256[2][]`
pub fn compile_type(ty: &str) -> Result<Codec> {
    compile_kind(&TypeKind::parse(ty, &[])?)
}

/// Structural recursion over a parsed descriptor
pub fn compile_kind(kind: &TypeKind) -> Result<Codec> {
    let codec = match kind {
        TypeKind::Uint(bits) => Codec::Uint(*bits),
        TypeKind::Int(bits) => Codec::Int(*bits),
        TypeKind::Address => Codec::Address,
        TypeKind::Bool => Codec::Bool,
        TypeKind::FixedBytes(n) => Codec::FixedBytes(*n),
        TypeKind::Bytes => Codec::Bytes,
        TypeKind::String => Codec::String,
        TypeKind::FixedArray(len, inner) => Codec::Array(array(kind, inner, Some(*len))?),
        TypeKind::Array(inner) => Codec::Array(array(kind, inner, None)?),
        TypeKind::Tuple(fields) => {
            let fields = fields
                .iter()
                .map(|field| {
                    Ok(TupleField {
                        name: field.name.clone(),
                        codec: compile_kind(&field.kind)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Codec::Tuple(TupleCodec::new(fields, &kind.to_string())?)
        }
    };
    Ok(codec)
}

fn array(kind: &TypeKind, inner: &TypeKind, len: Option<usize>) -> Result<ArrayCodec> {
    let element = compile_kind(inner)?;
    // Zero-size elements would let a tiny payload claim unbounded repetition
    if element.size() == Some(0) {
        return Err(AbiError::validation(
            kind.to_string(),
            "arrays of zero-size elements disabled",
        ));
    }
    let size = match (len, element.size()) {
        (Some(len), Some(elem)) => Some(len.checked_mul(elem).ok_or_else(|| {
            AbiError::validation(kind.to_string(), "fixed array size overflows")
        })?),
        // Dynamic elements (or a dynamic length) make the whole array dynamic
        _ => None,
    };
    Ok(ArrayCodec {
        element: Box::new(element),
        len,
        size,
    })
}
