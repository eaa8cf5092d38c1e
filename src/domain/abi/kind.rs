//! Parsed type descriptors
//!
//! A descriptor string is parsed once into a [`TypeKind`] tree; codecs and
//! canonical signatures are then derived by structural recursion.

use std::fmt;

use super::Param;
use crate::error::{AbiError, Result};

/// Named member of a tuple type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Option<String>,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Uint(usize),
    Int(usize),
    Address,
    Bool,
    FixedBytes(usize),
    Bytes,
    String,
    Tuple(Vec<Field>),
    FixedArray(usize, Box<TypeKind>),
    Array(Box<TypeKind>),
}

impl TypeKind {
    /// Parse a parameter descriptor, including tuple components
    pub fn from_param(param: &Param) -> Result<Self> {
        Self::parse(&param.ty, &param.components)
    }

    /// Parse a type string; `components` is consulted for `tuple` bases
    pub fn parse(ty: &str, components: &[Param]) -> Result<Self> {
        let ty = ty.trim();
        if let Some(stripped) = ty.strip_suffix(']') {
            let open = stripped
                .rfind('[')
                .ok_or_else(|| AbiError::validation(ty, "unbalanced array brackets"))?;
            let inner = Self::parse(&stripped[..open], components)?;
            let len = &stripped[open + 1..];
            if len.is_empty() {
                return Ok(TypeKind::Array(Box::new(inner)));
            }
            let len = parse_digits(len).ok_or_else(|| {
                AbiError::validation(ty, format!("wrong array size `{}`", len))
            })?;
            return Ok(TypeKind::FixedArray(len, Box::new(inner)));
        }

        match ty {
            "string" => return Ok(TypeKind::String),
            "bytes" => return Ok(TypeKind::Bytes),
            "address" => return Ok(TypeKind::Address),
            "bool" => return Ok(TypeKind::Bool),
            "tuple" => return Self::parse_tuple(ty, components),
            _ => {}
        }

        if let Some(bits) = ty.strip_prefix("uint") {
            return parse_bits(ty, bits).map(TypeKind::Uint);
        }
        if let Some(bits) = ty.strip_prefix("int") {
            return parse_bits(ty, bits).map(TypeKind::Int);
        }
        if let Some(size) = ty.strip_prefix("bytes") {
            return match parse_digits(size) {
                Some(n) if (1..=32).contains(&n) => Ok(TypeKind::FixedBytes(n)),
                _ => Err(AbiError::validation(ty, "wrong bytes<N> size")),
            };
        }

        Err(AbiError::validation(ty, "unknown type"))
    }

    fn parse_tuple(ty: &str, components: &[Param]) -> Result<Self> {
        if components.is_empty() {
            return Err(AbiError::validation(ty, "tuple without components"));
        }
        let fields = components
            .iter()
            .map(|component| {
                Ok(Field {
                    name: component.has_name().then(|| component.name.clone()),
                    kind: Self::from_param(component)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TypeKind::Tuple(fields))
    }

    /// Fits in a single 32-byte word (and therefore in a single event topic)
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            TypeKind::Uint(_)
                | TypeKind::Int(_)
                | TypeKind::Address
                | TypeKind::Bool
                | TypeKind::FixedBytes(_)
        )
    }
}

/// Canonical type string: `uint` becomes `uint256`, tuples expand to `(a,b)`
impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Uint(bits) => write!(f, "uint{}", bits),
            TypeKind::Int(bits) => write!(f, "int{}", bits),
            TypeKind::Address => f.write_str("address"),
            TypeKind::Bool => f.write_str("bool"),
            TypeKind::FixedBytes(n) => write!(f, "bytes{}", n),
            TypeKind::Bytes => f.write_str("bytes"),
            TypeKind::String => f.write_str("string"),
            TypeKind::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field.kind)?;
                }
                f.write_str(")")
            }
            TypeKind::FixedArray(len, inner) => write!(f, "{}[{}]", inner, len),
            TypeKind::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// Plain decimal digits without sign or leading zeros
fn parse_digits(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0'))
    {
        return None;
    }
    s.parse().ok()
}

fn parse_bits(ty: &str, bits: &str) -> Result<usize> {
    if bits.is_empty() {
        return Ok(256);
    }
    match parse_digits(bits) {
        Some(n) if n > 0 && n <= 256 && n % 8 == 0 => Ok(n),
        _ => Err(AbiError::validation(ty, "invalid numeric type")),
    }
}
