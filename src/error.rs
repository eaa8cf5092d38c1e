//! Error taxonomy shared by the codec, binders and the dispatch registry

use thiserror::Error;

/// Errors raised while compiling descriptors or encoding/decoding payloads
///
/// Lookup misses are never errors: registry operations return `None` instead.
#[derive(Debug, Error)]
pub enum AbiError {
    /// Malformed or unknown type descriptor, duplicate field name, zero-size array element
    #[error("invalid descriptor `{descriptor}`: {reason}")]
    Validation { descriptor: String, reason: String },

    /// Integer value outside the declared bit width
    #[error("value {value} out of bounds for {ty}")]
    Bounds { ty: String, value: String },

    /// Wrong topic count, signature topic mismatch, missing call target
    #[error("{0}")]
    Structural(String),

    /// Payload bytes that cannot be decoded with the compiled codec
    #[error("decode error: {0}")]
    Decode(String),

    /// Value shape does not match the codec it is encoded with
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid interface json: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by the network capability
    #[error("network call failed: {0:#}")]
    Network(#[source] anyhow::Error),

    /// Failure reported by a call hook
    #[error("hook failed: {0:#}")]
    Hook(#[source] anyhow::Error),
}

impl AbiError {
    pub(crate) fn validation(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        AbiError::Validation {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bounds(ty: impl Into<String>, value: impl ToString) -> Self {
        AbiError::Bounds {
            ty: ty.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn structural(message: impl Into<String>) -> Self {
        AbiError::Structural(message.into())
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        AbiError::Decode(message.into())
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        AbiError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type Result<T, E = AbiError> = std::result::Result<T, E>;
