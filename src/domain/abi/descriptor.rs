//! Interface descriptors in the standard JSON ABI shape

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A function/event parameter or a tuple component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// Parameter name (may be empty)
    #[serde(default)]
    pub name: String,
    /// Type descriptor (e.g., "uint256", "tuple[]", "bytes32[2]")
    #[serde(rename = "type")]
    pub ty: String,
    /// Tuple components, only meaningful for `tuple` types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Param>,
    /// Event parameters only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            components: Vec::new(),
            indexed: false,
            internal_type: None,
        }
    }

    /// Unnamed parameter
    pub fn unnamed(ty: impl Into<String>) -> Self {
        Self::new("", ty)
    }

    /// Tuple parameter; `ty` may carry an array suffix such as `tuple[]`
    pub fn tuple(name: impl Into<String>, ty: impl Into<String>, components: Vec<Param>) -> Self {
        Self {
            components,
            ..Self::new(name, ty)
        }
    }

    /// Mark as an indexed event field
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Kind of an interface entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Function,
    Event,
    Constructor,
    Fallback,
    Receive,
    Error,
}

/// One entry of a contract interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiItem {
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub outputs: Vec<Param>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

impl AbiItem {
    pub fn function(name: impl Into<String>, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        Self {
            kind: ItemKind::Function,
            name: name.into(),
            inputs,
            outputs,
            anonymous: false,
            state_mutability: None,
        }
    }

    pub fn event(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        Self {
            kind: ItemKind::Event,
            ..Self::function(name, inputs, Vec::new())
        }
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn is_function(&self) -> bool {
        self.kind == ItemKind::Function
    }

    pub fn is_event(&self) -> bool {
        self.kind == ItemKind::Event
    }

    /// Name used for signatures; unnamed functions fall back to `function`
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "function"
        } else {
            &self.name
        }
    }
}

/// A full contract interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interface {
    pub items: Vec<AbiItem>,
}

impl Interface {
    pub fn new(items: Vec<AbiItem>) -> Self {
        Self { items }
    }

    /// Parse JSON ABI: either a raw array or a build artifact with an `abi` field
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let abi_value = match value {
            serde_json::Value::Object(mut map) if map.contains_key("abi") => {
                map.remove("abi").unwrap_or_default()
            }
            other => other,
        };
        Ok(serde_json::from_value(abi_value)?)
    }

    pub fn functions(&self) -> impl Iterator<Item = &AbiItem> {
        self.items.iter().filter(|item| item.is_function())
    }

    pub fn events(&self) -> impl Iterator<Item = &AbiItem> {
        self.items.iter().filter(|item| item.is_event())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<AbiItem>> for Interface {
    fn from(items: Vec<AbiItem>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for Interface {
    type Item = AbiItem;
    type IntoIter = std::vec::IntoIter<AbiItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
