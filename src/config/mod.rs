use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::builtin;
use crate::domain::abi::{ContractInfo, Interface, TokenStandard};
use crate::infrastructure::abi::Decoder;
use crate::infrastructure::ethereum::ProviderConfig;
use crate::utils::normalize_address;

#[derive(Debug, Clone, Deserialize)]
pub struct ContractSpec {
    pub address: String,
    /// JSON ABI or build artifact; falls back to the built-in interface of `standard`
    pub abi_path: Option<PathBuf>,
    pub standard: Option<TokenStandard>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,

    /// HTTP, WebSocket or IPC endpoint
    pub rpc: Option<String>,
}

impl ContractSpec {
    pub fn normalized_address(&self) -> String {
        normalize_address(&self.address)
    }

    pub fn info(&self) -> ContractInfo {
        ContractInfo {
            standard: self.standard,
            symbol: self.symbol.clone().filter(|s| !s.trim().is_empty()),
            decimals: self.decimals,
            name: self.name.clone(),
            price: self.price,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Register every configured contract in a fresh decoder
    pub fn build_decoder(&self) -> Result<Decoder> {
        let mut decoder = Decoder::new();
        for spec in &self.contracts {
            if let Some(path) = &spec.abi_path {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read ABI {}", path.display()))?;
                let interface = Interface::from_json(&content)
                    .with_context(|| format!("Failed to parse ABI {}", path.display()))?;
                decoder
                    .add(&spec.address, interface)
                    .with_context(|| format!("Failed to register {}", spec.address))?;
            } else if let Some(standard) = spec.standard {
                match builtin::interface(standard) {
                    Some(entries) => {
                        decoder
                            .add(&spec.address, entries)
                            .with_context(|| format!("Failed to register {}", spec.address))?;
                    }
                    None => warn!(
                        contract = %spec.address,
                        ?standard,
                        "no built-in interface for standard, set abi_path"
                    ),
                }
            } else {
                debug!(contract = %spec.address, "no interface configured, skipping");
            }
        }
        Ok(decoder)
    }

    /// Contract metadata keyed by normalized address, as consumed by hints
    pub fn contract_infos(&self) -> HashMap<String, ContractInfo> {
        self.contracts
            .iter()
            .map(|spec| (spec.normalized_address(), spec.info()))
            .collect()
    }

    pub fn provider_config(&self) -> Option<Result<ProviderConfig>> {
        self.rpc.as_deref().map(ProviderConfig::from_endpoint)
    }

    /// Relative ABI paths are taken relative to the config file
    fn resolve_paths(&mut self, base: &Path) {
        for spec in &mut self.contracts {
            if let Some(path) = &spec.abi_path {
                if path.is_relative() {
                    spec.abi_path = Some(base.join(path));
                }
            }
        }
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    let mut config = match Config::from_toml(&content) {
        Ok(config) => config,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "ignoring malformed config");
            return Config::default();
        }
    };
    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }
    config
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("ABI_DISPATCH_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("abi-dispatch").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("abi-dispatch").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "abi-dispatch", "abi-dispatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::HintOptions;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("abi-dispatch-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml(
            r#"
            rpc = "http://localhost:8545"

            [[contracts]]
            address = "0xDAC17F958D2ee523a2206206994597C13D831ec7"
            standard = "erc20"
            symbol = "USDT"
            decimals = 6
            price = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.contracts.len(), 1);
        let infos = config.contract_infos();
        let info = &infos["dac17f958d2ee523a2206206994597c13d831ec7"];
        assert_eq!(info.decimals, Some(6));
        assert_eq!(info.standard, Some(TokenStandard::Erc20));
        assert!(matches!(
            config.provider_config(),
            Some(Ok(ProviderConfig::Http(_)))
        ));

        let decoder = config.build_decoder().unwrap();
        assert_eq!(decoder.len(), 1);
    }

    #[test]
    fn test_load_resolves_abi_path() {
        let dir = scratch_dir("load");
        fs::write(
            dir.join("token.json"),
            r#"{"abi":[{"type":"function","name":"ping","inputs":[],"outputs":[]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("config.toml"),
            "[[contracts]]\naddress = \"0x01\"\nabi_path = \"token.json\"\n",
        )
        .unwrap();

        let config = load_from(&dir.join("config.toml"));
        assert_eq!(config.contracts[0].abi_path, Some(dir.join("token.json")));
        let decoder = config.build_decoder().unwrap();
        assert_eq!(
            decoder.method("01", &crate::domain::abi::selector_of("ping()")[..]),
            Some("ping")
        );
        assert!(decoder
            .decode("0x01", &[0, 0, 0, 0], &HintOptions::new())
            .unwrap()
            .is_none());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_or_malformed_config() {
        let dir = scratch_dir("bad");
        assert!(load_from(&dir.join("absent.toml")).contracts.is_empty());

        fs::write(dir.join("bad.toml"), "contracts = 3").unwrap();
        let config = load_from(&dir.join("bad.toml"));
        assert!(config.contracts.is_empty());
        assert!(config.rpc.is_none());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_standard_without_builtin_registers_nothing() {
        let config = Config::from_toml(
            r#"
            [[contracts]]
            address = "0x03"
            standard = "erc721"
            symbol = "PUNK"
            "#,
        )
        .unwrap();
        assert!(crate::builtin::interface(TokenStandard::Erc721).is_none());
        assert!(config.build_decoder().unwrap().is_empty());
        // metadata is still available to hints
        assert_eq!(
            config.contract_infos()["03"].standard,
            Some(TokenStandard::Erc721)
        );
    }

    #[test]
    fn test_unreadable_abi_fails_build() {
        let config = Config {
            contracts: vec![ContractSpec {
                address: "0x02".to_string(),
                abi_path: Some(PathBuf::from("/nonexistent/abi.json")),
                standard: None,
                name: None,
                symbol: None,
                decimals: None,
                price: None,
            }],
            rpc: None,
        };
        assert!(config.build_decoder().is_err());
    }
}
