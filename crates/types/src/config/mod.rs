// Path: crates/types/src/config/mod.rs
//! Deployment configuration consumed by the connection manager and gateway.
use crate::error::ConfigError;
use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The Sepolia testnet chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Native currency descriptor supplied when registering a network with the wallet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    /// Display name.
    pub name: String,
    /// Ticker symbol, 2 to 6 characters.
    pub symbol: String,
    /// Decimal places of the smallest unit.
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: "ETH".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// The network the voting contract is deployed on.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The chain the contract lives on. Writes are refused elsewhere.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Name shown to users and passed to the wallet.
    #[serde(default = "default_chain_name")]
    pub chain_name: String,
    /// Currency passed to `wallet_addEthereumChain`.
    #[serde(default)]
    pub native_currency: NativeCurrency,
    /// RPC endpoints offered when adding the network to a wallet.
    #[serde(default = "default_rpc_urls")]
    pub rpc_urls: Vec<String>,
    /// Explorer base URLs. The first one is used for transaction links.
    #[serde(default = "default_block_explorer_urls")]
    pub block_explorer_urls: Vec<String>,
}

fn default_chain_id() -> u64 {
    SEPOLIA_CHAIN_ID
}
fn default_chain_name() -> String {
    "Sepolia Test Network".to_string()
}
fn default_rpc_urls() -> Vec<String> {
    vec!["https://sepolia.infura.io/v3/".to_string()]
}
fn default_block_explorer_urls() -> Vec<String> {
    vec!["https://sepolia.etherscan.io/".to_string()]
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            chain_name: default_chain_name(),
            native_currency: NativeCurrency::default(),
            rpc_urls: default_rpc_urls(),
            block_explorer_urls: default_block_explorer_urls(),
        }
    }
}

impl NetworkConfig {
    /// The chain id in the `0x`-prefixed hex form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Explorer link for a transaction, using the first configured explorer.
    pub fn explorer_tx_url(&self, tx_hash: &TxHash) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }
}

/// Top-level configuration for a Ballot client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BallotConfig {
    /// Address of the deployed voting contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: Address,
    /// The required network.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Period of the background balance refresh while connected.
    #[serde(default = "default_balance_refresh_secs")]
    pub balance_refresh_secs: u64,
    /// Safety margin added on top of the raw gas estimate for votes.
    #[serde(default = "default_gas_margin_percent")]
    pub gas_margin_percent: u64,
    /// Shown to users who have no wallet installed.
    #[serde(default = "default_wallet_install_url")]
    pub wallet_install_url: String,
}

fn default_contract_address() -> Address {
    Address::new([
        0xf6, 0xbc, 0x8b, 0x2b, 0x57, 0x41, 0x94, 0xa8, 0x99, 0x30, 0x20, 0x47, 0xb9, 0xc9, 0x59,
        0x67, 0x51, 0x4a, 0x76, 0x11,
    ])
}
fn default_balance_refresh_secs() -> u64 {
    30
}
fn default_gas_margin_percent() -> u64 {
    20
}
fn default_wallet_install_url() -> String {
    "https://metamask.io/download/".to_string()
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            contract_address: default_contract_address(),
            network: NetworkConfig::default(),
            balance_refresh_secs: default_balance_refresh_secs(),
            gas_margin_percent: default_gas_margin_percent(),
            wallet_install_url: default_wallet_install_url(),
        }
    }
}

impl BallotConfig {
    /// Parses and validates a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Rejects configurations the client cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.chain_id == 0 {
            return Err(ConfigError::Invalid("network.chain_id must be non-zero".into()));
        }
        if self.network.rpc_urls.is_empty() {
            return Err(ConfigError::Invalid(
                "network.rpc_urls must list at least one endpoint".into(),
            ));
        }
        if self.balance_refresh_secs == 0 {
            return Err(ConfigError::Invalid(
                "balance_refresh_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Applies the configured safety margin to a raw gas estimate.
    pub fn gas_limit_with_margin(&self, estimate: u64) -> u64 {
        let factor = u128::from(100u64.saturating_add(self.gas_margin_percent));
        let scaled = u128::from(estimate) * factor / 100;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}
