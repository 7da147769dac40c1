// Path: crates/api/src/wallet.rs
//! Defines the `WalletProvider` trait for the injected browser wallet.

use async_trait::async_trait;
use ballot_types::config::NetworkConfig;
use ballot_types::error::ProviderError;
use ballot_types::{Address, U256};
use std::fmt::Debug;
use tokio::sync::mpsc;

/// A notification pushed by the wallet outside of any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The set of accounts exposed to the application changed. An empty
    /// list means the user revoked access or locked the wallet.
    AccountsChanged(Vec<Address>),
    /// The wallet switched to another chain.
    ChainChanged(u64),
}

/// Handle returned by [`WalletProvider::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The channel a listener receives wallet notifications on.
pub type WalletEventSink = mpsc::UnboundedSender<WalletEvent>;

/// The signing capability handed out by the connection manager.
///
/// Writes are attributed to `address`; `chain_id` is the network the wallet
/// was on when the handle was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signer {
    pub address: Address,
    pub chain_id: u64,
}

/// The EIP-1193 surface the connection manager needs from a wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync + Debug {
    /// Prompts the user for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Returns already-authorised accounts without prompting (`eth_accounts`).
    async fn current_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// The chain the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Native balance of `address` in wei.
    async fn balance(&self, address: Address) -> Result<U256, ProviderError>;

    /// Asks the wallet to switch chains (`wallet_switchEthereumChain`).
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// Registers a network definition (`wallet_addEthereumChain`).
    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError>;

    /// Registers a listener for account and chain notifications.
    fn subscribe(&self, sink: WalletEventSink) -> ListenerId;

    /// Removes a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}
