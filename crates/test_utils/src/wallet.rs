// Path: crates/test_utils/src/wallet.rs
//! An in-memory wallet that behaves like an injected EIP-1193 provider.

use crate::fixtures::{addr, ether};
use crate::lock;
use async_trait::async_trait;
use ballot_api::wallet::{ListenerId, WalletEvent, WalletEventSink, WalletProvider};
use ballot_types::config::{NetworkConfig, SEPOLIA_CHAIN_ID};
use ballot_types::error::ProviderError;
use ballot_types::{Address, U256};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug)]
struct WalletInner {
    accounts: Vec<Address>,
    authorized: bool,
    chain_id: u64,
    known_chains: HashSet<u64>,
    balances: HashMap<Address, U256>,
    request_error: Option<ProviderError>,
    switch_error: Option<ProviderError>,
    add_error: Option<ProviderError>,
    balance_error: Option<ProviderError>,
    listeners: BTreeMap<u64, WalletEventSink>,
    next_listener: u64,
    calls: Vec<String>,
}

/// A scriptable wallet.
///
/// By default it exposes one account (`addr(1)`) holding 1 ETH, sits on
/// Sepolia, and knows about mainnet and Sepolia. Account access must be
/// granted through `request_accounts` before `current_accounts` reports it,
/// unless built with [`MockWallet::pre_authorized`].
#[derive(Debug)]
pub struct MockWallet {
    inner: Mutex<WalletInner>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    pub fn new() -> Self {
        let account = addr(1);
        Self {
            inner: Mutex::new(WalletInner {
                accounts: vec![account],
                authorized: false,
                chain_id: SEPOLIA_CHAIN_ID,
                known_chains: HashSet::from([1, SEPOLIA_CHAIN_ID]),
                balances: HashMap::from([(account, ether(1))]),
                request_error: None,
                switch_error: None,
                add_error: None,
                balance_error: None,
                listeners: BTreeMap::new(),
                next_listener: 0,
                calls: Vec::new(),
            }),
        }
    }

    /// A wallet that already granted access in a previous session.
    pub fn pre_authorized(self) -> Self {
        lock(&self.inner).authorized = true;
        self
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        lock(&self.inner).accounts = accounts;
        self
    }

    pub fn on_chain(self, chain_id: u64) -> Self {
        {
            let mut inner = lock(&self.inner);
            inner.chain_id = chain_id;
            inner.known_chains.insert(chain_id);
        }
        self
    }

    /// Removes `chain_id` from the wallet's known networks so switching to it
    /// fails with code 4902 until it is added.
    pub fn without_chain(self, chain_id: u64) -> Self {
        lock(&self.inner).known_chains.remove(&chain_id);
        self
    }

    pub fn set_balance(&self, account: Address, balance: U256) {
        lock(&self.inner).balances.insert(account, balance);
    }

    pub fn fail_requests_with(&self, err: ProviderError) {
        lock(&self.inner).request_error = Some(err);
    }

    pub fn fail_switch_with(&self, err: ProviderError) {
        lock(&self.inner).switch_error = Some(err);
    }

    pub fn fail_add_with(&self, err: ProviderError) {
        lock(&self.inner).add_error = Some(err);
    }

    pub fn fail_balance_with(&self, err: Option<ProviderError>) {
        lock(&self.inner).balance_error = err;
    }

    /// Replaces the exposed accounts and notifies listeners, as a wallet does
    /// when the user switches or disconnects accounts.
    pub fn change_accounts(&self, accounts: Vec<Address>) {
        let event = {
            let mut inner = lock(&self.inner);
            inner.accounts = accounts.clone();
            inner.authorized = !accounts.is_empty();
            WalletEvent::AccountsChanged(accounts)
        };
        self.emit(event);
    }

    /// Moves the wallet to another chain and notifies listeners.
    pub fn change_chain(&self, chain_id: u64) {
        lock(&self.inner).chain_id = chain_id;
        self.emit(WalletEvent::ChainChanged(chain_id));
    }

    /// Delivers `event` to every live listener, dropping closed ones.
    pub fn emit(&self, event: WalletEvent) {
        let mut inner = lock(&self.inner);
        inner
            .listeners
            .retain(|_, sink| sink.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn current_chain(&self) -> u64 {
        lock(&self.inner).chain_id
    }

    /// Names of the RPC methods invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.inner).calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        lock(&self.inner)
            .calls
            .iter()
            .filter(|c| c.as_str() == method)
            .count()
    }

    fn record(&self, method: &str) {
        lock(&self.inner).calls.push(method.to_string());
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_requestAccounts");
        let mut inner = lock(&self.inner);
        if let Some(err) = inner.request_error.clone() {
            return Err(err);
        }
        inner.authorized = true;
        Ok(inner.accounts.clone())
    }

    async fn current_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_accounts");
        let inner = lock(&self.inner);
        if inner.authorized {
            Ok(inner.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record("eth_chainId");
        Ok(lock(&self.inner).chain_id)
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        self.record("eth_getBalance");
        let inner = lock(&self.inner);
        if let Some(err) = inner.balance_error.clone() {
            return Err(err);
        }
        Ok(inner.balances.get(&address).copied().unwrap_or_default())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.record("wallet_switchEthereumChain");
        {
            let inner = lock(&self.inner);
            if let Some(err) = inner.switch_error.clone() {
                return Err(err);
            }
            if !inner.known_chains.contains(&chain_id) {
                return Err(ProviderError::new(
                    ProviderError::UNRECOGNIZED_CHAIN,
                    format!("Unrecognized chain ID {chain_id:#x}"),
                ));
            }
        }
        self.change_chain(chain_id);
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError> {
        self.record("wallet_addEthereumChain");
        let mut inner = lock(&self.inner);
        if let Some(err) = inner.add_error.clone() {
            return Err(err);
        }
        inner.known_chains.insert(network.chain_id);
        Ok(())
    }

    fn subscribe(&self, sink: WalletEventSink) -> ListenerId {
        let mut inner = lock(&self.inner);
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.insert(id, sink);
        ListenerId(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        lock(&self.inner).listeners.remove(&id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn unknown_chain_requires_add_before_switch() {
        let wallet = MockWallet::new().on_chain(1).without_chain(SEPOLIA_CHAIN_ID);
        let err = wallet.switch_chain(SEPOLIA_CHAIN_ID).await.unwrap_err();
        assert!(err.is_unrecognized_chain());

        wallet.add_chain(&NetworkConfig::default()).await.unwrap();
        wallet.switch_chain(SEPOLIA_CHAIN_ID).await.unwrap();
        assert_eq!(wallet.current_chain(), SEPOLIA_CHAIN_ID);
    }

    #[tokio::test]
    async fn listeners_receive_events_until_unsubscribed() {
        let wallet = MockWallet::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = wallet.subscribe(tx);

        wallet.change_chain(5);
        assert_eq!(rx.recv().await, Some(WalletEvent::ChainChanged(5)));

        wallet.unsubscribe(id);
        assert_eq!(wallet.listener_count(), 0);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn accounts_hidden_until_authorized() {
        let wallet = MockWallet::new();
        assert!(wallet.current_accounts().await.unwrap().is_empty());
        assert_eq!(wallet.request_accounts().await.unwrap(), vec![addr(1)]);
        assert_eq!(wallet.current_accounts().await.unwrap(), vec![addr(1)]);
    }
}
