// Path: crates/client/src/connection/mod.rs
//! The connection manager: establishes, observes, and tears down the binding
//! to the user's wallet and hands out the signing capability.

mod refresh;
mod subscription;

use crate::notice::{Notice, NoticeBus, NoticeLevel};
use alloy_primitives::utils::format_ether;
use ballot_api::wallet::{Signer, WalletEvent, WalletProvider};
use ballot_types::app::ConnectionState;
use ballot_types::config::BallotConfig;
use ballot_types::error::{ErrorCode, WalletError};
use ballot_types::Address;
use refresh::BalanceRefresher;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use subscription::WalletSubscription;
use tokio::sync::watch;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns [`ConnectionState`] and the wallet's notification subscription.
///
/// Created once at application start and shared through `Arc`. State is
/// published on a `watch` channel; only this type writes to it.
pub struct ConnectionManager {
    wallet: Option<Arc<dyn WalletProvider>>,
    config: Arc<BallotConfig>,
    state: watch::Sender<ConnectionState>,
    notices: NoticeBus,
    subscription: Mutex<Option<WalletSubscription>>,
    refresher: Mutex<Option<BalanceRefresher>>,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("wallet", &self.wallet)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl ConnectionManager {
    /// `wallet` is `None` when no wallet is injected into the page.
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        config: Arc<BallotConfig>,
        notices: NoticeBus,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(ConnectionState::disconnected());
        Arc::new(Self {
            wallet,
            config,
            state,
            notices,
            subscription: Mutex::new(None),
            refresher: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &BallotConfig {
        &self.config
    }

    pub fn required_chain_id(&self) -> u64 {
        self.config.network.chain_id
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// A read-only view that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// The signing handle, available only while connected.
    pub fn signer(&self) -> Option<Signer> {
        let state = self.state.borrow();
        match (state.is_connected, state.address, state.chain_id) {
            (true, Some(address), Some(chain_id)) => Some(Signer { address, chain_id }),
            _ => None,
        }
    }

    pub fn is_listening(&self) -> bool {
        lock(&self.subscription).is_some()
    }

    pub fn is_refreshing_balance(&self) -> bool {
        lock(&self.refresher).is_some()
    }

    /// Registers the wallet notification listener and silently restores a
    /// connection the user authorised in an earlier session. Calling it
    /// again while already listening only re-checks the accounts.
    pub async fn start(self: &Arc<Self>) {
        let Some(wallet) = self.wallet.clone() else {
            tracing::info!(target: "wallet", event = "no_provider");
            return;
        };
        {
            let mut slot = lock(&self.subscription);
            if slot.is_none() {
                *slot = Some(WalletSubscription::register(wallet, Arc::downgrade(self)));
                tracing::debug!(target: "wallet", event = "subscribed");
            }
        }
        self.restore().await;
    }

    /// Releases the wallet listener and stops background refreshes.
    pub fn shutdown(&self) {
        if lock(&self.subscription).take().is_some() {
            tracing::debug!(target: "wallet", event = "unsubscribed");
        }
        self.stop_refresher();
    }

    /// Requests account access and resolves the full connection state.
    ///
    /// When the wallet is on another network the switch flow runs
    /// afterwards; its failure is reported but does not fail the connect.
    pub async fn connect(self: &Arc<Self>) -> Result<(), WalletError> {
        let Some(wallet) = self.wallet.clone() else {
            self.notices.publish(
                Notice::new(
                    NoticeLevel::Error,
                    "No wallet detected. Please install MetaMask to continue.",
                )
                .with_link(Some(self.config.wallet_install_url.clone())),
            );
            return Err(WalletError::WalletUnavailable);
        };

        self.state.send_modify(ConnectionState::begin_connecting);

        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                self.state.send_modify(ConnectionState::abort_connecting);
                let err = WalletError::from(e);
                tracing::warn!(target: "wallet", event = "connect_failed", code = err.code(), error = %err);
                if err == WalletError::UserRejected {
                    self.notices.error("Please connect to MetaMask.");
                } else {
                    self.notices.error("Failed to connect wallet. Please try again.");
                }
                return Err(err);
            }
        };

        let Some(address) = accounts.first().copied() else {
            self.state.send_modify(ConnectionState::abort_connecting);
            self.notices.error("Failed to connect wallet. Please try again.");
            return Err(WalletError::NoAccounts);
        };

        if let Err(err) = self.resolve(address).await {
            self.reset();
            tracing::warn!(target: "wallet", event = "resolve_failed", error = %err);
            self.notices.error("Failed to connect wallet. Please try again.");
            return Err(err);
        }
        self.notices.success("Wallet connected successfully!");

        let required = self.required_chain_id();
        let on_required_chain = self.state.borrow().is_on_chain(required);
        if !on_required_chain {
            if let Err(err) = self.switch_network(required).await {
                tracing::warn!(target: "wallet", event = "auto_switch_failed", error = %err);
            }
        }
        Ok(())
    }

    /// Forgets the binding locally. Wallet permissions are left untouched.
    pub fn disconnect(&self) {
        self.reset();
        self.notices.success("Wallet disconnected");
        tracing::info!(target: "wallet", event = "disconnected");
    }

    /// Asks the wallet to move to `chain_id`, registering the configured
    /// network first if the wallet does not know it.
    pub async fn switch_network(&self, chain_id: u64) -> Result<(), WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::WalletUnavailable)?;
        let network = &self.config.network;

        match wallet.switch_chain(chain_id).await {
            Ok(()) => {}
            Err(e) if e.is_unrecognized_chain() && chain_id == network.chain_id => {
                tracing::info!(target: "wallet", event = "add_network", chain_id, name = %network.chain_name);
                if let Err(add_err) = wallet.add_chain(network).await {
                    tracing::error!(target: "wallet", event = "add_network_failed", error = %add_err);
                    self.notices
                        .error(format!("Failed to add {} network", network.chain_name));
                    return Err(add_err.into());
                }
                if let Err(retry_err) = wallet.switch_chain(chain_id).await {
                    tracing::error!(target: "wallet", event = "switch_failed", error = %retry_err);
                    self.notices
                        .error(format!("Failed to switch to {} network", network.chain_name));
                    return Err(retry_err.into());
                }
            }
            Err(e) => {
                tracing::error!(target: "wallet", event = "switch_failed", chain_id, error = %e);
                let name = if chain_id == network.chain_id {
                    network.chain_name.clone()
                } else {
                    format!("chain {chain_id}")
                };
                self.notices
                    .error(format!("Failed to switch to {name} network"));
                return Err(e.into());
            }
        }

        self.set_chain_id(chain_id);
        Ok(())
    }

    /// Re-queries the balance of the connected account. Failures are logged
    /// and leave the previous balance in place.
    pub async fn refresh_balance(&self) {
        let Some(wallet) = &self.wallet else { return };
        let Some(address) = self.signer().map(|s| s.address) else {
            return;
        };
        match wallet.balance(address).await {
            Ok(balance) => {
                let formatted = format_ether(balance);
                self.state.send_if_modified(|state| {
                    if state.is_connected && state.address == Some(address) && state.balance != formatted {
                        state.balance = formatted;
                        true
                    } else {
                        false
                    }
                });
            }
            Err(e) => {
                tracing::warn!(target: "wallet", event = "balance_refresh_failed", error = %e);
            }
        }
    }

    pub(crate) async fn handle_event(self: &Arc<Self>, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first().copied() {
                None => self.disconnect(),
                Some(address) => {
                    if let Err(err) = self.resolve(address).await {
                        tracing::warn!(target: "wallet", event = "account_change_failed", error = %err);
                    }
                }
            },
            WalletEvent::ChainChanged(chain_id) => {
                self.set_chain_id(chain_id);
                let network = &self.config.network;
                if chain_id != network.chain_id {
                    tracing::warn!(target: "wallet", event = "wrong_network", chain_id, required = network.chain_id);
                    self.notices.warning(format!(
                        "Please switch to {} for full functionality",
                        network.chain_name
                    ));
                }
            }
        }
    }

    async fn restore(self: &Arc<Self>) {
        let Some(wallet) = &self.wallet else { return };
        match wallet.current_accounts().await {
            Ok(accounts) => {
                if let Some(address) = accounts.first().copied() {
                    if let Err(err) = self.resolve(address).await {
                        tracing::warn!(target: "wallet", event = "restore_failed", error = %err);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(target: "wallet", event = "restore_failed", error = %e);
            }
        }
    }

    /// Fetches balance and chain for `address` and marks the state connected.
    async fn resolve(self: &Arc<Self>, address: Address) -> Result<(), WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::WalletUnavailable)?;
        let balance = wallet.balance(address).await?;
        let chain_id = wallet.chain_id().await?;
        self.state.send_replace(ConnectionState::connected(
            address,
            format_ether(balance),
            chain_id,
        ));
        tracing::info!(target: "wallet", event = "connected", %address, chain_id);
        self.start_refresher();
        Ok(())
    }

    fn set_chain_id(&self, chain_id: u64) {
        self.state.send_if_modified(|state| {
            if state.is_connected && state.chain_id != Some(chain_id) {
                state.chain_id = Some(chain_id);
                true
            } else {
                false
            }
        });
    }

    fn reset(&self) {
        self.stop_refresher();
        self.state.send_replace(ConnectionState::disconnected());
    }

    fn start_refresher(self: &Arc<Self>) {
        let period = Duration::from_secs(self.config.balance_refresh_secs.max(1));
        let refresher = BalanceRefresher::spawn(Arc::downgrade(self), period);
        // Replacing the slot drops, and so aborts, any previous task.
        *lock(&self.refresher) = Some(refresher);
    }

    fn stop_refresher(&self) {
        lock(&self.refresher).take();
    }
}
