// Path: crates/client/src/connection/subscription.rs
//! The scoped registration of the wallet's account and chain listeners.

use super::ConnectionManager;
use ballot_api::wallet::{ListenerId, WalletProvider};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Forwards wallet notifications to the manager until dropped. Dropping
/// unregisters the listener from the wallet and stops the forwarding task.
pub(crate) struct WalletSubscription {
    wallet: Arc<dyn WalletProvider>,
    id: ListenerId,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WalletSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl WalletSubscription {
    pub(crate) fn register(
        wallet: Arc<dyn WalletProvider>,
        manager: Weak<ConnectionManager>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = wallet.subscribe(tx);
        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                tracing::debug!(target: "wallet", event = "notification", notification = ?event);
                manager.handle_event(event).await;
            }
        });
        Self { wallet, id, task }
    }
}

impl Drop for WalletSubscription {
    fn drop(&mut self) {
        self.wallet.unsubscribe(self.id);
        self.task.abort();
    }
}
