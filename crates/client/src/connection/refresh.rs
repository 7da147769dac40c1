// Path: crates/client/src/connection/refresh.rs
//! Periodic balance refresh while a wallet is connected.

use super::ConnectionManager;
use std::sync::Weak;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// A background task that re-reads the connected account's balance every
/// `period`. Dropping the handle cancels the task.
#[derive(Debug)]
pub(crate) struct BalanceRefresher {
    handle: JoinHandle<()>,
}

impl BalanceRefresher {
    pub(crate) fn spawn(manager: Weak<ConnectionManager>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            // The balance was just resolved, so the first tick waits a full period.
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                manager.refresh_balance().await;
            }
        });
        Self { handle }
    }
}

impl Drop for BalanceRefresher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
