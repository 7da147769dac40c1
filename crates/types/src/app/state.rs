// Path: crates/types/src/app/state.rs
//! Observable state owned by the connection manager and the contract gateway.

use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The current binding to the user's wallet.
///
/// Constructors keep the invariants: a connected state always carries an
/// address, and `is_connecting` is never set alongside `is_connected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    /// The selected account, when connected.
    pub address: Option<Address>,
    /// Native balance as a decimal string in whole currency units.
    pub balance: String,
    /// The wallet's current chain.
    pub chain_id: Option<u64>,
    /// An account is bound and usable for signing.
    pub is_connected: bool,
    /// An access request is awaiting the user.
    pub is_connecting: bool,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl ConnectionState {
    /// The initial state at process start and after any disconnect.
    pub fn disconnected() -> Self {
        Self {
            address: None,
            balance: "0".to_string(),
            chain_id: None,
            is_connected: false,
            is_connecting: false,
        }
    }

    /// A fully resolved wallet binding.
    pub fn connected(address: Address, balance: String, chain_id: u64) -> Self {
        Self {
            address: Some(address),
            balance,
            chain_id: Some(chain_id),
            is_connected: true,
            is_connecting: false,
        }
    }

    /// Marks an access request as in flight. Has no effect once connected.
    pub fn begin_connecting(&mut self) {
        if !self.is_connected {
            self.is_connecting = true;
        }
    }

    /// Clears the transient connecting flag after a failed attempt.
    pub fn abort_connecting(&mut self) {
        self.is_connecting = false;
    }

    /// Whether the binding targets `chain_id`.
    pub fn is_on_chain(&self, chain_id: u64) -> bool {
        self.chain_id == Some(chain_id)
    }

    /// Checks the documented invariants.
    pub fn is_well_formed(&self) -> bool {
        (!self.is_connected || self.address.is_some())
            && !(self.is_connected && self.is_connecting)
    }
}

/// A failure recorded by the gateway for the UI to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationFailure {
    /// Stable machine-readable code, see `ErrorCode`.
    pub code: String,
    /// The most specific human-readable message available.
    pub message: String,
}

impl OperationFailure {
    /// Pairs an error code with its user-facing message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The in-flight or last completed gateway write operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationState {
    /// A write is between validation and confirmation.
    pub is_loading: bool,
    /// The most recent failure, until cleared or replaced.
    pub error: Option<OperationFailure>,
    /// Reference of the last submitted transaction. Kept after confirmation
    /// so the UI can link to it.
    pub tx_hash: Option<TxHash>,
}

impl OperationState {
    /// Enters the validation phase of a new operation. Clears any stale error.
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Records the reference of a submitted transaction.
    pub fn submitted(&mut self, tx_hash: TxHash) {
        self.tx_hash = Some(tx_hash);
    }

    /// Completes the operation successfully.
    pub fn succeed(&mut self) {
        self.is_loading = false;
    }

    /// Completes the operation with a failure. Always clears loading.
    pub fn fail(&mut self, failure: OperationFailure) {
        self.error = Some(failure);
        self.is_loading = false;
    }

    /// Dismisses the recorded failure.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Returns to the idle state, forgetting the last transaction.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_constructors_are_well_formed() {
        let mut state = ConnectionState::disconnected();
        assert!(state.is_well_formed());
        assert_eq!(state.balance, "0");

        state.begin_connecting();
        assert!(state.is_connecting);
        assert!(state.is_well_formed());

        let connected = ConnectionState::connected(Address::repeat_byte(0x11), "1.5".into(), 1);
        assert!(connected.is_well_formed());
        assert!(!connected.is_connecting);
        assert!(connected.is_on_chain(1));
        assert!(!connected.is_on_chain(11155111));
    }

    #[test]
    fn connecting_flag_never_set_while_connected() {
        let mut state = ConnectionState::connected(Address::repeat_byte(0x11), "0".into(), 1);
        state.begin_connecting();
        assert!(!state.is_connecting);
    }

    #[test]
    fn begin_clears_stale_error_and_keeps_tx_hash() {
        let mut state = OperationState::default();
        state.submitted(TxHash::repeat_byte(0xab));
        state.fail(OperationFailure::new("GATEWAY_TX_FAILED", "Transaction failed"));
        assert!(!state.is_loading);

        state.begin();
        assert!(state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.tx_hash, Some(TxHash::repeat_byte(0xab)));
    }

    #[test]
    fn fail_forces_loading_off() {
        let mut state = OperationState::default();
        state.begin();
        state.fail(OperationFailure::new("X", "boom"));
        assert!(!state.is_loading);
        assert_eq!(state.error.as_ref().map(ToString::to_string).as_deref(), Some("boom"));

        state.reset();
        assert_eq!(state, OperationState::default());
    }
}
