// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Ballot Test Utilities
//!
//! Scriptable stand-ins for the wallet and voting contract boundaries, plus
//! a controllable clock and data fixtures.

pub mod clock;
pub mod contract;
pub mod fixtures;
pub mod wallet;

pub use clock::FixedClock;
pub use contract::MockContract;
pub use wallet::MockWallet;

use std::sync::{Mutex, MutexGuard};

/// Locks a mutex, recovering the data if a panicking test poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
