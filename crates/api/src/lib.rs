// Path: crates/api/src/lib.rs

//! # Ballot API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Ballot API
//!
//! The two external boundaries the Ballot client depends on: the injected
//! wallet and the deployed voting contract. Implementations live outside the
//! core (browser bindings, RPC bindings, or the in-memory doubles in
//! `ballot-test-utils`).

/// A source of wall-clock time.
pub mod clock;
/// The call surface of the deployed voting contract.
pub mod contract;
/// The injected wallet: account access, network switching, notifications.
pub mod wallet;
