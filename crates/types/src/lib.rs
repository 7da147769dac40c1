// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Ballot Types
//!
//! Plain data shared by every Ballot crate: the wallet and operation state
//! the UI observes, read-only projections of proposals held by the voting
//! contract, deployment configuration, and the error taxonomy.

/// Connection, operation, and proposal data structures.
pub mod app;
/// Deployment and network configuration.
pub mod config;
/// Error enums and the `ErrorCode` trait.
pub mod error;

pub use alloy_primitives::{Address, TxHash, U256};
