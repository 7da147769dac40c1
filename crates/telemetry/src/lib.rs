// Path: crates/telemetry/src/lib.rs
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

//! # Ballot Telemetry
//!
//! Structured logging initialization for applications embedding the Ballot
//! client. Library crates only emit `tracing` events; the host decides once,
//! at startup, where they go.

/// The initialization routine for global structured logging.
pub mod init;

pub use init::{init_tracing, LogFormat};
