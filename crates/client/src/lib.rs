// Path: crates/client/src/lib.rs
//! # Ballot Client Crate Lints
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
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Ballot Client
//!
//! The orchestration layer between a voting UI and the external world:
//! [`ConnectionManager`] owns the wallet binding, [`ContractGateway`] wraps
//! every contract call with validation and transaction tracking, and
//! [`intents`] turns raw form input into gateway calls.
//!
//! Both services are constructed explicitly and shared by reference; UI code
//! observes their state through `watch` receivers and user-facing messages
//! through the [`NoticeBus`].

pub mod connection;
pub mod gateway;
pub mod intents;
pub mod notice;

pub use connection::ConnectionManager;
pub use gateway::{ContractGateway, CreatedProposal};
pub use notice::{Notice, NoticeBus, NoticeLevel};
