// Path: crates/types/src/app/mod.rs
//! Application-level data structures.

mod proposal;
mod state;

pub use proposal::*;
pub use state::*;
