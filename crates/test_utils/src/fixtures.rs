// Path: crates/test_utils/src/fixtures.rs
//! Reusable test data.

use ballot_types::app::{Proposal, ProposalResults};
use ballot_types::{Address, U256};

/// Base timestamp used across fixtures (2024-01-01T00:00:00Z).
pub const T0: u64 = 1_704_067_200;

/// A deterministic account whose 20 bytes all equal `n`.
pub fn addr(n: u8) -> Address {
    Address::repeat_byte(n)
}

/// `n` whole ether in wei.
pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

/// An active proposal open from `start` to `end`.
pub fn proposal(id: u64, start: u64, end: u64) -> Proposal {
    Proposal {
        id,
        title: format!("Proposal #{id}"),
        description: format!("Description of proposal number {id} for testing"),
        start_time: start,
        end_time: end,
        yes_votes: 0,
        no_votes: 0,
        active: true,
        creator: addr(0xc0),
        category: "Governance".to_string(),
    }
}

/// Results with percentages rounded the way the contract does (integer
/// division for yes, remainder for no).
pub fn results(yes: u64, no: u64) -> ProposalResults {
    let total = yes + no;
    let (yes_percentage, no_percentage) = if total == 0 {
        (0, 0)
    } else {
        let yes_pct = yes * 100 / total;
        (yes_pct, 100 - yes_pct)
    };
    ProposalResults {
        total_votes: total,
        yes_votes: yes,
        no_votes: no,
        yes_percentage,
        no_percentage,
    }
}
