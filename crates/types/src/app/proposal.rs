// Path: crates/types/src/app/proposal.rs
//! Read-only projections of proposal data held by the voting contract.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A proposal as returned by the contract's `getProposal` call.
///
/// The status shown to users is not stored here; it depends on the wall clock
/// and is derived with [`Proposal::status_at`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Contract-assigned, monotonically increasing identifier.
    pub id: u64,
    /// Short headline.
    pub title: String,
    /// Body text shown on the proposal page.
    pub description: String,
    /// Voting window start, unix seconds.
    pub start_time: u64,
    /// Voting window end, unix seconds.
    pub end_time: u64,
    /// YES votes cast so far.
    pub yes_votes: u64,
    /// NO votes cast so far.
    pub no_votes: u64,
    /// Flag maintained by the contract. Cleared when an admin ends the proposal.
    pub active: bool,
    /// Account that submitted `createProposal`.
    pub creator: Address,
    /// Free-text label chosen by the creator.
    pub category: String,
}

impl Proposal {
    /// Classifies the proposal at unix time `now`.
    pub fn status_at(&self, now: u64) -> ProposalStatus {
        ProposalStatus::classify(self.active, self.start_time, self.end_time, now)
    }

    /// Whether a vote submitted at `now` would still fall inside the window.
    pub fn accepts_votes_at(&self, now: u64) -> bool {
        now < self.end_time
    }
}

/// Time-derived lifecycle status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    /// Active on-chain but the window has not opened yet.
    Pending,
    /// Inside the voting window.
    Active,
    /// Closed by an admin or past its end time.
    Ended,
}

impl ProposalStatus {
    /// Pure classification over `(active, start, end, now)`.
    pub fn classify(active: bool, start_time: u64, end_time: u64, now: u64) -> Self {
        if active && now < start_time {
            Self::Pending
        } else if active && now <= end_time {
            Self::Active
        } else {
            Self::Ended
        }
    }

    /// Lowercase name, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated tallies from `getProposalResults`.
///
/// Percentages are computed by the contract and passed through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResults {
    /// All votes cast.
    pub total_votes: u64,
    /// YES votes.
    pub yes_votes: u64,
    /// NO votes.
    pub no_votes: u64,
    /// YES share, whole percent.
    pub yes_percentage: u64,
    /// NO share, whole percent.
    pub no_percentage: u64,
}

impl ProposalResults {
    /// Checks the contract's arithmetic: tallies add up, and percentages sum
    /// to 100 when votes exist or are both zero when none do.
    pub fn is_consistent(&self) -> bool {
        let tallies_match = self.yes_votes.checked_add(self.no_votes) == Some(self.total_votes);
        let percentages_match = if self.total_votes == 0 {
            self.yes_percentage == 0 && self.no_percentage == 0
        } else {
            self.yes_percentage.checked_add(self.no_percentage) == Some(100)
        };
        tallies_match && percentages_match
    }
}

/// One voter's record on a proposal, from `getVote`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    /// Whether the voter has cast a vote.
    pub has_voted: bool,
    /// `true` for YES. Meaningless unless `has_voted`.
    pub choice: bool,
    /// Unix seconds when the vote was cast.
    pub timestamp: u64,
}
