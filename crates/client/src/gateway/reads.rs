// Path: crates/client/src/gateway/reads.rs
//! Read-only queries. None of these touch `OperationState` or need a
//! connected wallet, and none of them fail: a query that cannot complete is
//! logged and degrades to an empty value.

use super::ContractGateway;
use ballot_api::contract::{ProposalTuple, ResultsTuple, VoteTuple};
use ballot_types::app::{Proposal, ProposalResults, ProposalStatus, VoteRecord};
use ballot_types::error::{ContractError, ErrorCode, GatewayError};
use ballot_types::Address;
use futures_util::future::join_all;

pub(crate) fn proposal_from_tuple(tuple: ProposalTuple) -> Proposal {
    let (id, title, description, start_time, end_time, yes_votes, no_votes, active, creator, category) =
        tuple;
    Proposal {
        id,
        title,
        description,
        start_time,
        end_time,
        yes_votes,
        no_votes,
        active,
        creator,
        category,
    }
}

fn results_from_tuple(tuple: ResultsTuple) -> ProposalResults {
    let (total_votes, yes_votes, no_votes, yes_percentage, no_percentage) = tuple;
    ProposalResults {
        total_votes,
        yes_votes,
        no_votes,
        yes_percentage,
        no_percentage,
    }
}

fn vote_from_tuple(tuple: VoteTuple) -> VoteRecord {
    let (has_voted, choice, timestamp) = tuple;
    VoteRecord {
        has_voted,
        choice,
        timestamp,
    }
}

/// Logs a failed query and discards the error.
fn degrade<T>(query: &'static str, result: Result<T, ContractError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            let err = GatewayError::QueryFailed(err.best_message());
            tracing::warn!(target: "gateway", event = "query_failed", query, code = err.code(), error = %err);
            None
        }
    }
}

impl ContractGateway {
    pub async fn get_proposal(&self, proposal_id: u64) -> Option<Proposal> {
        degrade("getProposal", self.contract.get_proposal(proposal_id).await)
            .map(proposal_from_tuple)
    }

    /// Results exactly as the contract computed them. Inconsistent tallies
    /// are logged but passed through.
    pub async fn get_proposal_results(&self, proposal_id: u64) -> Option<ProposalResults> {
        let results = degrade(
            "getProposalResults",
            self.contract.get_proposal_results(proposal_id).await,
        )
        .map(results_from_tuple)?;
        if !results.is_consistent() {
            tracing::warn!(target: "gateway", event = "inconsistent_results", proposal_id, ?results);
        }
        Some(results)
    }

    pub async fn get_active_proposals(&self) -> Vec<u64> {
        degrade(
            "getActiveProposals",
            self.contract.get_active_proposals().await,
        )
        .unwrap_or_default()
    }

    pub async fn get_all_proposals(&self) -> Vec<u64> {
        degrade("getAllProposals", self.contract.get_all_proposals().await).unwrap_or_default()
    }

    pub async fn is_registered_voter(&self, voter: Address) -> bool {
        degrade(
            "isRegisteredVoter",
            self.contract.is_registered_voter(voter).await,
        )
        .unwrap_or(false)
    }

    pub async fn has_voted(&self, proposal_id: u64, voter: Address) -> bool {
        degrade("hasVoted", self.contract.has_voted(proposal_id, voter).await).unwrap_or(false)
    }

    /// The one admin check. The contract is the only authority on admin
    /// membership; nothing is cached client-side.
    pub async fn is_admin(&self, account: Address) -> bool {
        degrade("isAdmin", self.contract.is_admin(account).await).unwrap_or(false)
    }

    /// Whether the connected account is an admin. `false` when disconnected.
    pub async fn connected_is_admin(&self) -> bool {
        match self.connection.signer() {
            Some(signer) => self.is_admin(signer.address).await,
            None => false,
        }
    }

    pub async fn get_vote(&self, proposal_id: u64, voter: Address) -> Option<VoteRecord> {
        degrade("getVote", self.contract.get_vote(proposal_id, voter).await).map(vote_from_tuple)
    }

    /// `(yes, no)` tallies.
    pub async fn get_vote_count(&self, proposal_id: u64) -> Option<(u64, u64)> {
        degrade("getVoteCount", self.contract.get_vote_count(proposal_id).await)
    }

    /// The contract's own status string. UI code should prefer
    /// [`ContractGateway::proposal_status`], which accounts for the clock.
    pub async fn get_proposal_status(&self, proposal_id: u64) -> Option<String> {
        degrade(
            "getProposalStatus",
            self.contract.get_proposal_status(proposal_id).await,
        )
    }

    pub async fn proposal_counter(&self) -> Option<u64> {
        degrade("proposalCounter", self.contract.proposal_counter().await)
    }

    /// Classifies `proposal` against the current wall-clock time.
    pub fn proposal_status(&self, proposal: &Proposal) -> ProposalStatus {
        proposal.status_at(self.clock.now_secs())
    }

    /// Fetches several proposals concurrently, in the order of `ids`.
    /// Proposals that fail to load are skipped.
    pub async fn load_proposals(&self, ids: &[u64]) -> Vec<Proposal> {
        join_all(ids.iter().map(|id| self.get_proposal(*id)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}
