// Path: crates/api/src/contract.rs
//! Defines the `VotingContract` trait: the call surface of the deployed
//! voting contract as exposed by its generated bindings.

use async_trait::async_trait;
use ballot_types::error::ContractError;
use ballot_types::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Raw return of `getProposal`: id, title, description, start, end, yes,
/// no, active, creator, category.
pub type ProposalTuple = (
    u64,
    String,
    String,
    u64,
    u64,
    u64,
    u64,
    bool,
    Address,
    String,
);

/// Raw return of `getProposalResults`: total, yes, no, yes %, no %.
pub type ResultsTuple = (u64, u64, u64, u64, u64);

/// Raw return of `getVote`: has voted, choice, timestamp.
pub type VoteTuple = (bool, bool, u64);

/// A state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractCall {
    RegisterVoter(Address),
    RegisterVoters(Vec<Address>),
    UnregisterVoter(Address),
    CreateProposal {
        title: String,
        description: String,
        duration_minutes: u64,
        category: String,
    },
    Vote {
        proposal_id: u64,
        choice: bool,
    },
    EndProposal(u64),
    AddAdmin(Address),
    RemoveAdmin(Address),
}

impl ContractCall {
    /// The Solidity function name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::RegisterVoter(_) => "registerVoter",
            Self::RegisterVoters(_) => "registerVoters",
            Self::UnregisterVoter(_) => "unregisterVoter",
            Self::CreateProposal { .. } => "createProposal",
            Self::Vote { .. } => "vote",
            Self::EndProposal(_) => "endProposal",
            Self::AddAdmin(_) => "addAdmin",
            Self::RemoveAdmin(_) => "removeAdmin",
        }
    }
}

/// A decoded contract event from a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    VoterRegistered {
        voter: Address,
    },
    VoterUnregistered {
        voter: Address,
    },
    ProposalCreated {
        proposal_id: u64,
        title: String,
        creator: Address,
    },
    VoteCast {
        proposal_id: u64,
        voter: Address,
        choice: bool,
    },
    ProposalEnded {
        proposal_id: u64,
    },
}

impl ContractEvent {
    /// The Solidity event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VoterRegistered { .. } => "VoterRegistered",
            Self::VoterUnregistered { .. } => "VoterUnregistered",
            Self::ProposalCreated { .. } => "ProposalCreated",
            Self::VoteCast { .. } => "VoteCast",
            Self::ProposalEnded { .. } => "ProposalEnded",
        }
    }
}

/// Per-transaction overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    pub gas_limit: Option<u64>,
}

impl TxOptions {
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// `true` when the receipt status is 1.
    pub success: bool,
    /// Revert reason recovered by replaying the call, when available.
    pub revert_reason: Option<String>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Events emitted by the voting contract, in log order. Logs from other
    /// contracts or that fail to decode are omitted by the binding.
    pub events: Vec<ContractEvent>,
}

impl TxReceipt {
    /// First argument of the first `ProposalCreated` event, if one was emitted.
    pub fn created_proposal_id(&self) -> Option<u64> {
        self.events.iter().find_map(|event| match event {
            ContractEvent::ProposalCreated { proposal_id, .. } => Some(*proposal_id),
            _ => None,
        })
    }
}

/// The voting contract's call/return interface.
///
/// Reads go through a network reader and need no wallet. Writes are signed
/// by the wallet account given as `from`.
#[async_trait]
pub trait VotingContract: Send + Sync + Debug {
    /// The deployed address.
    fn address(&self) -> Address;

    async fn get_proposal(&self, proposal_id: u64) -> Result<ProposalTuple, ContractError>;
    /// Returns `(yes, no)`.
    async fn get_vote_count(&self, proposal_id: u64) -> Result<(u64, u64), ContractError>;
    async fn has_voted(&self, proposal_id: u64, voter: Address) -> Result<bool, ContractError>;
    async fn get_vote(&self, proposal_id: u64, voter: Address) -> Result<VoteTuple, ContractError>;
    async fn is_registered_voter(&self, voter: Address) -> Result<bool, ContractError>;
    async fn is_admin(&self, account: Address) -> Result<bool, ContractError>;
    async fn get_active_proposals(&self) -> Result<Vec<u64>, ContractError>;
    async fn get_all_proposals(&self) -> Result<Vec<u64>, ContractError>;
    /// The contract's own status label.
    async fn get_proposal_status(&self, proposal_id: u64) -> Result<String, ContractError>;
    async fn get_proposal_results(&self, proposal_id: u64) -> Result<ResultsTuple, ContractError>;
    async fn proposal_counter(&self) -> Result<u64, ContractError>;

    /// Estimates the gas `call` would consume if sent from `from`.
    async fn estimate_gas(&self, from: Address, call: &ContractCall) -> Result<u64, ContractError>;

    /// Signs and broadcasts `call`, returning as soon as the transaction
    /// has a hash.
    async fn send(
        &self,
        from: Address,
        call: ContractCall,
        options: TxOptions,
    ) -> Result<TxHash, ContractError>;

    /// Waits for the transaction to be mined. Imposes no timeout.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ContractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(events: Vec<ContractEvent>) -> TxReceipt {
        TxReceipt {
            tx_hash: TxHash::repeat_byte(1),
            success: true,
            revert_reason: None,
            block_number: Some(10),
            gas_used: 21_000,
            events,
        }
    }

    #[test]
    fn created_proposal_id_reads_first_creation_event() {
        let creator = Address::repeat_byte(0xaa);
        let r = receipt(vec![
            ContractEvent::VoterRegistered { voter: creator },
            ContractEvent::ProposalCreated {
                proposal_id: 7,
                title: "Budget".into(),
                creator,
            },
        ]);
        assert_eq!(r.created_proposal_id(), Some(7));
    }

    #[test]
    fn missing_creation_event_yields_none() {
        let r = receipt(vec![ContractEvent::ProposalEnded { proposal_id: 3 }]);
        assert_eq!(r.created_proposal_id(), None);
    }

    #[test]
    fn method_names_match_abi() {
        assert_eq!(
            ContractCall::Vote {
                proposal_id: 1,
                choice: true
            }
            .method(),
            "vote"
        );
        assert_eq!(ContractCall::RegisterVoters(vec![]).method(), "registerVoters");
    }
}
