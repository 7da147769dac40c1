// Path: crates/test_utils/src/contract.rs
//! An in-memory voting contract that applies calls the way the deployed
//! contract would, while recording every submission.

use crate::lock;
use async_trait::async_trait;
use ballot_api::contract::{
    ContractCall, ContractEvent, ProposalTuple, ResultsTuple, TxOptions, TxReceipt, VoteTuple,
    VotingContract,
};
use ballot_types::app::{Proposal, ProposalResults, VoteRecord};
use ballot_types::error::ContractError;
use ballot_types::{Address, TxHash, U256};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// A transaction submitted through [`VotingContract::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub from: Address,
    pub call: ContractCall,
    pub options: TxOptions,
}

#[derive(Debug)]
struct ContractInner {
    now: u64,
    proposals: BTreeMap<u64, Proposal>,
    results_override: HashMap<u64, ProposalResults>,
    voters: HashSet<Address>,
    admins: HashSet<Address>,
    votes: HashMap<(u64, Address), VoteRecord>,
    gas_estimate: u64,
    read_error: Option<ContractError>,
    estimate_error: Option<ContractError>,
    send_error: Option<ContractError>,
    revert_next: Option<Option<String>>,
    emit_creation_events: bool,
    receipts: HashMap<TxHash, TxReceipt>,
    submissions: Vec<Submission>,
    estimates: Vec<ContractCall>,
    nonce: u64,
}

/// A scriptable voting contract.
#[derive(Debug)]
pub struct MockContract {
    address: Address,
    inner: Mutex<ContractInner>,
    /// When set, `wait_for_receipt` blocks until a permit is released.
    confirmations: Option<Arc<Semaphore>>,
}

impl Default for MockContract {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContract {
    pub fn new() -> Self {
        Self {
            address: Address::repeat_byte(0xcc),
            inner: Mutex::new(ContractInner {
                now: crate::fixtures::T0,
                proposals: BTreeMap::new(),
                results_override: HashMap::new(),
                voters: HashSet::new(),
                admins: HashSet::new(),
                votes: HashMap::new(),
                gas_estimate: 50_000,
                read_error: None,
                estimate_error: None,
                send_error: None,
                revert_next: None,
                emit_creation_events: true,
                receipts: HashMap::new(),
                submissions: Vec::new(),
                estimates: Vec::new(),
                nonce: 0,
            }),
            confirmations: None,
        }
    }

    /// Holds every confirmation until [`MockContract::confirm_one`] is called.
    pub fn with_manual_confirmations(mut self) -> Self {
        self.confirmations = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Releases one held confirmation.
    pub fn confirm_one(&self) {
        if let Some(gate) = &self.confirmations {
            gate.add_permits(1);
        }
    }

    /// Block timestamp used for proposals created through `createProposal`.
    pub fn set_block_time(&self, now: u64) {
        lock(&self.inner).now = now;
    }

    pub fn insert_proposal(&self, proposal: Proposal) {
        lock(&self.inner).proposals.insert(proposal.id, proposal);
    }

    pub fn set_results(&self, proposal_id: u64, results: ProposalResults) {
        lock(&self.inner)
            .results_override
            .insert(proposal_id, results);
    }

    pub fn register(&self, voter: Address) {
        lock(&self.inner).voters.insert(voter);
    }

    pub fn make_admin(&self, account: Address) {
        lock(&self.inner).admins.insert(account);
    }

    pub fn record_vote(&self, proposal_id: u64, voter: Address, choice: bool) {
        let mut inner = lock(&self.inner);
        let timestamp = inner.now;
        inner.votes.insert(
            (proposal_id, voter),
            VoteRecord {
                has_voted: true,
                choice,
                timestamp,
            },
        );
    }

    pub fn set_gas_estimate(&self, gas: u64) {
        lock(&self.inner).gas_estimate = gas;
    }

    /// Makes every read-only call fail with `err` (or succeed again with `None`).
    pub fn fail_reads_with(&self, err: Option<ContractError>) {
        lock(&self.inner).read_error = err;
    }

    pub fn fail_estimates_with(&self, err: ContractError) {
        lock(&self.inner).estimate_error = Some(err);
    }

    pub fn fail_sends_with(&self, err: ContractError) {
        lock(&self.inner).send_error = Some(err);
    }

    /// The next mined transaction gets a failure status with `reason`.
    pub fn revert_next(&self, reason: Option<&str>) {
        lock(&self.inner).revert_next = Some(reason.map(str::to_string));
    }

    /// Stops emitting `ProposalCreated` in receipts.
    pub fn suppress_creation_events(&self) {
        lock(&self.inner).emit_creation_events = false;
    }

    pub fn submissions(&self) -> Vec<Submission> {
        lock(&self.inner).submissions.clone()
    }

    pub fn estimates(&self) -> Vec<ContractCall> {
        lock(&self.inner).estimates.clone()
    }

    pub fn is_voter(&self, account: Address) -> bool {
        lock(&self.inner).voters.contains(&account)
    }

    pub fn proposal(&self, proposal_id: u64) -> Option<Proposal> {
        lock(&self.inner).proposals.get(&proposal_id).cloned()
    }

    fn check_read(inner: &ContractInner) -> Result<(), ContractError> {
        match &inner.read_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn results_for(inner: &ContractInner, proposal_id: u64) -> Option<ProposalResults> {
        if let Some(results) = inner.results_override.get(&proposal_id) {
            return Some(*results);
        }
        inner
            .proposals
            .get(&proposal_id)
            .map(|p| crate::fixtures::results(p.yes_votes, p.no_votes))
    }

    /// Applies a successful call to the in-memory state.
    fn apply(inner: &mut ContractInner, from: Address, call: &ContractCall) -> Vec<ContractEvent> {
        match call {
            ContractCall::RegisterVoter(voter) => {
                inner.voters.insert(*voter);
                vec![ContractEvent::VoterRegistered { voter: *voter }]
            }
            ContractCall::RegisterVoters(voters) => voters
                .iter()
                .filter(|voter| inner.voters.insert(**voter))
                .map(|voter| ContractEvent::VoterRegistered { voter: *voter })
                .collect(),
            ContractCall::UnregisterVoter(voter) => {
                inner.voters.remove(voter);
                vec![ContractEvent::VoterUnregistered { voter: *voter }]
            }
            ContractCall::CreateProposal {
                title,
                description,
                duration_minutes,
                category,
            } => {
                let id = inner.proposals.keys().next_back().map_or(1, |last| last + 1);
                let start = inner.now;
                inner.proposals.insert(
                    id,
                    Proposal {
                        id,
                        title: title.clone(),
                        description: description.clone(),
                        start_time: start,
                        end_time: start + duration_minutes * 60,
                        yes_votes: 0,
                        no_votes: 0,
                        active: true,
                        creator: from,
                        category: category.clone(),
                    },
                );
                if inner.emit_creation_events {
                    vec![ContractEvent::ProposalCreated {
                        proposal_id: id,
                        title: title.clone(),
                        creator: from,
                    }]
                } else {
                    Vec::new()
                }
            }
            ContractCall::Vote {
                proposal_id,
                choice,
            } => {
                let timestamp = inner.now;
                if let Some(p) = inner.proposals.get_mut(proposal_id) {
                    if *choice {
                        p.yes_votes += 1;
                    } else {
                        p.no_votes += 1;
                    }
                }
                inner.votes.insert(
                    (*proposal_id, from),
                    VoteRecord {
                        has_voted: true,
                        choice: *choice,
                        timestamp,
                    },
                );
                vec![ContractEvent::VoteCast {
                    proposal_id: *proposal_id,
                    voter: from,
                    choice: *choice,
                }]
            }
            ContractCall::EndProposal(proposal_id) => {
                if let Some(p) = inner.proposals.get_mut(proposal_id) {
                    p.active = false;
                }
                vec![ContractEvent::ProposalEnded {
                    proposal_id: *proposal_id,
                }]
            }
            ContractCall::AddAdmin(account) => {
                inner.admins.insert(*account);
                Vec::new()
            }
            ContractCall::RemoveAdmin(account) => {
                inner.admins.remove(account);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl VotingContract for MockContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_proposal(&self, proposal_id: u64) -> Result<ProposalTuple, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        let p = inner.proposals.get(&proposal_id).ok_or(ContractError::Reverted {
            reason: Some("Proposal does not exist".to_string()),
        })?;
        Ok((
            p.id,
            p.title.clone(),
            p.description.clone(),
            p.start_time,
            p.end_time,
            p.yes_votes,
            p.no_votes,
            p.active,
            p.creator,
            p.category.clone(),
        ))
    }

    async fn get_vote_count(&self, proposal_id: u64) -> Result<(u64, u64), ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        Ok(inner
            .proposals
            .get(&proposal_id)
            .map(|p| (p.yes_votes, p.no_votes))
            .unwrap_or_default())
    }

    async fn has_voted(&self, proposal_id: u64, voter: Address) -> Result<bool, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        Ok(inner.votes.contains_key(&(proposal_id, voter)))
    }

    async fn get_vote(&self, proposal_id: u64, voter: Address) -> Result<VoteTuple, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        let record = inner
            .votes
            .get(&(proposal_id, voter))
            .copied()
            .unwrap_or_default();
        Ok((record.has_voted, record.choice, record.timestamp))
    }

    async fn is_registered_voter(&self, voter: Address) -> Result<bool, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        Ok(inner.voters.contains(&voter))
    }

    async fn is_admin(&self, account: Address) -> Result<bool, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        Ok(inner.admins.contains(&account))
    }

    async fn get_active_proposals(&self) -> Result<Vec<u64>, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        let now = inner.now;
        Ok(inner
            .proposals
            .values()
            .filter(|p| p.active && now <= p.end_time)
            .map(|p| p.id)
            .collect())
    }

    async fn get_all_proposals(&self) -> Result<Vec<u64>, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        Ok(inner.proposals.keys().copied().collect())
    }

    async fn get_proposal_status(&self, proposal_id: u64) -> Result<String, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        let p = inner.proposals.get(&proposal_id).ok_or(ContractError::Reverted {
            reason: Some("Proposal does not exist".to_string()),
        })?;
        Ok(p.status_at(inner.now).as_str().to_string())
    }

    async fn get_proposal_results(&self, proposal_id: u64) -> Result<ResultsTuple, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        let r = Self::results_for(&inner, proposal_id).ok_or(ContractError::Reverted {
            reason: Some("Proposal does not exist".to_string()),
        })?;
        Ok((
            r.total_votes,
            r.yes_votes,
            r.no_votes,
            r.yes_percentage,
            r.no_percentage,
        ))
    }

    async fn proposal_counter(&self) -> Result<u64, ContractError> {
        let inner = lock(&self.inner);
        Self::check_read(&inner)?;
        Ok(inner.proposals.keys().next_back().copied().unwrap_or(0))
    }

    async fn estimate_gas(&self, _from: Address, call: &ContractCall) -> Result<u64, ContractError> {
        let mut inner = lock(&self.inner);
        inner.estimates.push(call.clone());
        match &inner.estimate_error {
            Some(err) => Err(err.clone()),
            None => Ok(inner.gas_estimate),
        }
    }

    async fn send(
        &self,
        from: Address,
        call: ContractCall,
        options: TxOptions,
    ) -> Result<TxHash, ContractError> {
        let mut inner = lock(&self.inner);
        if let Some(err) = inner.send_error.clone() {
            return Err(err);
        }
        inner.nonce += 1;
        let tx_hash = TxHash::from(U256::from(inner.nonce).to_be_bytes::<32>());
        let receipt = match inner.revert_next.take() {
            Some(reason) => TxReceipt {
                tx_hash,
                success: false,
                revert_reason: reason,
                block_number: Some(inner.nonce),
                gas_used: options.gas_limit.unwrap_or(inner.gas_estimate),
                events: Vec::new(),
            },
            None => {
                let events = Self::apply(&mut inner, from, &call);
                TxReceipt {
                    tx_hash,
                    success: true,
                    revert_reason: None,
                    block_number: Some(inner.nonce),
                    gas_used: inner.gas_estimate,
                    events,
                }
            }
        };
        inner.receipts.insert(tx_hash, receipt);
        inner.submissions.push(Submission {
            from,
            call,
            options,
        });
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ContractError> {
        if let Some(gate) = &self.confirmations {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| ContractError::Unavailable(e.to_string()))?;
            permit.forget();
        }
        lock(&self.inner)
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| ContractError::Rpc {
                code: -32000,
                message: format!("transaction {tx_hash} not found"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{addr, proposal, T0};

    #[tokio::test]
    async fn vote_updates_tallies_and_records_voter() {
        let contract = MockContract::new();
        contract.insert_proposal(proposal(1, T0, T0 + 3600));
        let tx = contract
            .send(
                addr(1),
                ContractCall::Vote {
                    proposal_id: 1,
                    choice: true,
                },
                TxOptions::default(),
            )
            .await
            .unwrap();
        let receipt = contract.wait_for_receipt(tx).await.unwrap();
        assert!(receipt.success);
        assert!(contract.has_voted(1, addr(1)).await.unwrap());
        assert_eq!(contract.get_proposal_results(1).await.unwrap(), (1, 1, 0, 100, 0));
    }

    #[tokio::test]
    async fn reverted_transaction_leaves_state_untouched() {
        let contract = MockContract::new();
        contract.revert_next(Some("Not an admin"));
        let tx = contract
            .send(addr(1), ContractCall::RegisterVoter(addr(2)), TxOptions::default())
            .await
            .unwrap();
        let receipt = contract.wait_for_receipt(tx).await.unwrap();
        assert!(!receipt.success);
        assert_eq!(receipt.revert_reason.as_deref(), Some("Not an admin"));
        assert!(!contract.is_voter(addr(2)));
    }

    #[tokio::test]
    async fn created_proposals_get_sequential_ids() {
        let contract = MockContract::new();
        for expected in 1..=2 {
            let tx = contract
                .send(
                    addr(1),
                    ContractCall::CreateProposal {
                        title: "Title".into(),
                        description: "Description".into(),
                        duration_minutes: 10,
                        category: "Other".into(),
                    },
                    TxOptions::default(),
                )
                .await
                .unwrap();
            let receipt = contract.wait_for_receipt(tx).await.unwrap();
            assert_eq!(receipt.created_proposal_id(), Some(expected));
        }
        assert_eq!(contract.proposal_counter().await.unwrap(), 2);
    }
}
