// Path: crates/client/src/gateway/mod.rs
//! The contract gateway: the single mediator between UI intents and the
//! deployed voting contract.
//!
//! Every state-changing call runs the same lifecycle:
//!
//! 1. `OperationState` enters loading and any stale error is cleared.
//! 2. A signer is resolved through the [`ConnectionManager`]. Missing or
//!    mis-networked signers fail before anything reaches the network.
//! 3. Operation-specific pre-flight reads run (only votes have any).
//! 4. The call is submitted and its hash stored immediately.
//! 5. The gateway waits for the receipt. A failure status is reported as
//!    `TransactionFailed`, carrying the revert reason when the node gives one.
//!
//! Failures never escape: callers get `bool` or `Option`, and the failure is
//! recorded in `OperationState.error` and published as a notice.

mod reads;

use crate::connection::ConnectionManager;
use crate::notice::{Notice, NoticeBus, NoticeLevel};
use ballot_api::clock::Clock;
use ballot_api::contract::{ContractCall, ContractEvent, TxOptions, TxReceipt, VotingContract};
use ballot_api::wallet::Signer;
use ballot_types::app::{OperationFailure, OperationState};
use ballot_types::error::{ContractError, ErrorCode, GatewayError};
use ballot_types::{Address, TxHash};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

pub(crate) use reads::proposal_from_tuple;

/// The outcome of a confirmed `createProposal` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProposal {
    pub tx_hash: TxHash,
    /// Recovered from the `ProposalCreated` event. `None` when the receipt
    /// carried no such event; re-query the proposal list in that case.
    pub proposal_id: Option<u64>,
}

/// Wraps every contract operation with validation and transaction tracking.
pub struct ContractGateway {
    contract: Arc<dyn VotingContract>,
    connection: Arc<ConnectionManager>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<OperationState>,
    notices: NoticeBus,
}

impl std::fmt::Debug for ContractGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractGateway")
            .field("contract", &self.contract.address())
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl ContractGateway {
    pub fn new(
        contract: Arc<dyn VotingContract>,
        connection: Arc<ConnectionManager>,
        clock: Arc<dyn Clock>,
        notices: NoticeBus,
    ) -> Self {
        let (state, _) = watch::channel(OperationState::default());
        Self {
            contract,
            connection,
            clock,
            state,
            notices,
        }
    }

    pub fn connection(&self) -> &Arc<ConnectionManager> {
        &self.connection
    }

    /// A snapshot of the current operation state.
    pub fn state(&self) -> OperationState {
        self.state.borrow().clone()
    }

    /// A read-only view that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.send_modify(OperationState::clear_error);
    }

    pub fn reset_state(&self) {
        self.state.send_modify(OperationState::reset);
    }

    pub async fn register_voter(&self, voter: Address) -> bool {
        self.execute(ContractCall::RegisterVoter(voter), "Voter registered successfully!".into())
            .await
            .is_some()
    }

    /// Registers `voters` in one transaction. The list is submitted as given;
    /// callers filter malformed input beforehand.
    pub async fn register_voters(&self, voters: &[Address]) -> bool {
        let message = format!("{} voters registered successfully!", voters.len());
        self.execute(ContractCall::RegisterVoters(voters.to_vec()), message)
            .await
            .is_some()
    }

    pub async fn unregister_voter(&self, voter: Address) -> bool {
        self.execute(
            ContractCall::UnregisterVoter(voter),
            "Voter unregistered successfully!".into(),
        )
        .await
        .is_some()
    }

    /// Creates a proposal open for `duration_minutes` from its mining time.
    pub async fn create_proposal(
        &self,
        title: &str,
        description: &str,
        duration_minutes: u64,
        category: &str,
    ) -> Option<CreatedProposal> {
        let call = ContractCall::CreateProposal {
            title: title.to_string(),
            description: description.to_string(),
            duration_minutes,
            category: category.to_string(),
        };
        let receipt = self
            .execute(call, "Proposal created successfully!".into())
            .await?;
        let proposal_id = receipt.created_proposal_id();
        if proposal_id.is_none() {
            tracing::warn!(target: "gateway", event = "creation_event_missing", tx = %receipt.tx_hash);
        }
        Some(CreatedProposal {
            tx_hash: receipt.tx_hash,
            proposal_id,
        })
    }

    /// Casts a vote, `true` for YES.
    pub async fn vote(&self, proposal_id: u64, choice: bool) -> bool {
        let label = if choice { "YES" } else { "NO" };
        self.execute(
            ContractCall::Vote {
                proposal_id,
                choice,
            },
            format!("Vote {label} cast successfully!"),
        )
        .await
        .is_some()
    }

    pub async fn end_proposal(&self, proposal_id: u64) -> bool {
        self.execute(
            ContractCall::EndProposal(proposal_id),
            "Proposal ended successfully!".into(),
        )
        .await
        .is_some()
    }

    pub async fn add_admin(&self, account: Address) -> bool {
        self.execute(ContractCall::AddAdmin(account), "Admin added successfully!".into())
            .await
            .is_some()
    }

    pub async fn remove_admin(&self, account: Address) -> bool {
        self.execute(
            ContractCall::RemoveAdmin(account),
            "Admin removed successfully!".into(),
        )
        .await
        .is_some()
    }

    /// Runs the full write lifecycle for `call`, returning the receipt of a
    /// successfully mined transaction.
    async fn execute(&self, call: ContractCall, success_message: String) -> Option<TxReceipt> {
        let operation = call.method();
        self.state.send_modify(OperationState::begin);

        let (signer, options) = match self.prepare(&call).await {
            Ok(prepared) => prepared,
            Err(err) => {
                self.fail(operation, &err, None);
                return None;
            }
        };

        let tx_hash = match self.contract.send(signer.address, call, options).await {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                self.fail(operation, &GatewayError::from_submission(err), None);
                return None;
            }
        };
        self.state.send_modify(|state| state.submitted(tx_hash));
        tracing::info!(target: "gateway", event = "submitted", operation, tx = %tx_hash, gas_limit = ?options.gas_limit);
        self.notices.publish(
            Notice::new(
                NoticeLevel::Pending,
                "Transaction submitted. Waiting for confirmation...",
            )
            .with_key(tx_hash.to_string())
            .with_link(self.explorer_link(&tx_hash)),
        );

        match self.confirm(tx_hash).await {
            Ok(receipt) => {
                self.state.send_modify(OperationState::succeed);
                let events: Vec<&str> = receipt.events.iter().map(ContractEvent::name).collect();
                tracing::info!(target: "gateway", event = "confirmed", operation, tx = %tx_hash, block = ?receipt.block_number, gas_used = receipt.gas_used, ?events);
                self.notices.publish(
                    Notice::new(NoticeLevel::Success, success_message)
                        .with_key(tx_hash.to_string())
                        .with_link(self.explorer_link(&tx_hash)),
                );
                Some(receipt)
            }
            Err(err) => {
                self.fail(operation, &err, Some(tx_hash));
                None
            }
        }
    }

    /// Resolves the signer and runs the call's pre-flight checks.
    async fn prepare(&self, call: &ContractCall) -> Result<(Signer, TxOptions), GatewayError> {
        let signer = self.resolve_signer()?;
        let options = match call {
            ContractCall::Vote { proposal_id, .. } => {
                self.check_vote(signer.address, *proposal_id).await?;
                let estimate = self
                    .contract
                    .estimate_gas(signer.address, call)
                    .await
                    .map_err(GatewayError::from_submission)?;
                let gas_limit = self.connection.config().gas_limit_with_margin(estimate);
                tracing::debug!(target: "gateway", event = "gas_estimated", estimate, gas_limit);
                TxOptions::default().with_gas_limit(gas_limit)
            }
            _ => TxOptions::default(),
        };
        Ok((signer, options))
    }

    fn resolve_signer(&self) -> Result<Signer, GatewayError> {
        if !self.connection.has_wallet() {
            return Err(GatewayError::WalletUnavailable);
        }
        let signer = self.connection.signer().ok_or(GatewayError::NotConnected)?;
        let network = &self.connection.config().network;
        if signer.chain_id != network.chain_id {
            return Err(GatewayError::WrongNetwork {
                network: network.chain_name.clone(),
                expected: network.chain_id,
                actual: Some(signer.chain_id),
            });
        }
        Ok(signer)
    }

    /// Registered, not yet voted, and inside the voting window, in that order.
    async fn check_vote(&self, voter: Address, proposal_id: u64) -> Result<(), GatewayError> {
        let registered = self
            .contract
            .is_registered_voter(voter)
            .await
            .map_err(query_failed)?;
        if !registered {
            return Err(GatewayError::NotRegistered);
        }

        let voted = self
            .contract
            .has_voted(proposal_id, voter)
            .await
            .map_err(query_failed)?;
        if voted {
            return Err(GatewayError::AlreadyVoted);
        }

        let proposal = match self.contract.get_proposal(proposal_id).await {
            Ok(tuple) => proposal_from_tuple(tuple),
            Err(ContractError::Reverted { .. }) => {
                return Err(GatewayError::ProposalNotFound(proposal_id))
            }
            Err(err) => return Err(query_failed(err)),
        };
        if !proposal.accepts_votes_at(self.clock.now_secs()) {
            return Err(GatewayError::ProposalEnded);
        }
        Ok(())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<TxReceipt, GatewayError> {
        let receipt = self
            .contract
            .wait_for_receipt(tx_hash)
            .await
            .map_err(GatewayError::from_submission)?;
        if !receipt.success {
            return Err(GatewayError::TransactionFailed {
                reason: receipt.revert_reason,
            });
        }
        Ok(receipt)
    }

    fn fail(&self, operation: &'static str, err: &GatewayError, tx_hash: Option<TxHash>) {
        tracing::warn!(target: "gateway", event = "operation_failed", operation, code = err.code(), error = %err);
        let failure = OperationFailure::new(err.code(), err.to_string());
        self.state.send_modify(|state| state.fail(failure));

        let mut notice = Notice::new(NoticeLevel::Error, err.to_string());
        if let Some(tx_hash) = tx_hash {
            notice = notice
                .with_key(tx_hash.to_string())
                .with_link(self.explorer_link(&tx_hash));
        }
        self.notices.publish(notice);
    }

    fn explorer_link(&self, tx_hash: &TxHash) -> Option<String> {
        self.connection.config().network.explorer_tx_url(tx_hash)
    }
}

fn query_failed(err: ContractError) -> GatewayError {
    GatewayError::QueryFailed(err.best_message())
}
