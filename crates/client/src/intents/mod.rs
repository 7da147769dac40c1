// Path: crates/client/src/intents/mod.rs
//! The UI boundary: validation and parsing of raw form input before it
//! reaches the [`ContractGateway`], plus derived views over loaded data.
//!
//! The gateway trusts its inputs. Anything that must be filtered or rejected
//! (malformed addresses, out-of-range durations) is handled here.

mod address;
mod draft;
mod view;

pub use address::{parse_address, parse_address_list};
pub use draft::{to_minutes, DraftError, DurationUnit, ProposalDraft};
pub use view::{recent_ids, winning_option, DashboardSummary, Outcome, ProposalFilter, RECENT_LIMIT};

use crate::gateway::{ContractGateway, CreatedProposal};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("Please enter a valid Ethereum address")]
    InvalidAddress,
    #[error("Please enter valid Ethereum addresses")]
    NoValidAddresses,
    /// The gateway ran the operation and it failed. Details are in its
    /// `OperationState`.
    #[error("The operation did not complete")]
    OperationFailed,
}

/// Validates `draft` and submits it, converting the duration to minutes.
pub async fn submit_draft(
    gateway: &ContractGateway,
    draft: &ProposalDraft,
) -> Result<CreatedProposal, IntentError> {
    draft.validate()?;
    gateway
        .create_proposal(
            &draft.title,
            &draft.description,
            draft.duration_minutes(),
            &draft.category,
        )
        .await
        .ok_or(IntentError::OperationFailed)
}

/// Registers every valid address in newline-separated `input` in a single
/// transaction. Returns the number of addresses submitted.
pub async fn register_voters_from_input(
    gateway: &ContractGateway,
    input: &str,
) -> Result<usize, IntentError> {
    let voters = parse_address_list(input);
    if voters.is_empty() {
        return Err(IntentError::NoValidAddresses);
    }
    if gateway.register_voters(&voters).await {
        Ok(voters.len())
    } else {
        Err(IntentError::OperationFailed)
    }
}

pub async fn register_voter_from_input(
    gateway: &ContractGateway,
    input: &str,
) -> Result<(), IntentError> {
    let voter = parse_address(input).ok_or(IntentError::InvalidAddress)?;
    if gateway.register_voter(voter).await {
        Ok(())
    } else {
        Err(IntentError::OperationFailed)
    }
}

pub async fn add_admin_from_input(
    gateway: &ContractGateway,
    input: &str,
) -> Result<(), IntentError> {
    let account = parse_address(input).ok_or(IntentError::InvalidAddress)?;
    if gateway.add_admin(account).await {
        Ok(())
    } else {
        Err(IntentError::OperationFailed)
    }
}

/// Loads the dashboard: counts, the active proposals, and the most recent
/// proposals. Proposals that fail to load are left out.
pub async fn load_dashboard(gateway: &ContractGateway) -> DashboardSummary {
    let (active_ids, all_ids) =
        tokio::join!(gateway.get_active_proposals(), gateway.get_all_proposals());
    let recent = recent_ids(&all_ids, RECENT_LIMIT);
    let (active, recent) = tokio::join!(
        gateway.load_proposals(&active_ids),
        gateway.load_proposals(&recent)
    );
    DashboardSummary {
        total_proposals: all_ids.len(),
        active_proposals: active_ids.len(),
        active,
        recent,
    }
}
