// Path: crates/client/tests/gateway.rs
//! End-to-end write and read flows through the gateway, with the wallet and
//! contract replaced by in-memory doubles.

use ballot_api::contract::ContractCall;
use ballot_api::wallet::WalletProvider;
use ballot_client::intents::{self, DurationUnit, IntentError, ProposalDraft};
use ballot_client::{ConnectionManager, ContractGateway, Notice, NoticeBus, NoticeLevel};
use ballot_test_utils::fixtures::{addr, proposal, T0};
use ballot_test_utils::{FixedClock, MockContract, MockWallet};
use ballot_types::app::{OperationState, ProposalStatus};
use ballot_types::config::BallotConfig;
use ballot_types::error::{ContractError, ProviderError};
use ballot_types::Address;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

struct Harness {
    contract: Arc<MockContract>,
    clock: Arc<FixedClock>,
    gateway: Arc<ContractGateway>,
    notices: broadcast::Receiver<Notice>,
}

async fn harness_with(contract: MockContract, connect: bool) -> Harness {
    let bus = NoticeBus::default();
    let notices = bus.subscribe();
    let connection = ConnectionManager::new(
        Some(Arc::new(MockWallet::new()) as Arc<dyn WalletProvider>),
        Arc::new(BallotConfig::default()),
        bus.clone(),
    );
    if connect {
        connection.connect().await.unwrap();
    }
    let contract = Arc::new(contract);
    let clock = Arc::new(FixedClock::new(T0 + 60));
    let gateway = Arc::new(ContractGateway::new(
        contract.clone(),
        connection,
        clock.clone(),
        bus,
    ));
    Harness {
        contract,
        clock,
        gateway,
        notices,
    }
}

async fn connected() -> Harness {
    harness_with(MockContract::new(), true).await
}

fn drain(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        out.push(notice);
    }
    out
}

#[tokio::test]
async fn vote_already_cast_is_rejected_before_submission() {
    let h = connected().await;
    h.contract.insert_proposal(proposal(1, T0, T0 + 3600));
    h.contract.register(addr(1));
    h.contract.record_vote(1, addr(1), true);

    assert!(!h.gateway.vote(1, false).await);

    assert!(h.contract.submissions().is_empty());
    assert!(h.contract.estimates().is_empty());
    let state = h.gateway.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.unwrap().message, "You have already voted on this proposal.");
}

#[tokio::test]
async fn unregistered_voter_is_rejected_before_submission() {
    let h = connected().await;
    h.contract.insert_proposal(proposal(1, T0, T0 + 3600));

    assert!(!h.gateway.vote(1, true).await);

    assert!(h.contract.submissions().is_empty());
    let error = h.gateway.state().error.unwrap();
    assert_eq!(error.code, "GATEWAY_NOT_REGISTERED");
    assert_eq!(
        error.message,
        "You must be registered as a voter first. Please contact an admin."
    );
}

#[tokio::test]
async fn disconnected_writes_only_set_the_error() {
    let h = connected().await;
    assert!(h.gateway.register_voter(addr(5)).await);
    let before = h.gateway.state();
    assert!(before.tx_hash.is_some());

    h.gateway.connection().disconnect();
    let submitted = h.contract.submissions().len();

    let attempts = [
        h.gateway.register_voter(addr(6)).await,
        h.gateway.register_voters(&[addr(6), addr(7)]).await,
        h.gateway.unregister_voter(addr(5)).await,
        h.gateway
            .create_proposal("Title", "A description long enough", 60, "General")
            .await
            .is_some(),
        h.gateway.vote(1, true).await,
        h.gateway.end_proposal(1).await,
        h.gateway.add_admin(addr(6)).await,
        h.gateway.remove_admin(addr(6)).await,
    ];
    assert!(attempts.iter().all(|ok| !ok));
    assert_eq!(h.contract.submissions().len(), submitted);

    let after = h.gateway.state();
    let error = after.error.clone().unwrap();
    assert_eq!(error.code, "GATEWAY_NOT_CONNECTED");
    assert_eq!(
        after,
        OperationState {
            error: Some(error),
            ..before
        }
    );
}

#[tokio::test]
async fn proposal_duration_is_submitted_in_minutes() {
    let mut h = connected().await;
    h.contract.set_block_time(T0 + 30);
    let draft = ProposalDraft {
        title: "Extend the grants programme".into(),
        description: "Renew community grants for another quarter".into(),
        duration: 2,
        duration_unit: "hours".parse::<DurationUnit>().unwrap(),
        category: "Finance".into(),
    };

    let created = intents::submit_draft(&h.gateway, &draft).await.unwrap();

    assert_eq!(created.proposal_id, Some(1));
    let submissions = h.contract.submissions();
    assert_eq!(submissions.len(), 1);
    match &submissions[0].call {
        ContractCall::CreateProposal {
            duration_minutes,
            title,
            ..
        } => {
            assert_eq!(*duration_minutes, 120);
            assert_eq!(title, "Extend the grants programme");
        }
        other => panic!("unexpected call {other:?}"),
    }
    let created_proposal = h.contract.proposal(1).unwrap();
    assert_eq!(created_proposal.start_time, T0 + 30);
    assert_eq!(created_proposal.end_time, T0 + 30 + 7200);

    let notices = drain(&mut h.notices);
    assert!(notices
        .iter()
        .any(|n| n.message == "Proposal created successfully!"));
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_gateway() {
    let h = connected().await;
    let draft = ProposalDraft {
        title: "Hi".into(),
        ..ProposalDraft::default()
    };
    let err = intents::submit_draft(&h.gateway, &draft).await.unwrap_err();
    assert!(matches!(err, IntentError::Draft(_)));
    assert!(h.contract.submissions().is_empty());
    assert_eq!(h.gateway.state(), OperationState::default());
}

#[tokio::test]
async fn bulk_registration_filters_malformed_addresses() {
    let h = connected().await;
    let a = format!("0x{}", "aa".repeat(20));
    let b = format!("0x{}", "bb".repeat(20));
    let input = format!("{a}\ninvalid\n{b}");

    let count = intents::register_voters_from_input(&h.gateway, &input)
        .await
        .unwrap();

    assert_eq!(count, 2);
    let submissions = h.contract.submissions();
    assert_eq!(
        submissions[0].call,
        ContractCall::RegisterVoters(vec![Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)])
    );
    assert!(h.contract.is_voter(Address::repeat_byte(0xaa)));
}

#[tokio::test]
async fn bulk_registration_with_nothing_valid_is_refused_locally() {
    let h = connected().await;
    let err = intents::register_voters_from_input(&h.gateway, "nope\n0x12")
        .await
        .unwrap_err();
    assert_eq!(err, IntentError::NoValidAddresses);
    assert!(h.contract.submissions().is_empty());
}

#[tokio::test]
async fn gateway_submits_bulk_lists_unvalidated() {
    let h = connected().await;
    let voters = [Address::ZERO, addr(2), addr(2)];
    assert!(h.gateway.register_voters(&voters).await);
    assert_eq!(
        h.contract.submissions()[0].call,
        ContractCall::RegisterVoters(voters.to_vec())
    );
}

#[tokio::test]
async fn reverted_transaction_reports_revert_reason() {
    let mut h = connected().await;
    h.contract.insert_proposal(proposal(1, T0, T0 + 3600));
    h.contract.revert_next(Some("Only admin can end proposals"));

    assert!(!h.gateway.end_proposal(1).await);

    let state = h.gateway.state();
    assert!(!state.is_loading);
    let error = state.error.unwrap();
    assert_eq!(error.code, "GATEWAY_TRANSACTION_FAILED");
    assert_eq!(error.message, "Only admin can end proposals");
    assert!(state.tx_hash.is_some());
    assert!(h.contract.proposal(1).unwrap().active);

    let notices = drain(&mut h.notices);
    let last = notices.last().unwrap();
    assert_eq!(last.level, NoticeLevel::Error);
    assert_eq!(last.key, state.tx_hash.map(|tx| tx.to_string()));
}

#[tokio::test]
async fn tx_hash_is_visible_before_confirmation() {
    let h = harness_with(MockContract::new().with_manual_confirmations(), true).await;
    let mut rx = h.gateway.subscribe();

    let gateway = h.gateway.clone();
    let pending = tokio::spawn(async move { gateway.register_voter(addr(8)).await });

    let state = timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.tx_hash.is_some()),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();
    assert!(state.is_loading);
    assert!(state.error.is_none());

    h.contract.confirm_one();
    assert!(pending.await.unwrap());
    let state = h.gateway.state();
    assert!(!state.is_loading);
    assert!(state.tx_hash.is_some());
}

#[tokio::test]
async fn pending_and_success_notices_share_the_transaction_key() {
    let mut h = connected().await;
    drain(&mut h.notices);

    assert!(h.gateway.add_admin(addr(4)).await);

    let notices = drain(&mut h.notices);
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].level, NoticeLevel::Pending);
    assert_eq!(
        notices[0].message,
        "Transaction submitted. Waiting for confirmation..."
    );
    assert_eq!(notices[1].level, NoticeLevel::Success);
    assert_eq!(notices[1].message, "Admin added successfully!");
    assert_eq!(notices[0].key, notices[1].key);
    let tx = h.gateway.state().tx_hash.unwrap();
    assert_eq!(
        notices[1].link.as_deref(),
        Some(format!("https://sepolia.etherscan.io/tx/{tx}").as_str())
    );
}

#[tokio::test]
async fn created_proposal_id_is_optional() {
    let h = connected().await;
    let first = h
        .gateway
        .create_proposal("First proposal", "The first proposal on record", 60, "General")
        .await
        .unwrap();
    assert_eq!(first.proposal_id, Some(1));

    h.contract.suppress_creation_events();
    let second = h
        .gateway
        .create_proposal("Second proposal", "The second proposal on record", 60, "General")
        .await
        .unwrap();
    assert_eq!(second.proposal_id, None);
    assert_ne!(first.tx_hash, second.tx_hash);
    assert_eq!(h.gateway.get_all_proposals().await, vec![1, 2]);
    assert!(h.gateway.state().error.is_none());
}

#[tokio::test]
async fn vote_succeeds_and_status_follows_the_clock() {
    let mut h = connected().await;
    h.contract.insert_proposal(proposal(1, T0, T0 + 3600));
    h.contract.register(addr(1));

    assert!(h.gateway.vote(1, true).await);
    assert!(h.gateway.has_voted(1, addr(1)).await);
    let record = h.gateway.get_vote(1, addr(1)).await.unwrap();
    assert!(record.has_voted && record.choice);
    assert_eq!(h.gateway.get_vote_count(1).await, Some((1, 0)));
    assert!(drain(&mut h.notices)
        .iter()
        .any(|n| n.message == "Vote YES cast successfully!"));

    let loaded = h.gateway.get_proposal(1).await.unwrap();
    assert_eq!(h.gateway.proposal_status(&loaded), ProposalStatus::Active);
    h.clock.set(T0 + 3601);
    assert_eq!(h.gateway.proposal_status(&loaded), ProposalStatus::Ended);
    assert!(!h.gateway.vote(1, false).await);
}

#[tokio::test]
async fn dashboard_lists_recent_proposals_newest_first() {
    let h = harness_with(MockContract::new(), false).await;
    for id in 1..=7 {
        h.contract.insert_proposal(proposal(id, T0, T0 + 3600));
    }
    h.contract.insert_proposal({
        let mut ended = proposal(8, T0 - 7200, T0 - 3600);
        ended.active = false;
        ended
    });

    let summary = intents::load_dashboard(&h.gateway).await;

    assert_eq!(summary.total_proposals, 8);
    assert_eq!(summary.active_proposals, 7);
    assert_eq!(summary.active.len(), 7);
    let recent: Vec<u64> = summary.recent.iter().map(|p| p.id).collect();
    assert_eq!(recent, vec![8, 7, 6, 5, 4]);
}

#[tokio::test]
async fn failed_gas_estimate_aborts_the_vote() {
    let mut h = connected().await;
    h.contract.insert_proposal(proposal(1, T0, T0 + 3600));
    h.contract.register(addr(1));
    h.contract.fail_estimates_with(ContractError::Rpc {
        code: -32000,
        message: "gas required exceeds allowance".into(),
    });
    drain(&mut h.notices);

    assert!(!h.gateway.vote(1, true).await);

    assert_eq!(h.contract.estimates().len(), 1);
    assert!(h.contract.submissions().is_empty());
    let state = h.gateway.state();
    assert!(!state.is_loading);
    assert!(state.tx_hash.is_none());
    let error = state.error.unwrap();
    assert_eq!(error.code, "GATEWAY_SUBMISSION_FAILED");
    assert_eq!(error.message, "RPC error -32000: gas required exceeds allowance");
    let notices = drain(&mut h.notices);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn declined_signature_is_reported_as_user_rejection() {
    let h = connected().await;
    h.contract.fail_sends_with(ContractError::Rpc {
        code: ProviderError::USER_REJECTED,
        message: "User denied transaction signature".into(),
    });

    assert!(!h.gateway.register_voter(addr(5)).await);

    assert!(!h.contract.is_voter(addr(5)));
    let state = h.gateway.state();
    assert!(!state.is_loading);
    assert!(state.tx_hash.is_none());
    assert_eq!(state.error.unwrap().code, "GATEWAY_USER_REJECTED");
}

#[tokio::test]
async fn vote_at_exact_end_time_is_rejected_while_status_is_active() {
    let h = connected().await;
    h.contract.insert_proposal(proposal(1, T0, T0 + 3600));
    h.contract.register(addr(1));
    h.clock.set(T0 + 3000);
    h.clock.advance(600);

    let loaded = h.gateway.get_proposal(1).await.unwrap();
    assert_eq!(h.gateway.proposal_status(&loaded), ProposalStatus::Active);
    assert!(!h.gateway.vote(1, true).await);

    assert!(h.contract.estimates().is_empty());
    assert!(h.contract.submissions().is_empty());
    let error = h.gateway.state().error.unwrap();
    assert_eq!(error.code, "GATEWAY_PROPOSAL_ENDED");
}
