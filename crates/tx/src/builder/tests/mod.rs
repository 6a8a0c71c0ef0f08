// Path: crates/tx/src/builder/tests/mod.rs
use super::*;
use chrono::Duration;
use koa_crypto::account::verify_transaction;
use koa_types::app::{Digest, SignedTransaction, TxType, MIN_TXN_FEE};

const APP_ID: u64 = 1234;

fn params() -> SuggestedParams {
    SuggestedParams {
        fee: 0,
        min_fee: MIN_TXN_FEE,
        flat_fee: false,
        first_valid: 50,
        last_valid: 1050,
        genesis_id: "sandnet-v1".to_string(),
        genesis_hash: Digest::hash(b"sandnet"),
        consensus_version: "future".to_string(),
    }
}

fn now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
}

fn state(king: Option<Address>, end_of_reign: DateTime<Utc>) -> ContractState {
    ContractState {
        admin: Address([0xAA; 32]),
        king,
        end_of_reign,
        king_price: 200_000,
        init_price: 100_000,
        reward_multiplier: 75,
        admin_fee: 5,
        reign_period: 3600,
    }
}

fn request<'a>(challenger: &'a Account, state: ContractState) -> BecomeKingRequest<'a> {
    BecomeKingRequest {
        params: params(),
        state,
        challenger,
        message: "long live the king".to_string(),
        app_id: APP_ID,
        split_override: None,
    }
}

fn members(built: &CoronationGroup) -> Vec<&SignedTransaction> {
    built.group.transactions.iter().collect()
}

#[test]
fn no_king_builds_three_members() {
    // Scenario A: vacant throne, init price 100000, admin fee 5%.
    let challenger = Account::generate();
    let req = request(&challenger, state(None, DateTime::<Utc>::default()));
    let built = build_become_king_group(&req, now()).unwrap();

    let m = members(&built);
    assert_eq!(m.len(), 3);

    let call = &m[0].txn;
    assert_eq!(call.tx_type, TxType::ApplicationCall);
    assert_eq!(call.app_id, APP_ID);
    assert_eq!(call.app_args[0].to_vec(), b"claim_throne".to_vec());
    assert!(call.accounts.is_empty());
    assert_eq!(call.fee, MIN_TXN_FEE);
    assert_eq!(call.note, b"kingOfAlgo/v1:ulong live the king".to_vec());

    let admin = &m[1].txn;
    assert_eq!(admin.receiver, Address([0xAA; 32]));
    assert_eq!(admin.amount, 5_000);
    assert_eq!(admin.note, b"kingOfAlgo/v1:uadmin_fee_tx".to_vec());

    let comp = &m[2].txn;
    assert_eq!(comp.receiver, Address::for_application(APP_ID));
    assert_eq!(comp.amount, 95_000);
    assert_eq!(comp.note, b"kingOfAlgo/v1:ucomp_tx".to_vec());
}

#[test]
fn active_king_builds_four_members() {
    // Scenario B: king price 200000, reward 75%, admin fee 5%.
    let challenger = Account::generate();
    let king = Address([0xBB; 32]);
    let req = request(&challenger, state(Some(king), now() + Duration::hours(1)));
    let built = build_become_king_group(&req, now()).unwrap();

    let m = members(&built);
    assert_eq!(m.len(), 4);
    assert_eq!(m[1].txn.amount, 10_000);
    assert_eq!(m[2].txn.amount, 40_000);
    assert_eq!(m[3].txn.amount, 150_000);
    assert_eq!(m[3].txn.receiver, king);
    assert_eq!(m[3].txn.note, b"kingOfAlgo/v1:ureward_tx".to_vec());

    let total: u64 = m.iter().skip(1).map(|s| s.txn.amount).sum();
    assert_eq!(total, 200_000);

    // An active reign never triggers the settlement path.
    assert!(m[0].txn.accounts.is_empty());
    assert_eq!(m[0].txn.fee, MIN_TXN_FEE);
}

#[test]
fn expired_reign_with_king_references_king_and_doubles_fee() {
    // Scenario D: the reign lapsed; init price drives pay and reward.
    let challenger = Account::generate();
    let king = Address([0xBB; 32]);
    let req = request(&challenger, state(Some(king), now() - Duration::seconds(1)));
    let built = build_become_king_group(&req, now()).unwrap();

    let m = members(&built);
    assert_eq!(m.len(), 4);
    assert_eq!(m[0].txn.accounts, vec![king]);
    assert_eq!(m[0].txn.fee, 2 * MIN_TXN_FEE);
    assert_eq!(m[1].txn.amount, 5_000);
    assert_eq!(m[2].txn.amount, 20_000);
    assert_eq!(m[3].txn.amount, 75_000);

    // Payments keep the suggested fee.
    assert!(m.iter().skip(1).all(|s| s.txn.fee == MIN_TXN_FEE));
}

#[test]
fn expired_reign_without_king_uses_suggested_fee() {
    let challenger = Account::generate();
    let req = request(&challenger, state(None, now() - Duration::seconds(1)));
    let built = build_become_king_group(&req, now()).unwrap();
    assert_eq!(built.group.len(), 3);
    assert!(built.group.transactions[0].txn.accounts.is_empty());
    assert_eq!(built.group.transactions[0].txn.fee, MIN_TXN_FEE);
}

#[test]
fn every_member_shares_group_and_is_signed_by_challenger() {
    let challenger = Account::generate();
    let req = request(&challenger, state(Some(Address([0xBB; 32])), now() + Duration::hours(1)));
    let built = build_become_king_group(&req, now()).unwrap();

    assert!(!built.group.group_id.is_zero());
    for stx in &built.group.transactions {
        assert_eq!(stx.txn.group, built.group.group_id);
        assert_eq!(stx.txn.sender, challenger.address());
        verify_transaction(stx).unwrap();
    }
    assert_eq!(
        SignedGroup::decode_wire(&built.group.wire).unwrap(),
        built.group.transactions
    );
}

#[test]
fn same_inputs_build_identical_bytes() {
    let challenger = Account::generate();
    let req = request(&challenger, state(Some(Address([0xBB; 32])), now() + Duration::hours(1)));
    let a = build_become_king_group(&req, now()).unwrap();
    let b = build_become_king_group(&req, now()).unwrap();
    assert_eq!(a.group.wire, b.group.wire);
}

#[test]
fn split_override_changes_only_what_it_names() {
    let challenger = Account::generate();
    let thief = Address([0xCC; 32]);
    let mut req = request(&challenger, state(Some(Address([0xBB; 32])), now() + Duration::hours(1)));
    req.split_override = Some(SplitOverride {
        reward: Some(190_000),
        comp: Some(0),
        reward_receiver: Some(thief),
        ..Default::default()
    });
    let built = build_become_king_group(&req, now()).unwrap();

    let m = members(&built);
    assert_eq!(m[1].txn.amount, 10_000);
    assert_eq!(m[2].txn.amount, 0);
    assert_eq!(m[3].txn.amount, 190_000);
    assert_eq!(m[3].txn.receiver, thief);
    // The reported pricing is still the honest split.
    assert_eq!(built.pricing.reward_amount, 150_000);
}

#[test]
fn invalid_params_fail_without_partial_output() {
    let challenger = Account::generate();
    let mut req = request(&challenger, state(None, DateTime::<Utc>::default()));
    req.params.genesis_hash = Digest::default();
    assert!(matches!(
        build_become_king_group(&req, now()),
        Err(BuildError::Invalid(_))
    ));

    let mut req = request(&challenger, state(Some(Address([0xBB; 32])), now() + Duration::hours(1)));
    req.state.admin_fee = 50;
    assert!(matches!(
        build_become_king_group(&req, now()),
        Err(BuildError::Pricing(_))
    ));
}
