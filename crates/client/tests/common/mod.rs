// Path: crates/client/tests/common/mod.rs
//! An in-memory ledger that enforces the contract's coronation rules.
//!
//! Groups are applied to a copy of the world and committed only when every
//! member succeeds, so a rejected group never moves funds.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use koa_client::algod::models::{
    NodeStatus, PendingTransaction, SimulateGroupResult, SimulateRequest, SimulateResponse,
    SimulateTxnResult,
};
use koa_client::{ClientError, LedgerRead, LedgerWrite, ProgramCompiler, Simulator};
use koa_crypto::account::verify_transaction;
use koa_tx::group::compute_group_id;
use koa_tx::SignedGroup;
use koa_types::app::{
    Address, Digest, OnCompletion, RawKeyValue, SignedTransaction, SuggestedParams, Transaction,
    TxType, MIN_TXN_FEE,
};
use koa_types::error::SubmissionError;
use koa_types::keys::{
    ADMIN_FEE_KEY, ADMIN_KEY, DEFAULT_PRICE, END_OF_REIGN_KEY, INIT_PRICE_KEY, KING_KEY,
    KING_PRICE_KEY, REIGN_PERIOD_KEY, REWARD_MULTIPLIER_KEY,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

pub const MIN_BALANCE: u64 = 100_000;
pub const FIRST_APP_ID: u64 = 1001;
const ADMIN_FEE_PERCENT: u64 = 5;
const REWARD_PERCENT: u64 = 75;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Uint(u64),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
struct App {
    creator: Address,
    global: BTreeMap<Vec<u8>, Value>,
}

impl App {
    fn uint(&self, key: &[u8]) -> u64 {
        match self.global.get(key) {
            Some(Value::Uint(v)) => *v,
            _ => 0,
        }
    }

    fn bytes(&self, key: &[u8]) -> Vec<u8> {
        match self.global.get(key) {
            Some(Value::Bytes(b)) => b.clone(),
            _ => Vec::new(),
        }
    }

    fn put_uint(&mut self, key: &[u8], v: u64) {
        self.global.insert(key.to_vec(), Value::Uint(v));
    }

    fn put_bytes(&mut self, key: &[u8], v: &[u8]) {
        self.global.insert(key.to_vec(), Value::Bytes(v.to_vec()));
    }

    fn reset_timestamp(&mut self, now: u64) {
        let period = self.uint(REIGN_PERIOD_KEY);
        self.put_uint(END_OF_REIGN_KEY, now + period);
    }

    fn set_init_state(&mut self, now: u64) {
        self.put_bytes(KING_KEY, b"");
        self.put_uint(INIT_PRICE_KEY, DEFAULT_PRICE);
        self.put_uint(KING_PRICE_KEY, DEFAULT_PRICE);
        self.reset_timestamp(now);
    }

    fn set_new_king(&mut self, king: Address) {
        let price = self.uint(KING_PRICE_KEY);
        self.put_uint(KING_PRICE_KEY, price * 2);
        self.put_bytes(KING_KEY, king.as_bytes());
    }
}

#[derive(Debug, Clone, Default)]
struct World {
    balances: HashMap<Address, u64>,
    apps: HashMap<u64, App>,
    next_app_id: u64,
}

type Rejection = (usize, String);

impl World {
    fn debit(&mut self, who: Address, amount: u64) -> Result<(), String> {
        let balance = self.balances.get(&who).copied().unwrap_or(0);
        let left = balance
            .checked_sub(amount)
            .filter(|left| *left >= MIN_BALANCE)
            .ok_or_else(|| format!("overspend: account {} balance {} cannot pay {}", who, balance, amount))?;
        self.balances.insert(who, left);
        Ok(())
    }

    fn credit(&mut self, who: Address, amount: u64) {
        *self.balances.entry(who).or_insert(0) += amount;
    }

    fn pay(&mut self, txn: &Transaction) -> Result<(), String> {
        self.debit(txn.sender, txn.amount + txn.fee)?;
        self.credit(txn.receiver, txn.amount);
        Ok(())
    }

    /// Applies a whole group, returning the id of an application it created.
    fn apply_group(
        &mut self,
        txns: &[Transaction],
        genesis: Digest,
        round: u64,
        now: u64,
    ) -> Result<Option<u64>, Rejection> {
        if txns.len() > 1 {
            let expected = compute_group_id(txns).map_err(|e| (0, e.to_string()))?;
            if let Some(i) = txns.iter().position(|t| t.group != expected) {
                return Err((i, "incomplete group: group id mismatch".to_string()));
            }
        }

        let mut created = None;
        for (i, txn) in txns.iter().enumerate() {
            if txn.genesis_hash != genesis {
                return Err((i, "wrong genesis hash".to_string()));
            }
            if txn.first_valid > round || txn.last_valid < round {
                return Err((i, format!("round {} outside validity window", round)));
            }
            if txn.fee < MIN_TXN_FEE {
                return Err((i, format!("fee {} below minimum", txn.fee)));
            }
            match txn.tx_type {
                TxType::Payment => self.pay(txn).map_err(|e| (i, e))?,
                TxType::ApplicationCall if txn.app_id == 0 => {
                    created = Some(self.create_app(txn, now).map_err(|e| (i, e))?);
                }
                TxType::ApplicationCall => self.call_app(i, txns, now).map_err(|e| (i, e))?,
            }
        }
        Ok(created)
    }

    fn create_app(&mut self, txn: &Transaction, now: u64) -> Result<u64, String> {
        self.debit(txn.sender, txn.fee)?;
        let period = txn
            .app_args
            .first()
            .and_then(|a| <[u8; 8]>::try_from(a.as_slice()).ok())
            .map(u64::from_be_bytes)
            .ok_or("missing reign period argument")?;

        let mut app = App {
            creator: txn.sender,
            global: BTreeMap::new(),
        };
        app.put_bytes(ADMIN_KEY, txn.sender.as_bytes());
        app.put_uint(ADMIN_FEE_KEY, ADMIN_FEE_PERCENT);
        app.put_uint(REIGN_PERIOD_KEY, period);
        app.put_uint(REWARD_MULTIPLIER_KEY, REWARD_PERCENT);
        app.set_init_state(now);

        let id = FIRST_APP_ID + self.next_app_id;
        self.next_app_id += 1;
        self.apps.insert(id, app);
        Ok(id)
    }

    fn call_app(&mut self, index: usize, txns: &[Transaction], now: u64) -> Result<(), String> {
        let call = &txns[index];
        self.debit(call.sender, call.fee)?;
        if call.on_completion != OnCompletion::NoOp {
            return Err("only claims are supported".to_string());
        }
        let app_address = Address::for_application(call.app_id);
        let mut app = self
            .apps
            .get(&call.app_id)
            .cloned()
            .ok_or_else(|| format!("application {} does not exist", call.app_id))?;

        let king = app.bytes(KING_KEY);
        let admin = app.bytes(ADMIN_KEY);
        let expected_size = if king.is_empty() { 3 } else { 4 };
        ensure(txns.len() == expected_size, "wrong group size")?;
        ensure(index == 0, "claim must be the first member")?;
        ensure(txns.iter().all(|t| t.rekey_to.is_zero()), "rekey not allowed")?;

        let admin_fee = payment(txns, 1, &king, &admin, "admin fee")?;
        let comp = payment(txns, 2, &king, app_address.as_bytes(), "compensation")?;
        let fee_pct = app.uint(ADMIN_FEE_KEY);
        let reward_pct = app.uint(REWARD_MULTIPLIER_KEY);

        if king.is_empty() {
            let price = app.uint(INIT_PRICE_KEY);
            ensure(admin_fee.amount + comp.amount == price, "unbalanced split")?;
            ensure(admin_fee.amount == ceil_percent(price, fee_pct), "wrong admin fee")?;
            app.reset_timestamp(now);
        } else {
            let reward = payment(txns, 3, &king, &king, "reward")?;
            let sum = admin_fee.amount + comp.amount + reward.amount;
            if app.uint(END_OF_REIGN_KEY) > now {
                let price = app.uint(KING_PRICE_KEY);
                ensure(sum == price, "unbalanced split")?;
                ensure(reward.amount == ceil_percent(price, reward_pct), "wrong reward")?;
                ensure(admin_fee.amount == ceil_percent(price, fee_pct), "wrong admin fee")?;
            } else {
                let price = app.uint(INIT_PRICE_KEY);
                ensure(call.fee == MIN_TXN_FEE * 2, "call must fund the inner payment")?;
                ensure(sum == price, "unbalanced split")?;
                ensure(reward.amount == ceil_percent(price, reward_pct), "wrong reward")?;
                ensure(admin_fee.amount == ceil_percent(price, fee_pct), "wrong admin fee")?;
                ensure(
                    call.accounts.contains(&reward.receiver),
                    "inner payment receiver is not referenced",
                )?;
                let balance = self.balances.get(&app_address).copied().unwrap_or(0);
                let payout = balance.saturating_sub(MIN_BALANCE);
                self.debit(app_address, payout)?;
                self.credit(reward.receiver, payout);
                app.set_init_state(now);
            }
        }

        app.set_new_king(comp.sender);
        self.apps.insert(call.app_id, app);
        Ok(())
    }
}

fn payment<'t>(
    txns: &'t [Transaction],
    index: usize,
    king: &[u8],
    receiver: &[u8],
    what: &str,
) -> Result<&'t Transaction, String> {
    let t = &txns[index];
    ensure(t.tx_type == TxType::Payment, &format!("{} is not a payment", what))?;
    ensure(t.sender.as_bytes().as_slice() != king, &format!("{} sent by the king", what))?;
    ensure(t.receiver.as_bytes().as_slice() == receiver, &format!("{} has the wrong receiver", what))?;
    Ok(t)
}

fn ensure(cond: bool, msg: &str) -> Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(format!("logic eval error: {}", msg))
    }
}

fn ceil_percent(amount: u64, percent: u64) -> u64 {
    (amount * percent).div_ceil(100)
}

struct Inner {
    world: World,
    round: u64,
    pending: HashMap<String, PendingTransaction>,
    group_sizes: Vec<usize>,
    hide_app_index: bool,
}

pub struct FakeLedger {
    inner: Mutex<Inner>,
    genesis: Digest,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                world: World::default(),
                round: 1,
                pending: HashMap::new(),
                group_sizes: Vec::new(),
                hide_app_index: false,
            }),
            genesis: Digest::hash(b"fakenet"),
        }
    }

    pub fn fund(&self, who: Address, amount: u64) {
        self.inner.lock().unwrap().world.credit(who, amount);
    }

    pub fn balance_of(&self, who: &Address) -> u64 {
        self.inner
            .lock()
            .unwrap()
            .world
            .balances
            .get(who)
            .copied()
            .unwrap_or(0)
    }

    /// Moves the reign's end into the past.
    pub fn expire_reign(&self, app_id: u64) {
        let now = now_secs();
        let mut inner = self.inner.lock().unwrap();
        let app = inner.world.apps.get_mut(&app_id).unwrap();
        app.put_uint(END_OF_REIGN_KEY, now - 1);
    }

    /// Confirmations stop reporting the id of created applications.
    pub fn hide_application_index(&self) {
        self.inner.lock().unwrap().hide_app_index = true;
    }

    /// Sizes of every committed group, in commit order.
    pub fn committed_group_sizes(&self) -> Vec<usize> {
        self.inner.lock().unwrap().group_sizes.clone()
    }
}

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap()
}

fn decode(wire: &[u8]) -> Result<Vec<SignedTransaction>, ClientError> {
    SignedGroup::decode_wire(wire).map_err(|e| {
        SubmissionError::Rejected {
            status: 400,
            message: e.to_string(),
        }
        .into()
    })
}

#[async_trait]
impl LedgerRead for FakeLedger {
    async fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        let round = self.inner.lock().unwrap().round;
        Ok(SuggestedParams {
            fee: 0,
            min_fee: MIN_TXN_FEE,
            flat_fee: false,
            first_valid: round,
            last_valid: round + 1000,
            genesis_id: "fakenet-v1".to_string(),
            genesis_hash: self.genesis,
            consensus_version: "fake".to_string(),
        })
    }

    async fn read_contract_key_values(
        &self,
        address: &Address,
        app_id: u64,
    ) -> Result<Vec<RawKeyValue>, ClientError> {
        let inner = self.inner.lock().unwrap();
        let app = inner
            .world
            .apps
            .get(&app_id)
            .filter(|app| app.creator == *address)
            .ok_or_else(|| ClientError::Http {
                context: "account application information".to_string(),
                status: 404,
                body: "application not found".to_string(),
            })?;
        Ok(app
            .global
            .iter()
            .map(|(k, v)| match v {
                Value::Uint(u) => RawKeyValue::uint(k, *u),
                Value::Bytes(b) => RawKeyValue::bytes(k, b),
            })
            .collect())
    }

    async fn account_balance(&self, address: &Address) -> Result<u64, ClientError> {
        Ok(self.balance_of(address))
    }
}

#[async_trait]
impl LedgerWrite for FakeLedger {
    async fn submit(&self, signed: &[u8]) -> Result<String, ClientError> {
        let stxns = decode(signed)?;
        let rejected = |message: String| -> ClientError {
            SubmissionError::Rejected {
                status: 400,
                message,
            }
            .into()
        };
        for stx in &stxns {
            verify_transaction(stx).map_err(|e| rejected(e.to_string()))?;
        }
        let txns: Vec<Transaction> = stxns.into_iter().map(|s| s.txn).collect();
        let ids: Vec<String> = txns.iter().map(|t| t.id().unwrap()).collect();

        let mut inner = self.inner.lock().unwrap();
        let round = inner.round + 1;
        let mut world = inner.world.clone();
        let created = world
            .apply_group(&txns, self.genesis, round, now_secs())
            .map_err(|(i, msg)| rejected(format!("transaction {}: {}", ids[i], msg)))?;

        inner.world = world;
        inner.round = round;
        inner.group_sizes.push(txns.len());
        let created = if inner.hide_app_index { None } else { created };
        for (i, id) in ids.iter().enumerate() {
            inner.pending.insert(
                id.clone(),
                PendingTransaction {
                    confirmed_round: round,
                    pool_error: String::new(),
                    application_index: if i == 0 { created } else { None },
                },
            );
        }
        Ok(ids[0].clone())
    }

    async fn status(&self) -> Result<NodeStatus, ClientError> {
        Ok(NodeStatus {
            last_round: self.inner.lock().unwrap().round,
            ..Default::default()
        })
    }

    async fn wait_for_block_after(&self, round: u64) -> Result<NodeStatus, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.round = inner.round.max(round + 1);
        Ok(NodeStatus {
            last_round: inner.round,
            ..Default::default()
        })
    }

    async fn pending_transaction(&self, tx_id: &str) -> Result<PendingTransaction, ClientError> {
        self.inner
            .lock()
            .unwrap()
            .pending
            .get(tx_id)
            .cloned()
            .ok_or_else(|| ClientError::Http {
                context: "pending transaction".to_string(),
                status: 404,
                body: "txn does not exist".to_string(),
            })
    }
}

#[async_trait]
impl Simulator for FakeLedger {
    async fn simulate(&self, request: &SimulateRequest) -> Result<SimulateResponse, ClientError> {
        let inner = self.inner.lock().unwrap();
        let mut response = SimulateResponse {
            last_round: inner.round,
            version: 2,
            txn_groups: Vec::new(),
        };
        for group in &request.txn_groups {
            let txns: Vec<Transaction> = group.txns.iter().map(|s| s.txn.clone()).collect();
            let mut world = inner.world.clone();
            let outcome = world.apply_group(&txns, self.genesis, inner.round + 1, now_secs());
            let (failed_at, failure_message) = match outcome {
                Ok(_) => (None, None),
                Err((i, msg)) => (Some(vec![i as u64]), Some(msg)),
            };
            response.txn_groups.push(SimulateGroupResult {
                txn_results: vec![SimulateTxnResult::default(); txns.len()],
                failure_message,
                failed_at,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ProgramCompiler for FakeLedger {
    async fn compile(&self, source: &[u8]) -> Result<Vec<u8>, ClientError> {
        Ok(Digest::hash(source).as_bytes().to_vec())
    }
}
