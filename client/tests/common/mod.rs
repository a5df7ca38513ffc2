//! In-memory ledger double for the integration tests.
//!
//! Implements the three remote interfaces over one mutex-guarded world
//! and models just enough of the matching program to exercise the
//! orchestration layer: atomic group application, token bookkeeping,
//! the key-presence stage machine, the earliest-bid tie-break, and the
//! reclaim branches (bidding token returned, or the access token revoked
//! from an escrow that cannot fund another cycle; the bidding timeout
//! falls away with the last reclaim).
//! Groups are applied to a copy of the world and committed only when
//! every member succeeds, mirroring the real ledger's atomicity.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use factora_client::config::{self, MATCHING_APP_MINIMUM_BALANCE, OWNERSHIP_TOKEN_UNIT};
use factora_client::error::{ClientError, Result};
use factora_client::identity::Address;
use factora_client::ledger::{
    AccountInfo, AppId, ApplicationInfo, AssetBalance, AssetBalancePage, AssetHolding, AssetId,
    AssetParams, CreatedAsset, IndexerRpc, LedgerRpc, NodeStatus, PendingTxn, Round, StateMap,
    StateValue, SuggestedParams, TemplateCompiler, TemplateParam, TemplateParams,
};
use factora_client::state::keys;
use factora_client::transaction::{OnComplete, SignedTransaction, Transaction, TxnKind};

pub const MATCHING_APP: AppId = 10;
pub const MINTER_APP: AppId = 20;
pub const CURRENCY: AssetId = 1;
pub const IDENTITY_TOKEN: AssetId = 2;
pub const TOKEN_RESERVE: u64 = 3;
pub const BID_TIME_LIMIT: u64 = 600;

const BID_TIME_LIMIT_KEY: &str = "bid_time_limit";

#[derive(Debug, Clone, Default)]
struct MockAccount {
    balance: u64,
    min_balance: u64,
    holdings: BTreeMap<AssetId, u64>,
    created: Vec<AssetId>,
    local: BTreeMap<AppId, StateMap>,
}

#[derive(Debug, Clone)]
struct World {
    round: Round,
    timestamp: u64,
    accounts: BTreeMap<Address, MockAccount>,
    globals: BTreeMap<AppId, StateMap>,
    assets: BTreeMap<AssetId, AssetParams>,
    next_asset_id: AssetId,
    receipts: BTreeMap<String, PendingTxn>,
}

/// The mock chain: node, indexer, and compiler in one.
pub struct MockChain {
    world: Mutex<World>,
}

fn uint(v: u64) -> StateValue {
    StateValue::Uint(v)
}

fn addr_bytes(a: Address) -> StateValue {
    StateValue::Bytes(a.as_bytes().to_vec())
}

impl MockChain {
    /// A fresh chain with the matching and minting applications created
    /// but the matching application not yet set up, and the currency and
    /// identity tokens in existence.
    pub fn bootstrap() -> Self {
        let mut globals = BTreeMap::new();
        let mut matching: StateMap = StateMap::new();
        matching.insert(keys::CURRENCY_ID.to_string(), uint(CURRENCY));
        matching.insert(keys::MINTER_ID.to_string(), uint(MINTER_APP));
        matching.insert(keys::IDENTITY_TOKEN_ID.to_string(), uint(IDENTITY_TOKEN));
        matching.insert(keys::TOKEN_RESERVE_SIZE.to_string(), uint(TOKEN_RESERVE));
        matching.insert(BID_TIME_LIMIT_KEY.to_string(), uint(BID_TIME_LIMIT));
        globals.insert(MATCHING_APP, matching);
        globals.insert(MINTER_APP, StateMap::new());

        let treasury = Address::from_bytes([0xAA; 32]);
        let mut assets = BTreeMap::new();
        assets.insert(
            CURRENCY,
            AssetParams {
                name: "Factora USD".to_string(),
                unit_name: "FUSD".to_string(),
                creator: treasury,
                total: u64::MAX,
            },
        );
        assets.insert(
            IDENTITY_TOKEN,
            AssetParams {
                name: "FactoraIdentity".to_string(),
                unit_name: "FC-ID".to_string(),
                creator: treasury,
                total: u64::MAX,
            },
        );

        Self {
            world: Mutex::new(World {
                round: 1,
                timestamp: 1_700_000_000,
                accounts: BTreeMap::new(),
                globals,
                assets,
                next_asset_id: 100,
                receipts: BTreeMap::new(),
            }),
        }
    }

    // -- fixture helpers ----------------------------------------------------

    pub fn fund(&self, address: Address, motes: u64) {
        let mut w = self.world.lock();
        w.accounts.entry(address).or_default().balance += motes;
    }

    /// Gives an account an asset holding (implies the opt-in).
    pub fn give_asset(&self, address: Address, asset_id: AssetId, amount: u64) {
        let mut w = self.world.lock();
        *w.accounts
            .entry(address)
            .or_default()
            .holdings
            .entry(asset_id)
            .or_insert(0) += amount;
    }

    pub fn set_min_balance(&self, address: Address, min_balance: u64) {
        let mut w = self.world.lock();
        w.accounts.entry(address).or_default().min_balance = min_balance;
    }

    pub fn set_timestamp(&self, timestamp: u64) {
        self.world.lock().timestamp = timestamp;
    }

    pub fn timestamp(&self) -> u64 {
        self.world.lock().timestamp
    }

    /// Tokenizes an invoice: mints a 2-unit ownership token from the
    /// minting application (one unit anchored on the invoice account, one
    /// unit to the holder who will deposit it at verification) and writes
    /// the invoice's terms into its local state on the minting app.
    pub fn mint_invoice(
        &self,
        invoice: Address,
        holder: Address,
        value_cents: u64,
        interest_rate: u64,
        due_date: u64,
        risk_score: u64,
    ) -> AssetId {
        let mut w = self.world.lock();
        let asset_id = w.next_asset_id;
        w.next_asset_id += 1;

        w.assets.insert(
            asset_id,
            AssetParams {
                name: format!("FactoraOwnership-{asset_id}"),
                unit_name: OWNERSHIP_TOKEN_UNIT.to_string(),
                creator: Address::for_application(MINTER_APP),
                total: 2,
            },
        );
        w.accounts
            .entry(invoice)
            .or_default()
            .holdings
            .insert(asset_id, 1);
        w.accounts
            .entry(holder)
            .or_default()
            .holdings
            .insert(asset_id, 1);

        let mut local = StateMap::new();
        local.insert(keys::INVOICE_ASSET_ID.to_string(), uint(asset_id));
        local.insert(keys::INVOICE_VALUE.to_string(), uint(value_cents));
        local.insert(keys::INVOICE_INTEREST_RATE.to_string(), uint(interest_rate));
        local.insert(keys::INVOICE_DUE_DATE.to_string(), uint(due_date));
        local.insert(keys::INVOICE_RISK_SCORE.to_string(), uint(risk_score));
        local.insert(keys::DEBTOR_ADDRESS.to_string(), addr_bytes(holder));
        w.accounts
            .entry(invoice)
            .or_default()
            .local
            .insert(MINTER_APP, local);

        asset_id
    }

    // -- inspection helpers ---------------------------------------------------

    pub fn balance_of(&self, address: Address) -> u64 {
        self.world
            .lock()
            .accounts
            .get(&address)
            .map(|a| a.balance)
            .unwrap_or(0)
    }

    pub fn holding_of(&self, address: Address, asset_id: AssetId) -> Option<u64> {
        self.world
            .lock()
            .accounts
            .get(&address)
            .and_then(|a| a.holdings.get(&asset_id).copied())
    }

    pub fn has_global(&self, key: &str) -> bool {
        self.world
            .lock()
            .globals
            .get(&MATCHING_APP)
            .map(|g| g.contains_key(key))
            .unwrap_or(false)
    }

    pub fn global_uint(&self, key: &str) -> Option<u64> {
        match self.world.lock().globals.get(&MATCHING_APP)?.get(key)? {
            StateValue::Uint(v) => Some(*v),
            StateValue::Bytes(_) => None,
        }
    }

    pub fn global_addr(&self, key: &str) -> Option<Address> {
        match self.world.lock().globals.get(&MATCHING_APP)?.get(key)? {
            StateValue::Bytes(b) => Address::from_slice(b).ok(),
            StateValue::Uint(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Group application
// ---------------------------------------------------------------------------

impl World {
    fn account_mut(&mut self, address: Address) -> &mut MockAccount {
        self.accounts.entry(address).or_default()
    }

    fn global_mut(&mut self, app_id: AppId) -> Result<&mut StateMap> {
        self.globals
            .get_mut(&app_id)
            .ok_or_else(|| ClientError::Rpc(format!("unknown application {app_id}")))
    }

    fn global_u64(&self, app_id: AppId, key: &str) -> Result<u64> {
        match self.globals.get(&app_id).and_then(|g| g.get(key)) {
            Some(StateValue::Uint(v)) => Ok(*v),
            _ => Err(ClientError::Rpc(format!("global key {key} missing"))),
        }
    }

    fn global_address(&self, app_id: AppId, key: &str) -> Result<Address> {
        match self.globals.get(&app_id).and_then(|g| g.get(key)) {
            Some(StateValue::Bytes(b)) => Address::from_slice(b),
            _ => Err(ClientError::Rpc(format!("global key {key} missing"))),
        }
    }

    fn debit_fee(&mut self, sender: Address, fee: u64) -> Result<()> {
        let account = self.account_mut(sender);
        if account.balance < fee {
            return Err(ClientError::SubmissionRejected(format!(
                "account {sender} cannot cover fee {fee}"
            )));
        }
        account.balance -= fee;
        Ok(())
    }

    fn move_asset(
        &mut self,
        asset_id: AssetId,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<()> {
        let sender = self.account_mut(from);
        let held = sender.holdings.get_mut(&asset_id).ok_or_else(|| {
            ClientError::SubmissionRejected(format!("{from} not opted into asset {asset_id}"))
        })?;
        if *held < amount {
            return Err(ClientError::SubmissionRejected(format!(
                "{from} holds {held} of asset {asset_id}, needs {amount}"
            )));
        }
        *held -= amount;

        let receiver = self.account_mut(to);
        let slot = receiver.holdings.get_mut(&asset_id).ok_or_else(|| {
            ClientError::SubmissionRejected(format!("{to} not opted into asset {asset_id}"))
        })?;
        *slot += amount;
        Ok(())
    }

    fn apply(&mut self, txn: &Transaction) -> Result<()> {
        self.debit_fee(txn.sender, txn.fee)?;

        match &txn.kind {
            TxnKind::Payment { receiver, amount } => {
                let sender = self.account_mut(txn.sender);
                if sender.balance < *amount {
                    return Err(ClientError::SubmissionRejected(format!(
                        "account {} cannot cover payment of {amount}",
                        txn.sender
                    )));
                }
                sender.balance -= amount;
                self.account_mut(*receiver).balance += amount;
            }
            TxnKind::AssetTransfer {
                asset_id,
                receiver,
                amount,
                close_to,
            } => {
                if *amount == 0 && *receiver == txn.sender && close_to.is_none() {
                    // Opt-in.
                    self.account_mut(txn.sender)
                        .holdings
                        .entry(*asset_id)
                        .or_insert(0);
                } else {
                    self.move_asset(*asset_id, txn.sender, *receiver, *amount)?;
                    if let Some(close_to) = close_to {
                        let rest = self
                            .account_mut(txn.sender)
                            .holdings
                            .remove(asset_id)
                            .unwrap_or(0);
                        self.move_asset_unchecked(*asset_id, *close_to, rest)?;
                    }
                }
            }
            TxnKind::AppCall {
                app_id,
                on_complete: OnComplete::OptIn,
                ..
            } => {
                let account = self.account_mut(txn.sender);
                if account.local.contains_key(app_id) {
                    return Err(ClientError::SubmissionRejected(format!(
                        "{} already opted into application {app_id}",
                        txn.sender
                    )));
                }
                account.local.insert(*app_id, StateMap::new());
            }
            TxnKind::AppCall {
                app_id,
                on_complete: OnComplete::NoOp,
                args,
                accounts,
                ..
            } => {
                let selector = String::from_utf8(args.first().cloned().unwrap_or_default())
                    .map_err(|_| {
                        ClientError::SubmissionRejected("unreadable selector".to_string())
                    })?;
                let numeric: Vec<u64> = args[1..]
                    .iter()
                    .filter_map(|a| a.as_slice().try_into().ok().map(u64::from_be_bytes))
                    .collect();
                self.apply_call(txn.sender, *app_id, &selector, &numeric, accounts)?;
            }
        }
        Ok(())
    }

    /// Deposit into an account that already holds the asset (used by the
    /// close-out remainder, whose receiver is known to be an anchor).
    fn move_asset_unchecked(&mut self, asset_id: AssetId, to: Address, amount: u64) -> Result<()> {
        let slot = self
            .account_mut(to)
            .holdings
            .get_mut(&asset_id)
            .ok_or_else(|| {
                ClientError::SubmissionRejected(format!("{to} not opted into asset {asset_id}"))
            })?;
        *slot += amount;
        Ok(())
    }

    fn matching_tokens(&self) -> Result<(AssetId, AssetId)> {
        let app_address = Address::for_application(MATCHING_APP);
        let created = &self
            .accounts
            .get(&app_address)
            .ok_or_else(|| ClientError::SubmissionRejected("app not set up".to_string()))?
            .created;
        let find = |name: &str| {
            created
                .iter()
                .find(|id| self.assets.get(id).map(|p| p.name == name).unwrap_or(false))
                .copied()
                .ok_or_else(|| ClientError::SubmissionRejected("app not set up".to_string()))
        };
        Ok((
            find(config::BIDDING_TOKEN_NAME)?,
            find(config::ACCESS_TOKEN_NAME)?,
        ))
    }

    fn apply_call(
        &mut self,
        sender: Address,
        app_id: AppId,
        selector: &str,
        numeric: &[u64],
        accounts: &[Address],
    ) -> Result<()> {
        if app_id != MATCHING_APP {
            return Err(ClientError::SubmissionRejected(format!(
                "call to unknown application {app_id}"
            )));
        }
        let app_address = Address::for_application(MATCHING_APP);

        match selector {
            "setup" => {
                if self.accounts.get(&app_address).map(|a| a.balance).unwrap_or(0)
                    < MATCHING_APP_MINIMUM_BALANCE
                {
                    return Err(ClientError::SubmissionRejected(
                        "application account underfunded".to_string(),
                    ));
                }
                let reserve = self.global_u64(MATCHING_APP, keys::TOKEN_RESERVE_SIZE)?;
                for name in [config::BIDDING_TOKEN_NAME, config::ACCESS_TOKEN_NAME] {
                    let asset_id = self.next_asset_id;
                    self.next_asset_id += 1;
                    self.assets.insert(
                        asset_id,
                        AssetParams {
                            name: name.to_string(),
                            unit_name: name[..4].to_uppercase(),
                            creator: app_address,
                            total: reserve,
                        },
                    );
                    let app = self.account_mut(app_address);
                    app.created.push(asset_id);
                    app.holdings.insert(asset_id, reserve);
                }
                // The application opts itself into the currency.
                self.account_mut(app_address).holdings.entry(CURRENCY).or_insert(0);
            }
            "set_bid_time_limit" => {
                let limit = *numeric.first().ok_or_else(|| {
                    ClientError::SubmissionRejected("missing bid time limit".to_string())
                })?;
                self.global_mut(MATCHING_APP)?
                    .insert(BID_TIME_LIMIT_KEY.to_string(), uint(limit));
            }
            "unfreeze" => {
                let investor = accounts[0];
                let escrow = accounts[1];
                let (bid_id, access_id) = self.matching_tokens()?;
                self.move_asset(bid_id, app_address, escrow, 1)?;
                self.move_asset(access_id, app_address, escrow, 1)?;
                let local = self
                    .account_mut(escrow)
                    .local
                    .get_mut(&MATCHING_APP)
                    .ok_or_else(|| {
                        ClientError::SubmissionRejected(
                            "escrow not opted into application".to_string(),
                        )
                    })?;
                local.insert(keys::INVESTOR_ADDRESS.to_string(), addr_bytes(investor));
            }
            "freeze" | "withdraw" | "repay" => {
                // The accompanying group transfers do the work.
            }
            "verify" => {
                let invoice = accounts[0];
                // The application opts itself into the ownership token so
                // the deposit later in the group lands.
                let ownership = match self
                    .accounts
                    .get(&invoice)
                    .and_then(|a| a.local.get(&MINTER_APP))
                    .and_then(|l| l.get(keys::INVOICE_ASSET_ID))
                {
                    Some(StateValue::Uint(id)) => *id,
                    _ => {
                        return Err(ClientError::SubmissionRejected(
                            "invoice has no ownership token".to_string(),
                        ))
                    }
                };
                self.account_mut(app_address)
                    .holdings
                    .entry(ownership)
                    .or_insert(0);
                let timeout = self.timestamp + self.global_u64(MATCHING_APP, BID_TIME_LIMIT_KEY)?;
                let globals = self.global_mut(MATCHING_APP)?;
                if globals.contains_key(keys::OWNER_ADDRESS) {
                    return Err(ClientError::SubmissionRejected(
                        "another invoice is already in play".to_string(),
                    ));
                }
                globals.insert(keys::OWNER_ADDRESS.to_string(), addr_bytes(sender));
                globals.insert(keys::INVOICE_ADDRESS.to_string(), addr_bytes(invoice));
                globals.insert(keys::BIDDING_TIMEOUT.to_string(), uint(timeout));
            }
            "bid" => {
                if !self
                    .globals
                    .get(&MATCHING_APP)
                    .map(|g| g.contains_key(keys::BIDDING_TIMEOUT))
                    .unwrap_or(false)
                {
                    return Err(ClientError::SubmissionRejected(
                        "no invoice open for bidding".to_string(),
                    ));
                }
                let now = self.timestamp;
                let local = self
                    .account_mut(sender)
                    .local
                    .get_mut(&MATCHING_APP)
                    .ok_or_else(|| {
                        ClientError::SubmissionRejected(
                            "escrow not opted into application".to_string(),
                        )
                    })?;
                local.insert(keys::BID_TIMESTAMP.to_string(), uint(now));

                let leading = self.global_u64(MATCHING_APP, keys::LEADING_TIMESTAMP).ok();
                let wins = match leading {
                    None => true,
                    Some(lead) => now < lead,
                };
                if wins {
                    let globals = self.global_mut(MATCHING_APP)?;
                    globals.insert(keys::ESCROW_ADDRESS.to_string(), addr_bytes(sender));
                    globals.insert(keys::LEADING_TIMESTAMP.to_string(), uint(now));
                }
            }
            "action" => {
                let invoice = accounts[0];
                let escrow = self.global_address(MATCHING_APP, keys::ESCROW_ADDRESS)?;
                let ownership = match self
                    .accounts
                    .get(&invoice)
                    .and_then(|a| a.local.get(&MINTER_APP))
                    .and_then(|l| l.get(keys::INVOICE_ASSET_ID))
                {
                    Some(StateValue::Uint(id)) => *id,
                    _ => {
                        return Err(ClientError::SubmissionRejected(
                            "invoice has no ownership token".to_string(),
                        ))
                    }
                };
                self.move_asset(ownership, app_address, escrow, 1)?;
                // The bidding timeout stays in place until every escrow
                // that bid has reclaimed.
                let globals = self.global_mut(MATCHING_APP)?;
                for key in [
                    keys::OWNER_ADDRESS,
                    keys::INVOICE_ADDRESS,
                    keys::ESCROW_ADDRESS,
                    keys::LEADING_TIMESTAMP,
                ] {
                    globals.remove(key);
                }
            }
            "reset" => {
                let invoice = accounts[0];
                let owner = accounts[1];
                let ownership = match self
                    .accounts
                    .get(&invoice)
                    .and_then(|a| a.local.get(&MINTER_APP))
                    .and_then(|l| l.get(keys::INVOICE_ASSET_ID))
                {
                    Some(StateValue::Uint(id)) => *id,
                    _ => {
                        return Err(ClientError::SubmissionRejected(
                            "invoice has no ownership token".to_string(),
                        ))
                    }
                };
                // The deposited ownership token goes back to its owner so
                // the invoice can be verified again.
                self.move_asset(ownership, app_address, owner, 1)?;
                let globals = self.global_mut(MATCHING_APP)?;
                for key in [
                    keys::OWNER_ADDRESS,
                    keys::INVOICE_ADDRESS,
                    keys::ESCROW_ADDRESS,
                    keys::LEADING_TIMESTAMP,
                    keys::BIDDING_TIMEOUT,
                ] {
                    globals.remove(key);
                }
            }
            "reclaim" => {
                let globals = self.globals.get(&MATCHING_APP).cloned().unwrap_or_default();
                if !globals.contains_key(keys::BIDDING_TIMEOUT) {
                    return Err(ClientError::SubmissionRejected(
                        "no bidding round to reclaim from".to_string(),
                    ));
                }
                if globals.contains_key(keys::ESCROW_ADDRESS) {
                    return Err(ClientError::SubmissionRejected(
                        "match not actioned yet".to_string(),
                    ));
                }
                let (bid_id, access_id) = self.matching_tokens()?;

                let account = self.account_mut(sender);
                let (balance, min_balance) = (account.balance, account.min_balance);
                let local = account.local.get_mut(&MATCHING_APP).ok_or_else(|| {
                    ClientError::SubmissionRejected(
                        "escrow not opted into application".to_string(),
                    )
                })?;
                if local.remove(keys::BID_TIMESTAMP).is_none() {
                    return Err(ClientError::SubmissionRejected(
                        "escrow has no outstanding bid".to_string(),
                    ));
                }

                // An escrow that cannot fund another bidding cycle has its
                // access token revoked; otherwise its bidding token comes
                // back.
                let spendable = balance.saturating_sub(min_balance);
                if spendable < config::RECLAIM_FEE + config::MAX_BIDDING_FEES {
                    self.move_asset(access_id, sender, app_address, 1)?;
                } else {
                    self.move_asset(bid_id, app_address, sender, 1)?;
                }

                let outstanding = self.accounts.values().any(|a| {
                    a.local
                        .get(&MATCHING_APP)
                        .map(|l| l.contains_key(keys::BID_TIMESTAMP))
                        .unwrap_or(false)
                });
                if !outstanding {
                    self.global_mut(MATCHING_APP)?.remove(keys::BIDDING_TIMEOUT);
                }
            }
            other => {
                return Err(ClientError::SubmissionRejected(format!(
                    "unknown selector {other}"
                )))
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl LedgerRpc for MockChain {
    async fn suggested_params(&self) -> Result<SuggestedParams> {
        let w = self.world.lock();
        Ok(SuggestedParams {
            min_fee: config::MIN_TXN_FEE,
            first_valid: w.round,
            last_valid: w.round + 1_000,
            genesis_id: "factora-mock".to_string(),
        })
    }

    async fn submit(&self, signed: &[SignedTransaction]) -> Result<String> {
        let mut w = self.world.lock();
        let mut staged = w.clone();

        for entry in signed {
            staged.apply(&entry.txn)?;
        }

        staged.round += 1;
        let confirmed = PendingTxn {
            confirmed_round: Some(staged.round),
            ..PendingTxn::default()
        };
        for entry in signed {
            staged.receipts.insert(entry.txn.id(), confirmed.clone());
        }

        let first_id = signed[0].txn.id();
        *w = staged;
        Ok(first_id)
    }

    async fn account_info(&self, address: Address) -> Result<AccountInfo> {
        let w = self.world.lock();
        let account = w.accounts.get(&address).cloned().unwrap_or_default();
        Ok(AccountInfo {
            address,
            balance: account.balance,
            min_balance: account.min_balance,
            assets: account
                .holdings
                .iter()
                .map(|(asset_id, amount)| AssetHolding {
                    asset_id: *asset_id,
                    amount: *amount,
                })
                .collect(),
            created_assets: account
                .created
                .iter()
                .filter_map(|id| {
                    w.assets.get(id).map(|params| CreatedAsset {
                        asset_id: *id,
                        params: params.clone(),
                    })
                })
                .collect(),
            app_local_state: account.local.clone(),
        })
    }

    async fn application_info(&self, app_id: AppId) -> Result<ApplicationInfo> {
        let w = self.world.lock();
        let global_state = w
            .globals
            .get(&app_id)
            .cloned()
            .ok_or_else(|| ClientError::Rpc(format!("unknown application {app_id}")))?;
        Ok(ApplicationInfo {
            app_id,
            global_state,
        })
    }

    async fn asset_info(&self, asset_id: AssetId) -> Result<AssetParams> {
        let w = self.world.lock();
        w.assets
            .get(&asset_id)
            .cloned()
            .ok_or_else(|| ClientError::Rpc(format!("unknown asset {asset_id}")))
    }

    async fn status(&self) -> Result<NodeStatus> {
        Ok(NodeStatus {
            last_round: self.world.lock().round,
        })
    }

    async fn status_after_round(&self, round: Round) -> Result<NodeStatus> {
        let mut w = self.world.lock();
        if w.round < round {
            w.round = round;
        }
        Ok(NodeStatus { last_round: w.round })
    }

    async fn pending_transaction(&self, txn_id: &str) -> Result<PendingTxn> {
        let w = self.world.lock();
        Ok(w.receipts.get(txn_id).cloned().unwrap_or_default())
    }

    async fn block_timestamp(&self, _round: Round) -> Result<u64> {
        Ok(self.world.lock().timestamp)
    }
}

#[async_trait]
impl IndexerRpc for MockChain {
    async fn asset_balances(
        &self,
        asset_id: AssetId,
        min_amount: u64,
        max_amount: u64,
        _next: Option<String>,
    ) -> Result<AssetBalancePage> {
        let w = self.world.lock();
        let balances = w
            .accounts
            .iter()
            .filter_map(|(address, account)| {
                account.holdings.get(&asset_id).and_then(|amount| {
                    (*amount >= min_amount && *amount <= max_amount).then_some(AssetBalance {
                        address: *address,
                        amount: *amount,
                    })
                })
            })
            .collect();
        Ok(AssetBalancePage {
            balances,
            next: None,
        })
    }
}

#[async_trait]
impl TemplateCompiler for MockChain {
    /// Deterministic stand-in compiler: the "program" is a digest of the
    /// template name and the rendered parameters, which preserves the one
    /// property derivation depends on.
    async fn compile(&self, template: &str, params: &TemplateParams) -> Result<Vec<u8>> {
        let mut hasher = Sha256::new();
        hasher.update(template.as_bytes());
        for (key, value) in params {
            hasher.update(key.as_bytes());
            match value {
                TemplateParam::Uint(v) => hasher.update(v.to_be_bytes()),
                TemplateParam::Address(a) => hasher.update(a.as_bytes()),
            }
        }
        Ok(hasher.finalize().to_vec())
    }
}
