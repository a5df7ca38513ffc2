//! Typed payloads exchanged with the ledger node and index service.
//!
//! These mirror the node's REST responses one-to-one but decoded: state
//! keys are UTF-8 strings and state values are already split into the two
//! on-ledger representations (unsigned integer or raw bytes). What a byte
//! value *means* (address, text, opaque blob) is not recorded on the
//! ledger, so interpretation is left to the caller; see
//! [`crate::state::StateReader`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::identity::Address;

/// Numeric id of a fungible asset.
pub type AssetId = u64;

/// Numeric id of a stateful application.
pub type AppId = u64;

/// A ledger round (the unit of finality progression).
pub type Round = u64;

/// Fee basis and validity window for new transactions, as suggested by
/// the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedParams {
    /// Minimum fee for a single transaction, in motes.
    pub min_fee: u64,
    /// First round the transaction is valid in.
    pub first_valid: Round,
    /// Last round the transaction is valid in.
    pub last_valid: Round,
    /// Genesis id of the network the params were fetched from.
    pub genesis_id: String,
}

/// A decoded global or local state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateValue {
    /// An unsigned 64-bit integer.
    Uint(u64),
    /// A raw byte sequence. Could be an address, UTF-8 text, or opaque
    /// data; the ledger does not distinguish.
    Bytes(Vec<u8>),
}

/// A decoded key-value state map, global or local.
pub type StateMap = BTreeMap<String, StateValue>;

/// One asset position held by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHolding {
    /// The held asset.
    pub asset_id: AssetId,
    /// Balance in the asset's smallest unit.
    pub amount: u64,
}

/// Immutable parameters of an asset, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetParams {
    /// Full asset name, e.g. `FactoraBid`.
    pub name: String,
    /// Short unit name, e.g. `FC-OWN`.
    pub unit_name: String,
    /// The account that created the asset.
    pub creator: Address,
    /// Fixed total supply.
    pub total: u64,
}

/// An asset created by an account, with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAsset {
    /// The asset's numeric id.
    pub asset_id: AssetId,
    /// Its creation parameters.
    pub params: AssetParams,
}

/// Full account state as returned by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The queried address.
    pub address: Address,
    /// Native balance in motes.
    pub balance: u64,
    /// Minimum balance the account must maintain given its holdings and
    /// opt-ins. Spendable balance is `balance - min_balance`.
    pub min_balance: u64,
    /// Asset positions (an entry exists once the account has opted in).
    pub assets: Vec<AssetHolding>,
    /// Assets this account created.
    pub created_assets: Vec<CreatedAsset>,
    /// Local state per application the account has opted into.
    pub app_local_state: BTreeMap<AppId, StateMap>,
}

impl AccountInfo {
    /// Balance of one asset, or `None` if the account never opted in.
    pub fn asset_balance(&self, asset_id: AssetId) -> Option<u64> {
        self.assets
            .iter()
            .find(|h| h.asset_id == asset_id)
            .map(|h| h.amount)
    }
}

/// Application info: the global state owned by a stateful program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    /// The application id.
    pub app_id: AppId,
    /// Decoded global key-value state.
    pub global_state: StateMap,
}

/// Node sync status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    /// The most recent committed round.
    pub last_round: Round,
}

/// Receipt (or pending marker) for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PendingTxn {
    /// Round the transaction was confirmed in. `None` while pending;
    /// a positive value is final.
    pub confirmed_round: Option<Round>,
    /// Set when the transaction was removed from the pool with an error.
    /// Fatal: the transaction will never confirm.
    pub pool_error: Option<String>,
    /// For application-create transactions, the id of the new application.
    pub application_index: Option<AppId>,
    /// For asset-create transactions, the id of the new asset.
    pub asset_index: Option<AssetId>,
}

/// One holder row from the index service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    /// Holding account.
    pub address: Address,
    /// Held amount.
    pub amount: u64,
}

/// One page of an asset-balances lookup. The index service is eventually
/// consistent; callers must treat the result as a snapshot, not truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalancePage {
    /// Holders on this page.
    pub balances: Vec<AssetBalance>,
    /// Opaque cursor for the next page, if any.
    pub next: Option<String>,
}
