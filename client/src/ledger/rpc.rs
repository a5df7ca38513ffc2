//! The ledger RPC boundary.
//!
//! Everything this crate knows about the outside world arrives through
//! [`LedgerRpc`]. The trait is object-safe so workflows hold an
//! `Arc<dyn LedgerRpc>` and tests substitute an in-memory double; the
//! client itself never caches remote state (staleness directly causes
//! malformed transaction construction, so every operation reads fresh).

use async_trait::async_trait;

use super::types::{
    AccountInfo, AppId, ApplicationInfo, AssetId, AssetParams, NodeStatus, PendingTxn, Round,
    SuggestedParams,
};
use crate::error::Result;
use crate::identity::Address;
use crate::transaction::SignedTransaction;

/// RPC surface of a ledger node.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Current fee basis and validity window for new transactions.
    async fn suggested_params(&self) -> Result<SuggestedParams>;

    /// Submits a complete (already grouped and signed) transaction set as
    /// a unit. Returns the id of the first transaction, which identifies
    /// the whole group for confirmation tracking.
    ///
    /// Rejection here means nothing was applied; groups are atomic.
    async fn submit(&self, signed: &[SignedTransaction]) -> Result<String>;

    /// Full account state for an address.
    async fn account_info(&self, address: Address) -> Result<AccountInfo>;

    /// Global state of a stateful application.
    async fn application_info(&self, app_id: AppId) -> Result<ApplicationInfo>;

    /// Creation parameters of an asset.
    async fn asset_info(&self, asset_id: AssetId) -> Result<AssetParams>;

    /// Current node status.
    async fn status(&self) -> Result<NodeStatus>;

    /// Blocks until the given round has been committed, then returns the
    /// status. The confirmation tracker uses this to advance one round at
    /// a time.
    async fn status_after_round(&self, round: Round) -> Result<NodeStatus>;

    /// Receipt or pending marker for a submitted transaction id.
    async fn pending_transaction(&self, txn_id: &str) -> Result<PendingTxn>;

    /// Timestamp (Unix seconds) of the block at the given round.
    async fn block_timestamp(&self, round: Round) -> Result<u64>;
}
