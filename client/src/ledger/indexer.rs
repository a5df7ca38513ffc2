//! The read-only index service boundary.
//!
//! The indexer answers queries the node itself cannot, most importantly
//! "who holds this asset". It is eventually consistent: a holder that
//! opted in a round ago may not appear yet, and results are paged.

use async_trait::async_trait;

use super::types::{AssetBalancePage, AssetId};
use crate::error::Result;

/// RPC surface of the index service.
#[async_trait]
pub trait IndexerRpc: Send + Sync {
    /// Holders of `asset_id` with `min_amount <= balance <= max_amount`,
    /// one page at a time. Pass the previous page's `next` cursor to
    /// continue; `None` starts from the beginning.
    async fn asset_balances(
        &self,
        asset_id: AssetId,
        min_amount: u64,
        max_amount: u64,
        next: Option<String>,
    ) -> Result<AssetBalancePage>;
}
