//! Enumerating open escrows through the index service.
//!
//! An escrow is "open" exactly when it holds one unit of the access
//! token. The indexer query is paged and eventually consistent, so the
//! result is a best-effort snapshot; the programs re-validate everything
//! at execution time.

use tracing::debug;

use super::derive::escrow_from_escrow_address;
use super::EscrowAccount;
use crate::config::LoanBounds;
use crate::error::Result;
use crate::ledger::types::AppId;
use crate::ledger::{IndexerRpc, LedgerRpc, TemplateCompiler};
use crate::matching::tokens::app_tokens;

/// All escrows currently holding exactly one access-token unit.
pub async fn open_escrows(
    ledger: &dyn LedgerRpc,
    indexer: &dyn IndexerRpc,
    compiler: &dyn TemplateCompiler,
    app_id: AppId,
    bounds: &LoanBounds,
) -> Result<Vec<EscrowAccount>> {
    let tokens = app_tokens(ledger, app_id).await?;

    let mut escrows = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = indexer
            .asset_balances(tokens.access_id, 1, 1, cursor)
            .await?;
        for holder in &page.balances {
            if holder.amount != 1 {
                continue;
            }
            let escrow =
                escrow_from_escrow_address(ledger, compiler, holder.address, app_id, bounds)
                    .await?;
            escrows.push(escrow);
        }
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(count = escrows.len(), "enumerated open escrows");
    Ok(escrows)
}
