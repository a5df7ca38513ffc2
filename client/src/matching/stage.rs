//! Protocol stage predicates.
//!
//! The matching program encodes its stage in which global keys exist,
//! not in a dedicated enum value. Each predicate here checks presence
//! through [`StateReader::has_global_key`], so a missing key is a
//! negative answer rather than an error.

use crate::identity::Address;
use crate::ledger::types::AppId;
use crate::ledger::LedgerRpc;
use crate::state::{keys, StateReader};

use super::tokens::app_tokens;

/// Whether an invoice is locked for bidding. The bidding timeout key is
/// written when an invoice is verified and deleted by `reset`, or after
/// a settled match once every bidding escrow has reclaimed.
pub async fn is_app_locked(ledger: &dyn LedgerRpc, app_id: AppId) -> crate::error::Result<bool> {
    StateReader::new(ledger)
        .has_global_key(app_id, keys::BIDDING_TIMEOUT)
        .await
}

/// Whether bidding has closed with a winner. Requires both the winning
/// escrow to be recorded and every outstanding bid token to be back in
/// the application's reserve.
pub async fn is_winner_found(ledger: &dyn LedgerRpc, app_id: AppId) -> crate::error::Result<bool> {
    let has_winner = StateReader::new(ledger)
        .has_global_key(app_id, keys::ESCROW_ADDRESS)
        .await?;
    if !has_winner {
        return Ok(false);
    }
    all_bids_collected(ledger, app_id).await
}

/// Whether the application is back in its idle stage, ready for the
/// next invoice. The owner key is deleted by `reset`.
pub async fn is_app_reset(ledger: &dyn LedgerRpc, app_id: AppId) -> crate::error::Result<bool> {
    Ok(!StateReader::new(ledger)
        .has_global_key(app_id, keys::OWNER_ADDRESS)
        .await?)
}

/// Whether the application holds its full bid-token reserve, meaning no
/// bid is still outstanding with an escrow.
pub async fn all_bids_collected(
    ledger: &dyn LedgerRpc,
    app_id: AppId,
) -> crate::error::Result<bool> {
    let tokens = app_tokens(ledger, app_id).await?;
    let reserve_size = StateReader::new(ledger)
        .global_u64(app_id, keys::TOKEN_RESERVE_SIZE)
        .await?;

    let app_address = Address::for_application(app_id);
    let info = ledger.account_info(app_address).await?;
    Ok(info.asset_balance(tokens.bidding_id) == Some(reserve_size))
}
