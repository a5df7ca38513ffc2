//! Discovering the matching application's tokens.
//!
//! The bidding and access tokens are created by the application account
//! itself during setup and are found by name among its created assets.
//! The currency token is external and recorded in global state.

use crate::config::{ACCESS_TOKEN_NAME, BIDDING_TOKEN_NAME};
use crate::error::{ClientError, Result};
use crate::identity::Address;
use crate::ledger::types::{AppId, AssetId};
use crate::ledger::LedgerRpc;
use crate::state::{keys, StateReader};

/// The three asset ids a configured matching application works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppTokens {
    /// Settlement currency, created outside the application.
    pub currency_id: AssetId,
    /// One unit per open escrow, surrendered while a bid is live.
    pub bidding_id: AssetId,
    /// Marks an escrow as open for matching.
    pub access_id: AssetId,
}

/// Resolves all three token ids for `app_id`.
///
/// Fails with [`ClientError::NotConfigured`] before `setup` has run,
/// since the bidding and access tokens do not exist until then.
pub async fn app_tokens(ledger: &dyn LedgerRpc, app_id: AppId) -> Result<AppTokens> {
    let reader = StateReader::new(ledger);
    let currency_id = reader.global_u64(app_id, keys::CURRENCY_ID).await?;

    let app_address = Address::for_application(app_id);
    let info = ledger.account_info(app_address).await?;

    let find = |name: &str| -> Option<AssetId> {
        info.created_assets
            .iter()
            .find(|asset| asset.params.name == name)
            .map(|asset| asset.asset_id)
    };

    let bidding_id = find(BIDDING_TOKEN_NAME)
        .ok_or(ClientError::NotConfigured)?;
    let access_id = find(ACCESS_TOKEN_NAME)
        .ok_or(ClientError::NotConfigured)?;

    Ok(AppTokens {
        currency_id,
        bidding_id,
        access_id,
    })
}

/// Whether setup has completed, without treating its absence as an error.
pub async fn is_app_set_up(ledger: &dyn LedgerRpc, app_id: AppId) -> Result<bool> {
    match app_tokens(ledger, app_id).await {
        Ok(_) => Ok(true),
        Err(ClientError::NotConfigured) => Ok(false),
        Err(e) => Err(e),
    }
}
