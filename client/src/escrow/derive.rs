//! Deterministic escrow derivation.
//!
//! Both escrow flavors are template instantiations over parameters read
//! fresh from the matching application. Token ids are fetched on every
//! derivation on purpose: caching them across calls risks deriving
//! against stale ids and producing an address the programs will not
//! recognize. The derivation itself is pure with respect to its inputs.

use tracing::debug;

use super::EscrowAccount;
use crate::config::{LoanBounds, BORROWER_ESCROW_TEMPLATE, INVESTOR_ESCROW_TEMPLATE};
use crate::error::Result;
use crate::identity::Address;
use crate::ledger::types::AppId;
use crate::ledger::{LedgerRpc, TemplateCompiler, TemplateParams};
use crate::matching::tokens::app_tokens;
use crate::state::{keys, StateReader};

/// Derives the investor escrow owned by `owner` for the given matching
/// application.
///
/// Fails with [`crate::error::ClientError::NotConfigured`] when the
/// application has not created its tokens yet, and with `Compile` when
/// the template compiler rejects the parameters (fatal, never retried).
pub async fn investor_escrow(
    ledger: &dyn LedgerRpc,
    compiler: &dyn TemplateCompiler,
    app_id: AppId,
    owner: Address,
    bounds: &LoanBounds,
) -> Result<EscrowAccount> {
    let tokens = app_tokens(ledger, app_id).await?;

    let mut params = TemplateParams::new();
    params.insert("INVESTOR_ADDRESS".to_string(), owner.into());
    params.insert("MATCHING_APP_ID".to_string(), app_id.into());
    params.insert("CURRENCY_TOKEN_ID".to_string(), tokens.currency_id.into());
    params.insert("BIDDING_TOKEN_ID".to_string(), tokens.bidding_id.into());
    params.insert("ACCESS_TOKEN_ID".to_string(), tokens.access_id.into());
    params.insert("MINIMUM_VALUE".to_string(), bounds.min_value.into());
    params.insert("MAXIMUM_VALUE".to_string(), bounds.max_value.into());
    params.insert("MINIMUM_TERM".to_string(), bounds.min_term.into());
    params.insert("MAXIMUM_TERM".to_string(), bounds.max_term.into());
    params.insert("MINIMUM_INTEREST".to_string(), bounds.min_interest.into());
    params.insert("MAXIMUM_RISK".to_string(), bounds.max_risk.into());

    let program = compiler.compile(INVESTOR_ESCROW_TEMPLATE, &params).await?;
    let escrow = EscrowAccount::from_program(program);
    debug!(owner = %owner, escrow = %escrow.address(), "derived investor escrow");
    Ok(escrow)
}

/// Derives the borrower escrow owned by `owner`.
pub async fn borrower_escrow(
    ledger: &dyn LedgerRpc,
    compiler: &dyn TemplateCompiler,
    app_id: AppId,
    owner: Address,
) -> Result<EscrowAccount> {
    let reader = StateReader::new(ledger);
    let minter_id = reader.global_u64(app_id, keys::MINTER_ID).await?;
    let tokens = app_tokens(ledger, app_id).await?;

    let mut params = TemplateParams::new();
    params.insert("BORROWER_ADDRESS".to_string(), owner.into());
    params.insert("MATCHING_APP_ID".to_string(), app_id.into());
    params.insert("MINTING_APP_ID".to_string(), minter_id.into());
    params.insert("CURRENCY_TOKEN_ID".to_string(), tokens.currency_id.into());

    let program = compiler.compile(BORROWER_ESCROW_TEMPLATE, &params).await?;
    let escrow = EscrowAccount::from_program(program);
    debug!(owner = %owner, escrow = %escrow.address(), "derived borrower escrow");
    Ok(escrow)
}

/// Reads the owner of an investor escrow back out of the escrow's local
/// state on the matching application.
pub async fn investor_address_from_escrow(
    ledger: &dyn LedgerRpc,
    escrow_address: Address,
    app_id: AppId,
) -> Result<Address> {
    StateReader::new(ledger)
        .local_address(escrow_address, app_id, keys::INVESTOR_ADDRESS)
        .await
}

/// Rebuilds a full [`EscrowAccount`] from nothing but its address, via
/// the owner recorded on the ledger. Used when enumerating open escrows
/// whose owners are not known in advance.
pub async fn escrow_from_escrow_address(
    ledger: &dyn LedgerRpc,
    compiler: &dyn TemplateCompiler,
    escrow_address: Address,
    app_id: AppId,
    bounds: &LoanBounds,
) -> Result<EscrowAccount> {
    let owner = investor_address_from_escrow(ledger, escrow_address, app_id).await?;
    investor_escrow(ledger, compiler, app_id, owner, bounds).await
}
