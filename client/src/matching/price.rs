//! Invoice pricing.
//!
//! An invoice is bought at a discount to its face value. The discount is
//! simple interest over the remaining tenor:
//!
//! ```text
//! price = face / (1 + rate * tenor / seconds_in_year)
//! ```
//!
//! Rates carry [`INTEREST_SCALE`] fixed-point scaling. All intermediate
//! products are computed in `u128` so the scale factors never overflow.

use crate::config::{
    CENTS_SCALE, CURRENCY_DECIMAL_SCALE, INTEREST_SCALE, SECONDS_IN_YEAR,
};
use crate::error::{ClientError, Result};
use crate::identity::Address;
use crate::ledger::types::{AppId, AssetId};
use crate::ledger::LedgerRpc;
use crate::state::{keys, StateReader};

/// Discounted price of an invoice, in currency base units.
///
/// `face` is the invoice value in currency base units, `interest_rate`
/// is annualized and scaled by [`INTEREST_SCALE`], `tenor_seconds` is
/// the time remaining until the due date. Division happens last, so the
/// result is the floor of the exact rational price.
pub fn invoice_price(face: u64, interest_rate: u64, tenor_seconds: u64) -> Result<u64> {
    if tenor_seconds == 0 {
        return Err(ClientError::Validation(
            "invoice tenor must be positive".to_string(),
        ));
    }

    let scale = INTEREST_SCALE as u128 * SECONDS_IN_YEAR as u128;
    let numerator = face as u128 * scale;
    let denominator = scale + interest_rate as u128 * tenor_seconds as u128;

    let price = numerator / denominator;
    u64::try_from(price).map_err(|_| {
        ClientError::Validation(format!("invoice price {price} exceeds u64 range"))
    })
}

/// Face value of an invoice in currency base units, converted from the
/// on-ledger cents representation. Computed in `u128` because the scale
/// factor alone can push large cent values past the `u64` range.
pub fn invoice_face_value(value_cents: u64) -> Result<u64> {
    let face = value_cents as u128 * CURRENCY_DECIMAL_SCALE as u128 / CENTS_SCALE as u128;
    u64::try_from(face).map_err(|_| {
        ClientError::Validation(format!("invoice face value {face} exceeds u64 range"))
    })
}

/// Settlement price of the invoice currently in play.
///
/// Reads the invoice's terms out of its local state on the minting
/// application: face value in cents, annualized interest rate, and due
/// date. The remaining term runs from `as_of` when given, otherwise from
/// the bidding timeout recorded on the matching application, so that
/// every participant settles against the same reference time. Fails with
/// a validation error when the due date does not lie strictly after the
/// reference time.
pub async fn current_invoice_price(
    ledger: &dyn LedgerRpc,
    app_id: AppId,
    invoice: Address,
    as_of: Option<u64>,
) -> Result<u64> {
    let reader = StateReader::new(ledger);
    let minter_id = reader.global_u64(app_id, keys::MINTER_ID).await?;

    let value_cents = reader.local_u64(invoice, minter_id, keys::INVOICE_VALUE).await?;
    let interest_rate = reader
        .local_u64(invoice, minter_id, keys::INVOICE_INTEREST_RATE)
        .await?;
    let due_date = reader
        .local_u64(invoice, minter_id, keys::INVOICE_DUE_DATE)
        .await?;

    let reference = match as_of {
        Some(ts) => ts,
        None => reader.global_u64(app_id, keys::BIDDING_TIMEOUT).await?,
    };
    if due_date <= reference {
        return Err(ClientError::Validation(format!(
            "invoice due date {due_date} is not after reference time {reference}"
        )));
    }

    let face = invoice_face_value(value_cents)?;
    invoice_price(face, interest_rate, due_date - reference)
}

/// Asset id of the ownership token attached to a live invoice.
pub async fn invoice_ownership_token(
    ledger: &dyn LedgerRpc,
    minter_id: AppId,
    invoice: Address,
) -> Result<AssetId> {
    StateReader::new(ledger)
        .local_u64(invoice, minter_id, keys::INVOICE_ASSET_ID)
        .await
}
