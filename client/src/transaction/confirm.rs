//! Confirmation tracking.
//!
//! After a group is submitted the only safe thing to do is watch the
//! ledger until the tracked transaction is confirmed, rejected, or the
//! round budget runs out. Resubmission is never performed here: most
//! protocol operations are not idempotent and a resubmitted group under
//! fresh parameters is a distinct transaction, not a retry.
//!
//! The poll loop distinguishes three failure shapes:
//!
//! - a transient RPC failure while querying pending state is absorbed and
//!   retried (up to [`MAX_POLL_ATTEMPTS`] times, linear whole-second
//!   backoff) because the transaction may well confirm regardless;
//! - an explicit pool error is fatal immediately, the node has dropped
//!   the transaction and it will never confirm;
//! - exhausting the round budget raises [`ClientError::Timeout`] and
//!   leaves the resubmission decision to the caller.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_CONFIRMATION_ROUNDS, MAX_POLL_ATTEMPTS};
use crate::error::{ClientError, Result};
use crate::ledger::types::PendingTxn;
use crate::ledger::LedgerRpc;

/// Polls pending-transaction state with bounded retry. Only transport
/// failures are retried; whatever the node answers is returned as-is.
async fn poll_pending(ledger: &dyn LedgerRpc, txn_id: &str) -> Result<PendingTxn> {
    let mut last = String::new();
    for attempt in 0..MAX_POLL_ATTEMPTS {
        match ledger.pending_transaction(txn_id).await {
            Ok(pending) => return Ok(pending),
            Err(e) => {
                warn!(txn_id, attempt, error = %e, "pending-transaction query failed");
                last = e.to_string();
                if attempt + 1 < MAX_POLL_ATTEMPTS {
                    tokio::time::sleep(Duration::from_secs(attempt as u64 + 1)).await;
                }
            }
        }
    }
    Err(ClientError::TransientQuery {
        attempts: MAX_POLL_ATTEMPTS,
        last,
    })
}

/// Blocks until `txn_id` is confirmed, rejected, or `timeout_rounds`
/// rounds have elapsed since the call started.
pub async fn wait_for_confirmation(
    ledger: &dyn LedgerRpc,
    txn_id: &str,
    timeout_rounds: u64,
) -> Result<PendingTxn> {
    let start_round = ledger.status().await?.last_round;
    let mut last_round = start_round;
    debug!(txn_id, start_round, timeout_rounds, "awaiting confirmation");

    while last_round < start_round + timeout_rounds {
        let pending = poll_pending(ledger, txn_id).await?;

        if let Some(round) = pending.confirmed_round {
            if round > 0 {
                info!(txn_id, round, "transaction confirmed");
                return Ok(pending);
            }
        }

        if let Some(pool_error) = pending.pool_error.filter(|e| !e.is_empty()) {
            return Err(ClientError::SubmissionRejected(format!(
                "pool error: {pool_error}"
            )));
        }

        last_round += 1;
        ledger.status_after_round(last_round).await?;
    }

    Err(ClientError::Timeout {
        txn_id: txn_id.to_string(),
        rounds: timeout_rounds,
    })
}

/// [`wait_for_confirmation`] with the default round budget.
pub async fn wait_default(ledger: &dyn LedgerRpc, txn_id: &str) -> Result<PendingTxn> {
    wait_for_confirmation(ledger, txn_id, DEFAULT_CONFIRMATION_ROUNDS).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
